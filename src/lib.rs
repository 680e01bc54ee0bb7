//! # aes-rounds - AES round primitives with hardware dispatch
//!
//! This crate exposes the building blocks of AES rather than a finished
//! encryption API: the individual state transforms, the round functions in
//! three key-insertion orders, the key schedule, fixed-count batched rounds and
//! 2-way/4-way multi-lane variants. It is meant for constructions that reuse
//! the AES round as a primitive (wide-block permutations, tweakable block
//! ciphers, AES-based MACs and hashes).
//!
//! ## Features
//!
//! - **Hardware Dispatch**: AES-NI and VAES on x86-64, ARM Crypto Extensions on
//!   AArch64, selected at runtime from CPU features probed once
//! - **Identical Output**: every hardware path matches the portable
//!   implementation in [`soft`] byte for byte
//! - **Compile-time Checked Shapes**: unsupported round counts and lane counts
//!   are rejected by the type system
//! - **No-std Compatible**: without `std`, only compile-time target features
//!   are used
//!
//! The portable implementation is table-based and not constant-time.
//!
//! ## Usage
//!
//! ```rust
//! use aes_rounds::{encrypt_block, decrypt_block, round, KeySchedule};
//!
//! let schedule = KeySchedule::new(&[0u8; 16])?;
//!
//! // A single AESENC-equivalent round
//! let mut state = [0u8; 16];
//! round(&mut state, schedule.round_key(1));
//!
//! // A complete AES-128 block encryption
//! let mut block = *b"a 16-byte block!";
//! encrypt_block(&schedule, &mut block);
//! decrypt_block(&schedule.inverse(), &mut block);
//! assert_eq!(&block, b"a 16-byte block!");
//! # Ok::<(), aes_rounds::Error>(())
//! ```
//!
//! Batched rounds keep the state in a register between rounds:
//!
//! ```rust
//! use aes_rounds::{rounds_with_final, KeySchedule, RoundKeys10};
//!
//! let schedule = KeySchedule::new(&[7u8; 16])?;
//! let keys: RoundKeys10 = schedule.round_key_array(1);
//!
//! let mut block = [0u8; 16];
//! aes_rounds::soft::add_round_key(&mut block, schedule.round_key(0));
//! rounds_with_final(&mut block, &keys);
//! # Ok::<(), aes_rounds::Error>(())
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

mod block;
mod cipher;
mod cpu;
mod error;
mod intrinsics;
mod key_schedule;
mod lanes;
mod multiround;
mod single_round;
pub mod soft;
pub mod tables;
mod utils;

#[cfg(test)]
mod tests;

pub use block::{Block, Block2, Block4, Key2, Key4, LaneCount, Lanes, SupportedLanes};
pub use cipher::{
    decrypt_block, decrypt_block_aes128, decrypt_block_aes192, decrypt_block_aes256,
    decrypt_blocks, encrypt_block, encrypt_block_aes128, encrypt_block_aes192,
    encrypt_block_aes256, encrypt_blocks,
};
pub use cpu::{
    backend_name, cpu_features, optimal_parallel_blocks, use_hardware_acceleration,
    use_vector_acceleration, CpuFeatures,
};
pub use error::{Error, Result};
pub use key_schedule::{AesVariant, KeySchedule};
pub use lanes::{
    final_round_key_first_lanes, final_round_lanes, final_round_no_key_lanes,
    inv_final_round_key_first_lanes, inv_final_round_lanes, inv_final_round_no_key_lanes,
    inv_mix_columns_lanes, inv_round_key_first_lanes, inv_round_lanes, inv_round_no_key_lanes,
    inv_rounds_lanes, inv_rounds_no_key_lanes, inv_rounds_per_lane, inv_rounds_with_final_lanes,
    inv_rounds_with_final_per_lane, round_key_first_lanes, round_lanes, round_no_key_lanes,
    rounds_lanes, rounds_no_key_lanes, rounds_per_lane, rounds_with_final_lanes,
    rounds_with_final_per_lane,
};
pub use multiround::{
    inv_rounds, inv_rounds_no_key, inv_rounds_with_final, rounds, rounds_no_key,
    rounds_with_final, RoundCount, RoundKeys, RoundKeys10, RoundKeys12, RoundKeys14, RoundKeys4,
    RoundKeys6, RoundKeys7, SupportedRounds,
};
pub use single_round::{
    final_round, final_round_key_first, final_round_no_key, inv_final_round,
    inv_final_round_key_first, inv_final_round_no_key, inv_mix_columns, inv_round,
    inv_round_key_first, inv_round_no_key, round, round_key_first, round_no_key,
};
pub use soft::{
    add_round_key, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows, sub_bytes,
};
pub use utils::{xor_block, xor_in_place, xor_lanes};
