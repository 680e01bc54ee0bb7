//! Whole-block AES encryption and decryption built from the round primitives.
//!
//! These are raw block-cipher calls (no mode of operation). Decryption uses
//! the equivalent inverse cipher and therefore takes the schedule returned by
//! [`KeySchedule::inverse`].

use crate::block::{Block, Lanes};
use crate::intrinsics::{dispatch, Backend, Engine};
use crate::key_schedule::{AesVariant, KeySchedule};
use crate::lanes::gather;
use crate::multiround::{inv_rounds_with_final, rounds_with_final};
use crate::utils::{xor_in_place, xor_lanes};

/// Blocks per batch in the bulk helpers.
const BATCH: usize = 4;

#[inline]
fn check_forward(schedule: &KeySchedule) {
    assert!(
        !schedule.is_inverse(),
        "encryption requires a forward key schedule"
    );
}

#[inline]
fn check_inverse(schedule: &KeySchedule) {
    assert!(
        schedule.is_inverse(),
        "decryption requires an inverse key schedule (see KeySchedule::inverse)"
    );
}

#[inline]
fn check_variant(schedule: &KeySchedule, expected: AesVariant) {
    assert_eq!(
        schedule.variant(),
        expected,
        "key schedule has the wrong AES variant"
    );
}

/// Encrypts one block in place.
///
/// # Panics
///
/// Panics if `schedule` is an inverse schedule.
pub fn encrypt_block(schedule: &KeySchedule, block: &mut Block) {
    check_forward(schedule);
    let keys = schedule.round_keys();
    xor_in_place(block, &keys[0]);
    dispatch!(Engine::current(), b => b.rounds(block, &keys[1..], true));
}

/// Decrypts one block in place.
///
/// # Panics
///
/// Panics unless `schedule` came from [`KeySchedule::inverse`].
pub fn decrypt_block(schedule: &KeySchedule, block: &mut Block) {
    check_inverse(schedule);
    let keys = schedule.round_keys();
    xor_in_place(block, &keys[0]);
    dispatch!(Engine::current(), b => b.inv_rounds(block, &keys[1..], true));
}

macro_rules! fixed_variant {
    ($enc:ident, $dec:ident, $variant:ident, $n:literal) => {
        #[doc = concat!("Encrypts one block with a forward ", stringify!($variant), " schedule.")]
        ///
        /// # Panics
        ///
        /// Panics if the schedule is an inverse schedule or of another variant.
        pub fn $enc(schedule: &KeySchedule, block: &mut Block) {
            check_forward(schedule);
            check_variant(schedule, AesVariant::$variant);
            xor_in_place(block, schedule.round_key(0));
            rounds_with_final::<$n>(block, &schedule.round_key_array::<$n>(1));
        }

        #[doc = concat!("Decrypts one block with an inverse ", stringify!($variant), " schedule.")]
        ///
        /// # Panics
        ///
        /// Panics if the schedule is a forward schedule or of another variant.
        pub fn $dec(schedule: &KeySchedule, block: &mut Block) {
            check_inverse(schedule);
            check_variant(schedule, AesVariant::$variant);
            xor_in_place(block, schedule.round_key(0));
            inv_rounds_with_final::<$n>(block, &schedule.round_key_array::<$n>(1));
        }
    };
}

fixed_variant!(encrypt_block_aes128, decrypt_block_aes128, Aes128, 10);
fixed_variant!(encrypt_block_aes192, decrypt_block_aes192, Aes192, 12);
fixed_variant!(encrypt_block_aes256, decrypt_block_aes256, Aes256, 14);

fn process_blocks<B: Backend>(backend: B, keys: &[Block], blocks: &mut [Block], decrypt: bool) {
    let Some((first, rest)) = keys.split_first() else {
        return;
    };
    let whitening = Lanes::<BATCH>::splat(*first);

    let mut chunks = blocks.chunks_exact_mut(BATCH);
    for chunk in &mut chunks {
        let mut lanes = gather::<BATCH>(chunk);
        xor_lanes(&mut lanes, &whitening);
        if decrypt {
            backend.inv_rounds_lanes(&mut lanes, rest, true);
        } else {
            backend.rounds_lanes(&mut lanes, rest, true);
        }
        chunk.copy_from_slice(lanes.as_blocks());
    }
    for block in chunks.into_remainder() {
        xor_in_place(block, first);
        if decrypt {
            backend.inv_rounds(block, rest, true);
        } else {
            backend.rounds(block, rest, true);
        }
    }
}

/// Encrypts every block of `blocks` independently (ECB-style), four at a time.
///
/// # Panics
///
/// Panics if `schedule` is an inverse schedule.
pub fn encrypt_blocks(schedule: &KeySchedule, blocks: &mut [Block]) {
    check_forward(schedule);
    let keys = schedule.round_keys();
    dispatch!(Engine::current(), b => process_blocks(b, keys, blocks, false));
}

/// Decrypts every block of `blocks` independently, four at a time.
///
/// # Panics
///
/// Panics unless `schedule` came from [`KeySchedule::inverse`].
pub fn decrypt_blocks(schedule: &KeySchedule, blocks: &mut [Block]) {
    check_inverse(schedule);
    let keys = schedule.round_keys();
    dispatch!(Engine::current(), b => process_blocks(b, keys, blocks, true));
}
