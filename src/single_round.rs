//! Single-block round operations, dispatched to the fastest available backend.
//!
//! The step order of each shape is documented on its portable counterpart in
//! [`soft`](crate::soft). Results are identical on every backend.

use crate::block::Block;
use crate::intrinsics::{dispatch, Backend, Engine};

macro_rules! keyed_round {
    ($($(#[$attr:meta])* $name:ident;)*) => {
        $(
            $(#[$attr])*
            #[inline]
            pub fn $name(block: &mut Block, key: &Block) {
                dispatch!(Engine::current(), b => b.$name(block, key))
            }
        )*
    };
}

macro_rules! unkeyed_round {
    ($($(#[$attr:meta])* $name:ident;)*) => {
        $(
            $(#[$attr])*
            #[inline]
            pub fn $name(block: &mut Block) {
                dispatch!(Engine::current(), b => b.$name(block))
            }
        )*
    };
}

keyed_round! {
    /// SubBytes, ShiftRows, MixColumns, AddRoundKey (AESENC).
    round;
    /// SubBytes, ShiftRows, AddRoundKey (AESENCLAST).
    final_round;
    /// InvShiftRows, InvSubBytes, InvMixColumns, AddRoundKey (AESDEC).
    ///
    /// Expects keys from an inverse [`KeySchedule`](crate::KeySchedule).
    inv_round;
    /// InvShiftRows, InvSubBytes, AddRoundKey (AESDECLAST).
    inv_final_round;
    /// AddRoundKey, SubBytes, ShiftRows, MixColumns.
    round_key_first;
    /// AddRoundKey, SubBytes, ShiftRows.
    final_round_key_first;
    /// InvMixColumns, InvShiftRows, InvSubBytes, AddRoundKey.
    ///
    /// Inverse of [`round_key_first`].
    inv_round_key_first;
    /// InvShiftRows, InvSubBytes, AddRoundKey.
    ///
    /// Inverse of [`final_round_key_first`].
    inv_final_round_key_first;
}

unkeyed_round! {
    /// SubBytes, ShiftRows, MixColumns.
    round_no_key;
    /// SubBytes, ShiftRows.
    final_round_no_key;
    /// InvMixColumns, InvShiftRows, InvSubBytes. Inverse of [`round_no_key`].
    inv_round_no_key;
    /// InvShiftRows, InvSubBytes. Inverse of [`final_round_no_key`].
    inv_final_round_no_key;
    /// InvMixColumns alone (AESIMC). Used to derive decryption round keys.
    inv_mix_columns;
}
