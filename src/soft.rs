//! Portable implementation of every AES primitive.
//!
//! The functions in this module never use hardware instructions. They define
//! the reference output: every hardware backend must match them byte for byte.
//!
//! State layout is column-major, as in FIPS-197: byte `state[r + 4 * c]` is
//! row `r` of column `c`.
//!
//! The S-box lookups are table-based and are not constant-time.

use crate::block::{Block, LaneCount, Lanes, SupportedLanes};
use crate::intrinsics::{Backend, Soft};
use crate::multiround::{RoundCount, RoundKeys, SupportedRounds};
use crate::tables::{gf_double, mul11, mul13, mul14, mul3, mul9, INV_SBOX, SBOX};

// State transforms

/// Substitutes every byte through the S-box.
#[inline]
pub fn sub_bytes(state: &mut Block) {
    for b in state.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

/// Substitutes every byte through the inverse S-box.
#[inline]
pub fn inv_sub_bytes(state: &mut Block) {
    for b in state.iter_mut() {
        *b = INV_SBOX[*b as usize];
    }
}

/// Rotates row `r` left by `r` positions.
#[inline]
pub fn shift_rows(state: &mut Block) {
    let s = *state;
    for c in 0..4 {
        for r in 1..4 {
            state[r + 4 * c] = s[r + 4 * ((c + r) % 4)];
        }
    }
}

/// Rotates row `r` right by `r` positions.
#[inline]
pub fn inv_shift_rows(state: &mut Block) {
    let s = *state;
    for c in 0..4 {
        for r in 1..4 {
            state[r + 4 * ((c + r) % 4)] = s[r + 4 * c];
        }
    }
}

/// Multiplies each column by the fixed polynomial `{03}x^3 + {01}x^2 + {01}x + {02}`.
#[inline]
pub fn mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        col[0] = gf_double(a0) ^ mul3(a1) ^ a2 ^ a3;
        col[1] = a0 ^ gf_double(a1) ^ mul3(a2) ^ a3;
        col[2] = a0 ^ a1 ^ gf_double(a2) ^ mul3(a3);
        col[3] = mul3(a0) ^ a1 ^ a2 ^ gf_double(a3);
    }
}

/// Multiplies each column by `{0b}x^3 + {0d}x^2 + {09}x + {0e}`, the inverse of
/// [`mix_columns`].
#[inline]
pub fn inv_mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        col[0] = mul14(a0) ^ mul11(a1) ^ mul13(a2) ^ mul9(a3);
        col[1] = mul9(a0) ^ mul14(a1) ^ mul11(a2) ^ mul13(a3);
        col[2] = mul13(a0) ^ mul9(a1) ^ mul14(a2) ^ mul11(a3);
        col[3] = mul11(a0) ^ mul13(a1) ^ mul9(a2) ^ mul14(a3);
    }
}

/// XORs the round key into the state. Self-inverse.
#[inline]
pub fn add_round_key(state: &mut Block, key: &Block) {
    for (s, k) in state.iter_mut().zip(key) {
        *s ^= k;
    }
}

// Round compositions

/// SubBytes, ShiftRows, MixColumns, AddRoundKey.
#[inline]
pub fn round(state: &mut Block, key: &Block) {
    round_no_key(state);
    add_round_key(state, key);
}

/// SubBytes, ShiftRows, AddRoundKey.
#[inline]
pub fn final_round(state: &mut Block, key: &Block) {
    final_round_no_key(state);
    add_round_key(state, key);
}

/// InvShiftRows, InvSubBytes, InvMixColumns, AddRoundKey.
///
/// This is the equivalent-inverse-cipher round: it expects round keys that
/// already went through InvMixColumns (see [`KeySchedule::inverse`]).
///
/// [`KeySchedule::inverse`]: crate::KeySchedule::inverse
#[inline]
pub fn inv_round(state: &mut Block, key: &Block) {
    inv_final_round_no_key(state);
    inv_mix_columns(state);
    add_round_key(state, key);
}

/// InvShiftRows, InvSubBytes, AddRoundKey.
#[inline]
pub fn inv_final_round(state: &mut Block, key: &Block) {
    inv_final_round_no_key(state);
    add_round_key(state, key);
}

/// AddRoundKey, SubBytes, ShiftRows, MixColumns.
#[inline]
pub fn round_key_first(state: &mut Block, key: &Block) {
    add_round_key(state, key);
    round_no_key(state);
}

/// AddRoundKey, SubBytes, ShiftRows.
#[inline]
pub fn final_round_key_first(state: &mut Block, key: &Block) {
    add_round_key(state, key);
    final_round_no_key(state);
}

/// InvMixColumns, InvShiftRows, InvSubBytes, AddRoundKey.
///
/// Exact inverse of [`round_key_first`].
#[inline]
pub fn inv_round_key_first(state: &mut Block, key: &Block) {
    inv_round_no_key(state);
    add_round_key(state, key);
}

/// InvShiftRows, InvSubBytes, AddRoundKey.
///
/// Exact inverse of [`final_round_key_first`].
#[inline]
pub fn inv_final_round_key_first(state: &mut Block, key: &Block) {
    inv_final_round_no_key(state);
    add_round_key(state, key);
}

/// SubBytes, ShiftRows, MixColumns.
#[inline]
pub fn round_no_key(state: &mut Block) {
    sub_bytes(state);
    shift_rows(state);
    mix_columns(state);
}

/// SubBytes, ShiftRows.
#[inline]
pub fn final_round_no_key(state: &mut Block) {
    sub_bytes(state);
    shift_rows(state);
}

/// InvMixColumns, InvShiftRows, InvSubBytes. Exact inverse of [`round_no_key`].
#[inline]
pub fn inv_round_no_key(state: &mut Block) {
    inv_mix_columns(state);
    inv_shift_rows(state);
    inv_sub_bytes(state);
}

/// InvShiftRows, InvSubBytes. Exact inverse of [`final_round_no_key`].
#[inline]
pub fn inv_final_round_no_key(state: &mut Block) {
    inv_shift_rows(state);
    inv_sub_bytes(state);
}

// Batched rounds

/// `N` consecutive [`round`]s with `keys[0..N]`.
pub fn rounds<const N: usize>(state: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds(state, keys, false);
}

/// `N - 1` [`round`]s followed by a [`final_round`] with `keys[N - 1]`.
pub fn rounds_with_final<const N: usize>(state: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds(state, keys, true);
}

/// `N` consecutive [`inv_round`]s with `keys[0..N]`.
pub fn inv_rounds<const N: usize>(state: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds(state, keys, false);
}

/// `N - 1` [`inv_round`]s followed by an [`inv_final_round`].
pub fn inv_rounds_with_final<const N: usize>(state: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds(state, keys, true);
}

/// `N` consecutive [`round_no_key`]s.
pub fn rounds_no_key<const N: usize>(state: &mut Block)
where
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds_no_key(state, N);
}

/// `N` consecutive [`inv_round_no_key`]s.
pub fn inv_rounds_no_key<const N: usize>(state: &mut Block)
where
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds_no_key(state, N);
}

// Lanes

macro_rules! soft_keyed_lanes {
    ($($(#[$attr:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$attr])*
            pub fn $name<const L: usize>(blocks: &mut Lanes<L>, keys: &Lanes<L>)
            where
                LaneCount<L>: SupportedLanes,
            {
                Soft.keyed_lanes(crate::intrinsics::KeyedRound::$op, blocks, keys);
            }
        )*
    };
}

macro_rules! soft_unkeyed_lanes {
    ($($(#[$attr:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$attr])*
            pub fn $name<const L: usize>(blocks: &mut Lanes<L>)
            where
                LaneCount<L>: SupportedLanes,
            {
                Soft.unkeyed_lanes(crate::intrinsics::UnkeyedRound::$op, blocks);
            }
        )*
    };
}

soft_keyed_lanes! {
    /// [`round`] on every lane with that lane's key.
    round_lanes => Round;
    /// [`final_round`] on every lane with that lane's key.
    final_round_lanes => FinalRound;
    /// [`inv_round`] on every lane with that lane's key.
    inv_round_lanes => InvRound;
    /// [`inv_final_round`] on every lane with that lane's key.
    inv_final_round_lanes => InvFinalRound;
    /// [`round_key_first`] on every lane with that lane's key.
    round_key_first_lanes => RoundKeyFirst;
    /// [`final_round_key_first`] on every lane with that lane's key.
    final_round_key_first_lanes => FinalRoundKeyFirst;
    /// [`inv_round_key_first`] on every lane with that lane's key.
    inv_round_key_first_lanes => InvRoundKeyFirst;
    /// [`inv_final_round_key_first`] on every lane with that lane's key.
    inv_final_round_key_first_lanes => InvFinalRoundKeyFirst;
}

soft_unkeyed_lanes! {
    /// [`round_no_key`] on every lane.
    round_no_key_lanes => RoundNoKey;
    /// [`final_round_no_key`] on every lane.
    final_round_no_key_lanes => FinalRoundNoKey;
    /// [`inv_round_no_key`] on every lane.
    inv_round_no_key_lanes => InvRoundNoKey;
    /// [`inv_final_round_no_key`] on every lane.
    inv_final_round_no_key_lanes => InvFinalRoundNoKey;
    /// [`inv_mix_columns`] on every lane.
    inv_mix_columns_lanes => InvMixColumns;
}

/// [`rounds`] on every lane, all lanes sharing `keys`.
pub fn rounds_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>, keys: &RoundKeys<N>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds_lanes(blocks, keys, false);
}

/// [`rounds_with_final`] on every lane, all lanes sharing `keys`.
pub fn rounds_with_final_lanes<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &RoundKeys<N>,
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds_lanes(blocks, keys, true);
}

/// [`inv_rounds`] on every lane, all lanes sharing `keys`.
pub fn inv_rounds_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>, keys: &RoundKeys<N>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds_lanes(blocks, keys, false);
}

/// [`inv_rounds_with_final`] on every lane, all lanes sharing `keys`.
pub fn inv_rounds_with_final_lanes<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &RoundKeys<N>,
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds_lanes(blocks, keys, true);
}

/// [`rounds_no_key`] on every lane.
pub fn rounds_no_key_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds_no_key_lanes(blocks, N);
}

/// [`inv_rounds_no_key`] on every lane.
pub fn inv_rounds_no_key_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds_no_key_lanes(blocks, N);
}

/// [`rounds`] on every lane, lane `i` using `keys[i]`.
pub fn rounds_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds_per_lane(blocks, keys, false);
}

/// [`rounds_with_final`] on every lane, lane `i` using `keys[i]`.
pub fn rounds_with_final_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.rounds_per_lane(blocks, keys, true);
}

/// [`inv_rounds`] on every lane, lane `i` using `keys[i]`.
pub fn inv_rounds_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds_per_lane(blocks, keys, false);
}

/// [`inv_rounds_with_final`] on every lane, lane `i` using `keys[i]`.
pub fn inv_rounds_with_final_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    Soft.inv_rounds_per_lane(blocks, keys, true);
}
