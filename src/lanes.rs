//! Multi-lane round operations on [`Block2`](crate::Block2) and
//! [`Block4`](crate::Block4).
//!
//! Lane `i` of the output is always the single-block operation applied to lane
//! `i` of the input with lane `i`'s key. With VAES the standard-order rounds
//! run two or four lanes per instruction; the key-first and unkeyed shapes,
//! and [`inv_mix_columns_lanes`], run one lane at a time on the single-block
//! hardware path.

use crate::block::{Block, LaneCount, Lanes, SupportedLanes};
use crate::intrinsics::{dispatch, Backend, Engine, KeyedRound, UnkeyedRound};
use crate::multiround::{RoundCount, RoundKeys, SupportedRounds};

macro_rules! keyed_lanes {
    ($($(#[$attr:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$attr])*
            #[inline]
            pub fn $name<const L: usize>(blocks: &mut Lanes<L>, keys: &Lanes<L>)
            where
                LaneCount<L>: SupportedLanes,
            {
                dispatch!(Engine::current(), b => b.keyed_lanes(KeyedRound::$op, blocks, keys))
            }
        )*
    };
}

macro_rules! unkeyed_lanes {
    ($($(#[$attr:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$attr])*
            #[inline]
            pub fn $name<const L: usize>(blocks: &mut Lanes<L>)
            where
                LaneCount<L>: SupportedLanes,
            {
                dispatch!(Engine::current(), b => b.unkeyed_lanes(UnkeyedRound::$op, blocks))
            }
        )*
    };
}

keyed_lanes! {
    /// [`round`](crate::round) on every lane with that lane's key.
    round_lanes => Round;
    /// [`final_round`](crate::final_round) on every lane with that lane's key.
    final_round_lanes => FinalRound;
    /// [`inv_round`](crate::inv_round) on every lane with that lane's key.
    inv_round_lanes => InvRound;
    /// [`inv_final_round`](crate::inv_final_round) on every lane with that lane's key.
    inv_final_round_lanes => InvFinalRound;
    /// [`round_key_first`](crate::round_key_first) on every lane with that lane's key.
    round_key_first_lanes => RoundKeyFirst;
    /// [`final_round_key_first`](crate::final_round_key_first) on every lane.
    final_round_key_first_lanes => FinalRoundKeyFirst;
    /// [`inv_round_key_first`](crate::inv_round_key_first) on every lane.
    inv_round_key_first_lanes => InvRoundKeyFirst;
    /// [`inv_final_round_key_first`](crate::inv_final_round_key_first) on every lane.
    inv_final_round_key_first_lanes => InvFinalRoundKeyFirst;
}

unkeyed_lanes! {
    /// [`round_no_key`](crate::round_no_key) on every lane.
    round_no_key_lanes => RoundNoKey;
    /// [`final_round_no_key`](crate::final_round_no_key) on every lane.
    final_round_no_key_lanes => FinalRoundNoKey;
    /// [`inv_round_no_key`](crate::inv_round_no_key) on every lane.
    inv_round_no_key_lanes => InvRoundNoKey;
    /// [`inv_final_round_no_key`](crate::inv_final_round_no_key) on every lane.
    inv_final_round_no_key_lanes => InvFinalRoundNoKey;
    /// [`inv_mix_columns`](crate::inv_mix_columns) on every lane.
    inv_mix_columns_lanes => InvMixColumns;
}

/// [`rounds`](crate::rounds) on every lane; all lanes share `keys`.
#[inline]
pub fn rounds_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>, keys: &RoundKeys<N>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds_lanes(blocks, keys, false))
}

/// [`rounds_with_final`](crate::rounds_with_final) on every lane; all lanes
/// share `keys`.
#[inline]
pub fn rounds_with_final_lanes<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &RoundKeys<N>,
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds_lanes(blocks, keys, true))
}

/// [`inv_rounds`](crate::inv_rounds) on every lane; all lanes share `keys`.
#[inline]
pub fn inv_rounds_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>, keys: &RoundKeys<N>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds_lanes(blocks, keys, false))
}

/// [`inv_rounds_with_final`](crate::inv_rounds_with_final) on every lane; all
/// lanes share `keys`.
#[inline]
pub fn inv_rounds_with_final_lanes<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &RoundKeys<N>,
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds_lanes(blocks, keys, true))
}

/// [`rounds_no_key`](crate::rounds_no_key) on every lane.
#[inline]
pub fn rounds_no_key_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds_no_key_lanes(blocks, N))
}

/// [`inv_rounds_no_key`](crate::inv_rounds_no_key) on every lane.
#[inline]
pub fn inv_rounds_no_key_lanes<const L: usize, const N: usize>(blocks: &mut Lanes<L>)
where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds_no_key_lanes(blocks, N))
}

/// [`rounds`](crate::rounds) on every lane; lane `i` uses `keys[i]`.
#[inline]
pub fn rounds_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds_per_lane(blocks, keys, false))
}

/// [`rounds_with_final`](crate::rounds_with_final) on every lane; lane `i`
/// uses `keys[i]`.
#[inline]
pub fn rounds_with_final_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds_per_lane(blocks, keys, true))
}

/// [`inv_rounds`](crate::inv_rounds) on every lane; lane `i` uses `keys[i]`.
#[inline]
pub fn inv_rounds_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds_per_lane(blocks, keys, false))
}

/// [`inv_rounds_with_final`](crate::inv_rounds_with_final) on every lane;
/// lane `i` uses `keys[i]`.
#[inline]
pub fn inv_rounds_with_final_per_lane<const L: usize, const N: usize>(
    blocks: &mut Lanes<L>,
    keys: &[RoundKeys<N>; L],
) where
    LaneCount<L>: SupportedLanes,
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds_per_lane(blocks, keys, true))
}

/// Copies exactly `L` blocks into lanes.
#[inline]
pub(crate) fn gather<const L: usize>(blocks: &[Block]) -> Lanes<L> {
    let mut lanes = Lanes::<L>::zeroed();
    lanes.0.copy_from_slice(blocks);
    lanes
}
