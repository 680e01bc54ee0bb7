//! Fixed-count batched rounds.
//!
//! Every function here gives the same result as calling the single-round
//! operation `N` times with `keys[0]`, `keys[1]`, ... in order. Hardware
//! backends keep the state in a register for the whole batch.
//!
//! Supported counts are 4, 6, 7, 10, 12 and 14. Any other `N` is rejected at
//! compile time.

use crate::block::Block;
use crate::intrinsics::{dispatch, Backend, Engine};

/// `N` consecutive round keys for one batched call.
pub type RoundKeys<const N: usize> = [Block; N];

/// Round keys for a 4-round batch.
pub type RoundKeys4 = RoundKeys<4>;
/// Round keys for a 6-round batch.
pub type RoundKeys6 = RoundKeys<6>;
/// Round keys for a 7-round batch.
pub type RoundKeys7 = RoundKeys<7>;
/// Round keys for a 10-round batch (AES-128 after the whitening key).
pub type RoundKeys10 = RoundKeys<10>;
/// Round keys for a 12-round batch (AES-192 after the whitening key).
pub type RoundKeys12 = RoundKeys<12>;
/// Round keys for a 14-round batch (AES-256 after the whitening key).
pub type RoundKeys14 = RoundKeys<14>;

/// Marker type used to restrict round counts.
pub struct RoundCount<const N: usize>;

/// Implemented for the round counts that have a batched implementation.
pub trait SupportedRounds: sealed::Sealed {}

macro_rules! supported_rounds {
    ($($n:literal),*) => {
        $(
            impl SupportedRounds for RoundCount<$n> {}
            impl sealed::Sealed for RoundCount<$n> {}
        )*
    };
}

supported_rounds!(4, 6, 7, 10, 12, 14);

mod sealed {
    pub trait Sealed {}
}

/// Applies `N` [`round`](crate::round)s.
#[inline]
pub fn rounds<const N: usize>(block: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds(block, keys, false))
}

/// Applies `N - 1` [`round`](crate::round)s then a [`final_round`](crate::final_round).
///
/// With `N` equal to 10, 12 or 14 and the keys following the whitening key,
/// this completes an AES-128, AES-192 or AES-256 encryption.
#[inline]
pub fn rounds_with_final<const N: usize>(block: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds(block, keys, true))
}

/// Applies `N` [`inv_round`](crate::inv_round)s.
#[inline]
pub fn inv_rounds<const N: usize>(block: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds(block, keys, false))
}

/// Applies `N - 1` [`inv_round`](crate::inv_round)s then an
/// [`inv_final_round`](crate::inv_final_round).
#[inline]
pub fn inv_rounds_with_final<const N: usize>(block: &mut Block, keys: &RoundKeys<N>)
where
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds(block, keys, true))
}

/// Applies `N` [`round_no_key`](crate::round_no_key)s.
#[inline]
pub fn rounds_no_key<const N: usize>(block: &mut Block)
where
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.rounds_no_key(block, N))
}

/// Applies `N` [`inv_round_no_key`](crate::inv_round_no_key)s.
#[inline]
pub fn inv_rounds_no_key<const N: usize>(block: &mut Block)
where
    RoundCount<N>: SupportedRounds,
{
    dispatch!(Engine::current(), b => b.inv_rounds_no_key(block, N))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soft;

    fn keys<const N: usize>(seed: u8) -> RoundKeys<N> {
        let mut keys = [[0u8; 16]; N];
        for (i, key) in keys.iter_mut().enumerate() {
            for (j, b) in key.iter_mut().enumerate() {
                *b = seed.wrapping_mul(31).wrapping_add((i * 16 + j) as u8);
            }
        }
        keys
    }

    fn check_count<const N: usize>()
    where
        RoundCount<N>: SupportedRounds,
    {
        let keys = keys::<N>(N as u8);
        let input: Block = core::array::from_fn(|i| (i as u8).wrapping_mul(7));

        let mut expected = input;
        for k in &keys {
            soft::round(&mut expected, k);
        }
        let mut batched = input;
        rounds::<N>(&mut batched, &keys);
        assert_eq!(batched, expected, "rounds::<{N}>");

        let mut expected = input;
        for k in &keys[..N - 1] {
            soft::round(&mut expected, k);
        }
        soft::final_round(&mut expected, &keys[N - 1]);
        let mut batched = input;
        rounds_with_final::<N>(&mut batched, &keys);
        assert_eq!(batched, expected, "rounds_with_final::<{N}>");

        let mut expected = input;
        for k in &keys {
            soft::inv_round(&mut expected, k);
        }
        let mut batched = input;
        inv_rounds::<N>(&mut batched, &keys);
        assert_eq!(batched, expected, "inv_rounds::<{N}>");

        let mut expected = input;
        for k in &keys[..N - 1] {
            soft::inv_round(&mut expected, k);
        }
        soft::inv_final_round(&mut expected, &keys[N - 1]);
        let mut batched = input;
        inv_rounds_with_final::<N>(&mut batched, &keys);
        assert_eq!(batched, expected, "inv_rounds_with_final::<{N}>");

        let mut expected = input;
        for _ in 0..N {
            soft::round_no_key(&mut expected);
        }
        let mut batched = input;
        rounds_no_key::<N>(&mut batched);
        assert_eq!(batched, expected, "rounds_no_key::<{N}>");

        inv_rounds_no_key::<N>(&mut batched);
        assert_eq!(batched, input, "inv_rounds_no_key::<{N}>");
    }

    #[test]
    fn test_batched_equals_sequential() {
        check_count::<4>();
        check_count::<6>();
        check_count::<7>();
        check_count::<10>();
        check_count::<12>();
        check_count::<14>();
    }

    #[test]
    fn test_soft_batched_equals_dispatched() {
        let keys = keys::<10>(3);
        let mut a = [0x5au8; 16];
        let mut b = a;
        soft::rounds_with_final::<10>(&mut a, &keys);
        rounds_with_final::<10>(&mut b, &keys);
        assert_eq!(a, b);
    }
}
