//! ARM NEON + Crypto Extensions implementation.
//!
//! AESE XORs the key *before* SubBytes and ShiftRows, and MixColumns is a
//! separate AESMC. The key-first shapes therefore map directly onto AESE/AESD,
//! while the standard shapes use a zero key and XOR the round key afterwards.

#![allow(unsafe_code)]

use core::arch::aarch64::*;

use super::Backend;
use crate::block::{Block, Lanes};
use crate::cpu::CpuFeatures;

/// ARM Crypto backend. Only constructed when the CPU supports NEON and AES.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ArmCrypto {
    _detected: (),
}

impl ArmCrypto {
    pub(crate) fn new(features: &'static CpuFeatures) -> Option<Self> {
        features.has_arm_crypto.then_some(Self { _detected: () })
    }
}

#[inline(always)]
unsafe fn load(block: &Block) -> uint8x16_t {
    vld1q_u8(block.as_ptr())
}

#[inline(always)]
unsafe fn store(block: &mut Block, v: uint8x16_t) {
    vst1q_u8(block.as_mut_ptr(), v)
}

macro_rules! keyed_impl {
    ($($name:ident => |$s:ident, $k:ident, $z:ident| $body:expr;)*) => {
        $(
            #[target_feature(enable = "neon,aes")]
            unsafe fn $name(block: &mut Block, key: &Block) {
                let $s = load(block);
                let $k = load(key);
                let $z = vdupq_n_u8(0);
                store(block, $body);
            }
        )*
    };
}

macro_rules! unkeyed_impl {
    ($($name:ident => |$s:ident, $z:ident| $body:expr;)*) => {
        $(
            #[target_feature(enable = "neon,aes")]
            unsafe fn $name(block: &mut Block) {
                let $s = load(block);
                let $z = vdupq_n_u8(0);
                store(block, $body);
            }
        )*
    };
}

keyed_impl! {
    round_impl => |s, k, z| veorq_u8(vaesmcq_u8(vaeseq_u8(s, z)), k);
    final_round_impl => |s, k, z| veorq_u8(vaeseq_u8(s, z), k);
    inv_round_impl => |s, k, z| veorq_u8(vaesimcq_u8(vaesdq_u8(s, z)), k);
    inv_final_round_impl => |s, k, z| veorq_u8(vaesdq_u8(s, z), k);
    round_key_first_impl => |s, k, _z| vaesmcq_u8(vaeseq_u8(s, k));
    final_round_key_first_impl => |s, k, _z| vaeseq_u8(s, k);
    inv_round_key_first_impl => |s, k, z| veorq_u8(vaesdq_u8(vaesimcq_u8(s), z), k);
}

unkeyed_impl! {
    round_no_key_impl => |s, z| vaesmcq_u8(vaeseq_u8(s, z));
    final_round_no_key_impl => |s, z| vaeseq_u8(s, z);
    inv_round_no_key_impl => |s, z| vaesdq_u8(vaesimcq_u8(s), z);
    inv_final_round_no_key_impl => |s, z| vaesdq_u8(s, z);
    inv_mix_columns_impl => |s, _z| vaesimcq_u8(s);
}

// The key of each round is folded into the AESE/AESD of the next one, so a
// batch costs one XOR in total instead of one per round.

#[target_feature(enable = "neon,aes")]
unsafe fn rounds_impl(block: &mut Block, keys: &[Block], with_final: bool) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    let mut s = load(block);
    let mut pending = vdupq_n_u8(0);
    for key in body {
        s = vaesmcq_u8(vaeseq_u8(s, pending));
        pending = load(key);
    }
    s = vaeseq_u8(s, pending);
    if !with_final {
        s = vaesmcq_u8(s);
    }
    store(block, veorq_u8(s, load(last)));
}

#[target_feature(enable = "neon,aes")]
unsafe fn inv_rounds_impl(block: &mut Block, keys: &[Block], with_final: bool) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    let mut s = load(block);
    let mut pending = vdupq_n_u8(0);
    for key in body {
        s = vaesimcq_u8(vaesdq_u8(s, pending));
        pending = load(key);
    }
    s = vaesdq_u8(s, pending);
    if !with_final {
        s = vaesimcq_u8(s);
    }
    store(block, veorq_u8(s, load(last)));
}

#[target_feature(enable = "neon,aes")]
unsafe fn rounds_no_key_impl(block: &mut Block, count: usize) {
    let zero = vdupq_n_u8(0);
    let mut s = load(block);
    for _ in 0..count {
        s = vaesmcq_u8(vaeseq_u8(s, zero));
    }
    store(block, s);
}

#[target_feature(enable = "neon,aes")]
unsafe fn inv_rounds_no_key_impl(block: &mut Block, count: usize) {
    let zero = vdupq_n_u8(0);
    let mut s = load(block);
    for _ in 0..count {
        s = vaesdq_u8(vaesimcq_u8(s), zero);
    }
    store(block, s);
}

/// All lanes share `keys`, interleaved so the AESE/AESMC pairs can fuse.
#[target_feature(enable = "neon,aes")]
unsafe fn rounds_lanes_impl<const L: usize>(
    blocks: &mut Lanes<L>,
    keys: &[Block],
    with_final: bool,
) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    let mut s = [vdupq_n_u8(0); L];
    for (v, block) in s.iter_mut().zip(&blocks.0) {
        *v = load(block);
    }
    let mut pending = vdupq_n_u8(0);
    for key in body {
        for v in s.iter_mut() {
            *v = vaesmcq_u8(vaeseq_u8(*v, pending));
        }
        pending = load(key);
    }
    let k = load(last);
    for (block, mut v) in blocks.0.iter_mut().zip(s) {
        v = vaeseq_u8(v, pending);
        if !with_final {
            v = vaesmcq_u8(v);
        }
        store(block, veorq_u8(v, k));
    }
}

#[target_feature(enable = "neon,aes")]
unsafe fn inv_rounds_lanes_impl<const L: usize>(
    blocks: &mut Lanes<L>,
    keys: &[Block],
    with_final: bool,
) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    let mut s = [vdupq_n_u8(0); L];
    for (v, block) in s.iter_mut().zip(&blocks.0) {
        *v = load(block);
    }
    let mut pending = vdupq_n_u8(0);
    for key in body {
        for v in s.iter_mut() {
            *v = vaesimcq_u8(vaesdq_u8(*v, pending));
        }
        pending = load(key);
    }
    let k = load(last);
    for (block, mut v) in blocks.0.iter_mut().zip(s) {
        v = vaesdq_u8(v, pending);
        if !with_final {
            v = vaesimcq_u8(v);
        }
        store(block, veorq_u8(v, k));
    }
}

impl Backend for ArmCrypto {
    #[inline]
    fn round(self, block: &mut Block, key: &Block) {
        unsafe { round_impl(block, key) }
    }

    #[inline]
    fn final_round(self, block: &mut Block, key: &Block) {
        unsafe { final_round_impl(block, key) }
    }

    #[inline]
    fn inv_round(self, block: &mut Block, key: &Block) {
        unsafe { inv_round_impl(block, key) }
    }

    #[inline]
    fn inv_final_round(self, block: &mut Block, key: &Block) {
        unsafe { inv_final_round_impl(block, key) }
    }

    #[inline]
    fn round_key_first(self, block: &mut Block, key: &Block) {
        unsafe { round_key_first_impl(block, key) }
    }

    #[inline]
    fn final_round_key_first(self, block: &mut Block, key: &Block) {
        unsafe { final_round_key_first_impl(block, key) }
    }

    #[inline]
    fn inv_round_key_first(self, block: &mut Block, key: &Block) {
        unsafe { inv_round_key_first_impl(block, key) }
    }

    #[inline]
    fn inv_final_round_key_first(self, block: &mut Block, key: &Block) {
        unsafe { inv_final_round_impl(block, key) }
    }

    #[inline]
    fn round_no_key(self, block: &mut Block) {
        unsafe { round_no_key_impl(block) }
    }

    #[inline]
    fn final_round_no_key(self, block: &mut Block) {
        unsafe { final_round_no_key_impl(block) }
    }

    #[inline]
    fn inv_round_no_key(self, block: &mut Block) {
        unsafe { inv_round_no_key_impl(block) }
    }

    #[inline]
    fn inv_final_round_no_key(self, block: &mut Block) {
        unsafe { inv_final_round_no_key_impl(block) }
    }

    #[inline]
    fn inv_mix_columns(self, block: &mut Block) {
        unsafe { inv_mix_columns_impl(block) }
    }

    fn rounds(self, block: &mut Block, keys: &[Block], with_final: bool) {
        unsafe { rounds_impl(block, keys, with_final) }
    }

    fn inv_rounds(self, block: &mut Block, keys: &[Block], with_final: bool) {
        unsafe { inv_rounds_impl(block, keys, with_final) }
    }

    fn rounds_no_key(self, block: &mut Block, count: usize) {
        unsafe { rounds_no_key_impl(block, count) }
    }

    fn inv_rounds_no_key(self, block: &mut Block, count: usize) {
        unsafe { inv_rounds_no_key_impl(block, count) }
    }

    fn rounds_lanes<const L: usize>(self, blocks: &mut Lanes<L>, keys: &[Block], with_final: bool) {
        unsafe { rounds_lanes_impl(blocks, keys, with_final) }
    }

    fn inv_rounds_lanes<const L: usize>(
        self,
        blocks: &mut Lanes<L>,
        keys: &[Block],
        with_final: bool,
    ) {
        unsafe { inv_rounds_lanes_impl(blocks, keys, with_final) }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{KeyedRound, Soft, UnkeyedRound};
    use super::*;
    use crate::cpu::cpu_features;

    #[test]
    fn test_arm_round_fips197_appendix_b() {
        let Some(arm) = ArmCrypto::new(cpu_features()) else {
            return;
        };
        let mut state = [
            0x19, 0x3d, 0xe3, 0xbe, 0xa0, 0xf4, 0xe2, 0x2b, 0x9a, 0xc6, 0x8d, 0x2a, 0xe9, 0xf8,
            0x48, 0x08,
        ];
        let key = [
            0xa0, 0xfa, 0xfe, 0x17, 0x88, 0x54, 0x2c, 0xb1, 0x23, 0xa3, 0x39, 0x39, 0x2a, 0x6c,
            0x76, 0x05,
        ];
        let expected = [
            0xa4, 0x9c, 0x7f, 0xf2, 0x68, 0x9f, 0x35, 0x2b, 0x6b, 0x5b, 0xea, 0x43, 0x02, 0x6a,
            0x50, 0x49,
        ];
        arm.round(&mut state, &key);
        assert_eq!(state, expected);
    }

    #[test]
    fn test_arm_matches_soft() {
        let Some(arm) = ArmCrypto::new(cpu_features()) else {
            return;
        };
        let block: Block = core::array::from_fn(|i| (i as u8).wrapping_mul(29) ^ 0x5c);
        let key: Block = core::array::from_fn(|i| (i as u8).wrapping_mul(13) ^ 0xa7);

        for op in [
            KeyedRound::Round,
            KeyedRound::FinalRound,
            KeyedRound::InvRound,
            KeyedRound::InvFinalRound,
            KeyedRound::RoundKeyFirst,
            KeyedRound::FinalRoundKeyFirst,
            KeyedRound::InvRoundKeyFirst,
            KeyedRound::InvFinalRoundKeyFirst,
        ] {
            let (mut hw, mut sw) = (block, block);
            arm.keyed(op, &mut hw, &key);
            Soft.keyed(op, &mut sw, &key);
            assert_eq!(hw, sw, "{op:?}");
        }

        for op in [
            UnkeyedRound::RoundNoKey,
            UnkeyedRound::FinalRoundNoKey,
            UnkeyedRound::InvRoundNoKey,
            UnkeyedRound::InvFinalRoundNoKey,
            UnkeyedRound::InvMixColumns,
        ] {
            let (mut hw, mut sw) = (block, block);
            arm.unkeyed(op, &mut hw);
            Soft.unkeyed(op, &mut sw);
            assert_eq!(hw, sw, "{op:?}");
        }
    }

    #[test]
    fn test_arm_batched_matches_soft() {
        let Some(arm) = ArmCrypto::new(cpu_features()) else {
            return;
        };
        let keys: [Block; 7] = core::array::from_fn(|i| [i as u8 * 17 + 3; 16]);
        for with_final in [false, true] {
            let blocks = Lanes::new([[0x11; 16], [0x22; 16], [0x33; 16], [0x44; 16]]);
            let (mut hw, mut sw) = (blocks, blocks);
            arm.rounds_lanes(&mut hw, &keys, with_final);
            Soft.rounds_lanes(&mut sw, &keys, with_final);
            assert_eq!(hw, sw);

            arm.inv_rounds_lanes(&mut hw, &keys, with_final);
            Soft.inv_rounds_lanes(&mut sw, &keys, with_final);
            assert_eq!(hw, sw);
        }
    }
}
