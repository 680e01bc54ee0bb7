//! x86-64 AES-NI implementation, with VAES for multi-lane rounds.
//!
//! AESENC and friends put AddRoundKey last, so the key-first and unkeyed
//! shapes are built by XORing the key beforehand or passing an all-zero key:
//!
//! | operation                    | instructions                    |
//! |------------------------------|---------------------------------|
//! | `round_key_first(s, k)`      | `aesenc(s ^ k, 0)`              |
//! | `final_round_key_first(s, k)`| `aesenclast(s ^ k, 0)`          |
//! | `inv_round_key_first(s, k)`  | `aesdeclast(aesimc(s), k)`      |
//! | `round_no_key(s)`            | `aesenc(s, 0)`                  |
//! | `inv_round_no_key(s)`        | `aesdeclast(aesimc(s), 0)`      |
//!
//! VAES only has the standard-order instructions, so the key-first and
//! unkeyed lane operations run one xmm lane at a time.

#![allow(unsafe_code)]

use core::arch::x86_64::*;

use super::{Backend, KeyedRound};
use crate::block::{Block, Lanes};
use crate::cpu::CpuFeatures;

/// Widest register the lane operations may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum VectorWidth {
    /// AES-NI only.
    Xmm,
    /// VAES with AVX2, two blocks per register.
    Ymm,
    /// VAES with AVX-512F, four blocks per register.
    Zmm,
}

/// AES-NI backend. Only constructed when the CPU supports AES-NI.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AesNi {
    width: VectorWidth,
}

impl AesNi {
    pub(crate) fn new(features: &'static CpuFeatures) -> Option<Self> {
        if !features.has_aes_ni {
            return None;
        }
        let width = if features.lanes4_vector() {
            VectorWidth::Zmm
        } else if features.lanes2_vector() {
            VectorWidth::Ymm
        } else {
            VectorWidth::Xmm
        };
        Some(Self { width })
    }

    /// Same backend restricted to at most `width`.
    #[cfg(test)]
    pub(crate) fn narrowed(self, width: VectorWidth) -> Self {
        Self {
            width: self.width.min(width),
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self.width {
            VectorWidth::Xmm => "aes-ni",
            VectorWidth::Ymm => "aes-ni+vaes256",
            VectorWidth::Zmm => "aes-ni+vaes512",
        }
    }

    fn batch_lanes<const L: usize>(
        self,
        dir: Direction,
        blocks: &mut Lanes<L>,
        keys: &[Block],
        with_final: bool,
    ) {
        unsafe {
            match self.width {
                VectorWidth::Zmm if L % 4 == 0 => rounds_zmm(dir, &mut blocks.0, keys, with_final),
                VectorWidth::Ymm | VectorWidth::Zmm if L % 2 == 0 => {
                    rounds_ymm(dir, &mut blocks.0, keys, with_final)
                }
                _ => rounds_lanes_xmm(dir, blocks, keys, with_final),
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// Direction and final-ness of the standard keyed shapes, the only ones VAES
/// can run directly.
fn vector_shape(op: KeyedRound) -> Option<(Direction, bool)> {
    match op {
        KeyedRound::Round => Some((Direction::Forward, false)),
        KeyedRound::FinalRound => Some((Direction::Forward, true)),
        KeyedRound::InvRound => Some((Direction::Inverse, false)),
        KeyedRound::InvFinalRound => Some((Direction::Inverse, true)),
        _ => None,
    }
}

#[inline(always)]
unsafe fn load(block: &Block) -> __m128i {
    _mm_loadu_si128(block.as_ptr().cast())
}

#[inline(always)]
unsafe fn store(block: &mut Block, v: __m128i) {
    _mm_storeu_si128(block.as_mut_ptr().cast(), v)
}

macro_rules! keyed_impl {
    ($($name:ident => |$s:ident, $k:ident| $body:expr;)*) => {
        $(
            #[target_feature(enable = "aes")]
            unsafe fn $name(block: &mut Block, key: &Block) {
                let $s = load(block);
                let $k = load(key);
                store(block, $body);
            }
        )*
    };
}

macro_rules! unkeyed_impl {
    ($($name:ident => |$s:ident| $body:expr;)*) => {
        $(
            #[target_feature(enable = "aes")]
            unsafe fn $name(block: &mut Block) {
                let $s = load(block);
                store(block, $body);
            }
        )*
    };
}

keyed_impl! {
    round_impl => |s, k| _mm_aesenc_si128(s, k);
    final_round_impl => |s, k| _mm_aesenclast_si128(s, k);
    inv_round_impl => |s, k| _mm_aesdec_si128(s, k);
    inv_final_round_impl => |s, k| _mm_aesdeclast_si128(s, k);
    round_key_first_impl => |s, k| _mm_aesenc_si128(_mm_xor_si128(s, k), _mm_setzero_si128());
    final_round_key_first_impl =>
        |s, k| _mm_aesenclast_si128(_mm_xor_si128(s, k), _mm_setzero_si128());
    inv_round_key_first_impl => |s, k| _mm_aesdeclast_si128(_mm_aesimc_si128(s), k);
}

unkeyed_impl! {
    round_no_key_impl => |s| _mm_aesenc_si128(s, _mm_setzero_si128());
    final_round_no_key_impl => |s| _mm_aesenclast_si128(s, _mm_setzero_si128());
    inv_round_no_key_impl => |s| _mm_aesdeclast_si128(_mm_aesimc_si128(s), _mm_setzero_si128());
    inv_final_round_no_key_impl => |s| _mm_aesdeclast_si128(s, _mm_setzero_si128());
    inv_mix_columns_impl => |s| _mm_aesimc_si128(s);
}

#[target_feature(enable = "aes")]
#[inline]
unsafe fn xmm_round(dir: Direction, s: __m128i, k: __m128i, last: bool) -> __m128i {
    match (dir, last) {
        (Direction::Forward, false) => _mm_aesenc_si128(s, k),
        (Direction::Forward, true) => _mm_aesenclast_si128(s, k),
        (Direction::Inverse, false) => _mm_aesdec_si128(s, k),
        (Direction::Inverse, true) => _mm_aesdeclast_si128(s, k),
    }
}

#[target_feature(enable = "aes")]
unsafe fn rounds_impl(dir: Direction, block: &mut Block, keys: &[Block], with_final: bool) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    let mut s = load(block);
    for key in body {
        s = xmm_round(dir, s, load(key), false);
    }
    s = xmm_round(dir, s, load(last), with_final);
    store(block, s);
}

#[target_feature(enable = "aes")]
unsafe fn rounds_no_key_impl(block: &mut Block, count: usize) {
    let zero = _mm_setzero_si128();
    let mut s = load(block);
    for _ in 0..count {
        s = _mm_aesenc_si128(s, zero);
    }
    store(block, s);
}

#[target_feature(enable = "aes")]
unsafe fn inv_rounds_no_key_impl(block: &mut Block, count: usize) {
    let zero = _mm_setzero_si128();
    let mut s = load(block);
    for _ in 0..count {
        s = _mm_aesdeclast_si128(_mm_aesimc_si128(s), zero);
    }
    store(block, s);
}

/// All lanes share `keys`; the lanes are interleaved to hide AESENC latency.
#[target_feature(enable = "aes")]
unsafe fn rounds_lanes_xmm<const L: usize>(
    dir: Direction,
    blocks: &mut Lanes<L>,
    keys: &[Block],
    with_final: bool,
) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    let mut s = [_mm_setzero_si128(); L];
    for (v, block) in s.iter_mut().zip(&blocks.0) {
        *v = load(block);
    }
    for key in body {
        let k = load(key);
        for v in s.iter_mut() {
            *v = xmm_round(dir, *v, k, false);
        }
    }
    let k = load(last);
    for v in s.iter_mut() {
        *v = xmm_round(dir, *v, k, with_final);
    }
    for (block, v) in blocks.0.iter_mut().zip(s) {
        store(block, v);
    }
}

/// Lane `i` uses `keys[i]`.
#[target_feature(enable = "aes")]
unsafe fn rounds_per_lane_xmm<const L: usize, const N: usize>(
    dir: Direction,
    blocks: &mut Lanes<L>,
    keys: &[[Block; N]; L],
    with_final: bool,
) {
    if N == 0 {
        return;
    }
    let mut s = [_mm_setzero_si128(); L];
    for (v, block) in s.iter_mut().zip(&blocks.0) {
        *v = load(block);
    }
    for r in 0..N {
        let last = with_final && r == N - 1;
        for (v, lane_keys) in s.iter_mut().zip(keys) {
            *v = xmm_round(dir, *v, load(&lane_keys[r]), last);
        }
    }
    for (block, v) in blocks.0.iter_mut().zip(s) {
        store(block, v);
    }
}

#[target_feature(enable = "aes,avx2,vaes")]
#[inline]
unsafe fn ymm_round(dir: Direction, s: __m256i, k: __m256i, last: bool) -> __m256i {
    match (dir, last) {
        (Direction::Forward, false) => _mm256_aesenc_epi128(s, k),
        (Direction::Forward, true) => _mm256_aesenclast_epi128(s, k),
        (Direction::Inverse, false) => _mm256_aesdec_epi128(s, k),
        (Direction::Inverse, true) => _mm256_aesdeclast_epi128(s, k),
    }
}

#[target_feature(enable = "aes,avx2,avx512f,vaes")]
#[inline]
unsafe fn zmm_round(dir: Direction, s: __m512i, k: __m512i, last: bool) -> __m512i {
    match (dir, last) {
        (Direction::Forward, false) => _mm512_aesenc_epi128(s, k),
        (Direction::Forward, true) => _mm512_aesenclast_epi128(s, k),
        (Direction::Inverse, false) => _mm512_aesdec_epi128(s, k),
        (Direction::Inverse, true) => _mm512_aesdeclast_epi128(s, k),
    }
}

/// One round on pairs of lanes. `blocks.len()` must be even.
#[target_feature(enable = "aes,avx2,vaes")]
unsafe fn keyed_ymm(dir: Direction, last: bool, blocks: &mut [Block], keys: &[Block]) {
    for (pair, key_pair) in blocks.chunks_exact_mut(2).zip(keys.chunks_exact(2)) {
        let s = _mm256_loadu_si256(pair.as_ptr().cast());
        let k = _mm256_loadu_si256(key_pair.as_ptr().cast());
        _mm256_storeu_si256(pair.as_mut_ptr().cast(), ymm_round(dir, s, k, last));
    }
}

/// One round on groups of four lanes. `blocks.len()` must be a multiple of 4.
#[target_feature(enable = "aes,avx2,avx512f,vaes")]
unsafe fn keyed_zmm(dir: Direction, last: bool, blocks: &mut [Block], keys: &[Block]) {
    for (quad, key_quad) in blocks.chunks_exact_mut(4).zip(keys.chunks_exact(4)) {
        let s = _mm512_loadu_si512(quad.as_ptr().cast());
        let k = _mm512_loadu_si512(key_quad.as_ptr().cast());
        _mm512_storeu_si512(quad.as_mut_ptr().cast(), zmm_round(dir, s, k, last));
    }
}

#[target_feature(enable = "aes,avx2,vaes")]
unsafe fn rounds_ymm(dir: Direction, blocks: &mut [Block], keys: &[Block], with_final: bool) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    for pair in blocks.chunks_exact_mut(2) {
        let mut s = _mm256_loadu_si256(pair.as_ptr().cast());
        for key in body {
            s = ymm_round(dir, s, _mm256_broadcastsi128_si256(load(key)), false);
        }
        s = ymm_round(dir, s, _mm256_broadcastsi128_si256(load(last)), with_final);
        _mm256_storeu_si256(pair.as_mut_ptr().cast(), s);
    }
}

#[target_feature(enable = "aes,avx2,avx512f,vaes")]
unsafe fn rounds_zmm(dir: Direction, blocks: &mut [Block], keys: &[Block], with_final: bool) {
    let Some((last, body)) = keys.split_last() else {
        return;
    };
    for quad in blocks.chunks_exact_mut(4) {
        let mut s = _mm512_loadu_si512(quad.as_ptr().cast());
        for key in body {
            s = zmm_round(dir, s, _mm512_broadcast_i32x4(load(key)), false);
        }
        s = zmm_round(dir, s, _mm512_broadcast_i32x4(load(last)), with_final);
        _mm512_storeu_si512(quad.as_mut_ptr().cast(), s);
    }
}

impl Backend for AesNi {
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

    // Same instruction sequence as the standard inverse final round.
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

    fn keyed_lanes<const L: usize>(self, op: KeyedRound, blocks: &mut Lanes<L>, keys: &Lanes<L>) {
        if let Some((dir, last)) = vector_shape(op) {
            match self.width {
                VectorWidth::Zmm if L % 4 == 0 => {
                    unsafe { keyed_zmm(dir, last, &mut blocks.0, &keys.0) };
                    return;
                }
                VectorWidth::Ymm | VectorWidth::Zmm if L % 2 == 0 => {
                    unsafe { keyed_ymm(dir, last, &mut blocks.0, &keys.0) };
                    return;
                }
                _ => {}
            }
        }
        for (block, key) in blocks.0.iter_mut().zip(&keys.0) {
            self.keyed(op, block, key);
        }
    }

    fn rounds(self, block: &mut Block, keys: &[Block], with_final: bool) {
        unsafe { rounds_impl(Direction::Forward, block, keys, with_final) }
    }

    fn inv_rounds(self, block: &mut Block, keys: &[Block], with_final: bool) {
        unsafe { rounds_impl(Direction::Inverse, block, keys, with_final) }
    }

    fn rounds_no_key(self, block: &mut Block, count: usize) {
        unsafe { rounds_no_key_impl(block, count) }
    }

    fn inv_rounds_no_key(self, block: &mut Block, count: usize) {
        unsafe { inv_rounds_no_key_impl(block, count) }
    }

    fn rounds_lanes<const L: usize>(self, blocks: &mut Lanes<L>, keys: &[Block], with_final: bool) {
        self.batch_lanes(Direction::Forward, blocks, keys, with_final);
    }

    fn inv_rounds_lanes<const L: usize>(
        self,
        blocks: &mut Lanes<L>,
        keys: &[Block],
        with_final: bool,
    ) {
        self.batch_lanes(Direction::Inverse, blocks, keys, with_final);
    }

    fn rounds_per_lane<const L: usize, const N: usize>(
        self,
        blocks: &mut Lanes<L>,
        keys: &[[Block; N]; L],
        with_final: bool,
    ) {
        unsafe { rounds_per_lane_xmm(Direction::Forward, blocks, keys, with_final) }
    }

    fn inv_rounds_per_lane<const L: usize, const N: usize>(
        self,
        blocks: &mut Lanes<L>,
        keys: &[[Block; N]; L],
        with_final: bool,
    ) {
        unsafe { rounds_per_lane_xmm(Direction::Inverse, blocks, keys, with_final) }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Soft, UnkeyedRound};
    use super::*;
    use crate::cpu::cpu_features;

    const KEYED: [KeyedRound; 8] = [
        KeyedRound::Round,
        KeyedRound::FinalRound,
        KeyedRound::InvRound,
        KeyedRound::InvFinalRound,
        KeyedRound::RoundKeyFirst,
        KeyedRound::FinalRoundKeyFirst,
        KeyedRound::InvRoundKeyFirst,
        KeyedRound::InvFinalRoundKeyFirst,
    ];

    const UNKEYED: [UnkeyedRound; 5] = [
        UnkeyedRound::RoundNoKey,
        UnkeyedRound::FinalRoundNoKey,
        UnkeyedRound::InvRoundNoKey,
        UnkeyedRound::InvFinalRoundNoKey,
        UnkeyedRound::InvMixColumns,
    ];

    fn backends() -> Vec<AesNi> {
        let Some(aes_ni) = AesNi::new(cpu_features()) else {
            return Vec::new();
        };
        vec![
            aes_ni.narrowed(VectorWidth::Xmm),
            aes_ni.narrowed(VectorWidth::Ymm),
            aes_ni,
        ]
    }

    fn sample_lanes<const L: usize>(seed: u8) -> Lanes<L> {
        let mut lanes = Lanes::<L>::zeroed();
        for (i, b) in lanes.as_bytes_mut().iter_mut().enumerate() {
            *b = seed.wrapping_add((i as u8).wrapping_mul(37));
        }
        lanes
    }

    #[test]
    fn test_x86_round_fips197_appendix_b() {
        let Some(aes_ni) = AesNi::new(cpu_features()) else {
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
        aes_ni.round(&mut state, &key);
        assert_eq!(state, expected);
    }

    #[test]
    fn test_x86_single_block_matches_soft() {
        for aes_ni in backends() {
            let lanes = sample_lanes::<2>(0x3c);
            let (block, key) = (lanes[0], lanes[1]);
            for op in KEYED {
                let mut hw = block;
                let mut sw = block;
                aes_ni.keyed(op, &mut hw, &key);
                Soft.keyed(op, &mut sw, &key);
                assert_eq!(hw, sw, "{op:?}");
            }
            for op in UNKEYED {
                let mut hw = block;
                let mut sw = block;
                aes_ni.unkeyed(op, &mut hw);
                Soft.unkeyed(op, &mut sw);
                assert_eq!(hw, sw, "{op:?}");
            }
        }
    }

    #[test]
    fn test_x86_lanes_match_soft() {
        for aes_ni in backends() {
            for op in KEYED {
                let blocks = sample_lanes::<4>(1);
                let keys = sample_lanes::<4>(2);
                let (mut hw, mut sw) = (blocks, blocks);
                aes_ni.keyed_lanes(op, &mut hw, &keys);
                Soft.keyed_lanes(op, &mut sw, &keys);
                assert_eq!(hw, sw, "{} {op:?} x4", aes_ni.name());

                let blocks = sample_lanes::<2>(3);
                let keys = sample_lanes::<2>(4);
                let (mut hw, mut sw) = (blocks, blocks);
                aes_ni.keyed_lanes(op, &mut hw, &keys);
                Soft.keyed_lanes(op, &mut sw, &keys);
                assert_eq!(hw, sw, "{} {op:?} x2", aes_ni.name());
            }
        }
    }

    #[test]
    fn test_x86_batched_lanes_match_soft() {
        for aes_ni in backends() {
            let keys = sample_lanes::<4>(9).into_blocks();
            for with_final in [false, true] {
                let blocks = sample_lanes::<4>(5);
                let (mut hw, mut sw) = (blocks, blocks);
                aes_ni.rounds_lanes(&mut hw, &keys, with_final);
                Soft.rounds_lanes(&mut sw, &keys, with_final);
                assert_eq!(hw, sw);

                aes_ni.inv_rounds_lanes(&mut hw, &keys, with_final);
                Soft.inv_rounds_lanes(&mut sw, &keys, with_final);
                assert_eq!(hw, sw);

                let blocks = sample_lanes::<2>(6);
                let per_lane = [keys, sample_lanes::<4>(10).into_blocks()];
                let (mut hw, mut sw) = (blocks, blocks);
                aes_ni.rounds_per_lane(&mut hw, &per_lane, with_final);
                Soft.rounds_per_lane(&mut sw, &per_lane, with_final);
                assert_eq!(hw, sw);

                aes_ni.inv_rounds_per_lane(&mut hw, &per_lane, with_final);
                Soft.inv_rounds_per_lane(&mut sw, &per_lane, with_final);
                assert_eq!(hw, sw);
            }
        }
    }
}
