//! Backend selection for AES round operations.
//!
//! Each backend implements the single-block operations. Batched and
//! multi-lane operations have portable default bodies built from those, and
//! the hardware backends override the ones they can do better in registers.
//!
//! A hardware backend value is only ever built from detected CPU features, so
//! holding one is proof that its instructions are available.

use crate::block::{Block, Lanes};
use crate::cpu::{cpu_features, CpuFeatures};

/// The eight keyed round shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyedRound {
    Round,
    FinalRound,
    InvRound,
    InvFinalRound,
    RoundKeyFirst,
    FinalRoundKeyFirst,
    InvRoundKeyFirst,
    InvFinalRoundKeyFirst,
}

/// The unkeyed round shapes, plus InvMixColumns on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnkeyedRound {
    RoundNoKey,
    FinalRoundNoKey,
    InvRoundNoKey,
    InvFinalRoundNoKey,
    InvMixColumns,
}

pub(crate) trait Backend: Copy {
    fn round(self, block: &mut Block, key: &Block);
    fn final_round(self, block: &mut Block, key: &Block);
    fn inv_round(self, block: &mut Block, key: &Block);
    fn inv_final_round(self, block: &mut Block, key: &Block);
    fn round_key_first(self, block: &mut Block, key: &Block);
    fn final_round_key_first(self, block: &mut Block, key: &Block);
    fn inv_round_key_first(self, block: &mut Block, key: &Block);
    fn inv_final_round_key_first(self, block: &mut Block, key: &Block);
    fn round_no_key(self, block: &mut Block);
    fn final_round_no_key(self, block: &mut Block);
    fn inv_round_no_key(self, block: &mut Block);
    fn inv_final_round_no_key(self, block: &mut Block);
    fn inv_mix_columns(self, block: &mut Block);

    #[inline]
    fn keyed(self, op: KeyedRound, block: &mut Block, key: &Block) {
        match op {
            KeyedRound::Round => self.round(block, key),
            KeyedRound::FinalRound => self.final_round(block, key),
            KeyedRound::InvRound => self.inv_round(block, key),
            KeyedRound::InvFinalRound => self.inv_final_round(block, key),
            KeyedRound::RoundKeyFirst => self.round_key_first(block, key),
            KeyedRound::FinalRoundKeyFirst => self.final_round_key_first(block, key),
            KeyedRound::InvRoundKeyFirst => self.inv_round_key_first(block, key),
            KeyedRound::InvFinalRoundKeyFirst => self.inv_final_round_key_first(block, key),
        }
    }

    #[inline]
    fn unkeyed(self, op: UnkeyedRound, block: &mut Block) {
        match op {
            UnkeyedRound::RoundNoKey => self.round_no_key(block),
            UnkeyedRound::FinalRoundNoKey => self.final_round_no_key(block),
            UnkeyedRound::InvRoundNoKey => self.inv_round_no_key(block),
            UnkeyedRound::InvFinalRoundNoKey => self.inv_final_round_no_key(block),
            UnkeyedRound::InvMixColumns => self.inv_mix_columns(block),
        }
    }

    #[inline]
    fn keyed_lanes<const L: usize>(self, op: KeyedRound, blocks: &mut Lanes<L>, keys: &Lanes<L>) {
        for (block, key) in blocks.0.iter_mut().zip(&keys.0) {
            self.keyed(op, block, key);
        }
    }

    #[inline]
    fn unkeyed_lanes<const L: usize>(self, op: UnkeyedRound, blocks: &mut Lanes<L>) {
        for block in blocks.0.iter_mut() {
            self.unkeyed(op, block);
        }
    }

    /// Standard rounds with `keys` in order; the last one is a final round
    /// when `with_final` is set.
    fn rounds(self, block: &mut Block, keys: &[Block], with_final: bool) {
        let Some((last, body)) = keys.split_last() else {
            return;
        };
        for key in body {
            self.round(block, key);
        }
        if with_final {
            self.final_round(block, last);
        } else {
            self.round(block, last);
        }
    }

    fn inv_rounds(self, block: &mut Block, keys: &[Block], with_final: bool) {
        let Some((last, body)) = keys.split_last() else {
            return;
        };
        for key in body {
            self.inv_round(block, key);
        }
        if with_final {
            self.inv_final_round(block, last);
        } else {
            self.inv_round(block, last);
        }
    }

    fn rounds_no_key(self, block: &mut Block, count: usize) {
        for _ in 0..count {
            self.round_no_key(block);
        }
    }

    fn inv_rounds_no_key(self, block: &mut Block, count: usize) {
        for _ in 0..count {
            self.inv_round_no_key(block);
        }
    }

    fn rounds_lanes<const L: usize>(self, blocks: &mut Lanes<L>, keys: &[Block], with_final: bool) {
        for block in blocks.0.iter_mut() {
            self.rounds(block, keys, with_final);
        }
    }

    fn inv_rounds_lanes<const L: usize>(
        self,
        blocks: &mut Lanes<L>,
        keys: &[Block],
        with_final: bool,
    ) {
        for block in blocks.0.iter_mut() {
            self.inv_rounds(block, keys, with_final);
        }
    }

    fn rounds_no_key_lanes<const L: usize>(self, blocks: &mut Lanes<L>, count: usize) {
        for block in blocks.0.iter_mut() {
            self.rounds_no_key(block, count);
        }
    }

    fn inv_rounds_no_key_lanes<const L: usize>(self, blocks: &mut Lanes<L>, count: usize) {
        for block in blocks.0.iter_mut() {
            self.inv_rounds_no_key(block, count);
        }
    }

    fn rounds_per_lane<const L: usize, const N: usize>(
        self,
        blocks: &mut Lanes<L>,
        keys: &[[Block; N]; L],
        with_final: bool,
    ) {
        for (block, keys) in blocks.0.iter_mut().zip(keys) {
            self.rounds(block, keys, with_final);
        }
    }

    fn inv_rounds_per_lane<const L: usize, const N: usize>(
        self,
        blocks: &mut Lanes<L>,
        keys: &[[Block; N]; L],
        with_final: bool,
    ) {
        for (block, keys) in blocks.0.iter_mut().zip(keys) {
            self.inv_rounds(block, keys, with_final);
        }
    }
}

/// The backend picked for this process.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Engine {
    Soft(Soft),
    #[cfg(target_arch = "x86_64")]
    AesNi(x86_64::AesNi),
    #[cfg(target_arch = "aarch64")]
    ArmCrypto(aarch64::ArmCrypto),
}

impl Engine {
    /// Backend matching the detected CPU features.
    #[inline]
    pub(crate) fn current() -> Self {
        Self::select(cpu_features())
    }

    #[inline]
    fn select(features: &'static CpuFeatures) -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if let Some(aes_ni) = x86_64::AesNi::new(features) {
                return Engine::AesNi(aes_ni);
            }
        }
        #[cfg(target_arch = "aarch64")]
        {
            if let Some(arm) = aarch64::ArmCrypto::new(features) {
                return Engine::ArmCrypto(arm);
            }
        }
        let _ = features;
        Engine::Soft(Soft)
    }

    /// Short backend name, for diagnostics.
    pub(crate) fn name(self) -> &'static str {
        match self {
            Engine::Soft(_) => "soft",
            #[cfg(target_arch = "x86_64")]
            Engine::AesNi(aes_ni) => aes_ni.name(),
            #[cfg(target_arch = "aarch64")]
            Engine::ArmCrypto(_) => "arm-crypto",
        }
    }
}

/// Runs `$body` with `$b` bound to the concrete backend held by `$engine`.
macro_rules! dispatch {
    ($engine:expr, $b:ident => $body:expr) => {
        match $engine {
            $crate::intrinsics::Engine::Soft($b) => $body,
            #[cfg(target_arch = "x86_64")]
            $crate::intrinsics::Engine::AesNi($b) => $body,
            #[cfg(target_arch = "aarch64")]
            $crate::intrinsics::Engine::ArmCrypto($b) => $body,
        }
    };
}

pub(crate) use dispatch;

#[cfg(target_arch = "aarch64")]
mod aarch64;

#[cfg(target_arch = "x86_64")]
mod x86_64;

mod fallback;

pub(crate) use fallback::Soft;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_matches_detected_features() {
        let engine = Engine::current();
        let features = cpu_features();
        match engine {
            Engine::Soft(_) => assert!(!features.use_hardware_acceleration()),
            #[cfg(target_arch = "x86_64")]
            Engine::AesNi(_) => assert!(features.has_aes_ni),
            #[cfg(target_arch = "aarch64")]
            Engine::ArmCrypto(_) => assert!(features.has_arm_crypto),
        }
        assert!(!engine.name().is_empty());
    }

    #[test]
    fn test_default_rounds_with_empty_keys_is_identity() {
        let mut block = [0x42u8; 16];
        Soft.rounds(&mut block, &[], true);
        Soft.inv_rounds(&mut block, &[], false);
        assert_eq!(block, [0x42u8; 16]);
    }
}
