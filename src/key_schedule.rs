//! AES key expansion and the equivalent-inverse-cipher schedule.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::Block;
use crate::error::{Error, Result};
use crate::intrinsics::{dispatch, Backend, Engine};
use crate::tables::{RCON, SBOX};

/// Maximum number of round keys (AES-256).
const MAX_ROUND_KEYS: usize = 15;

/// The three AES key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AesVariant {
    /// 16-byte key, 10 rounds.
    Aes128,
    /// 24-byte key, 12 rounds.
    Aes192,
    /// 32-byte key, 14 rounds.
    Aes256,
}

impl AesVariant {
    /// Variant for a key of `len` bytes.
    pub const fn from_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(AesVariant::Aes128),
            24 => Some(AesVariant::Aes192),
            32 => Some(AesVariant::Aes256),
            _ => None,
        }
    }

    /// Key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            AesVariant::Aes128 => 16,
            AesVariant::Aes192 => 24,
            AesVariant::Aes256 => 32,
        }
    }

    /// Number of rounds.
    pub const fn rounds(self) -> usize {
        match self {
            AesVariant::Aes128 => 10,
            AesVariant::Aes192 => 12,
            AesVariant::Aes256 => 14,
        }
    }
}

/// Expanded round keys for one AES key.
///
/// Holds `rounds() + 1` round keys. For a forward schedule key 0 is the raw
/// key (first 16 bytes of it for AES-192/256). The keys are wiped on drop,
/// and a live schedule cannot be wiped in place:
///
/// ```compile_fail
/// use zeroize::Zeroize;
///
/// let mut schedule = aes_rounds::KeySchedule::new(&[0u8; 16]).unwrap();
/// schedule.zeroize();
/// ```
#[derive(Clone)]
pub struct KeySchedule {
    keys: [Block; MAX_ROUND_KEYS],
    rounds: usize,
    inverse: bool,
}

impl KeySchedule {
    /// Expands a 16, 24 or 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`] for any other length.
    pub fn new(key: &[u8]) -> Result<Self> {
        let variant = AesVariant::from_key_len(key.len()).ok_or(Error::InvalidKeyLength)?;
        let rounds = variant.rounds();

        let mut words = [0u32; 4 * MAX_ROUND_KEYS];
        expand_key(key, &mut words[..4 * (rounds + 1)]);

        let mut keys = [[0u8; 16]; MAX_ROUND_KEYS];
        for (block, chunk) in keys.iter_mut().zip(words.chunks_exact(4)).take(rounds + 1) {
            for (dst, word) in block.chunks_exact_mut(4).zip(chunk) {
                dst.copy_from_slice(&word.to_be_bytes());
            }
        }
        words.zeroize();

        Ok(Self {
            keys,
            rounds,
            inverse: false,
        })
    }

    /// Number of rounds: 10, 12 or 14.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Key size this schedule was expanded from.
    pub fn variant(&self) -> AesVariant {
        match self.rounds {
            10 => AesVariant::Aes128,
            12 => AesVariant::Aes192,
            14 => AesVariant::Aes256,
            rounds => unreachable!("key schedule with {rounds} rounds"),
        }
    }

    /// Whether this is an equivalent-inverse-cipher schedule.
    #[inline]
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Round key `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i > rounds()`.
    #[inline]
    pub fn round_key(&self, i: usize) -> &Block {
        assert!(
            i <= self.rounds,
            "round key index {i} out of range for {} rounds",
            self.rounds
        );
        &self.keys[i]
    }

    /// All `rounds() + 1` round keys.
    #[inline]
    pub fn round_keys(&self) -> &[Block] {
        &self.keys[..=self.rounds]
    }

    /// `N` consecutive round keys starting at `first`, for the batched rounds.
    ///
    /// # Panics
    ///
    /// Panics if `first + N > rounds() + 1`.
    pub fn round_key_array<const N: usize>(&self, first: usize) -> [Block; N] {
        let end = first
            .checked_add(N)
            .filter(|&end| end <= self.rounds + 1);
        let Some(end) = end else {
            panic!(
                "round keys {first}..{first}+{N} out of range for {} rounds",
                self.rounds
            );
        };
        let mut out = [[0u8; 16]; N];
        out.copy_from_slice(&self.keys[first..end]);
        out
    }

    /// Derives the decryption schedule for the equivalent inverse cipher.
    ///
    /// The first and last keys swap places, and the interior keys are reversed
    /// and passed through InvMixColumns, so that decryption can use
    /// [`inv_round`](crate::inv_round) with the same shape as encryption.
    ///
    /// # Panics
    ///
    /// Panics if `self` is already an inverse schedule.
    pub fn inverse(&self) -> Self {
        assert!(
            !self.inverse,
            "inverse() called on an inverse key schedule"
        );
        let rounds = self.rounds;
        let mut keys = [[0u8; 16]; MAX_ROUND_KEYS];
        keys[0] = self.keys[rounds];
        keys[rounds] = self.keys[0];
        let engine = Engine::current();
        for i in 1..rounds {
            keys[i] = self.keys[rounds - i];
            dispatch!(engine, b => b.inv_mix_columns(&mut keys[i]));
        }
        Self {
            keys,
            rounds,
            inverse: true,
        }
    }
}

impl Drop for KeySchedule {
    fn drop(&mut self) {
        self.keys.zeroize();
    }
}

impl ZeroizeOnDrop for KeySchedule {}

impl TryFrom<&[u8]> for KeySchedule {
    type Error = Error;

    fn try_from(key: &[u8]) -> Result<Self> {
        Self::new(key)
    }
}

impl fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySchedule")
            .field("variant", &self.variant())
            .field("inverse", &self.inverse)
            .finish_non_exhaustive()
    }
}

/// FIPS-197 KeyExpansion over big-endian words. `words.len()` is
/// `4 * (rounds + 1)`.
fn expand_key(key: &[u8], words: &mut [u32]) {
    let nk = key.len() / 4;
    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    for i in nk..words.len() {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp = sub_word(temp.rotate_left(8)) ^ ((RCON[i / nk] as u32) << 24);
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        words[i] = words[i - nk] ^ temp;
    }
}

#[inline]
fn sub_word(w: u32) -> u32 {
    u32::from_be_bytes(w.to_be_bytes().map(|b| SBOX[b as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_block(s: &str) -> Block {
        let mut b = [0u8; 16];
        b.copy_from_slice(&hex::decode(s).unwrap());
        b
    }

    #[test]
    fn test_aes128_expansion() {
        // FIPS-197 Appendix A.1
        let key = hex::decode("2b7e151628aed2a6abf7158809cf4f3c").unwrap();
        let ks = KeySchedule::new(&key).unwrap();
        assert_eq!(ks.rounds(), 10);
        assert_eq!(ks.variant(), AesVariant::Aes128);
        assert_eq!(ks.round_keys().len(), 11);
        assert_eq!(ks.round_key(0)[..], key[..]);
        assert_eq!(
            ks.round_key(1),
            &hex_block("a0fafe1788542cb123a339392a6c7605")
        );
        assert_eq!(
            ks.round_key(10),
            &hex_block("d014f9a8c9ee2589e13f0cc8b6630ca6")
        );
    }

    #[test]
    fn test_aes192_expansion() {
        // FIPS-197 Appendix A.2
        let key = hex::decode("8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b").unwrap();
        let ks = KeySchedule::new(&key).unwrap();
        assert_eq!(ks.rounds(), 12);
        assert_eq!(ks.round_keys().len(), 13);
        assert_eq!(ks.round_key(0)[..], key[..16]);
        // w[4], w[5] are the last two key words; w[6] = fe0c91f7
        assert_eq!(ks.round_key(1)[..8], key[16..]);
        assert_eq!(ks.round_key(1)[8..12], [0xfe, 0x0c, 0x91, 0xf7]);
    }

    #[test]
    fn test_aes256_expansion() {
        // FIPS-197 Appendix A.3
        let key = hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
            .unwrap();
        let ks = KeySchedule::new(&key).unwrap();
        assert_eq!(ks.rounds(), 14);
        assert_eq!(ks.round_keys().len(), 15);
        assert_eq!(ks.round_key(1)[..], key[16..]);
        assert_eq!(
            ks.round_key(2),
            &hex_block("9ba354118e6925afa51a8b5f2067fcde")
        );
    }

    #[test]
    fn test_invalid_key_lengths() {
        for len in [0, 1, 14, 15, 17, 23, 25, 31, 33, 64] {
            let key = vec![0u8; len];
            assert_eq!(
                KeySchedule::new(&key).unwrap_err(),
                Error::InvalidKeyLength,
                "length {len}"
            );
        }
        let key = hex::decode("0102030405060708090a0b0c0d0e").unwrap();
        assert!(KeySchedule::try_from(&key[..]).is_err());
    }

    #[test]
    fn test_inverse_schedule() {
        let key = [0x42u8; 32];
        let ks = KeySchedule::new(&key).unwrap();
        let inv = ks.inverse();
        assert!(inv.is_inverse());
        assert!(!ks.is_inverse());
        assert_eq!(inv.rounds(), ks.rounds());
        assert_eq!(inv.round_key(0), ks.round_key(14));
        assert_eq!(inv.round_key(14), ks.round_key(0));
        for i in 1..14 {
            let mut expected = *ks.round_key(14 - i);
            crate::soft::inv_mix_columns(&mut expected);
            assert_eq!(inv.round_key(i), &expected, "key {i}");
        }
    }

    #[test]
    #[should_panic(expected = "inverse key schedule")]
    fn test_inverse_of_inverse_panics() {
        let ks = KeySchedule::new(&[0u8; 16]).unwrap();
        let _ = ks.inverse().inverse();
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_round_key_out_of_range() {
        let ks = KeySchedule::new(&[0u8; 16]).unwrap();
        let _ = ks.round_key(11);
    }

    #[test]
    fn test_round_key_array() {
        let ks = KeySchedule::new(&[7u8; 24]).unwrap();
        let keys: [Block; 12] = ks.round_key_array(1);
        assert_eq!(&keys[..], &ks.round_keys()[1..]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_round_key_array_out_of_range() {
        let ks = KeySchedule::new(&[7u8; 16]).unwrap();
        let _: [Block; 10] = ks.round_key_array(2);
    }

    #[test]
    fn test_schedule_shape_is_consistent() {
        fn wiped_on_drop<T: ZeroizeOnDrop>(_: &T) {}

        for (len, variant) in [
            (16, AesVariant::Aes128),
            (24, AesVariant::Aes192),
            (32, AesVariant::Aes256),
        ] {
            let ks = KeySchedule::new(&vec![0x2b; len]).unwrap();
            wiped_on_drop(&ks);
            for schedule in [ks.clone(), ks.inverse()] {
                assert_eq!(schedule.variant(), variant);
                assert_eq!(schedule.rounds(), variant.rounds());
                assert_eq!(schedule.round_keys().len(), variant.rounds() + 1);
            }

            let mut block = [0x42u8; 16];
            crate::encrypt_block(&ks, &mut block);
            assert_ne!(block, [0x42u8; 16], "{len}-byte key");
        }
    }

    #[test]
    fn test_debug_redacts_keys() {
        let ks = KeySchedule::new(&[0xaa; 16]).unwrap();
        let rendered = format!("{ks:?}");
        assert!(rendered.contains("Aes128"));
        assert!(!rendered.contains("170"));
    }
}
