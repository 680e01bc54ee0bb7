//! Portable backend.

use super::Backend;
use crate::block::Block;
use crate::soft;

/// Table-based software rounds, available on every target.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Soft;

impl Backend for Soft {
    #[inline]
    fn round(self, block: &mut Block, key: &Block) {
        soft::round(block, key)
    }

    #[inline]
    fn final_round(self, block: &mut Block, key: &Block) {
        soft::final_round(block, key)
    }

    #[inline]
    fn inv_round(self, block: &mut Block, key: &Block) {
        soft::inv_round(block, key)
    }

    #[inline]
    fn inv_final_round(self, block: &mut Block, key: &Block) {
        soft::inv_final_round(block, key)
    }

    #[inline]
    fn round_key_first(self, block: &mut Block, key: &Block) {
        soft::round_key_first(block, key)
    }

    #[inline]
    fn final_round_key_first(self, block: &mut Block, key: &Block) {
        soft::final_round_key_first(block, key)
    }

    #[inline]
    fn inv_round_key_first(self, block: &mut Block, key: &Block) {
        soft::inv_round_key_first(block, key)
    }

    #[inline]
    fn inv_final_round_key_first(self, block: &mut Block, key: &Block) {
        soft::inv_final_round_key_first(block, key)
    }

    #[inline]
    fn round_no_key(self, block: &mut Block) {
        soft::round_no_key(block)
    }

    #[inline]
    fn final_round_no_key(self, block: &mut Block) {
        soft::final_round_no_key(block)
    }

    #[inline]
    fn inv_round_no_key(self, block: &mut Block) {
        soft::inv_round_no_key(block)
    }

    #[inline]
    fn inv_final_round_no_key(self, block: &mut Block) {
        soft::inv_final_round_no_key(block)
    }

    #[inline]
    fn inv_mix_columns(self, block: &mut Block) {
        soft::inv_mix_columns(block)
    }
}
