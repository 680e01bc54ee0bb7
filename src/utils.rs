//! Block XOR helpers.

use crate::block::{Block, Lanes};

/// XOR two 16-byte blocks.
#[inline]
pub fn xor_block(a: &Block, b: &Block) -> Block {
    let mut result = *a;
    xor_in_place(&mut result, b);
    result
}

/// XOR `b` into `a`.
#[inline]
pub fn xor_in_place(a: &mut Block, b: &Block) {
    for (x, y) in a.iter_mut().zip(b) {
        *x ^= y;
    }
}

/// Lane-wise XOR of `b` into `a`.
#[inline]
pub fn xor_lanes<const L: usize>(a: &mut Lanes<L>, b: &Lanes<L>) {
    for (x, y) in a.0.iter_mut().zip(&b.0) {
        xor_in_place(x, y);
    }
}
