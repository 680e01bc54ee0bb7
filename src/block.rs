//! Block and multi-lane containers.

use core::ops::{Index, IndexMut};

/// A 128-bit AES state or round key.
pub type Block = [u8; 16];

/// `L` independent blocks laid out contiguously as `[block0 | block1 | ...]`.
///
/// The same type carries per-lane round keys, see [`Key2`] and [`Key4`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Lanes<const L: usize>(pub [Block; L]);

/// Two blocks processed together.
pub type Block2 = Lanes<2>;
/// Four blocks processed together.
pub type Block4 = Lanes<4>;
/// One round key per lane of a [`Block2`].
pub type Key2 = Lanes<2>;
/// One round key per lane of a [`Block4`].
pub type Key4 = Lanes<4>;

/// Marker type used to restrict lane counts.
pub struct LaneCount<const L: usize>;

/// Implemented for the lane counts that have a batched implementation (2 and 4).
pub trait SupportedLanes: sealed::Sealed {}

impl SupportedLanes for LaneCount<2> {}
impl SupportedLanes for LaneCount<4> {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::LaneCount<2> {}
    impl Sealed for super::LaneCount<4> {}
}

impl<const L: usize> Lanes<L> {
    /// Number of lanes.
    pub const LANES: usize = L;

    /// Size of the flat byte representation.
    pub const BYTES: usize = 16 * L;

    /// Wraps an array of blocks.
    #[inline]
    pub const fn new(blocks: [Block; L]) -> Self {
        Self(blocks)
    }

    /// All lanes set to zero.
    #[inline]
    pub const fn zeroed() -> Self {
        Self([[0u8; 16]; L])
    }

    /// Copies `block` into every lane.
    ///
    /// Broadcasting one round key to all lanes gives the same result as
    /// passing that key to each single-block call.
    #[inline]
    pub const fn splat(block: Block) -> Self {
        Self([block; L])
    }

    /// Returns lane `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= L`.
    #[inline]
    pub fn lane(&self, i: usize) -> &Block {
        assert!(i < L, "lane index {i} out of range for {L} lanes");
        &self.0[i]
    }

    /// Returns lane `i` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i >= L`.
    #[inline]
    pub fn lane_mut(&mut self, i: usize) -> &mut Block {
        assert!(i < L, "lane index {i} out of range for {L} lanes");
        &mut self.0[i]
    }

    /// Overwrites lane `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= L`.
    #[inline]
    pub fn set_lane(&mut self, i: usize, block: &Block) {
        *self.lane_mut(i) = *block;
    }

    /// The lanes as an array of blocks.
    #[inline]
    pub const fn as_blocks(&self) -> &[Block; L] {
        &self.0
    }

    /// The lanes as a mutable array of blocks.
    #[inline]
    pub fn as_blocks_mut(&mut self) -> &mut [Block; L] {
        &mut self.0
    }

    /// Flat byte view, `16 * L` bytes long.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_flattened()
    }

    /// Mutable flat byte view, `16 * L` bytes long.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.0.as_flattened_mut()
    }

    /// Builds lanes from a flat byte slice.
    ///
    /// Returns `None` unless `bytes.len() == 16 * L`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::BYTES {
            return None;
        }
        let mut lanes = Self::zeroed();
        lanes.as_bytes_mut().copy_from_slice(bytes);
        Some(lanes)
    }

    /// Consumes the container and returns its blocks.
    #[inline]
    pub const fn into_blocks(self) -> [Block; L] {
        self.0
    }
}

impl<const L: usize> Default for Lanes<L> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const L: usize> From<[Block; L]> for Lanes<L> {
    fn from(blocks: [Block; L]) -> Self {
        Self(blocks)
    }
}

impl<const L: usize> From<Lanes<L>> for [Block; L] {
    fn from(lanes: Lanes<L>) -> Self {
        lanes.0
    }
}

impl<const L: usize> Index<usize> for Lanes<L> {
    type Output = Block;

    #[inline]
    fn index(&self, i: usize) -> &Block {
        self.lane(i)
    }
}

impl<const L: usize> IndexMut<usize> for Lanes<L> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Block {
        self.lane_mut(i)
    }
}
