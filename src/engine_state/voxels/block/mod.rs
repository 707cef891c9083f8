//! # Block Module
//!
//! This module provides the core block-related functionality for the terrain core.
//! A block is nothing more than a small integer id: `0` is air, every other value
//! names a material and indexes into the texture atlas.

pub mod block_side;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Identifies the material of a single voxel.
///
/// # Memory Layout
/// The `#[repr(transparent)]` attribute guarantees the id has the same layout as
/// `BlockTypeSize`, so a cell's block array can be reinterpreted as raw bytes when
/// it is written to disk.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockId(pub BlockTypeSize);

impl BlockId {
    /// Empty space. Never meshed, never collides.
    pub const AIR: BlockId = BlockId(0);

    /// Fallback material for solid blocks that match no configured layer.
    pub const DEFAULT_GROUND: BlockId = BlockId(1);

    /// Returns `true` for every id except air.
    #[inline]
    pub fn is_solid(self) -> bool {
        self != Self::AIR
    }
}

impl From<BlockTypeSize> for BlockId {
    fn from(value: BlockTypeSize) -> Self {
        BlockId(value)
    }
}
