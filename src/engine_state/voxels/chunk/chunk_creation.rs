//! # Chunk Creation Module
//!
//! A builder that fills a chunk's block array in storage order (X outer, Y middle,
//! Z inner) while tracking the cursor position, so the caller can ask "which local
//! coordinate am I filling next" without recomputing it from the flat index.

use cgmath::Point3;

use crate::engine_state::rendering::meshing::mesh::SurfaceMesh;
use crate::engine_state::voxels::block::BlockId;

use super::{Chunk, CHUNK_DIMENSION, CHUNK_SIZE};

/// Builds a [`Chunk`] one block at a time.
///
/// Blocks are pushed in the same order the chunk stores them; [`cursor`](Self::cursor)
/// returns the local coordinate the next pushed block will occupy, or `None` once the
/// chunk is full.
pub struct ChunkCreationIterator {
    /// Chunk coordinate of the chunk being built
    position: Point3<i32>,
    /// Blocks pushed so far
    blocks: Vec<BlockId>,
    /// Set once any non-air block was pushed
    has_solid: bool,
    local_x: i32,
    local_y: i32,
    local_z: i32,
}

impl ChunkCreationIterator {
    /// Creates an empty builder for the chunk at `position`.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            position,
            blocks: Vec::with_capacity(CHUNK_SIZE as usize),
            has_solid: false,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// Local coordinate of the next block to push.
    pub fn cursor(&self) -> Option<Point3<i32>> {
        if self.blocks.len() >= CHUNK_SIZE as usize {
            return None;
        }
        Some(Point3::new(self.local_x, self.local_y, self.local_z))
    }

    /// Stores `block` at the cursor and advances it.
    ///
    /// Pushing past a full chunk is ignored.
    pub fn push_block(&mut self, block: BlockId) {
        if self.cursor().is_none() {
            return;
        }

        self.has_solid |= block.is_solid();
        self.blocks.push(block);

        self.local_z += 1;
        if self.local_z == CHUNK_DIMENSION {
            self.local_z = 0;
            self.local_y += 1;
            if self.local_y == CHUNK_DIMENSION {
                self.local_y = 0;
                self.local_x += 1;
            }
        }
    }

    /// Finalizes the chunk. Any unfilled tail is padded with air.
    ///
    /// The returned chunk has no mesh yet; the caller generates it once the neighbor
    /// source is known.
    pub fn return_chunk(mut self) -> Chunk {
        self.blocks.resize(CHUNK_SIZE as usize, BlockId::AIR);
        Chunk {
            position: self.position,
            blocks: self.blocks,
            has_solid: self.has_solid,
            mesh: SurfaceMesh::default(),
            no_geometry: true,
            mesh_revision: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_z_fastest() {
        let mut builder = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        assert_eq!(builder.cursor(), Some(Point3::new(0, 0, 0)));
        builder.push_block(BlockId::AIR);
        assert_eq!(builder.cursor(), Some(Point3::new(0, 0, 1)));
        for _ in 1..CHUNK_DIMENSION {
            builder.push_block(BlockId::AIR);
        }
        assert_eq!(builder.cursor(), Some(Point3::new(0, 1, 0)));
    }

    #[test]
    fn full_builder_stops_accepting_blocks() {
        let mut builder = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        for _ in 0..CHUNK_SIZE {
            builder.push_block(BlockId::AIR);
        }
        assert_eq!(builder.cursor(), None);
        builder.push_block(BlockId(3));
        let chunk = builder.return_chunk();
        assert_eq!(chunk.blocks().len(), CHUNK_SIZE as usize);
        assert!(chunk.is_empty());
    }
}
