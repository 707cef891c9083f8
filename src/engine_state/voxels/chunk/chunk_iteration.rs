//! # Chunk Iteration Module
//!
//! Iterates the solid blocks of a chunk in storage order, yielding each block's local
//! coordinate alongside its id. Air is skipped; the mesher never looks at it.

use cgmath::Point3;

use crate::engine_state::voxels::block::BlockId;

use super::{Chunk, CHUNK_DIMENSION};

/// An iterator over all non-air blocks in a chunk.
pub struct ChunkBlockIterator<'a> {
    chunk_ref: &'a Chunk,
    /// Flat index of the next block to inspect
    current_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockId);

    fn next(&mut self) -> Option<Self::Item> {
        let blocks = self.chunk_ref.blocks();
        while self.current_offset < blocks.len() {
            let offset = self.current_offset;
            self.current_offset += 1;

            let block = blocks[offset];
            if !block.is_solid() {
                continue;
            }

            let offset = offset as i32;
            let local = Point3::new(
                offset / (CHUNK_DIMENSION * CHUNK_DIMENSION),
                (offset / CHUNK_DIMENSION) % CHUNK_DIMENSION,
                offset % CHUNK_DIMENSION,
            );
            return Some((local, block));
        }
        None
    }
}
