//! # Block Sources
//!
//! Neighbor-aware block lookups. Meshing and collision read one ring of blocks past
//! a chunk's edge; those reads go through a [`BlockSource`], which resolves them
//! against the loaded chunk map and falls back to the generator for cells that have
//! not streamed in yet.

use std::collections::HashMap;

use cgmath::Point3;

use super::block::BlockId;
use super::chunk::Chunk;
use super::generator::TerrainGenerator;
use super::position::world_to_chunk;

/// Anything that can answer "which block is at this world coordinate".
pub trait BlockSource {
    fn block_at_world(&self, world: Point3<i32>) -> BlockId;

    fn is_solid_at(&self, world: Point3<i32>) -> bool {
        self.block_at_world(world).is_solid()
    }
}

/// Looks up loaded chunks first, generated terrain second.
pub struct StoreLookup<'a> {
    chunks: &'a HashMap<Point3<i32>, Chunk>,
    generator: &'a TerrainGenerator,
}

impl<'a> StoreLookup<'a> {
    pub fn new(chunks: &'a HashMap<Point3<i32>, Chunk>, generator: &'a TerrainGenerator) -> Self {
        StoreLookup { chunks, generator }
    }
}

impl BlockSource for StoreLookup<'_> {
    fn block_at_world(&self, world: Point3<i32>) -> BlockId {
        let (cell, local) = world_to_chunk(world);
        match self.chunks.get(&cell) {
            Some(chunk) => chunk.local_block(local),
            None => self.generator.block_at(world),
        }
    }
}
