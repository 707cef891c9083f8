//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 32x32x32 cube of block ids together with
//! the surface mesh derived from it.
//!
//! ## Storage
//!
//! Blocks live in a flat vector indexed by `(x * D + y) * D + z`, which is also the
//! order the edit log writes them to disk.
//!
//! ## Mesh Consistency
//!
//! A chunk's mesh always matches its block array. Every write path
//! ([`Chunk::set_block`], [`Chunk::replace_blocks`]) regenerates the mesh before
//! returning, so a chunk is never observed with stale geometry.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use chunk_creation::ChunkCreationIterator;
use chunk_iteration::ChunkBlockIterator;

use crate::engine_state::error::{AtlasError, TerrainError};
use crate::engine_state::rendering::atlas::Atlas;
use crate::engine_state::rendering::meshing::mesh::SurfaceMesh;

use super::block::BlockId;
use super::block_source::BlockSource;
use super::generator::TerrainGenerator;
use super::position::chunk_to_world;

pub mod chunk_creation;
pub mod chunk_iteration;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 32;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 32x32x32 collection of voxel blocks in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// Block ids in X/Y/Z order, always `CHUNK_SIZE` long.
    pub(super) blocks: Vec<BlockId>,

    /// Whether any block is non-air.
    pub(super) has_solid: bool,

    mesh: SurfaceMesh,

    /// True when the current mesh has no indices; the renderer skips such chunks.
    no_geometry: bool,

    /// Incremented each time the mesh is regenerated.
    mesh_revision: u64,
}

impl Chunk {
    /// Fills a chunk at `position` from the terrain generator.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `generator` - The seeded terrain function
    ///
    /// # Returns
    /// A chunk with its blocks filled and no mesh yet.
    pub fn generate(position: Point3<i32>, generator: &TerrainGenerator) -> Self {
        let mut cci = ChunkCreationIterator::new(position);
        while let Some(local) = cci.cursor() {
            cci.push_block(generator.block_at(chunk_to_world(position, local)));
        }
        cci.return_chunk()
    }

    /// Flat storage index of an in-range local coordinate.
    #[inline]
    pub fn index(local: Point3<i32>) -> usize {
        ((local.x * CHUNK_DIMENSION + local.y) * CHUNK_DIMENSION + local.z) as usize
    }

    /// Returns `true` if every component lies in `[0, CHUNK_DIMENSION)`.
    #[inline]
    pub fn contains_local(local: Point3<i32>) -> bool {
        (0..CHUNK_DIMENSION).contains(&local.x)
            && (0..CHUNK_DIMENSION).contains(&local.y)
            && (0..CHUNK_DIMENSION).contains(&local.z)
    }

    /// Block at an in-range local coordinate. Out-of-range coordinates read as air.
    pub fn local_block(&self, local: Point3<i32>) -> BlockId {
        if !Self::contains_local(local) {
            return BlockId::AIR;
        }
        self.blocks[Self::index(local)]
    }

    /// Block at a local offset that may fall outside this chunk.
    ///
    /// Out-of-range offsets are resolved in world space through `neighbors`, which
    /// reads the owning chunk if it is loaded and generated terrain otherwise.
    pub fn block_at(&self, offset: Point3<i32>, neighbors: &dyn BlockSource) -> BlockId {
        if Self::contains_local(offset) {
            self.blocks[Self::index(offset)]
        } else {
            neighbors.block_at_world(chunk_to_world(self.position, offset))
        }
    }

    /// Writes one block and regenerates the mesh.
    ///
    /// A local position outside the chunk is ignored and reads as air. If the
    /// mesh cannot be rebuilt the write is rolled back, so blocks and mesh stay
    /// in step.
    ///
    /// # Returns
    /// The id previously stored at `local`.
    pub fn set_block(
        &mut self,
        local: Point3<i32>,
        block: BlockId,
        neighbors: &dyn BlockSource,
        atlas: &dyn Atlas,
    ) -> Result<BlockId, AtlasError> {
        if !Self::contains_local(local) {
            return Ok(BlockId::AIR);
        }
        let index = Self::index(local);
        let had_solid = self.has_solid;
        let previous = std::mem::replace(&mut self.blocks[index], block);
        if block.is_solid() {
            self.has_solid = true;
        } else if previous.is_solid() {
            self.has_solid = self.blocks.iter().any(|b| b.is_solid());
        }
        if let Err(err) = self.generate_mesh(neighbors, atlas) {
            self.blocks[index] = previous;
            self.has_solid = had_solid;
            return Err(err);
        }
        Ok(previous)
    }

    /// Overwrites the whole block array (snapshot restore) and regenerates the mesh.
    pub fn replace_blocks(
        &mut self,
        blocks: Vec<BlockId>,
        neighbors: &dyn BlockSource,
        atlas: &dyn Atlas,
    ) -> Result<(), TerrainError> {
        if blocks.len() != CHUNK_SIZE as usize {
            return Err(TerrainError::SnapshotSize {
                position: self.position,
                found: blocks.len(),
                expected: CHUNK_SIZE as usize,
            });
        }
        self.has_solid = blocks.iter().any(|b| b.is_solid());
        self.blocks = blocks;
        self.generate_mesh(neighbors, atlas)?;
        Ok(())
    }

    /// Rebuilds the surface mesh from the current blocks.
    pub fn generate_mesh(
        &mut self,
        neighbors: &dyn BlockSource,
        atlas: &dyn Atlas,
    ) -> Result<(), AtlasError> {
        let started = Instant::now();
        let mesh = SurfaceMesh::build(self, neighbors, atlas)?;
        debug!(
            "Meshed chunk {:?}: {} indices in {:?}",
            self.position,
            mesh.index_count(),
            started.elapsed()
        );
        self.set_mesh(mesh);
        Ok(())
    }

    /// Installs a mesh built elsewhere (for example against the live chunk map).
    pub fn set_mesh(&mut self, mesh: SurfaceMesh) {
        self.no_geometry = mesh.is_empty();
        self.mesh = mesh;
        self.mesh_revision += 1;
    }

    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    pub fn no_geometry(&self) -> bool {
        self.no_geometry
    }

    pub fn mesh_revision(&self) -> u64 {
        self.mesh_revision
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Returns `true` if every block is air.
    pub fn is_empty(&self) -> bool {
        !self.has_solid
    }

    /// Iterates the solid blocks with their local coordinates.
    pub fn solid_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}
