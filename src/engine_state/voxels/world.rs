//! # World Module
//!
//! This module provides the `World` struct which manages the collection of loaded
//! chunks. It is the only writer of chunk data: streaming inserts and evicts through
//! it, edits go through it, and snapshot restores go through it.
//!
//! ## Architecture
//!
//! Chunks are kept in a hash map keyed by chunk coordinate. Chunks never hold
//! references to each other; a lookup across a chunk boundary goes back through the
//! map (see [`StoreLookup`]), falling back to the generator for cells that are not
//! loaded.
//!
//! ## Edit Log
//!
//! Every chunk that was ever modified has its full block array recorded in the edit
//! log. Regenerating from the seed reproduces untouched terrain, so the log is all
//! that needs to be saved. An edited chunk that is evicted and later streamed back in
//! is restored from its snapshot.
//!
//! ## Render Hand-off
//!
//! Each time a published chunk's mesh changes, a [`MeshCommand::Upload`] is queued;
//! eviction queues a [`MeshCommand::Release`] before the chunk is dropped. The
//! backend drains the queue with [`World::take_mesh_commands`].

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use log::debug;

use crate::engine_state::error::{AtlasError, TerrainError};
use crate::engine_state::physics::raycast::{self, RaycastHit};
use crate::engine_state::rendering::atlas::Atlas;
use crate::engine_state::rendering::frustum::ViewFrustum;
use crate::engine_state::rendering::meshing::{MeshCommand, SurfaceMesh};

use super::block::BlockId;
use super::block_source::StoreLookup;
use super::chunk::{Chunk, CHUNK_SIZE};
use super::generator::TerrainGenerator;
use super::position::{chunk_distance_squared, world_to_chunk};

/// Full block-array snapshots of every modified chunk, keyed by chunk coordinate.
pub type EditLog = HashMap<Point3<i32>, Vec<BlockId>>;

/// Shared atlas handle; read by the owner thread and every worker.
pub type SharedAtlas = Arc<dyn Atlas + Send + Sync>;

/// Represents a voxel world composed of multiple chunks.
pub struct World {
    pub(super) chunks: HashMap<Point3<i32>, Chunk>,
    pub(super) edit_log: EditLog,
    pub(super) generator: Arc<TerrainGenerator>,
    pub(super) atlas: SharedAtlas,
    pub(super) mesh_commands: Vec<MeshCommand>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new(generator: Arc<TerrainGenerator>, atlas: SharedAtlas) -> Self {
        World {
            chunks: HashMap::new(),
            edit_log: EditLog::new(),
            generator,
            atlas,
            mesh_commands: Vec::new(),
        }
    }

    pub fn generator(&self) -> &Arc<TerrainGenerator> {
        &self.generator
    }

    pub fn atlas(&self) -> &SharedAtlas {
        &self.atlas
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, position: Point3<i32>) -> bool {
        self.chunks.contains_key(&position)
    }

    pub fn get_chunk_at(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    /// Coordinates of every loaded chunk, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.chunks.keys().copied()
    }

    /// Neighbor-aware block source over the loaded chunks.
    pub fn lookup(&self) -> StoreLookup<'_> {
        StoreLookup::new(&self.chunks, &self.generator)
    }

    /// Block at a world coordinate, or `None` if its chunk is not loaded.
    pub fn block_at_world(&self, world: Point3<i32>) -> Option<BlockId> {
        let (cell, local) = world_to_chunk(world);
        self.chunks.get(&cell).map(|chunk| chunk.local_block(local))
    }

    /// Returns `true` if the block is loaded and not air.
    pub fn is_solid_world(&self, world: Point3<i32>) -> bool {
        self.block_at_world(world).is_some_and(BlockId::is_solid)
    }

    /// Generates, meshes and inserts the chunk at `position` on the calling thread.
    ///
    /// # Returns
    /// `false` if the chunk was already loaded.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) -> Result<bool, TerrainError> {
        if self.contains(position) {
            return Ok(false);
        }

        let mut chunk = Chunk::generate(position, &self.generator);
        chunk.generate_mesh(&self.lookup(), &*self.atlas)?;
        self.insert_chunk(chunk)
    }

    /// Publishes a constructed chunk.
    ///
    /// Chunks in the edit log are restored from their snapshot first, and their
    /// loaded neighbors are re-meshed against it. A chunk next to a loaded edited
    /// chunk is re-meshed against the store, since it was built against pristine
    /// terrain.
    ///
    /// # Returns
    /// `false` if a chunk was already loaded at that position; the new one is dropped.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Result<bool, TerrainError> {
        let position = chunk.position;
        if self.contains(position) {
            debug!("Dropping duplicate chunk {:?}", position);
            return Ok(false);
        }

        if let Some(snapshot) = self.edit_log.get(&position).cloned() {
            let mut chunk = chunk;
            chunk.replace_blocks(snapshot, &self.lookup(), &*self.atlas)?;
            self.chunks.insert(position, chunk);
            self.mesh_commands.push(MeshCommand::Upload(position));
            self.remesh_neighbors(position)?;
            debug!("Restored edited chunk {:?}", position);
            return Ok(true);
        }

        let next_to_edit = neighbor_offsets().any(|offset| {
            let neighbor = position + offset;
            self.edit_log.contains_key(&neighbor) && self.chunks.contains_key(&neighbor)
        });

        self.chunks.insert(position, chunk);
        if next_to_edit {
            self.remesh(position)?;
        } else {
            self.mesh_commands.push(MeshCommand::Upload(position));
        }
        Ok(true)
    }

    /// Rebuilds the mesh of a loaded chunk against the store.
    ///
    /// # Returns
    /// `false` if no chunk is loaded at `position`.
    pub fn remesh(&mut self, position: Point3<i32>) -> Result<bool, AtlasError> {
        let mesh = match self.chunks.get(&position) {
            Some(chunk) => SurfaceMesh::build(chunk, &self.lookup(), &*self.atlas)?,
            None => return Ok(false),
        };

        if let Some(chunk) = self.chunks.get_mut(&position) {
            chunk.set_mesh(mesh);
        }
        self.mesh_commands.push(MeshCommand::Upload(position));
        Ok(true)
    }

    /// Re-meshes every loaded chunk among the 26 around `position`.
    pub fn remesh_neighbors(&mut self, position: Point3<i32>) -> Result<usize, AtlasError> {
        let mut remeshed = 0;
        for offset in neighbor_offsets() {
            if self.remesh(position + offset)? {
                remeshed += 1;
            }
        }
        Ok(remeshed)
    }

    /// Temporarily takes the chunk at `position` out of the map so it can be mutated
    /// while the rest of the store serves its out-of-range lookups.
    pub(super) fn with_detached<T>(
        &mut self,
        position: Point3<i32>,
        f: impl FnOnce(&mut Chunk, &StoreLookup<'_>, &dyn Atlas) -> T,
    ) -> Option<T> {
        let mut chunk = self.chunks.remove(&position)?;
        let result = {
            let lookup = StoreLookup::new(&self.chunks, &self.generator);
            f(&mut chunk, &lookup, &*self.atlas)
        };
        self.chunks.insert(position, chunk);
        Some(result)
    }

    /// Removes a chunk, queueing the release of its GPU resources first.
    pub fn remove_chunk(&mut self, position: Point3<i32>) -> Option<Chunk> {
        if !self.contains(position) {
            return None;
        }
        self.mesh_commands.push(MeshCommand::Release(position));
        self.chunks.remove(&position)
    }

    /// Evicts the loaded chunk farthest from `center` (squared distance in chunk units).
    ///
    /// # Returns
    /// The evicted position, or `None` if the store is empty.
    pub fn evict_farthest(&mut self, center: Point3<i32>) -> Option<Point3<i32>> {
        let farthest = self
            .chunks
            .keys()
            .copied()
            .max_by_key(|&position| chunk_distance_squared(position, center))?;
        self.remove_chunk(farthest);
        Some(farthest)
    }

    /// Drains the queued backend commands, oldest first.
    pub fn take_mesh_commands(&mut self) -> Vec<MeshCommand> {
        std::mem::take(&mut self.mesh_commands)
    }

    /// Chunks with geometry whose bounds intersect `frustum`.
    pub fn visible_chunks(&self, frustum: &ViewFrustum) -> Vec<Point3<i32>> {
        self.chunks
            .values()
            .filter(|chunk| !chunk.no_geometry() && frustum.contains_chunk(chunk.position))
            .map(|chunk| chunk.position)
            .collect()
    }

    /// Casts a ray through the loaded blocks.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        raycast::raycast(self, origin, direction, max_distance)
    }

    /// Overwrites a chunk with a saved snapshot and records it in the edit log.
    ///
    /// An unloaded chunk is generated first so it has a mesh and atlas wiring, then
    /// restored.
    pub fn apply_snapshot(
        &mut self,
        position: Point3<i32>,
        blocks: Vec<BlockId>,
    ) -> Result<(), TerrainError> {
        if blocks.len() != CHUNK_SIZE as usize {
            return Err(TerrainError::SnapshotSize {
                position,
                found: blocks.len(),
                expected: CHUNK_SIZE as usize,
            });
        }

        self.edit_log.insert(position, blocks.clone());
        if !self.contains(position) {
            self.add_chunk_at(position)?;
            return Ok(());
        }

        if let Some(result) =
            self.with_detached(position, |chunk, lookup, atlas| chunk.replace_blocks(blocks, lookup, atlas))
        {
            result?;
        }
        self.mesh_commands.push(MeshCommand::Upload(position));
        self.remesh_neighbors(position)?;
        Ok(())
    }

    pub fn edit_log(&self) -> &EditLog {
        &self.edit_log
    }
}

/// Offsets of the 26 chunks sharing a face, edge or corner with a chunk.
pub fn neighbor_offsets() -> impl Iterator<Item = Vector3<i32>> {
    (-1..=1).flat_map(|x| {
        (-1..=1).flat_map(move |y| {
            (-1..=1)
                .map(move |z| Vector3::new(x, y, z))
                .filter(|offset| *offset != Vector3::new(0, 0, 0))
        })
    })
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;
    use crate::engine_state::config::WorldGenConfig;
    use crate::engine_state::rendering::atlas::GridAtlas;

    fn world() -> World {
        let generator = TerrainGenerator::new(
            3,
            WorldGenConfig {
                height_scale: 0,
                border: 0,
                layers: Vec::new(),
                ..WorldGenConfig::default()
            },
        );
        let mut atlas = GridAtlas::new(4, 4, 2, 2);
        atlas.add_solid_color(BlockId(1), [100, 80, 60, 255]).unwrap();
        atlas.add_solid_color(BlockId(2), [60, 60, 60, 255]).unwrap();
        World::new(Arc::new(generator), Arc::new(atlas))
    }

    #[test]
    fn there_are_26_neighbors() {
        assert_eq!(neighbor_offsets().count(), 26);
    }

    #[test]
    fn duplicate_inserts_are_dropped() {
        let mut world = world();
        assert!(world.add_chunk_at(Point3::new(0, 0, 0)).unwrap());
        assert!(!world.add_chunk_at(Point3::new(0, 0, 0)).unwrap());

        let again = Chunk::generate(Point3::new(0, 0, 0), world.generator());
        assert!(!world.insert_chunk(again).unwrap());
        assert_eq!(world.len(), 1);
        assert_eq!(world.take_mesh_commands(), vec![MeshCommand::Upload(Point3::new(0, 0, 0))]);
    }

    #[test]
    fn solidity_queries_only_see_loaded_chunks() {
        let mut world = world();
        assert!(!world.is_solid_world(Point3::new(0, 0, 0)));
        world.add_chunk_at(Point3::new(0, 0, 0)).unwrap();
        assert!(world.is_solid_world(Point3::new(0, 0, 0)));
        assert!(!world.is_solid_world(Point3::new(0, 1, 0)));
        assert_eq!(world.block_at_world(Point3::new(0, -1, 0)), None);
    }

    #[test]
    fn removal_releases_before_dropping() {
        let mut world = world();
        world.add_chunk_at(Point3::new(2, 0, 0)).unwrap();
        world.take_mesh_commands();
        assert!(world.remove_chunk(Point3::new(2, 0, 0)).is_some());
        assert!(world.remove_chunk(Point3::new(2, 0, 0)).is_none());
        assert_eq!(world.take_mesh_commands(), vec![MeshCommand::Release(Point3::new(2, 0, 0))]);
    }

    #[test]
    fn snapshots_restore_when_a_chunk_streams_back() {
        let mut world = world();
        let position = Point3::new(0, 1, 0);
        let mut blocks = vec![BlockId::AIR; CHUNK_SIZE as usize];
        blocks[Chunk::index(Point3::new(1, 1, 1))] = BlockId(2);

        world.apply_snapshot(position, blocks.clone()).unwrap();
        assert_eq!(world.get_chunk_at(position).unwrap().blocks(), &blocks[..]);

        world.remove_chunk(position);
        world.add_chunk_at(position).unwrap();
        assert_eq!(world.get_chunk_at(position).unwrap().blocks(), &blocks[..]);
        assert!(!world.get_chunk_at(position).unwrap().no_geometry());
    }

    #[test]
    fn malformed_snapshot_is_rejected_without_recording() {
        let mut world = world();
        let result = world.apply_snapshot(Point3::new(0, 0, 0), vec![BlockId::AIR; 3]);
        assert!(matches!(result, Err(TerrainError::SnapshotSize { .. })));
        assert!(world.edit_log().is_empty());
    }

    #[test]
    fn only_chunks_with_geometry_in_view_are_visible() {
        let mut world = world();
        for position in [Point3::new(0, 0, 0), Point3::new(0, 1, 0), Point3::new(-2, 0, 0)] {
            world.add_chunk_at(position).unwrap();
        }
        assert!(world.get_chunk_at(Point3::new(0, 1, 0)).unwrap().no_geometry());
        assert!(!world.get_chunk_at(Point3::new(-2, 0, 0)).unwrap().no_geometry());

        // looking along +X from just behind the origin chunk
        let frustum = ViewFrustum::new(
            Point3::new(-8.0, 8.0, 16.0),
            Deg(0.0),
            Deg(0.0),
            Deg(60.0),
            1.0,
            0.1,
            500.0,
        );
        assert!(frustum.contains_chunk(Point3::new(0, 1, 0)));
        assert_eq!(world.visible_chunks(&frustum), vec![Point3::new(0, 0, 0)]);
    }
}
