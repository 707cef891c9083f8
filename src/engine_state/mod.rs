//! # Engine State Module
//!
//! Owner-thread orchestration of the terrain core.
//!
//! ## Key Components
//!
//! * `EngineState` - Ties the world, the streamer, the player body and the save slot
//!   together and drives them once per tick
//! * `config` - World-gen and engine configuration
//! * `error` - Typed failures of every subsystem
//! * `physics` - Player collision and block picking
//! * `rendering` - Meshing, atlas lookup, culling and the backend hand-off
//! * `task_management` - Worker pool for chunk construction
//! * `voxels` - Blocks, chunks, terrain generation, edits and persistence
//!
//! ## Architecture
//!
//! The thread that owns an `EngineState` is the only one that mutates chunks. Each
//! tick it applies finished chunks from the worker pool, requests the next batch,
//! then moves the player. Block interaction goes through the same thread, so no chunk
//! ever needs a lock.

use std::sync::Arc;

use cgmath::{InnerSpace, Point3, Vector3};
use log::info;

use config::{EngineConfig, WorldGenConfig};
use error::{EngineError, PersistenceError, TerrainError};
use physics::{Body, RaycastHit};
use rendering::meshing::MeshCommand;
use voxels::{
    block::BlockId,
    generator::TerrainGenerator,
    position::chunk_containing,
    storage::{apply_changes_to_world, WorldSave},
    streaming::{ChunkStreamer, StreamingReport},
    world::{SharedAtlas, World},
};

pub mod config;
pub mod error;
pub mod physics;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// How far the player can break or place blocks.
pub const REACH: f32 = 8.0;

/// Longest simulated step; slower frames are slowed down rather than tunneled through.
pub const MAX_TICK_SECONDS: f32 = 0.1;

/// Seeds are drawn from `0..SEED_RANGE` when none is given.
pub const SEED_RANGE: i32 = 65536;

fn random_seed() -> i32 {
    fastrand::i32(0..SEED_RANGE)
}

/// Where a player appears in a fresh world: two blocks above the origin column's
/// surface.
pub fn spawn_point(generator: &TerrainGenerator) -> Point3<f32> {
    Point3::new(0.0, (generator.surface_height(0, 0) + 2) as f32, 0.0)
}

/// The main state container of the terrain core.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use cgmath::Vector3;
/// use voxel_terrain::engine_state::{config::EngineConfig, rendering::atlas::GridAtlas, EngineState};
///
/// let atlas = GridAtlas::new(4, 4, 16, 16);
/// let mut engine = EngineState::new(EngineConfig::default(), Arc::new(atlas)).unwrap();
/// loop {
///     engine.tick(1.0 / 60.0).unwrap();
///     for command in engine.take_mesh_commands() {
///         // upload or release GPU buffers
///     }
///     engine.break_block(Vector3::new(0.0, -1.0, 0.0)).unwrap();
/// }
/// ```
pub struct EngineState {
    /// The loaded chunks and their edit log
    pub world: World,
    /// The player's collision body
    pub player: Body,
    streamer: ChunkStreamer,
    save: WorldSave,
    config: EngineConfig,
    worldgen: WorldGenConfig,
    atlas: SharedAtlas,
    /// Releases for meshes of a replaced world, handed out before the new world's
    /// commands.
    retired_commands: Vec<MeshCommand>,
}

impl EngineState {
    /// Boots a world from `config`.
    ///
    /// # Arguments
    /// * `config` - Paths, seed and streaming tunables
    /// * `atlas` - Texture regions for every block id the generator can produce
    ///
    /// # Errors
    /// A world-gen file that exists but cannot be read or parsed.
    pub fn new(config: EngineConfig, atlas: SharedAtlas) -> Result<Self, EngineError> {
        let worldgen = WorldGenConfig::load(&config.worldgen_path)?;
        let seed = config.seed.unwrap_or_else(random_seed);
        info!("Seed: {}", seed);

        let generator = Arc::new(TerrainGenerator::new(seed, worldgen.clone()));
        let player = Body::player(spawn_point(&generator));

        Ok(EngineState {
            world: World::new(generator, atlas.clone()),
            player,
            streamer: ChunkStreamer::new(config.streaming),
            save: WorldSave::new(config.save_folder.clone()),
            config,
            worldgen,
            atlas,
            retired_commands: Vec::new(),
        })
    }

    pub fn seed(&self) -> i32 {
        self.world.generator().seed()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn worldgen(&self) -> &WorldGenConfig {
        &self.worldgen
    }

    pub fn save_slot(&self) -> &WorldSave {
        &self.save
    }

    /// Runs one frame: streaming around the player's eye, then player physics.
    ///
    /// The body stays put while the chunk it stands in is not loaded yet, so a fresh
    /// world does not drop the player through terrain that has not streamed in.
    pub fn tick(&mut self, dt: f32) -> Result<StreamingReport, TerrainError> {
        let dt = dt.min(MAX_TICK_SECONDS).max(0.0);
        let report = self.streamer.tick(&mut self.world, self.player.eye_position())?;

        if self.world.contains(chunk_containing(self.player.position)) {
            self.player.update(&self.world, dt);
        }
        Ok(report)
    }

    /// Blocks until every requested chunk has been published.
    pub fn finish_streaming(&mut self) -> Result<usize, TerrainError> {
        self.streamer.finish_pending(&mut self.world)
    }

    /// Drains pending mesh uploads and releases for the rendering backend.
    pub fn take_mesh_commands(&mut self) -> Vec<MeshCommand> {
        let mut commands = std::mem::take(&mut self.retired_commands);
        commands.extend(self.world.take_mesh_commands());
        commands
    }

    /// The block the player is looking at along `direction`, within [`REACH`].
    pub fn target_block(&self, direction: Vector3<f32>) -> Option<RaycastHit> {
        if direction.magnitude2() == 0.0 {
            return None;
        }
        self.world
            .raycast(self.player.eye_position(), direction.normalize(), REACH)
    }

    /// Removes the targeted block.
    ///
    /// # Returns
    /// The broken block, or `None` if nothing was in reach.
    pub fn break_block(&mut self, direction: Vector3<f32>) -> Result<Option<Point3<i32>>, TerrainError> {
        let Some(hit) = self.target_block(direction) else {
            return Ok(None);
        };
        let changed = self.world.set_block_world(hit.block, BlockId::AIR)?;
        Ok(changed.then_some(hit.block))
    }

    /// Places `block` against the face of the targeted block.
    ///
    /// Nothing is placed where it would overlap the player's body.
    ///
    /// # Returns
    /// The filled block, or `None` if nothing was placed.
    pub fn place_block(
        &mut self,
        direction: Vector3<f32>,
        block: BlockId,
    ) -> Result<Option<Point3<i32>>, TerrainError> {
        let Some(hit) = self.target_block(direction) else {
            return Ok(None);
        };
        let target = hit.block + hit.normal;
        if self.player.touched_blocks().contains(&target) {
            return Ok(None);
        }
        let changed = self.world.set_block_world(target, block)?;
        Ok(changed.then_some(target))
    }

    /// Writes the seed and edit log to the save slot.
    pub fn save(&self) -> Result<(), PersistenceError> {
        self.save.save(&self.world)
    }

    /// Replaces the world with the one in the save slot.
    ///
    /// Without a saved seed a fresh one is drawn. Saved edits are replayed
    /// immediately, generating their chunks if needed.
    ///
    /// # Returns
    /// The number of chunks restored from the edit log.
    pub fn load_saved(&mut self) -> Result<usize, EngineError> {
        let seed = match self.save.load_seed()? {
            Some(seed) => seed,
            None => {
                let seed = random_seed();
                info!("No saved seed in {}, using {}", self.save.folder().display(), seed);
                seed
            }
        };
        let changes = self.save.load_changes()?;

        self.replace_world(seed);
        let restored = apply_changes_to_world(&mut self.world, changes)?;
        info!("Loaded chunks: {}", restored);
        Ok(restored)
    }

    /// Replaces the world with a pristine one under a fresh random seed.
    ///
    /// # Returns
    /// The new seed.
    pub fn regenerate(&mut self) -> i32 {
        let seed = random_seed();
        self.replace_world(seed);
        seed
    }

    /// Swaps in an empty world for `seed`, respawns the player and restarts the worker
    /// pool so chunks still in flight for the old world are discarded.
    fn replace_world(&mut self, seed: i32) {
        let generator = Arc::new(TerrainGenerator::new(seed, self.worldgen.clone()));
        let mut previous =
            std::mem::replace(&mut self.world, World::new(generator, self.atlas.clone()));
        self.retired_commands.extend(previous.take_mesh_commands());
        self.retired_commands
            .extend(previous.positions().map(MeshCommand::Release));

        self.player = Body::player(spawn_point(self.world.generator()));
        self.streamer = ChunkStreamer::new(self.config.streaming);
        info!("Seed: {}", seed);
    }
}
