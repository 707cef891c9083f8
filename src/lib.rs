#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! The world-simulation core of a block-based sandbox: seeded terrain generation,
//! chunked storage with per-chunk surface meshes, ambient-occlusion-aware meshing,
//! boundary-correct block edits, distance-based streaming, player collision,
//! block picking and save/load.
//!
//! ## Key Modules
//!
//! * `engine_state` - The owner-thread state and every subsystem below it
//! * `engine_state::voxels` - Blocks, chunks, the world, streaming and persistence
//! * `engine_state::rendering` - Meshes, the atlas, culling and mesh commands
//! * `engine_state::physics` - Collision and raycasting
//!
//! ## Architecture
//!
//! Drawing is left to a backend: it drains [`MeshCommand`]s from the engine and
//! uploads or releases the vertex and index buffers of each chunk. Chunk construction
//! runs on a worker pool; every mutation of published chunks happens on the thread
//! that owns the [`EngineState`].
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_terrain::init_logging();
//!     if let Err(err) = voxel_terrain::run() {
//!         log::error!("{}", err);
//!     }
//! }
//! ```

use std::sync::Arc;

use cgmath::Vector3;
use log::{debug, info};

pub mod engine_state;

pub use engine_state::config::{EngineConfig, WorldGenConfig};
pub use engine_state::error::EngineError;
pub use engine_state::rendering::meshing::MeshCommand;
pub use engine_state::EngineState;

use engine_state::error::AtlasError;
use engine_state::rendering::atlas::GridAtlas;
use engine_state::voxels::block::BlockId;

/// Frames simulated by [`run`].
pub const HEADLESS_TICKS: usize = 240;

const HEADLESS_DT: f32 = 1.0 / 60.0;
const WALK_SPEED: f32 = 4.0;

const PALETTE: [[u8; 4]; 6] = [
    [121, 85, 58, 255],
    [96, 160, 64, 255],
    [128, 128, 128, 255],
    [168, 140, 96, 255],
    [64, 64, 72, 255],
    [236, 240, 244, 255],
];

/// Initializes `env_logger` on stdout, filtered by `RUST_LOG`.
///
/// Calling it again is harmless.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    if log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok()
    {
        info!("Logger initialized");
    }
}

/// A flat-coloured tile for every non-air id the atlas can hold.
pub fn placeholder_atlas() -> Result<GridAtlas, AtlasError> {
    let mut atlas = GridAtlas::new(4, 4, 16, 16);
    for id in 1..atlas.capacity() {
        atlas.add_solid_color(BlockId(id as u8), PALETTE[id % PALETTE.len()])?;
    }
    Ok(atlas)
}

/// Headless session: boots the default configuration, walks the player along +X
/// while chunks stream in, breaks the block underfoot and saves.
pub fn run() -> Result<(), EngineError> {
    let atlas = placeholder_atlas()?;
    let mut engine = EngineState::new(EngineConfig::default(), Arc::new(atlas))?;

    let mut uploads = 0;
    let mut releases = 0;
    for _ in 0..HEADLESS_TICKS {
        engine.player.velocity.x = WALK_SPEED;
        engine.tick(HEADLESS_DT)?;
        for command in engine.take_mesh_commands() {
            match command {
                MeshCommand::Upload(_) => uploads += 1,
                MeshCommand::Release(_) => releases += 1,
            }
        }
    }
    info!(
        "Streamed {} chunks ({} uploads, {} releases), player at {:?}",
        engine.world.len(),
        uploads,
        releases,
        engine.player.position
    );

    match engine.break_block(Vector3::new(0.0, -1.0, 0.0))? {
        Some(block) => info!("Broke block {:?}", block),
        None => debug!("Nothing in reach below the player"),
    }

    engine.save()?;
    Ok(())
}
