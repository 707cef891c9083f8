#![allow(dead_code)]

use std::sync::Arc;

use voxel_terrain::engine_state::{
    config::WorldGenConfig,
    rendering::atlas::GridAtlas,
    voxels::{block::BlockId, generator::TerrainGenerator, world::World},
};

pub const STONE: BlockId = BlockId(2);

/// Everything at or below y = 0 is ground, everything above is air.
pub fn flat_generator() -> TerrainGenerator {
    TerrainGenerator::new(
        1,
        WorldGenConfig {
            height_scale: 0,
            border: 0,
            layers: Vec::new(),
            ..WorldGenConfig::default()
        },
    )
}

pub fn colour_atlas() -> GridAtlas {
    let mut atlas = GridAtlas::new(4, 4, 2, 2);
    atlas.add_solid_color(BlockId::DEFAULT_GROUND, [120, 90, 60, 255]).unwrap();
    atlas.add_solid_color(STONE, [90, 90, 90, 255]).unwrap();
    atlas
}

pub fn flat_world() -> World {
    World::new(Arc::new(flat_generator()), Arc::new(colour_atlas()))
}
