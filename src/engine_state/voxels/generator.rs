//! # Terrain Generator
//!
//! Maps a world block coordinate to a block id. A 2D OpenSimplex sample at `(x, z)` is
//! shaped by an asymmetric power curve into a surface height; everything at or below
//! the surface is solid and classified into strata by its (jittered) Y coordinate.

use cgmath::Point3;
use noise::{NoiseFn, OpenSimplex};

use crate::engine_state::config::WorldGenConfig;

use super::block::BlockId;
use super::block_source::BlockSource;

/// Seeded terrain function shared by every chunk construction.
///
/// The generator is immutable after construction and is shared across worker threads
/// behind an `Arc`.
pub struct TerrainGenerator {
    seed: i32,
    noise: OpenSimplex,
    config: WorldGenConfig,
}

impl TerrainGenerator {
    /// Creates a generator for `seed` using the given parameters.
    pub fn new(seed: i32, config: WorldGenConfig) -> Self {
        TerrainGenerator {
            seed,
            noise: OpenSimplex::new(seed as u32),
            config,
        }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    /// Height of the highest solid block in the column at `(x, z)`.
    ///
    /// Positive noise samples are raised to the mountain power; negative samples are
    /// raised to the valley power (on their magnitude) and scaled by the valley factor.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let frequency = self.config.frequency as f64;
        let sample = self.noise.get([x as f64 * frequency, z as f64 * frequency]);

        let shaped = if sample >= 0.0 {
            sample.powf(self.config.mountain_power as f64)
        } else {
            -(-sample).powf(self.config.valley_power as f64) * self.config.valley_scale as f64
        };

        (shaped * self.config.height_scale as f64) as i32
    }

    /// Block id at a world coordinate.
    pub fn block_at(&self, world: Point3<i32>) -> BlockId {
        if world.y > self.surface_height(world.x, world.z) {
            return BlockId::AIR;
        }

        let y = world.y.saturating_add(self.strata_jitter(world));
        self.config
            .layers
            .iter()
            .find(|layer| layer.contains(y))
            .map(|layer| BlockId(layer.block_id))
            .unwrap_or(BlockId::DEFAULT_GROUND)
    }

    /// Offset in `[-border, border]` added to Y before layer lookup.
    fn strata_jitter(&self, world: Point3<i32>) -> i32 {
        let border = self.config.border.max(0);
        if border == 0 {
            return 0;
        }

        if !self.config.deterministic_strata {
            return fastrand::i32(-border..=border);
        }

        let span = 2 * border as u64 + 1;
        (coordinate_hash(world, self.seed) % span) as i32 - border
    }
}

impl BlockSource for TerrainGenerator {
    fn block_at_world(&self, world: Point3<i32>) -> BlockId {
        self.block_at(world)
    }
}

/// Stateless 64-bit mix of a coordinate and seed. Each axis is folded in
/// through its own round so no two axes share bits before mixing.
fn coordinate_hash(world: Point3<i32>, seed: i32) -> u64 {
    let mut h = (seed as u32 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h = mix(h ^ world.x as u32 as u64);
    h = mix(h ^ world.y as u32 as u64);
    mix(h ^ world.z as u32 as u64)
}

/// splitmix64 finaliser.
fn mix(mut h: u64) -> u64 {
    h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::config::LayerConfig;

    fn flat(layers: Vec<LayerConfig>, border: i32) -> TerrainGenerator {
        TerrainGenerator::new(
            7,
            WorldGenConfig {
                height_scale: 0,
                border,
                layers,
                ..WorldGenConfig::default()
            },
        )
    }

    #[test]
    fn flat_terrain_is_solid_at_and_below_zero() {
        let generator = flat(Vec::new(), 0);
        assert_eq!(generator.surface_height(123, -456), 0);
        assert_eq!(generator.block_at(Point3::new(5, 0, 5)), BlockId::DEFAULT_GROUND);
        assert_eq!(generator.block_at(Point3::new(5, 1, 5)), BlockId::AIR);
    }

    #[test]
    fn first_matching_layer_wins() {
        let generator = flat(
            vec![LayerConfig::new(9, -10, 0), LayerConfig::new(8, -20, 0)],
            0,
        );
        assert_eq!(generator.block_at(Point3::new(0, -5, 0)), BlockId(9));
        assert_eq!(generator.block_at(Point3::new(0, -15, 0)), BlockId(8));
        assert_eq!(generator.block_at(Point3::new(0, -25, 0)), BlockId::DEFAULT_GROUND);
    }

    #[test]
    fn deterministic_jitter_is_repeatable_and_bounded() {
        let generator = TerrainGenerator::new(42, WorldGenConfig::default());
        for i in -50..50 {
            let world = Point3::new(i * 13, i * 3 - 40, -i * 7);
            assert_eq!(generator.block_at(world), generator.block_at(world));
            let jitter = generator.strata_jitter(world);
            assert!((-8..=8).contains(&jitter));
        }
    }

    #[test]
    fn shared_jitter_stays_within_the_border() {
        let generator = TerrainGenerator::new(
            7,
            WorldGenConfig {
                height_scale: 0,
                border: 4,
                deterministic_strata: false,
                layers: vec![LayerConfig::new(7, -10, -3), LayerConfig::new(8, -2, 0)],
                ..WorldGenConfig::default()
            },
        );
        let allowed = [BlockId(7), BlockId(8), BlockId::DEFAULT_GROUND];
        for i in 0..500 {
            let world = Point3::new(i % 17, -(i % 21), i / 17);
            assert!((-4..=4).contains(&generator.strata_jitter(world)));
            assert!(allowed.contains(&generator.block_at(world)));
        }
    }

    #[test]
    fn coordinate_hash_separates_nearby_cells() {
        let mut seen = std::collections::HashSet::new();
        for x in -4..4 {
            for y in -4..4 {
                for z in -4..4 {
                    assert!(seen.insert(coordinate_hash(Point3::new(x, y, z), 42)));
                }
            }
        }
        assert_ne!(
            coordinate_hash(Point3::new(1, 2, 3), 42),
            coordinate_hash(Point3::new(3, 2, 1), 42)
        );
        assert_ne!(
            coordinate_hash(Point3::new(0, 1, 0), 42),
            coordinate_hash(Point3::new(1 << 21, 0, 0), 42)
        );
    }

    #[test]
    fn same_seed_same_terrain() {
        let a = TerrainGenerator::new(1234, WorldGenConfig::default());
        let b = TerrainGenerator::new(1234, WorldGenConfig::default());
        for x in (-5000..5000).step_by(250) {
            assert_eq!(a.surface_height(x, -x), b.surface_height(x, -x));
        }
    }
}
