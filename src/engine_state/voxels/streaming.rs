//! # Chunk Streaming
//!
//! Keeps the chunks around an observer loaded. Each tick the streamer applies the
//! chunks its workers finished, evicts the farthest chunks while the store is over
//! capacity, and, once the previous batch is fully applied, requests the next batch
//! of at most `cells_per_tick` missing chunks, nearest first.
//!
//! The near-to-far order comes from a list of offsets sorted once at start-up by
//! squared distance. Offsets are bucketed by squared distance and the buckets are
//! concatenated, so no per-tick sort is needed.

use std::num::NonZeroUsize;
use std::thread;

use cgmath::{Point3, Vector3};
use log::debug;

use crate::engine_state::error::TerrainError;
use crate::engine_state::task_management::TaskManager;

use super::position::chunk_containing;
use super::tasks::chunk_generation_task::ChunkGenerationTask;
use super::world::World;

/// Half-width, in chunks, of the cube kept loaded around the observer.
pub const VIEW_DISTANCE: i32 = 16;
/// Maximum number of loaded chunks.
pub const MAX_CELLS: usize = 50_000;
/// Maximum number of chunks requested per batch.
pub const CELLS_PER_TICK: usize = 4;

/// Tunables of the streamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingConfig {
    pub view_distance: i32,
    pub max_cells: usize,
    pub cells_per_tick: usize,
    /// Worker threads for chunk construction; zero builds chunks inline.
    pub worker_count: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            view_distance: VIEW_DISTANCE,
            max_cells: MAX_CELLS,
            cells_per_tick: CELLS_PER_TICK,
            worker_count: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
        }
    }
}

/// What one streaming tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// Chunks requested from the workers this tick.
    pub requested: usize,
    /// Worker results applied to the world this tick.
    pub completed: usize,
    /// Chunks evicted this tick.
    pub evicted: usize,
}

/// All offsets of the cube of half-width `distance`, ordered by squared distance from
/// the origin. Offsets at equal distance keep their x/y/z enumeration order.
pub fn offsets_by_distance(distance: i32) -> Vec<Vector3<i32>> {
    let distance = distance.max(0);
    let mut buckets: Vec<Vec<Vector3<i32>>> = vec![Vec::new(); (3 * distance * distance + 1) as usize];
    for x in -distance..=distance {
        for y in -distance..=distance {
            for z in -distance..=distance {
                buckets[(x * x + y * y + z * z) as usize].push(Vector3::new(x, y, z));
            }
        }
    }
    buckets.into_iter().flatten().collect()
}

/// Drives chunk loading and eviction around an observer.
pub struct ChunkStreamer {
    config: StreamingConfig,
    offsets: Vec<Vector3<i32>>,
    task_manager: TaskManager,
}

impl ChunkStreamer {
    pub fn new(config: StreamingConfig) -> Self {
        ChunkStreamer {
            offsets: offsets_by_distance(config.view_distance),
            task_manager: TaskManager::new(config.worker_count),
            config,
        }
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Runs one streaming step for an observer at `observer` (world space).
    pub fn tick(
        &mut self,
        world: &mut World,
        observer: Point3<f32>,
    ) -> Result<StreamingReport, TerrainError> {
        let center = chunk_containing(observer);

        self.task_manager.process_queued_tasks();
        let completed = self.task_manager.process_completed_tasks(world)?;
        let evicted = self.enforce_capacity(world, center);

        let mut requested = 0;
        if self.task_manager.is_idle() {
            for position in self.missing_cells(world, center) {
                self.task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                    position,
                    world.generator().clone(),
                    world.atlas().clone(),
                )));
                requested += 1;
            }
        }

        let report = StreamingReport {
            requested,
            completed,
            evicted,
        };
        if report != StreamingReport::default() {
            debug!(
                "Streaming around {:?}: {} requested, {} completed, {} evicted, {} loaded",
                center,
                requested,
                completed,
                evicted,
                world.len()
            );
        }
        Ok(report)
    }

    /// Up to `cells_per_tick` unloaded chunk positions around `center`, nearest first.
    pub fn missing_cells(&self, world: &World, center: Point3<i32>) -> Vec<Point3<i32>> {
        self.offsets
            .iter()
            .map(|&offset| center + offset)
            .filter(|position| !world.contains(*position))
            .take(self.config.cells_per_tick)
            .collect()
    }

    /// Evicts farthest-first until the world is within `max_cells`.
    ///
    /// # Returns
    /// The number of chunks evicted.
    pub fn enforce_capacity(&self, world: &mut World, center: Point3<i32>) -> usize {
        let mut evicted = 0;
        while world.len() > self.config.max_cells {
            if world.evict_farthest(center).is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    /// Blocks until every requested chunk has been applied.
    pub fn finish_pending(&mut self, world: &mut World) -> Result<usize, TerrainError> {
        self.task_manager.finish_all(world)
    }

    /// Returns `true` if no batch is in flight.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle()
    }
}
