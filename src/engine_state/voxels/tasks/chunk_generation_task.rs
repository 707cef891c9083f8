//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which builds a chunk off the owner
//! thread. The task fills the block array from the generator and meshes it against
//! generated terrain; the result publishes the finished chunk into the world.

use std::sync::Arc;

use cgmath::Point3;

use crate::engine_state::{
    error::{AtlasError, TerrainError},
    task_management::task::{Task, TaskResult},
    voxels::{
        chunk::Chunk,
        generator::TerrainGenerator,
        world::{SharedAtlas, World},
    },
};

/// A task that generates and meshes one chunk.
///
/// The chunk under construction is private to the task until its result is handled,
/// so any number of these can run in parallel.
pub struct ChunkGenerationTask {
    /// The position of the chunk to generate (in chunk coordinates)
    position: Point3<i32>,
    generator: Arc<TerrainGenerator>,
    atlas: SharedAtlas,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates where the chunk should be generated
    /// * `generator` - The world's terrain function
    /// * `atlas` - UV source for the initial mesh
    pub fn new(position: Point3<i32>, generator: Arc<TerrainGenerator>, atlas: SharedAtlas) -> Self {
        ChunkGenerationTask {
            position,
            generator,
            atlas,
        }
    }
}

impl Task for ChunkGenerationTask {
    /// Generates the chunk and its initial mesh.
    ///
    /// Faces on the chunk's edge are resolved against generated terrain; the world
    /// re-meshes on insertion if a loaded neighbor was edited.
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let mut chunk = Chunk::generate(self.position, &self.generator);
        let chunk = chunk
            .generate_mesh(&*self.generator, &*self.atlas)
            .map(|_| chunk);

        Box::new(ChunkGenerationTaskResult { chunk })
    }
}

/// The result of a chunk generation task.
pub struct ChunkGenerationTaskResult {
    chunk: Result<Chunk, AtlasError>,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Publishes the generated chunk into the world.
    ///
    /// A chunk that arrives after the same position was loaded by other means is
    /// dropped.
    fn handle_result(
        self: Box<Self>,
        world: &mut World,
    ) -> Result<Vec<Box<dyn Task + Send>>, TerrainError> {
        world.insert_chunk(self.chunk?)?;
        Ok(Vec::new())
    }
}
