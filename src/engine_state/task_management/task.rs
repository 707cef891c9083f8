//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which provides a framework for executing work asynchronously across multiple threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the owner thread with the world
//! 5. The result can spawn new tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back to the owner thread
//! - Tasks own everything they read; shared inputs are behind `Arc`

use crate::engine_state::error::TerrainError;
use crate::engine_state::voxels::world::World;

/// A unit of work that can be executed off the owner thread.
///
/// Tasks should own all the data they need. They never see the [`World`]; only
/// their result does, back on the owner thread.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Runs on a worker thread (or inline when the manager has no workers). Failures
    /// should be carried in the result so they surface on the owner thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Applies the result on the owner thread.
    ///
    /// # Arguments
    /// * `world` - The world, which this thread alone mutates
    ///
    /// # Returns
    /// Follow-up tasks to schedule (can be empty).
    fn handle_result(
        self: Box<Self>,
        world: &mut World,
    ) -> Result<Vec<Box<dyn Task + Send>>, TerrainError>;
}
