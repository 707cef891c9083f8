//! # Task Management System
//!
//! This module provides a worker pool for running work off the owner thread. Chunk
//! construction (generation and initial meshing) runs here; the finished chunks come
//! back to the owner thread, which is the only thread allowed to touch the world.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the owner thread and one worker
//!
//! Each worker is a `std::thread` with a dedicated task channel and result channel.
//! A manager built with zero workers runs tasks inline when queued tasks are
//! processed, which gives tests a deterministic schedule.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back results
//! 4. Results are applied on the owner thread in `process_completed_tasks()`
//! 5. Results can spawn new tasks
//!
//! Nothing is cancelled: a published task always runs to completion and its result is
//! applied whenever it arrives. Dropping the manager closes the task channels, which
//! ends each worker after its current task; results still in flight are discarded.

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{info, warn};
use task::{Task, TaskResult};

use crate::engine_state::error::TerrainError;
use crate::engine_state::voxels::world::World;

/// A communication channel between the owner thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the owner thread to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `_worker`: Handle to the worker thread
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    /// Results of tasks run inline (zero-worker mode), waiting to be applied
    inline_results: VecDeque<Box<dyn TaskResult + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 to ensure tasks are processed in order within each channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. Zero runs every task
    ///   inline on the owner thread.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        if num_workers > 0 {
            info!(
                "Starting {} worker(s), available parallelism: {:?}",
                num_workers,
                thread::available_parallelism()
            );
        }

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            inline_results: VecDeque::new(),
            current_channel: 0,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (worker disconnected), handing the task back
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    ///
    /// # Returns
    /// - `Some(usize)` index of a channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel % self.channels.len();
        let mut current = start_channel;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued (all workers busy, or inline mode)
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    warn!("Worker {} disconnected, queueing task", channel_idx);
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto free workers, oldest first.
    ///
    /// In inline mode every queued task is processed right here.
    pub fn process_queued_tasks(&mut self) {
        if self.channels.is_empty() {
            while let Some(task) = self.queued_tasks.pop_front() {
                self.inline_results.push_back(task.process());
            }
            return;
        }

        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Applies every result that has already arrived, without blocking.
    ///
    /// # Returns
    /// The number of results applied.
    pub fn process_completed_tasks(&mut self, world: &mut World) -> Result<usize, TerrainError> {
        let mut results = Vec::new();
        results.extend(self.inline_results.drain(..));
        for channel in &mut self.channels {
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        results.push(result);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        channel.num_tasks_in_flight = 0;
                        break;
                    }
                }
            }
        }

        self.apply_results(results, world)
    }

    /// Blocks until every published task has finished and its result is applied.
    ///
    /// Used at shutdown and by tests that need a settled world.
    pub fn finish_all(&mut self, world: &mut World) -> Result<usize, TerrainError> {
        let mut applied = 0;
        while !self.is_idle() {
            let queued_before = self.queued_tasks.len();
            self.process_queued_tasks();
            let mut progressed = self.queued_tasks.len() < queued_before;

            let ready = self.process_completed_tasks(world)?;
            applied += ready;
            progressed |= ready > 0;

            let mut results = Vec::new();
            for channel in &mut self.channels {
                if channel.num_tasks_in_flight == 0 {
                    continue;
                }
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        results.push(result);
                    }
                    Err(_) => channel.num_tasks_in_flight = 0,
                }
            }
            let waited = self.apply_results(results, world)?;
            applied += waited;
            progressed |= waited > 0;

            if !progressed && !self.queued_tasks.is_empty() {
                warn!(
                    "Workers disconnected, dropping {} queued task(s)",
                    self.queued_tasks.len()
                );
                self.queued_tasks.clear();
            }
        }
        Ok(applied)
    }

    /// Returns `true` when nothing is queued, in flight, or waiting to be applied.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
            && self.inline_results.is_empty()
            && self
                .channels
                .iter()
                .all(|channel| channel.num_tasks_in_flight == 0)
    }

    fn apply_results(
        &mut self,
        results: Vec<Box<dyn TaskResult + Send>>,
        world: &mut World,
    ) -> Result<usize, TerrainError> {
        let applied = results.len();
        let mut tasks_to_queue = Vec::new();
        for result in results {
            tasks_to_queue.extend(result.handle_result(world)?);
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        Ok(applied)
    }
}
