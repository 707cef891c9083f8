//! Chunk geometry and its hand-off to a rendering backend.
//!
//! The terrain core never draws anything. It keeps each chunk's [`SurfaceMesh`]
//! current and queues [`MeshCommand`]s telling a backend when to (re)upload a chunk's
//! buffers and when to free them.

use cgmath::Point3;

pub mod mesh;

pub use mesh::SurfaceMesh;

/// Instruction for the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshCommand {
    /// The chunk's mesh changed; upload it and draw it until released.
    Upload(Point3<i32>),
    /// The chunk is being evicted; free its buffers.
    Release(Point3<i32>),
}

impl MeshCommand {
    pub fn position(&self) -> Point3<i32> {
        match self {
            MeshCommand::Upload(position) | MeshCommand::Release(position) => *position,
        }
    }
}
