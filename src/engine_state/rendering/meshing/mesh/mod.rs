//! Mesh generation for voxel rendering.
//!
//! This module converts a chunk's block array into a [`SurfaceMesh`]: one quad per
//! exposed block face, with atlas UVs and per-vertex ambient occlusion.
//!
//! # Architecture
//! - [`SurfaceMesh`]: Vertex and index buffers of one chunk
//! - [`Face`]: A single quad with its corner occlusion levels
//! - [`ambient_occlusion`]: Corner occlusion levels and the brightness table
//!
//! # Seams
//! Faces on a chunk's edge consult the neighboring chunk through a
//! [`BlockSource`](crate::engine_state::voxels::block_source::BlockSource), so a
//! boundary face is culled or occluded exactly as an interior one would be.

pub mod ambient_occlusion;
mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
