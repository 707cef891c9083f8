//! Rendering-side data for the voxel engine.
//!
//! The terrain core produces geometry but never issues draw calls. This module holds
//! what a backend needs to consume that geometry: the vertex format, the texture
//! atlas lookup, frustum culling and the mesh upload/release commands.

pub mod atlas;
pub mod frustum;
pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
