//! Vertex data structures for chunk surface meshes.
//!
//! This module defines the interleaved vertex format the mesher emits. Vertices are
//! plain old data so a mesh can be handed to a rendering backend as a byte slice.

use cgmath::{Point3, Vector3};

/// A vertex of a chunk surface mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes), chunk-local
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes), normalized atlas UV
/// - Ambient Occlusion: f32 (4 bytes), brightness in `[0.4, 1.0]`
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
    pub ao: f32,
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - Chunk-local corner position
    /// * `normal` - Outward face normal
    /// * `tex_coords` - Atlas UV for this corner
    /// * `ao` - Ambient occlusion brightness
    pub fn new(pos: Point3<i32>, normal: Vector3<i32>, tex_coords: [f32; 2], ao: f32) -> Self {
        Vertex {
            position: [pos.x as f32, pos.y as f32, pos.z as f32],
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            tex_coords,
            ao,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        let vertex = Vertex::new(Point3::new(1, 2, 3), Vector3::new(0, 1, 0), [0.5, 0.25], 0.8);
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 36);
    }
}
