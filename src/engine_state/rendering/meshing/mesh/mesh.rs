//! Surface mesh construction for a chunk.
//!
//! Every solid block emits one quad per side whose neighbor (possibly in another
//! chunk) is air. Quads carry atlas UVs and per-vertex ambient occlusion.

use cgmath::Point3;

use crate::engine_state::error::AtlasError;
use crate::engine_state::rendering::atlas::Atlas;
use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::{
    block::block_side::BlockSide, block_source::BlockSource, chunk::Chunk,
};

use super::{ambient_occlusion::face_occlusion, face::Face};

/// Renderable geometry of one chunk, in chunk-local coordinates.
#[derive(Debug, Default, Clone)]
pub struct SurfaceMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    /// Builds the mesh for `chunk`.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to mesh
    /// * `neighbors` - Resolves blocks past the chunk's edge
    /// * `atlas` - Supplies the UV region of each block id
    ///
    /// # Errors
    /// Propagates [`AtlasError::Unregistered`] for a solid block with no atlas tile.
    pub fn build(
        chunk: &Chunk,
        neighbors: &dyn BlockSource,
        atlas: &dyn Atlas,
    ) -> Result<Self, AtlasError> {
        let mut mesh = SurfaceMesh::default();
        let is_solid = |offset: Point3<i32>| chunk.block_at(offset, neighbors).is_solid();

        for (local, block) in chunk.solid_blocks() {
            // looked up on the first exposed face so fully buried blocks never hit the atlas
            let mut cached_region = None;
            for side in BlockSide::all() {
                if is_solid(local + side.normal()) {
                    continue;
                }
                let region = match cached_region {
                    Some(region) => region,
                    None => {
                        let region = atlas.region(block)?;
                        cached_region = Some(region);
                        region
                    }
                };
                let occlusion = face_occlusion(local, side, &is_solid);
                mesh.push_face(&Face::new(local, side, region, occlusion));
            }
        }

        Ok(mesh)
    }

    fn push_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices.extend_from_slice(&face.indices(base));
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex buffer contents ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices.as_slice())
    }

    /// Index buffer contents ready for upload (`u32` indices).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices.as_slice())
    }
}
