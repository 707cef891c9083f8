use cgmath::Point3;

use crate::engine_state::rendering::atlas::Region;
use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::block_side::BlockSide;

use super::ambient_occlusion::{brightness, should_flip};

/// Represents a single visible quad of a voxel in the mesh.
///
/// A face knows its block, which side it covers, the atlas region of the block and
/// the occlusion level of each of its four corners (in the side's winding order).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Chunk-local coordinate of the block this face belongs to
    pub block: Point3<i32>,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
    pub region: Region,
    pub occlusion: [u8; 4],
}

impl Face {
    pub fn new(block: Point3<i32>, block_side: BlockSide, region: Region, occlusion: [u8; 4]) -> Self {
        Face {
            block,
            block_side,
            region,
            occlusion,
        }
    }

    /// The four vertices of this face in winding order.
    pub fn vertices(&self) -> [Vertex; 4] {
        let Region { u0, v0, u1, v1 } = self.region;
        let uvs = [[u0, v0], [u0, v1], [u1, v1], [u1, v0]];
        let normal = self.block_side.normal();
        let corners = self.block_side.corners();

        std::array::from_fn(|i| {
            let [cx, cy, cz] = corners[i];
            let position = Point3::new(self.block.x + cx, self.block.y + cy, self.block.z + cz);
            Vertex::new(position, normal, uvs[i], brightness(self.occlusion[i]))
        })
    }

    /// Two triangles over vertices `base..base + 4`, split along the diagonal that
    /// avoids interpolating across the darker pair of corners.
    pub fn indices(&self, base: u32) -> [u32; 6] {
        if should_flip(self.occlusion) {
            [base + 1, base + 2, base + 3, base + 1, base + 3, base]
        } else {
            [base, base + 1, base + 2, base, base + 2, base + 3]
        }
    }
}
