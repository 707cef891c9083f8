//! # Block Edits
//!
//! The single-block write path. A write updates the owning chunk and its mesh, records
//! the chunk in the edit log, then re-meshes every loaded neighbor that shares the
//! face, edge or corner the block touches. Ambient occlusion reads one ring of blocks
//! past a face, so a boundary edit can change shading in up to seven other chunks.

use cgmath::{Point3, Vector3};
use log::debug;

use crate::engine_state::error::{AtlasError, TerrainError};
use crate::engine_state::rendering::meshing::MeshCommand;

use super::block::BlockId;
use super::chunk::CHUNK_DIMENSION;
use super::position::world_to_chunk;
use super::world::World;

impl World {
    /// Writes `block` at a world coordinate.
    ///
    /// # Returns
    /// - `Ok(false)` if the owning chunk is not loaded; nothing changes.
    /// - `Ok(true)` if the block now holds `block`. Writing the value already present
    ///   succeeds without re-meshing anything.
    ///
    /// # Errors
    /// Atlas failures while re-meshing.
    pub fn set_block_world(
        &mut self,
        world: Point3<i32>,
        block: BlockId,
    ) -> Result<bool, TerrainError> {
        let (cell, local) = world_to_chunk(world);
        let current = match self.chunks.get(&cell) {
            Some(chunk) => chunk.local_block(local),
            None => return Ok(false),
        };
        if current == block {
            return Ok(true);
        }

        let snapshot = self.with_detached(cell, |chunk, lookup, atlas| {
            chunk.set_block(local, block, lookup, atlas)?;
            Ok::<_, AtlasError>(chunk.blocks().to_vec())
        });
        let Some(snapshot) = snapshot else {
            return Ok(false);
        };
        self.edit_log.insert(cell, snapshot?);
        self.mesh_commands.push(MeshCommand::Upload(cell));

        let mut remeshed = 0;
        for offset in affected_neighbors(local) {
            if self.remesh(cell + offset)? {
                remeshed += 1;
            }
        }
        debug!(
            "Set block {:?} to {:?}, {} neighboring chunk(s) remeshed",
            world, block, remeshed
        );
        Ok(true)
    }
}

/// Per-axis boundary membership of a local coordinate: `-1` on the low face, `+1` on
/// the high face, `0` inside.
pub fn boundary_offsets(local: Point3<i32>) -> Vector3<i32> {
    let side = |v: i32| {
        if v == 0 {
            -1
        } else if v == CHUNK_DIMENSION - 1 {
            1
        } else {
            0
        }
    };
    Vector3::new(side(local.x), side(local.y), side(local.z))
}

/// Offsets of the neighboring chunks whose meshes can see the block at `local`.
///
/// Every non-empty combination of the boundary axes: up to three face neighbors,
/// three edge neighbors and one corner neighbor.
pub fn affected_neighbors(local: Point3<i32>) -> Vec<Vector3<i32>> {
    let boundary = boundary_offsets(local);
    let mut neighbors = Vec::with_capacity(7);
    for mask in 1..8u8 {
        let mut offset = Vector3::new(0, 0, 0);
        let mut valid = true;
        for axis in 0..3 {
            if mask & (1 << axis) == 0 {
                continue;
            }
            if boundary[axis] == 0 {
                valid = false;
                break;
            }
            offset[axis] = boundary[axis];
        }
        if valid {
            neighbors.push(offset);
        }
    }
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_blocks_affect_no_neighbors() {
        assert!(affected_neighbors(Point3::new(5, 6, 7)).is_empty());
    }

    #[test]
    fn face_block_affects_one_neighbor() {
        assert_eq!(affected_neighbors(Point3::new(0, 5, 5)), vec![Vector3::new(-1, 0, 0)]);
    }

    #[test]
    fn edge_block_affects_three_neighbors() {
        let neighbors = affected_neighbors(Point3::new(31, 0, 9));
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.contains(&Vector3::new(1, 0, 0)));
        assert!(neighbors.contains(&Vector3::new(0, -1, 0)));
        assert!(neighbors.contains(&Vector3::new(1, -1, 0)));
    }

    #[test]
    fn corner_block_affects_seven_neighbors() {
        let neighbors = affected_neighbors(Point3::new(0, 31, 0));
        assert_eq!(neighbors.len(), 7);
        assert!(neighbors.contains(&Vector3::new(-1, 1, -1)));
    }
}
