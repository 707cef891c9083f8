//! Block picking by voxel grid traversal.
//!
//! The ray walks block to block, always crossing the nearest grid boundary next, so
//! every block the ray passes through is visited exactly once.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{position::block_containing, world::World};

/// The first solid block along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub block: Point3<i32>,
    /// Outward normal of the face the ray entered through; zero if the ray started
    /// inside the block.
    pub normal: Vector3<i32>,
    /// Distance along the ray to the entry point.
    pub distance: f32,
}

/// Distance along the ray to the first boundary crossing on one axis.
fn first_crossing(origin: f32, direction: f32, cell: i32, step: i32) -> f32 {
    match step {
        1 => (cell as f32 + 1.0 - origin) / direction,
        -1 => (origin - cell as f32) / -direction,
        _ => f32::INFINITY,
    }
}

/// Casts a ray against an arbitrary solidity predicate.
///
/// # Arguments
/// * `origin` - Ray start in world space
/// * `direction` - Normalized ray direction
/// * `max_distance` - Give up once the traversal passes this distance
/// * `is_solid` - Solidity of a world block
///
/// Boundaries reached at the same distance on several axes are crossed in X, Y, Z
/// priority.
pub fn raycast_with(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
    is_solid: impl Fn(Point3<i32>) -> bool,
) -> Option<RaycastHit> {
    let mut block = block_containing(origin);
    if is_solid(block) {
        return Some(RaycastHit {
            block,
            normal: Vector3::new(0, 0, 0),
            distance: 0.0,
        });
    }

    let step = [0, 1, 2].map(|axis| {
        if direction[axis] > 0.0 {
            1
        } else if direction[axis] < 0.0 {
            -1
        } else {
            0
        }
    });
    let mut t_max = [0, 1, 2]
        .map(|axis| first_crossing(origin[axis], direction[axis], block[axis], step[axis]));
    let t_delta = [0, 1, 2].map(|axis| {
        if step[axis] == 0 {
            f32::INFINITY
        } else {
            (1.0 / direction[axis]).abs()
        }
    });

    loop {
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };

        let t = t_max[axis];
        if !(t <= max_distance) {
            return None;
        }

        block[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        if is_solid(block) {
            let mut normal = Vector3::new(0, 0, 0);
            normal[axis] = -step[axis];
            return Some(RaycastHit {
                block,
                normal,
                distance: t,
            });
        }
    }
}

/// Casts a ray through the loaded chunks of `world`. Unloaded blocks are empty.
pub fn raycast(
    world: &World,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<RaycastHit> {
    raycast_with(origin, direction, max_distance, |block| world.is_solid_world(block))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_the_entry_face() {
        let hit = raycast_with(
            Point3::new(0.5, 0.5, -5.0),
            Vector3::new(0.0, 0.0, 1.0),
            10.0,
            |block| block == Point3::new(0, 0, 0),
        )
        .unwrap();
        assert_eq!(hit.block, Point3::new(0, 0, 0));
        assert_eq!(hit.normal, Vector3::new(0, 0, -1));
        assert_eq!(hit.distance, 5.0);
    }

    #[test]
    fn stops_at_max_distance() {
        let hit = raycast_with(
            Point3::new(0.5, 0.5, -5.0),
            Vector3::new(0.0, 0.0, 1.0),
            4.5,
            |block| block == Point3::new(0, 0, 0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn starting_inside_a_block_hits_with_zero_normal() {
        let hit = raycast_with(
            Point3::new(3.2, -0.5, 7.9),
            Vector3::new(1.0, 0.0, 0.0),
            8.0,
            |block| block.y < 0,
        )
        .unwrap();
        assert_eq!(hit.block, Point3::new(3, -1, 7));
        assert_eq!(hit.normal, Vector3::new(0, 0, 0));
    }

    #[test]
    fn looking_down_hits_the_top_face() {
        let hit = raycast_with(
            Point3::new(0.5, 3.5, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            8.0,
            |block| block.y <= 0,
        )
        .unwrap();
        assert_eq!(hit.block, Point3::new(0, 0, 0));
        assert_eq!(hit.normal, Vector3::new(0, 1, 0));
        assert_eq!(hit.distance, 2.5);
    }

    #[test]
    fn diagonal_ties_cross_x_first() {
        let direction = Vector3::new(1.0f32, 1.0, 0.0) / 2f32.sqrt();
        let hit = raycast_with(
            Point3::new(0.5, 0.5, 0.5),
            direction,
            8.0,
            |block| block == Point3::new(1, 0, 0) || block == Point3::new(0, 1, 0),
        )
        .unwrap();
        assert_eq!(hit.block, Point3::new(1, 0, 0));
        assert_eq!(hit.normal, Vector3::new(-1, 0, 0));
    }

    #[test]
    fn zero_direction_never_hits_anything_new() {
        let hit = raycast_with(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 0.0, 0.0), 8.0, |block| {
            block != Point3::new(0, 0, 0)
        });
        assert!(hit.is_none());
    }
}
