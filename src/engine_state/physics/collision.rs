//! Axis-aligned box collision against the block grid.
//!
//! Motion is integrated one axis at a time (X, then Y, then Z). After each axis step
//! the box is tested against solid blocks; on contact it is snapped flush against the
//! nearest block face in the direction of travel and that velocity component is
//! zeroed. This is a discrete sweep: a fast enough body can tunnel through thin walls.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::World;

/// Downward acceleration, blocks per second squared.
pub const GRAVITY: f32 = 35.0;
/// Per-axis velocity retained every 1/100 s.
pub const DAMPING: [f32; 3] = [0.9, 0.99, 0.9];
/// Decimal digits kept when snapping box bounds before flooring.
pub const SNAP_DIGITS: i32 = 5;
/// Upward velocity of a jump.
pub const JUMP_POWER: f32 = 15.0;
/// Player box size.
pub const PLAYER_SIZE: Vector3<f32> = Vector3::new(0.8, 1.8, 0.8);
/// Camera offset from the body's minimum corner.
pub const EYE_OFFSET: Vector3<f32> = Vector3::new(0.4, 1.5, 0.4);

/// Rounds to `SNAP_DIGITS` decimals, halves away from zero.
fn snap(value: f32) -> f32 {
    let scale = 10f64.powi(SNAP_DIGITS);
    ((value as f64 * scale).round() / scale) as f32
}

/// Every block a box overlaps: from the floor of its minimum corner up to, but not
/// including, the ceiling of its maximum corner.
pub fn touched_blocks(position: Point3<f32>, size: Vector3<f32>) -> Vec<Point3<i32>> {
    let min = [0, 1, 2].map(|axis| snap(position[axis]).floor() as i32);
    let max = [0, 1, 2].map(|axis| snap(position[axis] + size[axis]).ceil() as i32);

    let mut blocks = Vec::new();
    for x in min[0]..max[0] {
        for y in min[1]..max[1] {
            for z in min[2]..max[2] {
                blocks.push(Point3::new(x, y, z));
            }
        }
    }
    blocks
}

/// The touched blocks that are loaded and solid.
pub fn check_collision(world: &World, position: Point3<f32>, size: Vector3<f32>) -> Vec<Point3<i32>> {
    touched_blocks(position, size)
        .into_iter()
        .filter(|&block| world.is_solid_world(block))
        .collect()
}

/// A box-shaped body with velocity, positioned by its minimum corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Point3<f32>,
    pub size: Vector3<f32>,
    pub velocity: Vector3<f32>,
}

impl Body {
    pub fn new(position: Point3<f32>, size: Vector3<f32>) -> Self {
        Body {
            position,
            size,
            velocity: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// A body the size of the player.
    pub fn player(position: Point3<f32>) -> Self {
        Self::new(position, PLAYER_SIZE)
    }

    /// Advances the body by `dt` seconds: gravity, damping, then per-axis movement
    /// and collision resolution.
    pub fn update(&mut self, world: &World, dt: f32) {
        self.velocity.y -= GRAVITY * dt;
        for axis in 0..3 {
            self.velocity[axis] *= DAMPING[axis].powf(dt * 100.0);
        }

        for axis in 0..3 {
            self.position[axis] += self.velocity[axis] * dt;
            self.resolve_axis(world, axis);
        }
    }

    fn resolve_axis(&mut self, world: &World, axis: usize) {
        let hits = check_collision(world, self.position, self.size);
        if hits.is_empty() {
            return;
        }

        let velocity = self.velocity[axis];
        if velocity == 0.0 {
            return;
        }

        let coordinates = hits.iter().map(|block| block[axis]);
        if velocity > 0.0 {
            if let Some(nearest) = coordinates.min() {
                self.position[axis] = nearest as f32 - self.size[axis];
            }
        } else if let Some(nearest) = coordinates.max() {
            self.position[axis] = nearest as f32 + 1.0;
        }
        self.velocity[axis] = 0.0;
    }

    /// Blocks overlapped by the body.
    pub fn touched_blocks(&self) -> Vec<Point3<i32>> {
        touched_blocks(self.position, self.size)
    }

    /// Standing on something: a thin probe under the feet collides and the body is
    /// not moving vertically.
    pub fn is_grounded(&self, world: &World) -> bool {
        let probe = Point3::new(self.position.x, self.position.y - 0.1, self.position.z);
        let probe_size = Vector3::new(self.size.x, 0.1, self.size.z);
        self.velocity.y == 0.0 && !check_collision(world, probe, probe_size).is_empty()
    }

    /// Jumps if grounded.
    pub fn try_jump(&mut self, world: &World) -> bool {
        if !self.is_grounded(world) {
            return false;
        }
        self.velocity.y += JUMP_POWER;
        true
    }

    pub fn apply_impulse(&mut self, impulse: Vector3<f32>) {
        self.velocity += impulse;
    }

    pub fn eye_position(&self) -> Point3<f32> {
        self.position + EYE_OFFSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touched_blocks_cover_partial_overlaps() {
        let blocks = touched_blocks(Point3::new(0.5, 0.0, -0.5), Vector3::new(0.8, 1.8, 0.8));
        assert_eq!(blocks.len(), 2 * 2 * 2);
        assert!(blocks.contains(&Point3::new(0, 0, -1)));
        assert!(blocks.contains(&Point3::new(1, 1, 0)));
    }

    #[test]
    fn exact_boundaries_do_not_touch_the_next_block() {
        let blocks = touched_blocks(Point3::new(0.0, 1.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(blocks, vec![Point3::new(0, 1, 0)]);
    }

    #[test]
    fn float_noise_is_snapped_away() {
        let blocks = touched_blocks(Point3::new(0.0, 0.999_999_9, 0.0), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(blocks, vec![Point3::new(0, 1, 0)]);
    }

    #[test]
    fn eye_sits_above_the_body() {
        let body = Body::player(Point3::new(1.0, 2.0, 3.0));
        assert_eq!(body.eye_position(), Point3::new(1.4, 3.5, 3.4));
    }
}
