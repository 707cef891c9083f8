//! View-frustum culling at chunk granularity.
//!
//! Each chunk is approximated by its bounding sphere; a chunk is visible if that
//! sphere intersects the perspective frustum described by [`ViewFrustum`].

use cgmath::{InnerSpace, Point3, Rad, Vector3};

use crate::engine_state::voxels::chunk::CHUNK_DIMENSION;

/// A perspective frustum in world space.
#[derive(Debug, Clone, Copy)]
pub struct ViewFrustum {
    pub position: Point3<f32>,
    pub front: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view.
    pub fov_y: Rad<f32>,
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewFrustum {
    /// Builds a frustum looking along `yaw`/`pitch` from `position`.
    ///
    /// Yaw 0 looks along +X; positive pitch looks up.
    pub fn new<Y: Into<Rad<f32>>, P: Into<Rad<f32>>, F: Into<Rad<f32>>>(
        position: Point3<f32>,
        yaw: Y,
        pitch: P,
        fov_y: F,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let (yaw_sin, yaw_cos) = yaw.into().0.sin_cos();
        let (pitch_sin, pitch_cos) = pitch.into().0.sin_cos();
        let front = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();

        let right = front.cross(Vector3::unit_y());
        let right = if right.magnitude2() < 1e-6 {
            Vector3::unit_x()
        } else {
            right.normalize()
        };
        let up = right.cross(front).normalize();

        ViewFrustum {
            position,
            front,
            right,
            up,
            fov_y: fov_y.into(),
            aspect,
            near,
            far,
        }
    }

    /// Returns `true` if the bounding sphere of the chunk at `cell` may be visible.
    pub fn contains_chunk(&self, cell: Point3<i32>) -> bool {
        let size = CHUNK_DIMENSION as f32;
        let center = Point3::new(
            (cell.x as f32 + 0.5) * size,
            (cell.y as f32 + 0.5) * size,
            (cell.z as f32 + 0.5) * size,
        );
        let radius = 3f32.sqrt() * size / 2.0;
        let offset = center - self.position;

        let depth = offset.dot(self.front);
        if depth < self.near - radius || depth > self.far + radius {
            return false;
        }

        let half_y = self.fov_y.0 / 2.0;
        let limit_y = depth * half_y.tan() + radius / half_y.cos();
        if offset.dot(self.up).abs() > limit_y {
            return false;
        }

        let half_x = (half_y.tan() * self.aspect).atan();
        let limit_x = depth * half_x.tan() + radius / half_x.cos();
        offset.dot(self.right).abs() <= limit_x
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Deg;

    use super::*;

    fn looking_along_x() -> ViewFrustum {
        ViewFrustum::new(
            Point3::new(16.0, 16.0, 16.0),
            Deg(0.0),
            Deg(0.0),
            Deg(70.0),
            16.0 / 9.0,
            0.1,
            1000.0,
        )
    }

    #[test]
    fn chunks_ahead_are_visible() {
        let frustum = looking_along_x();
        assert!(frustum.contains_chunk(Point3::new(0, 0, 0)));
        assert!(frustum.contains_chunk(Point3::new(5, 0, 0)));
        assert!(frustum.contains_chunk(Point3::new(5, 1, 2)));
    }

    #[test]
    fn chunks_behind_or_beyond_are_culled() {
        let frustum = looking_along_x();
        assert!(!frustum.contains_chunk(Point3::new(-5, 0, 0)));
        assert!(!frustum.contains_chunk(Point3::new(40, 0, 0)));
        assert!(!frustum.contains_chunk(Point3::new(2, 0, 10)));
    }
}
