//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block together with the
//! geometry tables the mesher needs: the face normal, the four unit-cube corners of
//! the face in winding order, and the two in-plane axes used for ambient occlusion.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value for compact storage. The
/// discriminant order is also the order in which the mesher emits faces.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The right face (facing positive X)
    RIGHT = 0,

    /// The left face (facing negative X)
    LEFT = 1,

    /// The top face (facing positive Y)
    TOP = 2,

    /// The bottom face (facing negative Y)
    BOTTOM = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

/// Axis index for X.
pub const AXIS_X: usize = 0;
/// Axis index for Y.
pub const AXIS_Y: usize = 1;
/// Axis index for Z.
pub const AXIS_Z: usize = 2;

impl BlockSide {
    /// Returns an array containing all six block faces in emission order.
    ///
    /// The order is: [RIGHT, LEFT, TOP, BOTTOM, FRONT, BACK]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Unit offset from a block to the neighbor this face looks at.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// The four unit-cube corners of this face, in counter-clockwise winding order
    /// when viewed from outside the block.
    ///
    /// Corners are offsets from the block's minimum corner, so each component is 0 or 1.
    /// The component along an in-plane axis doubles as the corner's "parity" when
    /// choosing which side neighbors occlude it.
    pub fn corners(self) -> [[i32; 3]; 4] {
        match self {
            BlockSide::RIGHT => [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]],
            BlockSide::LEFT => [[0, 0, 1], [0, 1, 1], [0, 1, 0], [0, 0, 0]],
            BlockSide::TOP => [[0, 1, 1], [1, 1, 1], [1, 1, 0], [0, 1, 0]],
            BlockSide::BOTTOM => [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
            BlockSide::FRONT => [[1, 0, 1], [1, 1, 1], [0, 1, 1], [0, 0, 1]],
            BlockSide::BACK => [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]],
        }
    }

    /// The two axes spanning the face plane, as `(u, v)` axis indices.
    pub fn plane_axes(self) -> (usize, usize) {
        match self {
            BlockSide::RIGHT | BlockSide::LEFT => (AXIS_Y, AXIS_Z),
            BlockSide::TOP | BlockSide::BOTTOM => (AXIS_X, AXIS_Z),
            BlockSide::FRONT | BlockSide::BACK => (AXIS_X, AXIS_Y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_lie_on_the_face_plane() {
        for side in BlockSide::all() {
            let normal = side.normal();
            let (u, v) = side.plane_axes();
            let normal_axis = 3 - u - v;
            let plane = if normal[normal_axis] > 0 { 1 } else { 0 };
            for corner in side.corners() {
                assert_eq!(corner[normal_axis], plane, "{side:?}");
            }
        }
    }

    #[test]
    fn plane_axes_are_perpendicular_to_the_normal() {
        for side in BlockSide::all() {
            let normal = side.normal();
            let (u, v) = side.plane_axes();
            assert_eq!(normal[u], 0);
            assert_eq!(normal[v], 0);
            assert_ne!(u, v);
        }
    }

    #[test]
    fn winding_faces_outward() {
        for side in BlockSide::all() {
            let c = side.corners();
            let a = Vector3::new(c[1][0] - c[0][0], c[1][1] - c[0][1], c[1][2] - c[0][2]);
            let b = Vector3::new(c[2][0] - c[0][0], c[2][1] - c[0][1], c[2][2] - c[0][2]);
            assert_eq!(a.cross(b), side.normal(), "{side:?}");
        }
    }
}
