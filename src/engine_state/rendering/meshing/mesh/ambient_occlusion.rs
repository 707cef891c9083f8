//! Per-vertex ambient occlusion.
//!
//! Each face vertex looks at three blocks in the layer the face opens into: the two
//! in-plane neighbors sharing the vertex ("sides") and the diagonal between them
//! ("corner"). Two solid sides fully occlude the vertex whatever the corner holds.

use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// Brightness for occlusion levels 0 through 3.
pub const AO_BRIGHTNESS: [f32; 4] = [1.0, 0.8, 0.6, 0.4];

/// Occlusion level in `0..=3` from the solidity of the two sides and the corner.
pub fn occlusion_level(side1: bool, side2: bool, corner: bool) -> u8 {
    if side1 && side2 {
        return 3;
    }
    side1 as u8 + side2 as u8 + corner as u8
}

/// Maps an occlusion level to a brightness scalar.
pub fn brightness(level: u8) -> f32 {
    AO_BRIGHTNESS[level.min(3) as usize]
}

/// Occlusion levels of the four corners of `side` on the block at `local`.
///
/// `is_solid` receives chunk-local offsets, which may fall outside the chunk.
pub fn face_occlusion(
    local: Point3<i32>,
    side: BlockSide,
    is_solid: impl Fn(Point3<i32>) -> bool,
) -> [u8; 4] {
    let base = local + side.normal();
    let (u, v) = side.plane_axes();

    side.corners().map(|corner| {
        let step_u = corner[u] * 2 - 1;
        let step_v = corner[v] * 2 - 1;

        let mut side1 = base;
        side1[u] += step_u;
        let mut side2 = base;
        side2[v] += step_v;
        let mut diagonal = base;
        diagonal[u] += step_u;
        diagonal[v] += step_v;

        occlusion_level(is_solid(side1), is_solid(side2), is_solid(diagonal))
    })
}

/// Whether a quad should be split along its 1-3 diagonal instead of 0-2.
pub fn should_flip(occlusion: [u8; 4]) -> bool {
    occlusion[0] as u16 + occlusion[2] as u16 > occlusion[1] as u16 + occlusion[3] as u16
}
