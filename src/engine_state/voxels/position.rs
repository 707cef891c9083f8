//! # Position Module
//!
//! Conversions between world block coordinates, chunk coordinates and
//! chunk-local coordinates.
//!
//! A world coordinate decomposes by floor division into a chunk coordinate and a
//! local coordinate in `[0, CHUNK_DIMENSION)`. Floor (not truncation) keeps negative
//! coordinates on the correct side of the boundary: world `-1` lives in chunk `-1`
//! at local `31`.

use cgmath::Point3;

use super::chunk::CHUNK_DIMENSION;

/// Splits a world block coordinate into `(chunk coordinate, local coordinate)`.
pub fn world_to_chunk(world: Point3<i32>) -> (Point3<i32>, Point3<i32>) {
    (
        Point3::new(
            world.x.div_euclid(CHUNK_DIMENSION),
            world.y.div_euclid(CHUNK_DIMENSION),
            world.z.div_euclid(CHUNK_DIMENSION),
        ),
        Point3::new(
            world.x.rem_euclid(CHUNK_DIMENSION),
            world.y.rem_euclid(CHUNK_DIMENSION),
            world.z.rem_euclid(CHUNK_DIMENSION),
        ),
    )
}

/// Rebuilds a world block coordinate from a chunk coordinate and a local offset.
///
/// The offset may lie outside `[0, CHUNK_DIMENSION)`; this is how neighbor lookups
/// across a chunk boundary are expressed.
pub fn chunk_to_world(chunk: Point3<i32>, local: Point3<i32>) -> Point3<i32> {
    Point3::new(
        chunk.x * CHUNK_DIMENSION + local.x,
        chunk.y * CHUNK_DIMENSION + local.y,
        chunk.z * CHUNK_DIMENSION + local.z,
    )
}

/// The world block that contains a continuous position.
pub fn block_containing(position: Point3<f32>) -> Point3<i32> {
    Point3::new(
        position.x.floor() as i32,
        position.y.floor() as i32,
        position.z.floor() as i32,
    )
}

/// The chunk that contains a continuous position.
pub fn chunk_containing(position: Point3<f32>) -> Point3<i32> {
    world_to_chunk(block_containing(position)).0
}

/// Squared Euclidean distance between two chunk coordinates, widened to avoid overflow.
pub fn chunk_distance_squared(a: Point3<i32>, b: Point3<i32>) -> i64 {
    let dx = a.x as i64 - b.x as i64;
    let dy = a.y as i64 - b.y as i64;
    let dz = a.z as i64 - b.z as i64;
    dx * dx + dy * dy + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_round_trips_for_negative_and_positive_coordinates() {
        for w in -100..100 {
            let world = Point3::new(w, -w * 3, w * 7 - 5);
            let (chunk, local) = world_to_chunk(world);
            for axis in 0..3 {
                assert!((0..CHUNK_DIMENSION).contains(&local[axis]));
            }
            assert_eq!(chunk_to_world(chunk, local), world);
        }
    }

    #[test]
    fn minus_one_lands_in_the_previous_chunk() {
        let (chunk, local) = world_to_chunk(Point3::new(-1, -32, -33));
        assert_eq!(chunk, Point3::new(-1, -1, -2));
        assert_eq!(local, Point3::new(31, 0, 31));
    }

    #[test]
    fn continuous_positions_floor_toward_negative_infinity() {
        assert_eq!(block_containing(Point3::new(-0.5, 0.5, -1.0)), Point3::new(-1, 0, -1));
        assert_eq!(chunk_containing(Point3::new(-0.1, 31.9, 32.0)), Point3::new(-1, 0, 1));
    }
}
