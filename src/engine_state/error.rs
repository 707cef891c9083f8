//! # Error Types
//!
//! Typed failures for the terrain core. Configuration problems (atlas wiring,
//! malformed world-gen files) are fatal at the point of use and bubble up with `?`.
//! Edits against unloaded cells are not errors at all; they are reported as `false`.

use std::path::PathBuf;

use cgmath::Point3;
use thiserror::Error;

/// Failures raised by the texture atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The id does not fit in the atlas grid.
    #[error("atlas id {id} is outside the {capacity}-tile grid")]
    OutOfRange { id: u8, capacity: usize },

    /// A tile was registered twice under the same id.
    #[error("atlas id {0} is already registered")]
    Duplicate(u8),

    /// A lookup hit an id nobody registered.
    #[error("atlas id {0} was never registered")]
    Unregistered(u8),

    /// A source image does not match the configured tile size.
    #[error("tile for atlas id {id} is {width}x{height}, expected {expected_width}x{expected_height}")]
    TileSize {
        id: u8,
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },

    /// The source image could not be decoded.
    #[error("failed to load atlas image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Failures while reading the world-gen configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of the seed and edit-log codecs.
///
/// Missing files never produce one of these; they load as "nothing saved".
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying read/write failure, including truncated edit logs.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed file does not hold an integer: {0:?}")]
    InvalidSeed(String),

    #[error("edit log declares a negative entry count ({0})")]
    NegativeCount(i32),

    /// A stored snapshot does not have the shape of a cell.
    #[error("edit log entry for cell {cell:?} has dimensions {dimensions:?}, expected {expected}^3")]
    InvalidDimensions {
        cell: [i32; 3],
        dimensions: [i32; 3],
        expected: i32,
    },
}

/// Umbrella error for core world operations.
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error(transparent)]
    Atlas(#[from] AtlasError),

    /// A full-array replace was attempted with the wrong number of blocks.
    #[error("snapshot for cell {position:?} holds {found} blocks, expected {expected}")]
    SnapshotSize {
        position: Point3<i32>,
        found: usize,
        expected: usize,
    },
}

/// Errors raised while booting or reloading the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error(transparent)]
    Atlas(#[from] AtlasError),
}
