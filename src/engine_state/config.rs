//! # Configuration
//!
//! World generation parameters are read from an optional JSON file; when the file is
//! absent the built-in defaults are used. Field names match the on-disk format
//! (`heightScale`, `mPower`, ...), so existing world-gen files load unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::voxels::streaming::StreamingConfig;

/// Default location of the world-gen file, relative to the working directory.
pub const DEFAULT_WORLDGEN_PATH: &str = "config/worldgen.json";

/// Default save slot folder.
pub const DEFAULT_SAVE_FOLDER: &str = "saves/world";

/// One stratum of the layer list: solid blocks whose (jittered) Y falls in
/// `[min, max]` become `block_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    pub block_id: u8,
    pub min: i32,
    pub max: i32,
}

impl LayerConfig {
    pub fn new(block_id: u8, min: i32, max: i32) -> Self {
        Self { block_id, min, max }
    }

    pub fn contains(&self, y: i32) -> bool {
        y >= self.min && y <= self.max
    }
}

/// Flat parameter record driving the terrain generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldGenConfig {
    /// Noise frequency applied to world X/Z.
    pub frequency: f32,
    /// Blocks of height per unit of shaped noise.
    pub height_scale: i32,
    /// Half-width of the random jitter applied to Y before layer classification.
    pub border: i32,
    #[serde(rename = "mPower")]
    pub mountain_power: f32,
    #[serde(rename = "vPower")]
    pub valley_power: f32,
    #[serde(rename = "vScale")]
    pub valley_scale: f32,
    /// Ordered strata; the first match wins.
    pub layers: Vec<LayerConfig>,
    /// Derive strata jitter from the block coordinate and seed instead of a shared
    /// random source. Turning this off makes generation order-dependent.
    pub deterministic_strata: bool,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            frequency: 0.0003,
            height_scale: 512,
            border: 8,
            mountain_power: 3.0,
            valley_power: 3.0,
            valley_scale: 0.25,
            layers: vec![
                LayerConfig::new(4, -9999, -20),
                LayerConfig::new(3, -21, 50),
                LayerConfig::new(2, 51, 120),
                LayerConfig::new(5, 121, 9999),
            ],
            deterministic_strata: true,
        }
    }
}

impl WorldGenConfig {
    /// Loads the config at `path`, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No world-gen config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded world-gen config from {}", path.display());
        Ok(config)
    }
}

/// Everything needed to boot an [`EngineState`](super::EngineState).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub worldgen_path: PathBuf,
    pub save_folder: PathBuf,
    /// Explicit seed; `None` picks a fresh random one.
    pub seed: Option<i32>,
    pub streaming: StreamingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worldgen_path: PathBuf::from(DEFAULT_WORLDGEN_PATH),
            save_folder: PathBuf::from(DEFAULT_SAVE_FOLDER),
            seed: None,
            streaming: StreamingConfig::default(),
        }
    }
}
