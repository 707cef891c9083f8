//! Texture atlas lookup for block faces.
//!
//! The mesher only needs one thing from an atlas: the normalized UV rectangle of a
//! block id. [`GridAtlas`] is the stock implementation, packing fixed-size tiles into
//! a grid where tile `id` sits at column `id % tiles_x`, row `id / tiles_x`.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};
use log::debug;

use crate::engine_state::error::AtlasError;
use crate::engine_state::voxels::block::BlockId;

/// A normalized UV rectangle inside the atlas texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// Maps block ids to atlas regions.
pub trait Atlas {
    /// Region of `block`.
    ///
    /// # Errors
    /// [`AtlasError::Unregistered`] if no tile was registered for the id.
    fn region(&self, block: BlockId) -> Result<Region, AtlasError>;
}

/// A grid of equally sized RGBA tiles.
pub struct GridAtlas {
    tiles_x: u32,
    tiles_y: u32,
    tile_width: u32,
    tile_height: u32,
    pixels: RgbaImage,
    regions: Vec<Option<Region>>,
}

impl GridAtlas {
    /// Creates an empty atlas of `tiles_x` by `tiles_y` tiles.
    pub fn new(tiles_x: u32, tiles_y: u32, tile_width: u32, tile_height: u32) -> Self {
        GridAtlas {
            tiles_x,
            tiles_y,
            tile_width,
            tile_height,
            pixels: RgbaImage::new(tiles_x * tile_width, tiles_y * tile_height),
            regions: vec![None; (tiles_x * tiles_y) as usize],
        }
    }

    pub fn capacity(&self) -> usize {
        self.regions.len()
    }

    /// Registers `tile` as the texture of `block`.
    ///
    /// # Errors
    /// Fails if the id does not fit the grid, was already registered, or the tile is
    /// not exactly `tile_width x tile_height`.
    pub fn add_image(&mut self, block: BlockId, tile: &RgbaImage) -> Result<Region, AtlasError> {
        let id = block.0;
        let slot = id as usize;
        if slot >= self.capacity() {
            return Err(AtlasError::OutOfRange {
                id,
                capacity: self.capacity(),
            });
        }
        if self.regions[slot].is_some() {
            return Err(AtlasError::Duplicate(id));
        }
        if tile.width() != self.tile_width || tile.height() != self.tile_height {
            return Err(AtlasError::TileSize {
                id,
                width: tile.width(),
                height: tile.height(),
                expected_width: self.tile_width,
                expected_height: self.tile_height,
            });
        }

        let column = id as u32 % self.tiles_x;
        let row = id as u32 / self.tiles_x;
        imageops::replace(
            &mut self.pixels,
            tile,
            (column * self.tile_width) as i64,
            (row * self.tile_height) as i64,
        );

        let region = Region {
            u0: column as f32 / self.tiles_x as f32,
            v0: row as f32 / self.tiles_y as f32,
            u1: (column + 1) as f32 / self.tiles_x as f32,
            v1: (row + 1) as f32 / self.tiles_y as f32,
        };
        self.regions[slot] = Some(region);
        debug!("Registered atlas tile {} at ({}, {})", id, column, row);
        Ok(region)
    }

    /// Loads a tile from an image file and registers it.
    pub fn add_file(&mut self, block: BlockId, path: impl AsRef<Path>) -> Result<Region, AtlasError> {
        let path = path.as_ref();
        let tile = image::open(path)
            .map_err(|source| AtlasError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        self.add_image(block, &tile)
    }

    /// Registers a flat-coloured tile. Handy for tests and placeholder assets.
    pub fn add_solid_color(&mut self, block: BlockId, color: [u8; 4]) -> Result<Region, AtlasError> {
        let tile = RgbaImage::from_pixel(self.tile_width, self.tile_height, Rgba(color));
        self.add_image(block, &tile)
    }

    /// The packed atlas texture, ready for upload.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl Atlas for GridAtlas {
    fn region(&self, block: BlockId) -> Result<Region, AtlasError> {
        self.regions
            .get(block.0 as usize)
            .copied()
            .flatten()
            .ok_or(AtlasError::Unregistered(block.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regions_follow_the_grid() {
        let mut atlas = GridAtlas::new(4, 2, 8, 8);
        let region = atlas.add_solid_color(BlockId(5), [255, 0, 0, 255]).unwrap();
        assert_eq!(
            region,
            Region {
                u0: 0.25,
                v0: 0.5,
                u1: 0.5,
                v1: 1.0
            }
        );
        assert_eq!(atlas.region(BlockId(5)).unwrap(), region);
        assert_eq!(atlas.pixels().get_pixel(8, 8), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn configuration_mistakes_are_rejected() {
        let mut atlas = GridAtlas::new(2, 2, 4, 4);
        atlas.add_solid_color(BlockId(1), [0, 0, 0, 255]).unwrap();

        assert!(matches!(
            atlas.add_solid_color(BlockId(1), [0, 0, 0, 255]),
            Err(AtlasError::Duplicate(1))
        ));
        assert!(matches!(
            atlas.add_solid_color(BlockId(4), [0, 0, 0, 255]),
            Err(AtlasError::OutOfRange { id: 4, capacity: 4 })
        ));
        assert!(matches!(
            atlas.add_image(BlockId(2), &RgbaImage::new(3, 4)),
            Err(AtlasError::TileSize { width: 3, .. })
        ));
        assert!(matches!(atlas.region(BlockId(3)), Err(AtlasError::Unregistered(3))));
        assert!(matches!(atlas.region(BlockId(200)), Err(AtlasError::Unregistered(200))));
    }

    #[test]
    fn tiles_load_from_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stone.png");
        RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])).save(&path).unwrap();

        let mut atlas = GridAtlas::new(2, 2, 4, 4);
        atlas.add_file(BlockId(3), &path).unwrap();
        assert_eq!(atlas.pixels().get_pixel(4, 4), &Rgba([9, 9, 9, 255]));
        assert!(matches!(
            atlas.add_file(BlockId(2), dir.path().join("missing.png")),
            Err(AtlasError::Image { .. })
        ));
    }
}
