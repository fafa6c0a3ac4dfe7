//! Single-level slide source backed by an in-memory image.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::error::ExtractError;
use crate::geometry::{CoordSpace, Rect, TileSize};
use crate::tile::Tile;

use super::{Resolution, TileSource};

/// A [`TileSource`] over one full-resolution RGB image.
///
/// The whole image plays the role of level 0 and there are no coarser levels.
/// Extraction crops the requested level-0 rectangle and, when its footprint
/// differs from the requested tile size (mpp-based extraction), resamples the
/// crop down to `tile_size`.
#[derive(Debug, Clone)]
pub struct ImageSlide {
    image: RgbImage,
    mpp: Option<f64>,
}

impl ImageSlide {
    /// Wrap an image with no physical resolution information.
    pub fn new(image: RgbImage) -> Self {
        Self { image, mpp: None }
    }

    /// Wrap an image scanned at a known microns-per-pixel resolution.
    pub fn with_mpp(image: RgbImage, mpp: f64) -> Self {
        Self {
            image,
            mpp: Some(mpp),
        }
    }

    /// The underlying full-resolution image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    fn size_or_coordinate_error(&self, rect: &Rect, tile_size: TileSize) -> ExtractError {
        ExtractError::SizeOrCoordinate {
            x_ul: rect.x_ul,
            y_ul: rect.y_ul,
            tile_width: tile_size.width,
            tile_height: tile_size.height,
            source_width: self.image.width(),
            source_height: self.image.height(),
        }
    }
}

impl TileSource for ImageSlide {
    fn level_count(&self) -> usize {
        1
    }

    fn level_dimensions(&self, level: usize) -> Option<(u32, u32)> {
        (level == 0).then(|| (self.image.width(), self.image.height()))
    }

    fn base_mpp(&self) -> Option<f64> {
        self.mpp
    }

    fn extract_region(
        &self,
        rect: &Rect,
        tile_size: TileSize,
        resolution: Resolution,
    ) -> Result<Tile, ExtractError> {
        if let Resolution::Level(level) = resolution {
            if level != 0 {
                return Err(ExtractError::LevelUnavailable {
                    level,
                    level_count: 1,
                });
            }
        }
        if rect.space() != CoordSpace::Level(0)
            || rect.x_br > self.image.width()
            || rect.y_br > self.image.height()
        {
            return Err(self.size_or_coordinate_error(rect, tile_size));
        }

        let crop = imageops::crop_imm(
            &self.image,
            rect.x_ul,
            rect.y_ul,
            rect.width(),
            rect.height(),
        )
        .to_image();

        let pixels = if (crop.width(), crop.height()) == tile_size.as_tuple() {
            crop
        } else {
            imageops::resize(&crop, tile_size.width, tile_size.height, FilterType::Triangle)
        };

        Ok(Tile::new(pixels))
    }
}

// =============================================================================
// Tests
// =============================================================================
