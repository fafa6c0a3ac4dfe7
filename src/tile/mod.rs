//! Extracted pixel tiles.
//!
//! A [`Tile`] is the unit everything downstream consumes: a fixed-size RGB
//! crop that knows how to score its own tissue content and save itself to
//! disk. Pairing of image and annotation tiles lives in
//! [`PairedTileExtractor`].

mod extract;

pub use extract::{ExtractedTilePair, PairedTileExtractor};

use std::path::Path;

use image::{Rgb, RgbImage};

// =============================================================================
// Tissue Heuristic
// =============================================================================

/// Channel value at or above which a pixel counts as background glass.
///
/// Scanned glass comes out near-white; a pixel with every channel this bright
/// is not tissue.
pub const BACKGROUND_WHITE_THRESHOLD: u8 = 230;

/// Channel value at or below which a pixel counts as scanner padding.
///
/// Some scanners pad the slide border with pure black; a pixel with every
/// channel this dark is not tissue either.
pub const BACKGROUND_BLACK_THRESHOLD: u8 = 10;

fn is_tissue_pixel(pixel: &Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0;
    let near_white = r >= BACKGROUND_WHITE_THRESHOLD
        && g >= BACKGROUND_WHITE_THRESHOLD
        && b >= BACKGROUND_WHITE_THRESHOLD;
    let near_black = r <= BACKGROUND_BLACK_THRESHOLD
        && g <= BACKGROUND_BLACK_THRESHOLD
        && b <= BACKGROUND_BLACK_THRESHOLD;
    !near_white && !near_black
}

// =============================================================================
// Tile
// =============================================================================

/// A fixed-size RGB crop extracted from a slide.
#[derive(Debug, Clone)]
pub struct Tile {
    image: RgbImage,
}

impl Tile {
    /// Wrap an extracted pixel buffer.
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// The raw pixel content.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Tile width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Tile height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fraction of pixels that look like tissue, in `[0, 1]`.
    ///
    /// A pixel counts as tissue when it is neither near-white (glass) nor
    /// near-black (scanner padding). This stands in for the stain-aware
    /// segmentation used upstream to build the thumbnail mask; at tile scale
    /// the brightness test is what separates tissue from background.
    pub fn tissue_ratio(&self) -> f64 {
        let total = self.image.width() as u64 * self.image.height() as u64;
        if total == 0 {
            return 0.0;
        }
        let tissue = self.image.pixels().filter(|p| is_tissue_pixel(p)).count();
        tissue as f64 / total as f64
    }

    /// Save the tile to `path`; the image format follows the file extension.
    ///
    /// # Errors
    ///
    /// Returns an [`image::ImageError`] if encoding or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.image.save(path)
    }
}

// =============================================================================
// Tests
// =============================================================================
