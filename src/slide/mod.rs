//! Slide source abstraction.
//!
//! The tiler does not decode slide formats itself. Anything that can report
//! its pyramid geometry and cut a rectangular pixel region implements
//! [`TileSource`]; the engine drives two of them (image and annotation) in the
//! same level-0 coordinate frame.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            PairedGridTiler              │
//! └──────────┬───────────────────┬──────────┘
//!            │                   │
//!            ▼                   ▼
//! ┌───────────────────┐ ┌───────────────────┐
//! │ TileSource (image)│ │ TileSource (label)│
//! └───────────────────┘ └───────────────────┘
//! ```
//!
//! [`ImageSlide`] is the bundled single-level implementation backed by an
//! in-memory RGB image, enough for annotation masks, small scans and tests;
//! production slide readers live behind the same trait in their own crates.

mod image_source;

pub use image_source::ImageSlide;

use crate::error::ExtractError;
use crate::geometry::{Rect, TileSize};
use crate::tile::Tile;

// =============================================================================
// Resolution
// =============================================================================

/// The resolution a tile should be extracted at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// A pyramid level of the source; 0 is full resolution
    Level(usize),
    /// A physical target in microns per pixel; overrides any level choice
    Mpp(f64),
}

// =============================================================================
// Tile Source
// =============================================================================

/// A pixel source the tiler can cut regions from.
///
/// Region coordinates are always expressed at level 0, whatever resolution
/// the pixels are wanted at; this is what keeps the primary and secondary
/// sources aligned without either knowing about the other.
pub trait TileSource {
    /// Number of pyramid levels available.
    fn level_count(&self) -> usize;

    /// Pixel extent `(width, height)` of the given level, if it exists.
    fn level_dimensions(&self, level: usize) -> Option<(u32, u32)>;

    /// Physical resolution of level 0 in microns per pixel, if known.
    fn base_mpp(&self) -> Option<f64> {
        None
    }

    /// Extract the pixels under `rect` (a level-0 rectangle) as a tile of
    /// exactly `tile_size`, resampling to the requested resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when the rectangle, size, or level is invalid
    /// for this source's geometry. Callers treat this as a per-candidate skip.
    fn extract_region(
        &self,
        rect: &Rect,
        tile_size: TileSize,
        resolution: Resolution,
    ) -> Result<Tile, ExtractError>;
}
