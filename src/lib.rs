//! # WSI Tiler
//!
//! Paired grid tiling for Whole Slide Images (WSI).
//!
//! Given a gigapixel image slide, a companion annotation slide addressed in
//! the same full-resolution coordinate frame, and a thumbnail-resolution
//! binary tissue mask, this crate lays a coordinate grid over every connected
//! tissue region, filters grid cells by tissue coverage, and extracts
//! spatially-aligned tile pairs from both slides for downstream
//! machine-learning pipelines.
//!
//! ## Architecture
//!
//! - [`geometry`] - coordinate spaces, tagged rectangles, the scaler
//! - [`mask`] - binary tissue masks, region labeling, the overlap filter
//! - [`grid`] - lazy grid enumeration of candidate tiles
//! - [`slide`] - the [`TileSource`] capability and an in-memory adapter
//! - [`tile`] - extracted tiles and the paired extractor
//! - [`tiler`] - the orchestrator driving one run end to end
//! - [`config`] - run configuration
//!
//! ## Example
//!
//! ```no_run
//! use wsi_tiler::{BinaryMask, ImageSlide, PairedGridTiler, TileSize, TilerConfig};
//!
//! # fn main() -> Result<(), wsi_tiler::TilerError> {
//! let image = ImageSlide::new(image::open("slide.png").unwrap().to_rgb8());
//! let label = ImageSlide::new(image::open("annotation.png").unwrap().to_rgb8());
//!
//! // Tissue mask from an external segmentation step, at thumbnail resolution.
//! let mask = BinaryMask::from_fn(200, 150, |x, y| x > 20 && y > 20);
//!
//! let config = TilerConfig::new(TileSize::new(512, 512)?);
//! let report = PairedGridTiler::new(config).extract(
//!     &image,
//!     &label,
//!     &mask,
//!     "tiles/image".as_ref(),
//!     "tiles/label".as_ref(),
//! )?;
//!
//! println!("saved {} tile pairs", report.tiles_saved);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod mask;
pub mod slide;
pub mod tile;
pub mod tiler;

// Re-export commonly used types
pub use config::{TilerConfig, DEFAULT_REGION_COVERAGE, DEFAULT_SUFFIX, DEFAULT_TISSUE_PERCENT};
pub use error::{ExtractError, GeometryError, TilerError};
pub use geometry::{scale_rect, CoordFrame, CoordSpace, Rect, TileSize};
pub use grid::GridCoordinates;
pub use mask::{accepts, coverage, BinaryMask, Region, RegionLabels};
pub use slide::{ImageSlide, Resolution, TileSource};
pub use tile::{ExtractedTilePair, PairedTileExtractor, Tile};
pub use tiler::{PairedGridTiler, TileMetadata, TilingReport};
