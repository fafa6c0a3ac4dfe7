//! Paired extraction of aligned image and annotation tiles.

use tracing::{debug, warn};

use crate::geometry::{Rect, TileSize};
use crate::slide::{Resolution, TileSource};

use super::Tile;

// =============================================================================
// Extracted Tile Pair
// =============================================================================

/// An accepted image tile and its spatially-aligned annotation tile.
///
/// Transient: the orchestrator persists both tiles and keeps only the
/// metadata, never the pixels.
#[derive(Debug)]
pub struct ExtractedTilePair {
    /// Tile cut from the primary (image) source
    pub primary: Tile,
    /// Tile cut from the secondary (annotation) source at the same rectangle
    pub secondary: Tile,
    /// The level-0 rectangle both tiles were cut from
    pub coords: Rect,
    /// Measured tissue ratio of the primary tile
    pub tissue_ratio: f64,
}

// =============================================================================
// Paired Tile Extractor
// =============================================================================

/// Cuts aligned tile pairs from two sources sharing a level-0 frame.
///
/// The extractor owns the per-tile acceptance policy: a candidate survives
/// only if the primary source can cut it and (when `check_tissue` is on) the
/// cut pixels actually contain enough tissue. The secondary tile is extracted
/// unconditionally once the primary is accepted; alignment, not tissue
/// content, is the only requirement on the annotation side. Every failure
/// here is a per-candidate skip, never a run abort.
#[derive(Debug, Clone)]
pub struct PairedTileExtractor {
    tile_size: TileSize,
    resolution: Resolution,
    check_tissue: bool,
    min_tissue_ratio: f64,
}

impl PairedTileExtractor {
    /// Create an extractor.
    ///
    /// `min_tissue_ratio` is a fraction in `[0, 1]`; it is only consulted
    /// when `check_tissue` is true.
    pub fn new(
        tile_size: TileSize,
        resolution: Resolution,
        check_tissue: bool,
        min_tissue_ratio: f64,
    ) -> Self {
        Self {
            tile_size,
            resolution,
            check_tissue,
            min_tissue_ratio,
        }
    }

    /// Extract the tile pair under `coords`, a level-0 rectangle.
    ///
    /// Returns `None` when the candidate is skipped: the primary source
    /// rejected the geometry, the tissue check failed, or the secondary
    /// source rejected the geometry.
    pub fn extract_pair<P, S>(
        &self,
        primary: &P,
        secondary: &S,
        coords: &Rect,
    ) -> Option<ExtractedTilePair>
    where
        P: TileSource + ?Sized,
        S: TileSource + ?Sized,
    {
        let tile = match primary.extract_region(coords, self.tile_size, self.resolution) {
            Ok(tile) => tile,
            Err(err) => {
                debug!(%coords, %err, "skipping candidate: primary extraction failed");
                return None;
            }
        };

        let tissue_ratio = tile.tissue_ratio();
        if self.check_tissue && tissue_ratio <= self.min_tissue_ratio {
            debug!(
                %coords,
                tissue_ratio,
                min = self.min_tissue_ratio,
                "skipping candidate: not enough tissue in pixels"
            );
            return None;
        }

        let mask_tile = match secondary.extract_region(coords, self.tile_size, self.resolution) {
            Ok(tile) => tile,
            Err(err) => {
                warn!(%coords, %err, "skipping candidate: secondary extraction failed");
                return None;
            }
        };

        Some(ExtractedTilePair {
            primary: tile,
            secondary: mask_tile,
            coords: *coords,
            tissue_ratio,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
