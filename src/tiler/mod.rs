//! The paired grid-tiling orchestrator.
//!
//! [`PairedGridTiler`] drives the whole pipeline for one run:
//!
//! ```text
//! tissue mask ──► RegionLabels ──► per-region bbox (thumbnail)
//!                                        │ scale to working level
//!                                        ▼
//!                               GridCoordinates (lazy)
//!                                        │ scale to thumbnail
//!                                        ▼
//!                            tissue-overlap filter (region mask)
//!                                        │ scale to level 0
//!                                        ▼
//!                              PairedTileExtractor
//!                                        │
//!                                        ▼
//!                        save pair + record metadata entry
//! ```
//!
//! Validation failures (bad thresholds, missing level, tile larger than the
//! slide) abort before anything is extracted; everything after that is
//! failure-tolerant and per-candidate.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::TilerConfig;
use crate::error::{GeometryError, TilerError};
use crate::geometry::{scale_rect, CoordFrame, Rect, TileSize};
use crate::grid::GridCoordinates;
use crate::mask::{accepts, BinaryMask, RegionLabels};
use crate::slide::{Resolution, TileSource};
use crate::tile::PairedTileExtractor;

// =============================================================================
// Metadata
// =============================================================================

/// Per-tile metadata recorded under the tile's filename.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileMetadata {
    /// Measured tissue ratio of the saved image tile, in `[0, 1]`
    pub tissue_ratio: f64,
    /// Final `(width, height)` the pair was saved at
    pub tile_size: (u32, u32),
    /// Upper-left corner of the pair at full resolution
    pub origin: (u32, u32),
}

/// Outcome of one tiling run.
///
/// Zero saved tiles is a valid outcome (for instance on an all-background
/// mask); callers that need tiles must check `tiles_saved` themselves.
#[derive(Debug, Default)]
pub struct TilingReport {
    /// Filename of each saved pair mapped to its metadata
    pub metadata: BTreeMap<String, TileMetadata>,
    /// Number of tile pairs written
    pub tiles_saved: usize,
}

// =============================================================================
// Paired Grid Tiler
// =============================================================================

/// Geometry resolved once per run from the config and the primary source.
struct RunGeometry {
    /// Level the grid is laid at (0 when tiling by mpp)
    working_level: usize,
    /// Tile size in working-level pixels (rescaled when tiling by mpp)
    grid_tile_size: TileSize,
    /// Overlap in working-level pixels
    grid_overlap: i32,
    /// Resolution handed to the sources for extraction
    resolution: Resolution,
    /// Extent of the working level
    level_frame: CoordFrame,
    /// Extent of level 0
    level0_frame: CoordFrame,
}

/// Extracts a grid of spatially-aligned tile pairs from an image slide and
/// its annotation slide.
///
/// One instance is reusable across runs; each [`extract`](Self::extract) call
/// is a single sequential pass that owns its own counters and metadata.
#[derive(Debug, Clone)]
pub struct PairedGridTiler {
    config: TilerConfig,
}

impl PairedGridTiler {
    /// Create a tiler from a configuration.
    pub fn new(config: TilerConfig) -> Self {
        Self { config }
    }

    /// The configuration this tiler runs with.
    pub fn config(&self) -> &TilerConfig {
        &self.config
    }

    /// Run the full pipeline: regions, grid, filters, extraction, persistence.
    ///
    /// Tile pairs are written to `primary_dir` and `secondary_dir` under the
    /// identical filename
    /// `{prefix}tile_{counter}_level{level}_{x_ul}-{y_ul}-{x_br}-{y_br}{suffix}`
    /// with corners at level 0. Returns the accumulated metadata and the
    /// number of pairs saved.
    ///
    /// # Errors
    ///
    /// Fatal: invalid thresholds, a level missing from the primary source, a
    /// tile size exceeding the source extent, a configured mpp on a source
    /// without one, or an I/O failure while persisting. Per-candidate
    /// extraction failures are skipped, not raised.
    pub fn extract<P, S>(
        &self,
        primary: &P,
        secondary: &S,
        mask: &BinaryMask,
        primary_dir: &Path,
        secondary_dir: &Path,
    ) -> Result<TilingReport, TilerError>
    where
        P: TileSource + ?Sized,
        S: TileSource + ?Sized,
    {
        self.config.validate()?;
        let geometry = self.resolve_geometry(primary)?;

        fs::create_dir_all(primary_dir)?;
        fs::create_dir_all(secondary_dir)?;

        let thumb_frame = mask.frame();
        let extractor = PairedTileExtractor::new(
            self.config.tile_size,
            geometry.resolution,
            self.config.check_tissue,
            self.config.tissue_fraction(),
        );

        let labels = RegionLabels::from_mask(mask);
        info!(
            regions = labels.regions().len(),
            level = geometry.working_level,
            tile = %self.config.tile_size,
            "starting paired grid extraction"
        );

        let mut metadata = BTreeMap::new();
        let mut counter = 0usize;

        for region in labels.regions() {
            let region_mask = labels.region_mask(region);
            let bbox_lvl =
                match scale_or_drop(&region.bbox, &thumb_frame, &geometry.level_frame)? {
                    Some(bbox) => bbox,
                    None => {
                        debug!(label = region.label, "region too small at working level");
                        continue;
                    }
                };

            let grid = GridCoordinates::new(bbox_lvl, geometry.grid_tile_size, geometry.grid_overlap);
            debug!(
                label = region.label,
                candidates = grid.candidate_count(),
                "tiling region"
            );

            for candidate in grid {
                let thumb_rect =
                    match scale_or_drop(&candidate, &geometry.level_frame, &thumb_frame)? {
                        Some(rect) => rect,
                        None => continue,
                    };
                if !accepts(&thumb_rect, &region_mask, self.config.min_region_coverage) {
                    continue;
                }

                let coords =
                    match scale_or_drop(&candidate, &geometry.level_frame, &geometry.level0_frame)? {
                        Some(rect) => rect,
                        None => continue,
                    };

                let Some(pair) = extractor.extract_pair(primary, secondary, &coords) else {
                    continue;
                };

                let filename = self.tile_filename(counter, geometry.working_level, &pair.coords);
                pair.primary.save(primary_dir.join(&filename))?;
                pair.secondary.save(secondary_dir.join(&filename))?;
                info!(tile = counter, %filename, "saved tile pair");

                metadata.insert(
                    filename,
                    TileMetadata {
                        tissue_ratio: pair.tissue_ratio,
                        tile_size: self.config.tile_size.as_tuple(),
                        origin: (pair.coords.x_ul, pair.coords.y_ul),
                    },
                );
                counter += 1;
            }
        }

        info!(tiles = counter, "paired grid extraction finished");
        Ok(TilingReport {
            metadata,
            tiles_saved: counter,
        })
    }

    /// Resolve level, grid tile size, overlap and frames against the primary
    /// source, running the three fatal pre-extraction checks.
    fn resolve_geometry<P>(&self, primary: &P) -> Result<RunGeometry, TilerError>
    where
        P: TileSource + ?Sized,
    {
        let (working_level, grid_tile_size, grid_overlap, resolution) = match self.config.mpp {
            Some(mpp) => {
                // Tiling by physical resolution: geometry runs at level 0 with
                // the tile footprint rescaled by target/base mpp; the source
                // resamples the crop back down to the final tile size.
                let base = primary
                    .base_mpp()
                    .ok_or(TilerError::MissingResolution { mpp })?;
                let scale = mpp / base;
                let width = (f64::from(self.config.tile_size.width) * scale).ceil() as u32;
                let height = (f64::from(self.config.tile_size.height) * scale).ceil() as u32;
                let overlap = (f64::from(self.config.pixel_overlap) * scale) as i32;
                (
                    0,
                    TileSize::new(width, height)?,
                    overlap,
                    Resolution::Mpp(mpp),
                )
            }
            None => {
                let level = self.config.level;
                if primary.level_dimensions(level).is_none() {
                    return Err(TilerError::UnsupportedLevel {
                        level,
                        level_count: primary.level_count(),
                    });
                }
                (
                    level,
                    self.config.tile_size,
                    self.config.pixel_overlap,
                    Resolution::Level(level),
                )
            }
        };

        let (level_w, level_h) = primary.level_dimensions(working_level).ok_or(
            TilerError::UnsupportedLevel {
                level: working_level,
                level_count: primary.level_count(),
            },
        )?;
        if grid_tile_size.width > level_w || grid_tile_size.height > level_h {
            return Err(TilerError::TileSizeExceedsExtent {
                tile_width: grid_tile_size.width,
                tile_height: grid_tile_size.height,
                source_width: level_w,
                source_height: level_h,
                level: working_level,
            });
        }

        let (level0_w, level0_h) =
            primary
                .level_dimensions(0)
                .ok_or(TilerError::UnsupportedLevel {
                    level: 0,
                    level_count: primary.level_count(),
                })?;

        Ok(RunGeometry {
            working_level,
            grid_tile_size,
            grid_overlap,
            resolution,
            level_frame: CoordFrame::level(working_level as u32, level_w, level_h),
            level0_frame: CoordFrame::level(0, level0_w, level0_h),
        })
    }

    fn tile_filename(&self, counter: usize, level: usize, coords: &Rect) -> String {
        format!(
            "{}tile_{}_level{}_{}-{}-{}-{}{}",
            self.config.prefix,
            counter,
            level,
            coords.x_ul,
            coords.y_ul,
            coords.x_br,
            coords.y_br,
            self.config.suffix
        )
    }
}

/// Scale a rectangle, treating a collapse to zero area as "drop this
/// candidate" rather than a failure. Space mismatches still propagate.
fn scale_or_drop(
    rect: &Rect,
    from: &CoordFrame,
    to: &CoordFrame,
) -> Result<Option<Rect>, TilerError> {
    match scale_rect(rect, from, to) {
        Ok(scaled) => Ok(Some(scaled)),
        Err(GeometryError::EmptyRect { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::ImageSlide;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    const TISSUE: Rgb<u8> = Rgb([180, 100, 140]);
    const GLASS: Rgb<u8> = Rgb([250, 250, 250]);

    fn dirs() -> (TempDir, TempDir) {
        (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap())
    }

    fn uniform_slide(width: u32, height: u32, color: Rgb<u8>) -> ImageSlide {
        ImageSlide::new(RgbImage::from_pixel(width, height, color))
    }

    fn config(tile: u32) -> TilerConfig {
        TilerConfig::new(TileSize::new(tile, tile).unwrap())
    }

    #[test]
    fn test_all_background_mask_yields_empty_report() {
        let primary = uniform_slide(1024, 1024, TISSUE);
        let secondary = uniform_slide(1024, 1024, GLASS);
        let mask = BinaryMask::empty(64, 64);
        let (img_dir, lbl_dir) = dirs();

        let report = PairedGridTiler::new(config(256))
            .extract(&primary, &secondary, &mask, img_dir.path(), lbl_dir.path())
            .unwrap();

        assert_eq!(report.tiles_saved, 0);
        assert!(report.metadata.is_empty());
        assert_eq!(fs::read_dir(img_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_oversized_tile_aborts_before_extraction() {
        let primary = uniform_slide(512, 512, TISSUE);
        let secondary = uniform_slide(512, 512, GLASS);
        let mask = BinaryMask::from_fn(64, 64, |_, _| true);
        let (img_dir, lbl_dir) = dirs();

        let result = PairedGridTiler::new(config(1024)).extract(
            &primary,
            &secondary,
            &mask,
            img_dir.path(),
            lbl_dir.path(),
        );

        assert!(matches!(
            result,
            Err(TilerError::TileSizeExceedsExtent {
                tile_width: 1024,
                source_width: 512,
                ..
            })
        ));
        assert_eq!(fs::read_dir(img_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unsupported_level_aborts() {
        let primary = uniform_slide(512, 512, TISSUE);
        let secondary = uniform_slide(512, 512, GLASS);
        let mask = BinaryMask::from_fn(64, 64, |_, _| true);
        let (img_dir, lbl_dir) = dirs();

        let mut cfg = config(128);
        cfg.level = 3;
        let result = PairedGridTiler::new(cfg).extract(
            &primary,
            &secondary,
            &mask,
            img_dir.path(),
            lbl_dir.path(),
        );

        assert!(matches!(
            result,
            Err(TilerError::UnsupportedLevel { level: 3, .. })
        ));
    }

    #[test]
    fn test_mpp_without_base_resolution_aborts() {
        let primary = uniform_slide(512, 512, TISSUE);
        let secondary = uniform_slide(512, 512, GLASS);
        let mask = BinaryMask::from_fn(64, 64, |_, _| true);
        let (img_dir, lbl_dir) = dirs();

        let mut cfg = config(128);
        cfg.mpp = Some(0.5);
        let result = PairedGridTiler::new(cfg).extract(
            &primary,
            &secondary,
            &mask,
            img_dir.path(),
            lbl_dir.path(),
        );

        assert!(matches!(
            result,
            Err(TilerError::MissingResolution { .. })
        ));
    }

    #[test]
    fn test_filename_pattern() {
        let tiler = PairedGridTiler::new(TilerConfig {
            prefix: "case7.".to_string(),
            ..config(256)
        });
        let coords = Rect::new(crate::geometry::CoordSpace::Level(0), 0, 512, 256, 768).unwrap();
        assert_eq!(
            tiler.tile_filename(4, 0, &coords),
            "case7.tile_4_level0_0-512-256-768.png"
        );
    }
}
