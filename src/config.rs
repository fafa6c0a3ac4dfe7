//! Tiler configuration.
//!
//! All knobs of a tiling run live on [`TilerConfig`] and are threaded through
//! explicitly; there is no ambient, process-wide state. Defaults match the
//! common pathology setup: level 0, 80% tissue requirement, no overlap, PNG
//! output.
//!
//! # Threshold scales
//!
//! Two acceptance checks exist with historically different scales:
//! `tissue_percent` (0-100, checked against real pixel content) and
//! `min_region_coverage` (0.0-1.0, the geometric mask pre-filter). The
//! percentage is converted to a fraction exactly once, in
//! [`TilerConfig::tissue_fraction`]; every comparison inside the crate happens
//! on the 0.0-1.0 scale.

use crate::error::TilerError;
use crate::geometry::TileSize;

// =============================================================================
// Default Values
// =============================================================================

/// Default minimum tissue percentage over a tile's pixel content.
pub const DEFAULT_TISSUE_PERCENT: f64 = 80.0;

/// Default minimum fraction of a candidate's footprint that must land on the
/// region mask.
pub const DEFAULT_REGION_COVERAGE: f64 = 0.8;

/// Default tile filename suffix.
pub const DEFAULT_SUFFIX: &str = ".png";

// =============================================================================
// Tiler Config
// =============================================================================

/// Immutable configuration of one tiling run.
#[derive(Debug, Clone)]
pub struct TilerConfig {
    /// Final `(width, height)` of extracted tiles in pixels
    pub tile_size: TileSize,

    /// Pyramid level to tile at; ignored when `mpp` is set
    pub level: usize,

    /// Target physical resolution in microns per pixel; takes precedence
    /// over `level`
    pub mpp: Option<f64>,

    /// Whether to re-check accepted candidates against real pixel content
    pub check_tissue: bool,

    /// Minimum tissue percentage (0-100) of a tile's pixel content, used
    /// only when `check_tissue` is true
    pub tissue_percent: f64,

    /// Overlap in pixels between adjacent tiles on both axes; negative
    /// values leave a gap instead
    pub pixel_overlap: i32,

    /// Prefix prepended to every tile filename
    pub prefix: String,

    /// Suffix appended to every tile filename; selects the image format
    pub suffix: String,

    /// Minimum fraction (0.0-1.0) of a candidate's rasterized footprint that
    /// must fall on the region's mask
    pub min_region_coverage: f64,
}

impl TilerConfig {
    /// Configuration with defaults for everything but the tile size.
    pub fn new(tile_size: TileSize) -> Self {
        Self {
            tile_size,
            level: 0,
            mpp: None,
            check_tissue: true,
            tissue_percent: DEFAULT_TISSUE_PERCENT,
            pixel_overlap: 0,
            prefix: String::new(),
            suffix: DEFAULT_SUFFIX.to_string(),
            min_region_coverage: DEFAULT_REGION_COVERAGE,
        }
    }

    /// Check every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`TilerError::InvalidThreshold`] naming the offending field
    /// and value.
    pub fn validate(&self) -> Result<(), TilerError> {
        if !(0.0..=100.0).contains(&self.tissue_percent) {
            return Err(TilerError::InvalidThreshold {
                field: "tissue_percent",
                value: self.tissue_percent,
                min: 0.0,
                max: 100.0,
            });
        }
        if !(0.0..=1.0).contains(&self.min_region_coverage) {
            return Err(TilerError::InvalidThreshold {
                field: "min_region_coverage",
                value: self.min_region_coverage,
                min: 0.0,
                max: 1.0,
            });
        }
        if let Some(mpp) = self.mpp {
            if mpp <= 0.0 || !mpp.is_finite() {
                return Err(TilerError::InvalidThreshold {
                    field: "mpp",
                    value: mpp,
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        Ok(())
    }

    /// `tissue_percent` as a fraction in `[0, 1]`.
    ///
    /// The single point where the percentage scale is reconciled with the
    /// fractional scale used everywhere else.
    pub fn tissue_fraction(&self) -> f64 {
        self.tissue_percent / 100.0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TilerConfig {
        TilerConfig::new(TileSize::new(512, 512).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.level, 0);
        assert_eq!(config.mpp, None);
        assert!(config.check_tissue);
        assert_eq!(config.tissue_percent, DEFAULT_TISSUE_PERCENT);
        assert_eq!(config.pixel_overlap, 0);
        assert_eq!(config.suffix, ".png");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tissue_fraction_conversion() {
        let mut config = config();
        config.tissue_percent = 80.0;
        assert_eq!(config.tissue_fraction(), 0.8);
        config.tissue_percent = 0.0;
        assert_eq!(config.tissue_fraction(), 0.0);
    }

    #[test]
    fn test_tissue_percent_out_of_range() {
        let mut config = config();
        config.tissue_percent = 120.0;
        assert!(matches!(
            config.validate(),
            Err(TilerError::InvalidThreshold {
                field: "tissue_percent",
                ..
            })
        ));

        config.tissue_percent = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_region_coverage_out_of_range() {
        let mut config = config();
        config.min_region_coverage = 1.5;
        assert!(matches!(
            config.validate(),
            Err(TilerError::InvalidThreshold {
                field: "min_region_coverage",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_mpp() {
        let mut config = config();
        config.mpp = Some(0.0);
        assert!(config.validate().is_err());
        config.mpp = Some(-0.5);
        assert!(config.validate().is_err());
        config.mpp = Some(0.25);
        assert!(config.validate().is_ok());
    }
}
