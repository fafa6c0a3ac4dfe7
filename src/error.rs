use thiserror::Error;

/// Errors related to coordinate geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A rectangle was passed to the scaler with a space tag that does not
    /// match the source frame
    #[error("Coordinate space mismatch: rectangle is in {rect_space}, frame describes {frame_space}")]
    SpaceMismatch {
        rect_space: String,
        frame_space: String,
    },

    /// Rectangle corners do not describe a positive area
    #[error("Empty rectangle: ({x_ul}, {y_ul})-({x_br}, {y_br}) has no area")]
    EmptyRect {
        x_ul: u32,
        y_ul: u32,
        x_br: u32,
        y_br: u32,
    },
}

/// Recoverable, per-candidate extraction failures.
///
/// These never abort a tiling run: the orchestrator logs the candidate and
/// moves on to the next grid cell.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The requested rectangle or tile size is invalid for the source geometry
    #[error(
        "Tile size or coordinates invalid for source: requested {tile_width}x{tile_height} \
         at ({x_ul}, {y_ul}), source extent is {source_width}x{source_height}"
    )]
    SizeOrCoordinate {
        x_ul: u32,
        y_ul: u32,
        tile_width: u32,
        tile_height: u32,
        source_width: u32,
        source_height: u32,
    },

    /// The requested pyramid level does not exist on the source
    #[error("Level {level} not available on source ({level_count} levels)")]
    LevelUnavailable { level: usize, level_count: usize },
}

/// Fatal errors from a tiling run.
///
/// Any of these aborts the run before (configuration, level, size checks) or
/// during (I/O) extraction. Per-candidate geometry failures are *not* fatal;
/// see [`ExtractError`].
#[derive(Debug, Error)]
pub enum TilerError {
    /// Tile dimensions must both be at least 1
    #[error("Tile size must be greater than 0, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },

    /// Requested level is not present on the primary source
    #[error("Level {level} not supported by the slide ({level_count} levels available)")]
    UnsupportedLevel { level: usize, level_count: usize },

    /// Requested tile size is larger than the source extent at the chosen level
    #[error(
        "Tile size {tile_width}x{tile_height} exceeds the slide extent \
         {source_width}x{source_height} at level {level}"
    )]
    TileSizeExceedsExtent {
        tile_width: u32,
        tile_height: u32,
        source_width: u32,
        source_height: u32,
        level: usize,
    },

    /// A target mpp was configured but the source does not report its own
    #[error("Target resolution of {mpp} mpp requested but the slide reports no base mpp")]
    MissingResolution { mpp: f64 },

    /// A threshold field is outside its documented range
    #[error("Invalid threshold for {field}: {value} not in [{min}, {max}]")]
    InvalidThreshold {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Coordinate space bookkeeping failure
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Failed to persist a tile or create an output directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode a tile image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
