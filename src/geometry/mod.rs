//! Coordinate geometry for slide tiling.
//!
//! A Whole Slide Image exposes the same physical scene at several pixel
//! resolutions: the full-resolution level 0, coarser pyramid levels, and the
//! thumbnail-resolution tissue mask. A rectangle only means something together
//! with the space it was measured in, so every [`Rect`] carries an explicit
//! [`CoordSpace`] tag and the scaler refuses to convert a rectangle whose tag
//! does not match the source frame. This trades a little ceremony for catching
//! the classic tiling bug (mixing thumbnail and level coordinates) at the
//! point of conversion instead of as a silently wrong crop.

mod scale;

pub use scale::scale_rect;

use std::fmt;

use crate::error::{GeometryError, TilerError};

// =============================================================================
// Coordinate Spaces
// =============================================================================

/// Identifier of a pixel coordinate space on one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordSpace {
    /// The thumbnail-resolution space of the binary tissue mask
    Thumbnail,
    /// A pyramid level; level 0 is full resolution
    Level(u32),
}

impl fmt::Display for CoordSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordSpace::Thumbnail => write!(f, "thumbnail"),
            CoordSpace::Level(level) => write!(f, "level {}", level),
        }
    }
}

/// A coordinate space together with its pixel extent.
///
/// Two frames on the same slide describe the same scene at different
/// resolutions, which is all [`scale_rect`] needs to convert between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordFrame {
    /// The space this frame describes
    pub space: CoordSpace,
    /// Width of the space in pixels
    pub width: u32,
    /// Height of the space in pixels
    pub height: u32,
}

impl CoordFrame {
    /// Create a frame for an arbitrary space.
    pub fn new(space: CoordSpace, width: u32, height: u32) -> Self {
        Self {
            space,
            width,
            height,
        }
    }

    /// Create a thumbnail-space frame.
    pub fn thumbnail(width: u32, height: u32) -> Self {
        Self::new(CoordSpace::Thumbnail, width, height)
    }

    /// Create a pyramid-level frame.
    pub fn level(level: u32, width: u32, height: u32) -> Self {
        Self::new(CoordSpace::Level(level), width, height)
    }
}

// =============================================================================
// Rectangle
// =============================================================================

/// An axis-aligned pixel rectangle tagged with the space it lives in.
///
/// Invariant: `x_br > x_ul` and `y_br > y_ul`, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    space: CoordSpace,
    /// Upper-left x coordinate (inclusive)
    pub x_ul: u32,
    /// Upper-left y coordinate (inclusive)
    pub y_ul: u32,
    /// Bottom-right x coordinate (exclusive)
    pub x_br: u32,
    /// Bottom-right y coordinate (exclusive)
    pub y_br: u32,
}

impl Rect {
    /// Create a rectangle from its corners.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyRect`] if the corners do not enclose a
    /// positive area.
    pub fn new(
        space: CoordSpace,
        x_ul: u32,
        y_ul: u32,
        x_br: u32,
        y_br: u32,
    ) -> Result<Self, GeometryError> {
        if x_br <= x_ul || y_br <= y_ul {
            return Err(GeometryError::EmptyRect {
                x_ul,
                y_ul,
                x_br,
                y_br,
            });
        }
        Ok(Self {
            space,
            x_ul,
            y_ul,
            x_br,
            y_br,
        })
    }

    /// Corners already known to enclose a positive area.
    pub(crate) fn from_corners_unchecked(
        space: CoordSpace,
        x_ul: u32,
        y_ul: u32,
        x_br: u32,
        y_br: u32,
    ) -> Self {
        debug_assert!(x_br > x_ul && y_br > y_ul);
        Self {
            space,
            x_ul,
            y_ul,
            x_br,
            y_br,
        }
    }

    /// Create a rectangle from an origin and a tile size.
    ///
    /// Always valid because tile dimensions are at least 1.
    pub fn from_origin(space: CoordSpace, x_ul: u32, y_ul: u32, size: TileSize) -> Self {
        Self {
            space,
            x_ul,
            y_ul,
            x_br: x_ul + size.width,
            y_br: y_ul + size.height,
        }
    }

    /// The space this rectangle was measured in.
    pub fn space(&self) -> CoordSpace {
        self.space
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.x_br - self.x_ul
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.y_br - self.y_ul
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {}) @ {}",
            self.x_ul, self.y_ul, self.x_br, self.y_br, self.space
        )
    }
}

// =============================================================================
// Tile Size
// =============================================================================

/// Requested tile dimensions in pixels.
///
/// Invariant: both dimensions are at least 1, enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    /// Tile width in pixels
    pub width: u32,
    /// Tile height in pixels
    pub height: u32,
}

impl TileSize {
    /// Create a tile size.
    ///
    /// # Errors
    ///
    /// Returns [`TilerError::InvalidTileSize`] if either dimension is 0.
    pub fn new(width: u32, height: u32) -> Result<Self, TilerError> {
        if width < 1 || height < 1 {
            return Err(TilerError::InvalidTileSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// `(width, height)` as a tuple.
    pub fn as_tuple(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// =============================================================================
// Tests
// =============================================================================
