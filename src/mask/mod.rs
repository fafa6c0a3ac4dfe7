//! Binary tissue masks and the geometry checks built on them.
//!
//! A tissue mask is a thumbnail-resolution boolean grid produced by an
//! external segmentation step: `true` marks tissue, `false` marks glass and
//! background. The tiler never computes a mask itself; it consumes one and
//! uses it two ways:
//!
//! - [`RegionLabels`] decomposes the mask into connected tissue regions so the
//!   grid is laid per region and a tile cannot borrow coverage from an
//!   unrelated blob nearby.
//! - [`coverage`]/[`accepts`] score a candidate tile rectangle against one
//!   region's isolated mask before any pixels are fetched.

mod overlap;
mod regions;

pub use overlap::{accepts, coverage};
pub use regions::{Region, RegionLabels};

use ndarray::Array2;

use crate::geometry::CoordFrame;

// =============================================================================
// Binary Mask
// =============================================================================

/// A thumbnail-resolution boolean tissue map. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    grid: Array2<bool>,
}

impl BinaryMask {
    /// Wrap an existing grid. Rows index y, columns index x.
    pub fn new(grid: Array2<bool>) -> Self {
        Self { grid }
    }

    /// Build a mask of the given extent from a per-pixel predicate `f(x, y)`.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let grid = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            f(x as u32, y as u32)
        });
        Self { grid }
    }

    /// An all-background mask of the given extent.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            grid: Array2::from_elem((height as usize, width as usize), false),
        }
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.grid.ncols() as u32
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.grid.nrows() as u32
    }

    /// The thumbnail coordinate frame this mask is measured in.
    pub fn frame(&self) -> CoordFrame {
        CoordFrame::thumbnail(self.width(), self.height())
    }

    /// Value at `(x, y)`; out-of-bounds reads as background.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.grid
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Number of tissue pixels.
    pub fn tissue_pixels(&self) -> usize {
        self.grid.iter().filter(|&&v| v).count()
    }

    pub(crate) fn grid(&self) -> &Array2<bool> {
        &self.grid
    }
}

// =============================================================================
// Tests
// =============================================================================
