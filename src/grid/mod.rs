//! Grid enumeration of candidate tile rectangles.
//!
//! Given a region's bounding box at the working pyramid level, the generator
//! lays a regular grid of `tile_size` rectangles over it. The grid is lazy and
//! single-pass; downstream filters drain it once and drop whatever they
//! reject.

use tracing::warn;

use crate::geometry::{Rect, TileSize};

// =============================================================================
// Grid Coordinates
// =============================================================================

/// Lazy iterator over candidate tile rectangles inside a bounding box.
///
/// The stride between adjacent origins is `tile_edge - pixel_overlap` per
/// axis: a positive overlap makes adjacent tiles share pixels, a negative one
/// leaves a gap between them. Counts use floor division, so a trailing strip
/// that cannot fit a whole stride is dropped rather than truncated. Every
/// yielded rectangle is exactly `tile_size`; the last row and column may
/// overhang the bounding box, which is fine because acceptance is decided by
/// the tissue-overlap filter downstream, not by the box edge.
#[derive(Debug, Clone)]
pub struct GridCoordinates {
    bbox: Rect,
    tile_size: TileSize,
    stride_x: u64,
    stride_y: u64,
    n_cols: u64,
    n_rows: u64,
    next: u64,
}

impl GridCoordinates {
    /// Create a grid over `bbox` with the given tile size and overlap.
    ///
    /// An overlap at least as large as a tile edge would make the stride
    /// non-positive; the generator yields nothing in that case instead of
    /// looping forever.
    pub fn new(bbox: Rect, tile_size: TileSize, pixel_overlap: i32) -> Self {
        let stride_x = i64::from(tile_size.width) - i64::from(pixel_overlap);
        let stride_y = i64::from(tile_size.height) - i64::from(pixel_overlap);

        let (n_cols, n_rows, stride_x, stride_y) = if stride_x <= 0 || stride_y <= 0 {
            warn!(
                overlap = pixel_overlap,
                tile = %tile_size,
                "pixel overlap consumes the whole tile stride; no candidates generated"
            );
            (0, 0, 1, 1)
        } else {
            let n_cols = u64::from(bbox.width()) / stride_x as u64;
            let n_rows = u64::from(bbox.height()) / stride_y as u64;
            (n_cols, n_rows, stride_x as u64, stride_y as u64)
        };

        Self {
            bbox,
            tile_size,
            stride_x,
            stride_y,
            n_cols,
            n_rows,
            next: 0,
        }
    }

    /// Number of candidates the grid will yield in total.
    pub fn candidate_count(&self) -> u64 {
        self.n_cols * self.n_rows
    }
}

impl Iterator for GridCoordinates {
    type Item = Rect;

    fn next(&mut self) -> Option<Rect> {
        if self.next >= self.candidate_count() {
            return None;
        }

        // Column-major to keep origins walking down each column of the box.
        let i = self.next / self.n_rows;
        let j = self.next % self.n_rows;
        self.next += 1;

        let x_ul = u64::from(self.bbox.x_ul) + i * self.stride_x;
        let y_ul = u64::from(self.bbox.y_ul) + j * self.stride_y;

        Some(Rect::from_origin(
            self.bbox.space(),
            x_ul as u32,
            y_ul as u32,
            self.tile_size,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.candidate_count() - self.next) as usize;
        (remaining, Some(remaining))
    }
}

// =============================================================================
// Tests
// =============================================================================
