//! Connected-component decomposition of a tissue mask.

use std::collections::VecDeque;

use ndarray::Array2;

use crate::geometry::{CoordSpace, Rect};

use super::BinaryMask;

// =============================================================================
// Region
// =============================================================================

/// One connected tissue component of a mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Component label, 1-based
    pub label: u32,
    /// Thumbnail-space bounding box of the component
    pub bbox: Rect,
    /// Number of tissue pixels in the component
    pub pixel_count: usize,
}

// =============================================================================
// Region Labels
// =============================================================================

/// Labeled connected components of a [`BinaryMask`].
///
/// Components are 8-connected, matching the connectivity rule of the external
/// mask-labeling step this crate pairs with. Labels start at 1; 0 is
/// background. The label grid is kept so that isolating a single region is a
/// single pass instead of a re-labeling.
#[derive(Debug, Clone)]
pub struct RegionLabels {
    labels: Array2<u32>,
    regions: Vec<Region>,
}

impl RegionLabels {
    /// Label the connected tissue components of `mask`.
    ///
    /// An all-background mask yields zero regions; that is a valid outcome,
    /// not an error.
    pub fn from_mask(mask: &BinaryMask) -> Self {
        let rows = mask.height() as usize;
        let cols = mask.width() as usize;
        let grid = mask.grid();

        let mut labels = Array2::<u32>::zeros((rows, cols));
        let mut regions = Vec::new();
        let mut queue = VecDeque::new();
        let mut next_label = 1u32;

        for row in 0..rows {
            for col in 0..cols {
                if !grid[(row, col)] || labels[(row, col)] != 0 {
                    continue;
                }

                // Flood-fill one component.
                let label = next_label;
                next_label += 1;
                labels[(row, col)] = label;
                queue.push_back((row, col));

                let (mut min_col, mut max_col) = (col, col);
                let (mut min_row, mut max_row) = (row, row);
                let mut pixel_count = 0usize;

                while let Some((r, c)) = queue.pop_front() {
                    pixel_count += 1;
                    min_col = min_col.min(c);
                    max_col = max_col.max(c);
                    min_row = min_row.min(r);
                    max_row = max_row.max(r);

                    for dr in -1i64..=1 {
                        for dc in -1i64..=1 {
                            if dr == 0 && dc == 0 {
                                continue;
                            }
                            let nr = r as i64 + dr;
                            let nc = c as i64 + dc;
                            if nr < 0 || nc < 0 || nr >= rows as i64 || nc >= cols as i64 {
                                continue;
                            }
                            let (nr, nc) = (nr as usize, nc as usize);
                            if grid[(nr, nc)] && labels[(nr, nc)] == 0 {
                                labels[(nr, nc)] = label;
                                queue.push_back((nr, nc));
                            }
                        }
                    }
                }

                // Bounding box corners are exclusive on the bottom-right, so a
                // single-pixel component still has area 1.
                let bbox = Rect::from_corners_unchecked(
                    CoordSpace::Thumbnail,
                    min_col as u32,
                    min_row as u32,
                    max_col as u32 + 1,
                    max_row as u32 + 1,
                );

                regions.push(Region {
                    label,
                    bbox,
                    pixel_count,
                });
            }
        }

        Self { labels, regions }
    }

    /// The labeled regions, in discovery (row-major) order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// A mask the same shape as the input with only `region`'s pixels set.
    ///
    /// Overlap checks scoped to this mask cannot count tissue belonging to a
    /// different component.
    pub fn region_mask(&self, region: &Region) -> BinaryMask {
        BinaryMask::new(self.labels.mapv(|label| label == region.label))
    }
}

// =============================================================================
// Tests
// =============================================================================
