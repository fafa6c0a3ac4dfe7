//! Tissue-coverage scoring of candidate tiles.
//!
//! This is the cheap geometric pre-filter: a candidate rectangle, already
//! scaled into the mask's thumbnail space, is scored by how much of its
//! rasterized footprint lands on tissue. Candidates that pass are later
//! re-checked against real pixel content, which is far more expensive.

use ndarray::s;

use crate::geometry::Rect;

use super::BinaryMask;

/// Fraction of `rect`'s rasterized area covered by tissue in `region_mask`.
///
/// The rectangle is clipped to the mask bounds before scoring, mirroring the
/// rasterize-and-intersect approach: pixels of the candidate that fall outside
/// the mask contribute no area. Returns `None` when the clipped footprint is
/// empty (candidate entirely outside the mask).
pub fn coverage(rect: &Rect, region_mask: &BinaryMask) -> Option<f64> {
    let x0 = rect.x_ul.min(region_mask.width()) as usize;
    let x1 = rect.x_br.min(region_mask.width()) as usize;
    let y0 = rect.y_ul.min(region_mask.height()) as usize;
    let y1 = rect.y_br.min(region_mask.height()) as usize;

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let window = region_mask.grid().slice(s![y0..y1, x0..x1]);
    let tissue = window.iter().filter(|&&v| v).count();
    let area = (x1 - x0) * (y1 - y0);

    Some(tissue as f64 / area as f64)
}

/// Whether a candidate covers strictly more tissue than `threshold` (0.0-1.0).
///
/// A candidate with no rasterized footprint is always rejected. The check is
/// strict, so a threshold of 1.0 rejects everything and 0.0 accepts any
/// candidate touching at least one tissue pixel.
pub fn accepts(rect: &Rect, region_mask: &BinaryMask, threshold: f64) -> bool {
    match coverage(rect, region_mask) {
        Some(ratio) => ratio > threshold,
        None => false,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CoordSpace;

    fn rect(x_ul: u32, y_ul: u32, x_br: u32, y_br: u32) -> Rect {
        Rect::new(CoordSpace::Thumbnail, x_ul, y_ul, x_br, y_br).unwrap()
    }

    #[test]
    fn test_full_coverage() {
        let mask = BinaryMask::from_fn(20, 20, |_, _| true);
        let candidate = rect(2, 2, 10, 10);
        assert_eq!(coverage(&candidate, &mask), Some(1.0));
        assert!(accepts(&candidate, &mask, 0.8));
    }

    #[test]
    fn test_partial_coverage() {
        // Left half of the mask is tissue.
        let mask = BinaryMask::from_fn(20, 20, |x, _| x < 10);
        let candidate = rect(5, 0, 15, 10);
        assert_eq!(coverage(&candidate, &mask), Some(0.5));
        assert!(accepts(&candidate, &mask, 0.4));
        assert!(!accepts(&candidate, &mask, 0.5));
        assert!(!accepts(&candidate, &mask, 0.8));
    }

    #[test]
    fn test_candidate_outside_mask_rejected() {
        let mask = BinaryMask::from_fn(20, 20, |_, _| true);
        let candidate = rect(30, 30, 40, 40);
        assert_eq!(coverage(&candidate, &mask), None);
        assert!(!accepts(&candidate, &mask, 0.0));
    }

    #[test]
    fn test_overhang_counts_clipped_area_only() {
        // Candidate half-overhangs the right edge; the clipped footprint is
        // all tissue, so coverage is 1.0 over the visible part.
        let mask = BinaryMask::from_fn(20, 20, |_, _| true);
        let candidate = rect(15, 0, 25, 10);
        assert_eq!(coverage(&candidate, &mask), Some(1.0));
    }

    #[test]
    fn test_threshold_monotonicity() {
        // Raising the threshold never accepts more candidates.
        let mask = BinaryMask::from_fn(40, 40, |x, y| (x / 4 + y / 4) % 2 == 0);
        let candidates: Vec<Rect> = (0..9)
            .map(|i| {
                let x = (i % 3) * 12;
                let y = (i / 3) * 12;
                rect(x, y, x + 10, y + 10)
            })
            .collect();

        let accepted_at = |threshold: f64| {
            candidates
                .iter()
                .filter(|c| accepts(c, &mask, threshold))
                .count()
        };

        assert!(accepted_at(0.9) <= accepted_at(0.5));
        assert!(accepted_at(0.5) <= accepted_at(0.1));
    }

    #[test]
    fn test_strict_inequality_at_threshold() {
        // Exactly 80% tissue must NOT pass a 0.8 threshold.
        let mask = BinaryMask::from_fn(10, 10, |x, _| x < 8);
        let candidate = rect(0, 0, 10, 10);
        assert_eq!(coverage(&candidate, &mask), Some(0.8));
        assert!(!accepts(&candidate, &mask, 0.8));
        assert!(accepts(&candidate, &mask, 0.79));
    }
}
