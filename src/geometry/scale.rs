//! Rectangle conversion between coordinate spaces.

use crate::error::GeometryError;

use super::{CoordFrame, Rect};

/// Convert a rectangle from one coordinate frame to another.
///
/// Both frames must describe the same scene (same slide); scaling is applied
/// independently per axis and the resulting corners are rounded to the nearest
/// pixel. Repeated round-trips through frames of different resolution are
/// lossy: rounding can move each corner by up to one pixel per conversion, and
/// callers must not rely on bit-exact inverses.
///
/// # Errors
///
/// - [`GeometryError::SpaceMismatch`] if `rect` is not tagged with
///   `from.space`.
/// - [`GeometryError::EmptyRect`] if rounding collapses the rectangle to zero
///   area in the target frame (a tile much smaller than one target pixel).
///   Callers filtering candidates treat this as a rejection, not a failure.
pub fn scale_rect(rect: &Rect, from: &CoordFrame, to: &CoordFrame) -> Result<Rect, GeometryError> {
    if rect.space() != from.space {
        return Err(GeometryError::SpaceMismatch {
            rect_space: rect.space().to_string(),
            frame_space: from.space.to_string(),
        });
    }

    let sx = f64::from(to.width) / f64::from(from.width);
    let sy = f64::from(to.height) / f64::from(from.height);

    let x_ul = (f64::from(rect.x_ul) * sx).round() as u32;
    let y_ul = (f64::from(rect.y_ul) * sy).round() as u32;
    let x_br = (f64::from(rect.x_br) * sx).round() as u32;
    let y_br = (f64::from(rect.y_br) * sy).round() as u32;

    Rect::new(to.space, x_ul, y_ul, x_br, y_br)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CoordSpace;

    #[test]
    fn test_identity_scale() {
        let frame = CoordFrame::level(0, 10000, 8000);
        let rect = Rect::new(CoordSpace::Level(0), 100, 200, 300, 400).unwrap();
        let scaled = scale_rect(&rect, &frame, &frame).unwrap();
        assert_eq!(scaled, rect);
    }

    #[test]
    fn test_thumbnail_to_level() {
        let thumb = CoordFrame::thumbnail(100, 80);
        let level0 = CoordFrame::level(0, 10000, 8000);
        let rect = Rect::new(CoordSpace::Thumbnail, 10, 20, 30, 40).unwrap();

        let scaled = scale_rect(&rect, &thumb, &level0).unwrap();
        assert_eq!(scaled.space(), CoordSpace::Level(0));
        assert_eq!(scaled.x_ul, 1000);
        assert_eq!(scaled.y_ul, 2000);
        assert_eq!(scaled.x_br, 3000);
        assert_eq!(scaled.y_br, 4000);
    }

    #[test]
    fn test_round_trip_drift_is_bounded() {
        // Non-integral ratio, so rounding moves corners. After a full round
        // trip each corner may drift by up to one coarse pixel, no more.
        let level = CoordFrame::level(2, 3760, 4520);
        let thumb = CoordFrame::thumbnail(97, 113);
        let rect = Rect::new(CoordSpace::Level(2), 123, 456, 1147, 1480).unwrap();

        let there = scale_rect(&rect, &level, &thumb).unwrap();
        let back = scale_rect(&there, &thumb, &level).unwrap();

        let per_axis_tolerance_x = (3760.0 / 97.0_f64).ceil() as i64;
        let per_axis_tolerance_y = (4520.0 / 113.0_f64).ceil() as i64;
        assert!((i64::from(back.x_ul) - i64::from(rect.x_ul)).abs() <= per_axis_tolerance_x);
        assert!((i64::from(back.y_ul) - i64::from(rect.y_ul)).abs() <= per_axis_tolerance_y);
        assert!((i64::from(back.x_br) - i64::from(rect.x_br)).abs() <= per_axis_tolerance_x);
        assert!((i64::from(back.y_br) - i64::from(rect.y_br)).abs() <= per_axis_tolerance_y);
    }

    #[test]
    fn test_space_mismatch_is_rejected() {
        let thumb = CoordFrame::thumbnail(100, 80);
        let level0 = CoordFrame::level(0, 10000, 8000);
        let rect = Rect::new(CoordSpace::Level(0), 100, 200, 300, 400).unwrap();

        let result = scale_rect(&rect, &thumb, &level0);
        assert!(matches!(result, Err(GeometryError::SpaceMismatch { .. })));
    }

    #[test]
    fn test_collapse_to_zero_area() {
        // A 2-pixel-wide rect shrunk 1000x has no thumbnail footprint.
        let level0 = CoordFrame::level(0, 100_000, 100_000);
        let thumb = CoordFrame::thumbnail(100, 100);
        let rect = Rect::new(CoordSpace::Level(0), 500, 500, 502, 502).unwrap();

        let result = scale_rect(&rect, &level0, &thumb);
        assert!(matches!(result, Err(GeometryError::EmptyRect { .. })));
    }
}
