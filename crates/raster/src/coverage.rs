//! Anti-aliased coverage computation.
//!
//! Coverage is the fraction of a pixel occupied by a shape, always in
//! `[0, 1]`. Pixels far from every contour edge take the exact values 0
//! or 1 straight from the winding test; only pixels near an edge pay
//! for one of the two refinement strategies:
//!
//! - **supersampling**: the winding test evaluated on an N×N sub-pixel
//!   grid and averaged;
//! - **distance-based**: the signed distance from the pixel center to
//!   the nearest contour edge, mapped through a quintic Hermite easing
//!   over a fixed transition width, which keeps the coverage ramp
//!   C¹-continuous.
//!
//! Stroke coverage is computed from the distance to the stroke
//! centerline against half the stroke width instead of rasterizing the
//! offset contour, so overlapping cap/join geometry cannot double up.

use crate::geom::{LineSegment, Point};
use crate::path::FillRule;
use crate::scanline::EdgeTable;

use std::f64::consts::FRAC_1_SQRT_2;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Width of the edge transition band, in device pixels.
pub const TRANSITION_WIDTH: f64 = 1.0;

/// Distance from a pixel center past which its whole footprint is clear
/// of the contour and coverage is exactly 0 or 1.
pub const FAST_PATH_RADIUS: f64 = TRANSITION_WIDTH * 0.5 + FRAC_1_SQRT_2;

/// The anti-aliasing strategy applied to boundary pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum AntiAliasing {
    /// Average the winding test over a `grid`×`grid` sub-pixel grid.
    Supersample { grid: u8 },
    /// Map the signed distance to the nearest edge through a smooth
    /// easing curve.
    DistanceField,
}

impl AntiAliasing {
    pub const DEFAULT: Self = AntiAliasing::Supersample { grid: 4 };
}

impl Default for AntiAliasing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Quintic Hermite easing (`6t⁵ - 15t⁴ + 10t³`), clamped to `[0, 1]`.
#[inline]
pub fn smootherstep(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Distance from `p` to the closest of the given segments, saturated at
/// `cutoff`.
///
/// Segments whose bounding box is further than `cutoff` on either axis
/// are skipped without a distance computation.
pub fn distance_to_segments(p: Point, segments: &[LineSegment], cutoff: f64) -> f64 {
    let mut min_sq = cutoff * cutoff;

    for segment in segments {
        let min_x = segment.from.x.min(segment.to.x);
        let max_x = segment.from.x.max(segment.to.x);
        let min_y = segment.from.y.min(segment.to.y);
        let max_y = segment.from.y.max(segment.to.y);
        if p.x < min_x - cutoff
            || p.x > max_x + cutoff
            || p.y < min_y - cutoff
            || p.y > max_y + cutoff
        {
            continue;
        }

        min_sq = min_sq.min(segment.square_distance_to_point(p));
    }

    min_sq.sqrt()
}

/// Fractional coverage from averaging the winding test over a
/// `grid`×`grid` sub-pixel pattern centered on `center`.
pub fn supersample_coverage(
    table: &EdgeTable,
    center: Point,
    grid: u8,
    fill_rule: FillRule,
) -> f64 {
    let grid = grid.max(1) as u32;
    let mut hits = 0;

    for j in 0..grid {
        for i in 0..grid {
            let offset_x = (i as f64 + 0.5) / grid as f64 - 0.5;
            let offset_y = (j as f64 + 0.5) / grid as f64 - 0.5;
            let sample = Point::new(center.x + offset_x, center.y + offset_y);
            if table.hit_test(sample, fill_rule) {
                hits += 1;
            }
        }
    }

    hits as f64 / (grid * grid) as f64
}

/// Fractional coverage from the distance to the nearest edge.
///
/// `distance` is unsigned; `inside` gives it its sign. The result ramps
/// from 0 to 1 across the transition band centered on the edge.
#[inline]
pub fn distance_coverage(distance: f64, inside: bool) -> f64 {
    let signed = if inside { distance } else { -distance };

    smootherstep(signed / TRANSITION_WIDTH + 0.5)
}

/// Coverage of one pixel of a filled shape.
///
/// `segments` must be the boundary of the same contours `table` was
/// built from. This is the reference single-pixel entry point; the
/// renderer uses the same logic with the winding sweep amortized per
/// row.
pub fn fill_coverage(
    table: &EdgeTable,
    segments: &[LineSegment],
    center: Point,
    fill_rule: FillRule,
    anti_aliasing: AntiAliasing,
) -> f64 {
    let distance = distance_to_segments(center, segments, FAST_PATH_RADIUS);

    if distance >= FAST_PATH_RADIUS {
        return if table.hit_test(center, fill_rule) {
            1.0
        } else {
            0.0
        };
    }

    match anti_aliasing {
        AntiAliasing::Supersample { grid } => {
            supersample_coverage(table, center, grid, fill_rule)
        }
        AntiAliasing::DistanceField => {
            distance_coverage(distance, table.hit_test(center, fill_rule))
        }
    }
}

/// Coverage of one pixel of a stroked polyline, straight from the
/// distance to the centerline.
pub fn stroke_coverage(center: Point, centerline: &[LineSegment], half_width: f64) -> f64 {
    let cutoff = half_width + TRANSITION_WIDTH;
    let distance = distance_to_segments(center, centerline, cutoff);

    smootherstep((half_width - distance) / TRANSITION_WIDTH + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;
    use crate::path::SubPath;
    use crate::scanline::contour_segments;

    fn unit_square(size: f64) -> Vec<SubPath> {
        vec![SubPath {
            points: vec![
                point(0.0, 0.0),
                point(size, 0.0),
                point(size, size),
                point(0.0, size),
            ],
            closed: true,
        }]
    }

    #[test]
    fn smootherstep_is_monotone_and_clamped() {
        assert_eq!(smootherstep(-1.0), 0.0);
        assert_eq!(smootherstep(0.0), 0.0);
        assert_eq!(smootherstep(1.0), 1.0);
        assert_eq!(smootherstep(2.0), 1.0);
        assert!((smootherstep(0.5) - 0.5).abs() < 1e-12);

        let mut previous = 0.0;
        for i in 0..=100 {
            let v = smootherstep(i as f64 / 100.0);
            assert!(v >= previous);
            previous = v;
        }
    }

    #[test]
    fn coverage_is_exact_away_from_edges() {
        let contours = unit_square(20.0);
        let table = EdgeTable::build(&contours);
        let segments = contour_segments(&contours);

        for aa in &[AntiAliasing::DEFAULT, AntiAliasing::DistanceField] {
            let deep_inside =
                fill_coverage(&table, &segments, point(10.0, 10.0), FillRule::NonZero, *aa);
            assert_eq!(deep_inside, 1.0);

            let far_outside =
                fill_coverage(&table, &segments, point(30.0, 10.0), FillRule::NonZero, *aa);
            assert_eq!(far_outside, 0.0);
        }
    }

    #[test]
    fn coverage_stays_in_bounds_near_edges() {
        let contours = unit_square(20.0);
        let table = EdgeTable::build(&contours);
        let segments = contour_segments(&contours);

        for aa in &[AntiAliasing::DEFAULT, AntiAliasing::DistanceField] {
            for i in 0..100 {
                // A horizontal sweep across the left edge.
                let p = point(-2.0 + i as f64 * 0.05, 10.5);
                let coverage = fill_coverage(&table, &segments, p, FillRule::NonZero, *aa);
                assert!((0.0..=1.0).contains(&coverage));
            }
        }
    }

    #[test]
    fn edge_pixel_is_half_covered() {
        let contours = unit_square(20.0);
        let table = EdgeTable::build(&contours);
        let segments = contour_segments(&contours);

        // A pixel centered exactly on the left edge.
        for aa in &[AntiAliasing::Supersample { grid: 8 }, AntiAliasing::DistanceField] {
            let coverage =
                fill_coverage(&table, &segments, point(0.0, 10.5), FillRule::NonZero, *aa);
            assert!((coverage - 0.5).abs() < 0.15, "coverage {:?} {}", aa, coverage);
        }
    }

    #[test]
    fn stroke_coverage_follows_the_centerline() {
        let centerline = [LineSegment {
            from: point(0.0, 0.0),
            to: point(100.0, 0.0),
        }];

        // Deep inside the stroke band.
        assert_eq!(stroke_coverage(point(50.0, 0.0), &centerline, 5.0), 1.0);
        assert_eq!(stroke_coverage(point(50.0, 4.0), &centerline, 5.0), 1.0);
        // On the boundary.
        let on_edge = stroke_coverage(point(50.0, 5.0), &centerline, 5.0);
        assert!((on_edge - 0.5).abs() < 1e-12);
        // Far outside: twice the half-width away.
        assert_eq!(stroke_coverage(point(50.0, 10.0), &centerline, 5.0), 0.0);
    }

    #[test]
    fn distance_cutoff_saturates() {
        let segments = [LineSegment {
            from: point(0.0, 0.0),
            to: point(1.0, 0.0),
        }];

        let d = distance_to_segments(point(500.0, 500.0), &segments, 3.0);
        assert_eq!(d, 3.0);

        let d = distance_to_segments(point(0.5, 2.0), &segments, 3.0);
        assert!((d - 2.0).abs() < 1e-12);
    }
}
