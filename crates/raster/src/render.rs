//! The rasterization entry points.
//!
//! Everything here works in device space: the caller applies any
//! document-to-device transform before flattening. Rendering one shape
//! is a synchronous, single-threaded pass with no state shared across
//! calls; the destination pixmap is exclusively owned for the duration
//! of the call.

use crate::coverage::{
    distance_coverage, distance_to_segments, stroke_coverage, supersample_coverage, AntiAliasing,
    FAST_PATH_RADIUS, TRANSITION_WIDTH,
};
use crate::geom::{point, Box2D, LineSegment, COINCIDENCE_EPSILON};
use crate::path::{FillRule, PathCommand, SubPath};
use crate::pixel::{Color, Pixmap};
use crate::scanline::{contour_segments, EdgeTable};
use crate::stroke::stroke_outline;
use crate::{LineCap, LineJoin, StrokeStyle};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Parameters for fill rasterization.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct FillOptions {
    /// Maximum allowed distance to the path when flattening curves.
    ///
    /// Default value: `FillOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f64,

    /// Which regions count as interior.
    ///
    /// Default value: `FillRule::NonZero`.
    pub fill_rule: FillRule,

    /// How boundary pixels are refined.
    ///
    /// Default value: `AntiAliasing::DEFAULT`.
    pub anti_aliasing: AntiAliasing,
}

impl FillOptions {
    pub const DEFAULT_TOLERANCE: f64 = 0.1;

    pub const DEFAULT: Self = FillOptions {
        tolerance: Self::DEFAULT_TOLERANCE,
        fill_rule: FillRule::NonZero,
        anti_aliasing: AntiAliasing::DEFAULT,
    };

    #[inline]
    pub fn tolerance(tolerance: f64) -> Self {
        Self::DEFAULT.with_tolerance(tolerance)
    }

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    #[inline]
    pub const fn with_anti_aliasing(mut self, anti_aliasing: AntiAliasing) -> Self {
        self.anti_aliasing = anti_aliasing;
        self
    }
}

impl Default for FillOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fill flattened contours into the pixmap.
pub fn fill_sub_paths(
    pixmap: &mut Pixmap,
    sub_paths: &[SubPath],
    color: Color,
    options: &FillOptions,
) {
    let table = EdgeTable::build(sub_paths);
    if table.is_empty() {
        return;
    }
    let segments = contour_segments(sub_paths);

    let bounds = table.bounding_box();
    fill_impl(pixmap, &table, &segments, bounds, color, options);
}

/// Flatten a command sequence and fill it.
pub fn fill_path(
    pixmap: &mut Pixmap,
    commands: &[PathCommand],
    color: Color,
    options: &FillOptions,
) {
    let sub_paths = crate::path::flatten(commands, options.tolerance);
    fill_sub_paths(pixmap, &sub_paths, color, options);
}

/// Stroke flattened sub-paths into the pixmap.
///
/// When caps and joins are all round, coverage comes straight from the
/// distance to the centerline, which cannot produce doubled-coverage
/// seams where caps and joins overlap the segments. Any other style
/// builds the stroke outline and fills it as one non-zero polygon
/// union, which is seam-free for the same reason: overlaps accumulate
/// winding, not coverage.
pub fn stroke_sub_paths(
    pixmap: &mut Pixmap,
    sub_paths: &[SubPath],
    color: Color,
    style: &StrokeStyle,
    options: &FillOptions,
) {
    if style.line_width <= 0.0 {
        return;
    }

    let all_round = style.line_join == LineJoin::Round
        && style.start_cap == LineCap::Round
        && style.end_cap == LineCap::Round;

    if all_round {
        stroke_by_distance(pixmap, sub_paths, color, style);
        return;
    }

    let mut contours = Vec::new();
    for sub_path in sub_paths {
        contours.extend(stroke_outline(&sub_path.points, sub_path.closed, style));
    }

    // The outline is a union of possibly overlapping closed contours;
    // only the non-zero rule fills it correctly.
    let fill_options = options.with_fill_rule(FillRule::NonZero);
    fill_sub_paths(pixmap, &contours, color, &fill_options);
}

/// Flatten a command sequence and stroke it.
pub fn stroke_path(
    pixmap: &mut Pixmap,
    commands: &[PathCommand],
    color: Color,
    style: &StrokeStyle,
    options: &FillOptions,
) {
    let sub_paths = crate::path::flatten(commands, options.tolerance);
    stroke_sub_paths(pixmap, &sub_paths, color, style, options);
}

fn fill_impl(
    pixmap: &mut Pixmap,
    table: &EdgeTable,
    segments: &[LineSegment],
    bounds: Box2D,
    color: Color,
    options: &FillOptions,
) {
    let (x_range, y_range) = match pixel_range(pixmap, bounds, TRANSITION_WIDTH) {
        Some(ranges) => ranges,
        None => return,
    };

    for y in y_range {
        let center_y = y as f64 + 0.5;
        // Rows with no crossings still get the sweep: pixels within the
        // transition band of a horizontal boundary need their coverage
        // refined even though the whole row is outside.
        let crossings = table.crossings_at(center_y);

        // Sweep the row left to right, accumulating winding as crossings
        // go by so the interior test is O(1) per pixel.
        let mut next_crossing = 0;
        let mut winding = 0;

        for x in x_range.clone() {
            let center_x = x as f64 + 0.5;
            while next_crossing < crossings.len() && crossings[next_crossing].x <= center_x {
                winding += crossings[next_crossing].direction;
                next_crossing += 1;
            }

            let inside = options.fill_rule.is_in(winding);
            let distance = distance_to_segments(
                point(center_x, center_y),
                segments,
                FAST_PATH_RADIUS,
            );

            let coverage = if distance >= FAST_PATH_RADIUS {
                if inside {
                    1.0
                } else {
                    0.0
                }
            } else {
                match options.anti_aliasing {
                    AntiAliasing::Supersample { grid } => supersample_coverage(
                        table,
                        point(center_x, center_y),
                        grid,
                        options.fill_rule,
                    ),
                    AntiAliasing::DistanceField => distance_coverage(distance, inside),
                }
            };

            pixmap.blend_pixel(x as i32, y as i32, color, coverage);
        }
    }
}

fn stroke_by_distance(
    pixmap: &mut Pixmap,
    sub_paths: &[SubPath],
    color: Color,
    style: &StrokeStyle,
) {
    let half_width = style.half_width();
    let centerline = centerline_segments(sub_paths);
    if centerline.is_empty() {
        return;
    }

    let mut bounds = Box2D {
        min: point(f64::MAX, f64::MAX),
        max: point(f64::MIN, f64::MIN),
    };
    for segment in &centerline {
        let b = segment.bounding_box();
        bounds.min.x = bounds.min.x.min(b.min.x);
        bounds.min.y = bounds.min.y.min(b.min.y);
        bounds.max.x = bounds.max.x.max(b.max.x);
        bounds.max.y = bounds.max.y.max(b.max.y);
    }

    let (x_range, y_range) = match pixel_range(pixmap, bounds, half_width + TRANSITION_WIDTH) {
        Some(ranges) => ranges,
        None => return,
    };

    for y in y_range {
        for x in x_range.clone() {
            let center = point(x as f64 + 0.5, y as f64 + 0.5);
            let coverage = stroke_coverage(center, &centerline, half_width);
            pixmap.blend_pixel(x as i32, y as i32, color, coverage);
        }
    }
}

/// The centerline segments of the given sub-paths, closing edges
/// included for closed ones, degenerate segments dropped.
fn centerline_segments(sub_paths: &[SubPath]) -> Vec<LineSegment> {
    let mut segments = Vec::new();

    for sub_path in sub_paths {
        let points = &sub_path.points;
        if points.len() < 2 {
            continue;
        }

        let count = if sub_path.closed {
            points.len()
        } else {
            points.len() - 1
        };
        for i in 0..count {
            let segment = LineSegment {
                from: points[i],
                to: points[(i + 1) % points.len()],
            };
            if (segment.to - segment.from).length() > COINCIDENCE_EPSILON {
                segments.push(segment);
            }
        }
    }

    segments
}

/// Expand `bounds` by `margin`, clamp to the pixmap and convert to
/// pixel index ranges. `None` when the clamped area is empty.
fn pixel_range(
    pixmap: &Pixmap,
    bounds: Box2D,
    margin: f64,
) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
    let x0 = ((bounds.min.x - margin).floor().max(0.0)) as usize;
    let y0 = ((bounds.min.y - margin).floor().max(0.0)) as usize;
    let x1 = (bounds.max.x + margin).ceil();
    let y1 = (bounds.max.y + margin).ceil();

    if x1 < 0.0 || y1 < 0.0 {
        return None;
    }

    let x1 = (x1 as usize).min(pixmap.width());
    let y1 = (y1 as usize).min(pixmap.height());

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some((x0..x1, y0..y1))
}
