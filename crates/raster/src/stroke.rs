//! Stroke outline synthesis.
//!
//! Given a flattened polyline and a stroke style, build the closed
//! contour(s) delimiting the stroked region: both offset sides, joins at
//! interior vertices and caps at the ends of open sub-paths. The
//! resulting contours are meant to be filled with the non-zero winding
//! rule, which absorbs the overlaps a self-intersecting stroke produces.

use crate::geom::{Line, Point, Vector, COINCIDENCE_EPSILON};
use crate::path::SubPath;
use crate::{LineCap, LineJoin, StrokeStyle};

use std::f64::consts::PI;

/// Build the outline contour(s) of a stroked polyline.
///
/// Open polylines produce one closed contour: the left offsets walked
/// forward, the end cap, the right offsets walked backward and the
/// start cap. Closed polylines produce two closed rings (outer and
/// inner offset); filling both with the non-zero rule yields the
/// stroked annulus.
///
/// Zero-length segments are dropped first; fewer than 2 usable points
/// produce no contours at all.
pub fn stroke_outline(points: &[Point], closed: bool, style: &StrokeStyle) -> Vec<SubPath> {
    debug_assert!(style.line_width > 0.0);

    let points = sanitize(points, closed);
    if points.len() < 2 {
        return Vec::new();
    }

    // A "closed" 2-point sub-path has no interior; stroke it as an open
    // segment so the caps give it shape.
    if closed && points.len() >= 3 {
        let mut reversed = points.clone();
        reversed.reverse();

        return vec![
            SubPath {
                points: offset_ring(&points, style),
                closed: true,
            },
            SubPath {
                points: offset_ring(&reversed, style),
                closed: true,
            },
        ];
    }

    let mut reversed = points.clone();
    reversed.reverse();

    let mut contour = offset_side(&points, style);

    let last = *points.last().unwrap();
    let t_end = direction(points[points.len() - 2], last);
    add_cap(&mut contour, last, t_end, style.end_cap, style);

    contour.extend(offset_side(&reversed, style));

    let first = points[0];
    let t_start = direction(points[1], first);
    add_cap(&mut contour, first, t_start, style.start_cap, style);

    vec![SubPath {
        points: contour,
        closed: true,
    }]
}

/// Drop zero-length segments (and, for closed polylines, a trailing
/// point coincident with the first).
fn sanitize(points: &[Point], closed: bool) -> Vec<Point> {
    let e2 = COINCIDENCE_EPSILON * COINCIDENCE_EPSILON;
    let mut out: Vec<Point> = Vec::with_capacity(points.len());

    for &p in points {
        if out
            .last()
            .map_or(true, |last| (p - *last).square_length() > e2)
        {
            out.push(p);
        }
    }

    if closed && out.len() > 1 {
        if (out[0] - *out.last().unwrap()).square_length() <= e2 {
            out.pop();
        }
    }

    out
}

#[inline]
fn direction(from: Point, to: Point) -> Vector {
    (to - from).normalize()
}

/// Unit normal pointing to the left of the segment direction.
#[inline]
fn left_normal(from: Point, to: Point) -> Vector {
    let t = direction(from, to);
    Vector::new(-t.y, t.x)
}

/// The left-hand offsets of an open polyline, joins included.
fn offset_side(points: &[Point], style: &StrokeStyle) -> Vec<Point> {
    let hw = style.half_width();
    let mut out = Vec::new();

    let n_first = left_normal(points[0], points[1]);
    out.push(points[0] + n_first * hw);

    for i in 1..points.len() - 1 {
        let n_prev = left_normal(points[i - 1], points[i]);
        let n_next = left_normal(points[i], points[i + 1]);
        add_join(&mut out, points[i], n_prev, n_next, style);
    }

    let n_last = left_normal(points[points.len() - 2], *points.last().unwrap());
    out.push(*points.last().unwrap() + n_last * hw);

    out
}

/// The left-hand offset ring of a closed polyline, with a join at every
/// vertex (including the wrap-around one).
fn offset_ring(points: &[Point], style: &StrokeStyle) -> Vec<Point> {
    let len = points.len();
    let mut out = Vec::new();

    for i in 0..len {
        let prev = points[(i + len - 1) % len];
        let next = points[(i + 1) % len];
        let n_prev = left_normal(prev, points[i]);
        let n_next = left_normal(points[i], next);
        add_join(&mut out, points[i], n_prev, n_next, style);
    }

    out
}

/// Join the offset edges meeting at `vertex`.
///
/// `n_prev` and `n_next` are the unit offset normals of the incoming and
/// outgoing segments. The two offset endpoints are always emitted; the
/// join style decides what is inserted between them.
fn add_join(out: &mut Vec<Point>, vertex: Point, n_prev: Vector, n_next: Vector, style: &StrokeStyle) {
    let hw = style.half_width();
    let start = vertex + n_prev * hw;
    let end = vertex + n_next * hw;

    out.push(start);

    // Nearly aligned edges need no join geometry.
    if n_prev.dot(n_next) >= 1.0 - 1e-9 {
        out.push(end);
        return;
    }

    match style.line_join {
        LineJoin::Bevel => {}
        LineJoin::Round => {
            let turn = n_prev
                .angle_from_x_axis()
                .angle_to(n_next.angle_from_x_axis())
                .radians;
            push_arc(out, vertex, n_prev, turn, hw, style.tolerance);
        }
        LineJoin::Miter => {
            // The offset edges extended to their intersection. Per the
            // SVG spec the join falls back to bevel when the spike gets
            // longer than the miter limit allows.
            let prev_edge = Line {
                point: start,
                vector: Vector::new(n_prev.y, -n_prev.x),
            };
            let next_edge = Line {
                point: end,
                vector: Vector::new(n_next.y, -n_next.x),
            };
            if let Some(miter_point) = prev_edge.intersection(&next_edge) {
                if (miter_point - vertex).length() <= hw * style.miter_limit {
                    out.push(miter_point);
                }
            }
        }
    }

    out.push(end);
}

/// Cap an open end. `t_out` is the unit tangent pointing out of the
/// polyline; the previously emitted point is `vertex + n * hw` where
/// `n` is `t_out` rotated 90° counter-clockwise, and the next point the
/// caller emits is its mirror `vertex - n * hw`.
fn add_cap(out: &mut Vec<Point>, vertex: Point, t_out: Vector, cap: LineCap, style: &StrokeStyle) {
    let hw = style.half_width();
    let n = Vector::new(-t_out.y, t_out.x);

    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            out.push(vertex + (n + t_out) * hw);
            out.push(vertex + (t_out - n) * hw);
        }
        LineCap::Round => {
            // A half circle from one offset side to the other, passing
            // through the extended tip.
            push_arc(out, vertex, n, -PI, hw, style.tolerance);
        }
    }
}

/// Sample an arc of `sweep` radians around `vertex`, starting (exclusive)
/// at `vertex + n_start * radius` and stopping one step short of the end
/// point, which the caller emits.
fn push_arc(
    out: &mut Vec<Point>,
    vertex: Point,
    n_start: Vector,
    sweep: f64,
    radius: f64,
    tolerance: f64,
) {
    let start_angle = n_start.y.atan2(n_start.x);
    let num_points = arc_sample_count(sweep, radius, tolerance);

    for k in 1..=num_points {
        let angle = start_angle + sweep * k as f64 / (num_points + 1) as f64;
        out.push(vertex + Vector::new(angle.cos(), angle.sin()) * radius);
    }
}

/// How many interior samples an arc needs so the polyline stays within
/// `tolerance` of it. Sharper turns get more samples; never fewer than 2.
fn arc_sample_count(sweep: f64, radius: f64, tolerance: f64) -> u32 {
    let max_step = if tolerance < radius {
        2.0 * (1.0 - tolerance / radius).acos()
    } else {
        PI
    };

    ((sweep.abs() / max_step).ceil() as u32).max(2)
}
