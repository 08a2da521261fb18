use crate::{
    flat_enough, point, Box2D, LineSegment, Point, QuadraticBezierSegment, COINCIDENCE_EPSILON,
    MAX_SUBDIVISION_DEPTH,
};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A 2D cubic bézier curve segment defined by its endpoints and two
/// control points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicBezierSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CubicBezierSegment {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;
        let one_t3 = one_t2 * one_t;

        (self.from.to_vector() * one_t3
            + self.ctrl1.to_vector() * 3.0 * one_t2 * t
            + self.ctrl2.to_vector() * 3.0 * one_t * t2
            + self.to.to_vector() * t3)
            .to_point()
    }

    /// Elevate a quadratic curve to an equivalent cubic.
    pub fn from_quadratic(curve: &QuadraticBezierSegment) -> Self {
        CubicBezierSegment {
            from: curve.from,
            ctrl1: curve.from.lerp(curve.ctrl, 2.0 / 3.0),
            ctrl2: curve.to.lerp(curve.ctrl, 2.0 / 3.0),
            to: curve.to,
        }
    }

    /// Split this curve in two sub-curves at parameter `t` (de Casteljau).
    pub fn split(&self, t: f64) -> (CubicBezierSegment, CubicBezierSegment) {
        let ctrl1a = self.from.lerp(self.ctrl1, t);
        let ctrl2a = self.ctrl1.lerp(self.ctrl2, t);
        let ctrl1aa = ctrl1a.lerp(ctrl2a, t);
        let ctrl3a = self.ctrl2.lerp(self.to, t);
        let ctrl2aa = ctrl2a.lerp(ctrl3a, t);
        let split_point = ctrl1aa.lerp(ctrl2aa, t);

        (
            CubicBezierSegment {
                from: self.from,
                ctrl1: ctrl1a,
                ctrl2: ctrl1aa,
                to: split_point,
            },
            CubicBezierSegment {
                from: split_point,
                ctrl1: ctrl2aa,
                ctrl2: ctrl3a,
                to: self.to,
            },
        )
    }

    /// Whether all of the curve's points are coincident.
    pub fn is_degenerate(&self) -> bool {
        let e2 = COINCIDENCE_EPSILON * COINCIDENCE_EPSILON;

        (self.ctrl1 - self.from).square_length() <= e2
            && (self.ctrl2 - self.from).square_length() <= e2
            && (self.to - self.from).square_length() <= e2
    }

    /// A conservative bounding box computed from the control polygon.
    pub fn fast_bounding_box(&self) -> Box2D {
        Box2D {
            min: point(
                self.from
                    .x
                    .min(self.ctrl1.x)
                    .min(self.ctrl2.x)
                    .min(self.to.x),
                self.from
                    .y
                    .min(self.ctrl1.y)
                    .min(self.ctrl2.y)
                    .min(self.to.y),
            ),
            max: point(
                self.from
                    .x
                    .max(self.ctrl1.x)
                    .max(self.ctrl2.x)
                    .max(self.to.x),
                self.from
                    .y
                    .max(self.ctrl1.y)
                    .max(self.ctrl2.y)
                    .max(self.to.y),
            ),
        }
    }

    fn is_flat_enough(&self, tolerance: f64) -> bool {
        let chord = LineSegment {
            from: self.from,
            to: self.to,
        };
        let deviation = chord
            .distance_to_point(self.ctrl1)
            .max(chord.distance_to_point(self.ctrl2));

        flat_enough(deviation, chord.length(), tolerance)
    }

    /// Approximate the curve with a sequence of line segments.
    ///
    /// The `callback` is invoked for the end point of each segment, in
    /// order. The first point of the curve is not reported (the caller
    /// already has it); the last reported point is exactly `self.to`.
    /// Degenerate curves report nothing.
    pub fn for_each_flattened<F: FnMut(Point)>(&self, tolerance: f64, callback: &mut F) {
        debug_assert!(tolerance > 0.0);

        if self.is_degenerate() {
            return;
        }

        flatten_recursive(self, tolerance, MAX_SUBDIVISION_DEPTH, callback);
    }
}

fn flatten_recursive<F: FnMut(Point)>(
    curve: &CubicBezierSegment,
    tolerance: f64,
    depth: u32,
    callback: &mut F,
) {
    if depth == 0 || curve.is_flat_enough(tolerance) {
        callback(curve.to);
        return;
    }

    let (first, second) = curve.split(0.5);
    flatten_recursive(&first, tolerance, depth - 1, callback);
    flatten_recursive(&second, tolerance, depth - 1, callback);
}
