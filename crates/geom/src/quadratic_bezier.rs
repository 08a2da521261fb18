use crate::{
    flat_enough, point, Box2D, LineSegment, Point, COINCIDENCE_EPSILON, MAX_SUBDIVISION_DEPTH,
};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A 2D quadratic bézier curve segment defined by its endpoints and a
/// control point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticBezierSegment {
    pub from: Point,
    pub ctrl: Point,
    pub to: Point,
}

impl QuadraticBezierSegment {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let t2 = t * t;
        let one_t = 1.0 - t;
        let one_t2 = one_t * one_t;

        (self.from.to_vector() * one_t2
            + self.ctrl.to_vector() * 2.0 * one_t * t
            + self.to.to_vector() * t2)
            .to_point()
    }

    /// Split this curve in two sub-curves at parameter `t`.
    pub fn split(&self, t: f64) -> (QuadraticBezierSegment, QuadraticBezierSegment) {
        let split_point = self.sample(t);

        (
            QuadraticBezierSegment {
                from: self.from,
                ctrl: self.from.lerp(self.ctrl, t),
                to: split_point,
            },
            QuadraticBezierSegment {
                from: split_point,
                ctrl: self.ctrl.lerp(self.to, t),
                to: self.to,
            },
        )
    }

    /// Whether all of the curve's points are coincident.
    pub fn is_degenerate(&self) -> bool {
        let e2 = COINCIDENCE_EPSILON * COINCIDENCE_EPSILON;

        (self.ctrl - self.from).square_length() <= e2
            && (self.to - self.from).square_length() <= e2
    }

    /// A conservative bounding box computed from the control polygon.
    pub fn fast_bounding_box(&self) -> Box2D {
        Box2D {
            min: point(
                self.from.x.min(self.ctrl.x).min(self.to.x),
                self.from.y.min(self.ctrl.y).min(self.to.y),
            ),
            max: point(
                self.from.x.max(self.ctrl.x).max(self.to.x),
                self.from.y.max(self.ctrl.y).max(self.to.y),
            ),
        }
    }

    fn is_flat_enough(&self, tolerance: f64) -> bool {
        let chord = LineSegment {
            from: self.from,
            to: self.to,
        };
        let deviation = chord.distance_to_point(self.ctrl);

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
    curve: &QuadraticBezierSegment,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineSegment;

    #[test]
    fn flatten_ends_at_endpoint() {
        let curve = QuadraticBezierSegment {
            from: point(0.0, 0.0),
            ctrl: point(50.0, 100.0),
            to: point(100.0, 0.0),
        };

        let mut last = curve.from;
        let mut count = 0;
        curve.for_each_flattened(0.01, &mut |p| {
            last = p;
            count += 1;
        });

        assert_eq!(last, curve.to);
        assert!(count > 2);
    }

    #[test]
    fn flatten_within_tolerance() {
        let curve = QuadraticBezierSegment {
            from: point(0.0, 0.0),
            ctrl: point(100.0, 0.0),
            to: point(100.0, 100.0),
        };

        for tolerance in &[1.0, 0.1, 0.01] {
            let mut polyline = vec![curve.from];
            curve.for_each_flattened(*tolerance, &mut |p| polyline.push(p));

            // Sample the analytic curve densely and check every sample is
            // close to the polyline.
            for i in 0..=256 {
                let p = curve.sample(i as f64 / 256.0);
                let min_dist = polyline
                    .windows(2)
                    .map(|w| LineSegment { from: w[0], to: w[1] }.distance_to_point(p))
                    .fold(f64::MAX, f64::min);
                assert!(
                    min_dist <= tolerance * 2.0,
                    "tolerance {} dist {}",
                    tolerance,
                    min_dist
                );
            }
        }
    }

    #[test]
    fn tighter_tolerance_makes_more_points() {
        let curve = QuadraticBezierSegment {
            from: point(0.0, 0.0),
            ctrl: point(10.0, 40.0),
            to: point(60.0, 10.0),
        };

        let mut previous = 0;
        for tolerance in &[1.0, 0.1, 0.01, 0.001] {
            let mut count = 0;
            curve.for_each_flattened(*tolerance, &mut |_| count += 1);
            assert!(count >= previous);
            previous = count;
        }
    }

    #[test]
    fn flatten_degenerate() {
        let curve = QuadraticBezierSegment {
            from: point(4.0, 4.0),
            ctrl: point(4.0, 4.0),
            to: point(4.0, 4.0),
        };

        let mut count = 0;
        curve.for_each_flattened(0.01, &mut |_| count += 1);
        assert_eq!(count, 0);
    }
}
