//! Elliptic arc maths: endpoint to center parameterization conversion and
//! approximation with cubic bézier curves.

use crate::{
    point, vector, Angle, CubicBezierSegment, Point, Rotation, Vector, COINCIDENCE_EPSILON,
};
use arrayvec::ArrayVec;
use std::f64::consts::PI;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// The large-arc and sweep flags of the arc command.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ArcFlags {
    /// Pick the larger of the two sweeps joining the endpoints.
    pub large_arc: bool,
    /// Traverse the arc in the direction of increasing angles.
    pub sweep: bool,
}

/// An elliptic arc in endpoint parameterization, as it appears in path
/// data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SvgArc {
    pub from: Point,
    pub to: Point,
    pub radii: Vector,
    pub x_rotation: Angle,
    pub flags: ArcFlags,
}

/// An elliptic arc in center parameterization.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Arc {
    pub center: Point,
    pub radii: Vector,
    pub start_angle: Angle,
    pub sweep_angle: Angle,
    pub x_rotation: Angle,
}

impl SvgArc {
    /// Whether the arc degrades to a plain line segment.
    ///
    /// This happens when either radius is (close to) zero or when the
    /// endpoints are coincident.
    pub fn is_straight_line(&self) -> bool {
        self.radii.x.abs() <= COINCIDENCE_EPSILON
            || self.radii.y.abs() <= COINCIDENCE_EPSILON
            || (self.to - self.from).square_length() <= COINCIDENCE_EPSILON * COINCIDENCE_EPSILON
    }

    /// Convert to center parameterization.
    ///
    /// Callers must check `is_straight_line` first.
    pub fn to_arc(&self) -> Arc {
        Arc::from_svg_arc(self)
    }

    /// Approximate the arc with a sequence of cubic bézier segments.
    pub fn for_each_cubic_bezier<F: FnMut(&CubicBezierSegment)>(&self, callback: &mut F) {
        if self.is_straight_line() {
            callback(&CubicBezierSegment {
                from: self.from,
                ctrl1: self.from,
                ctrl2: self.to,
                to: self.to,
            });
            return;
        }

        self.to_arc().for_each_cubic_bezier(callback);
    }
}

impl Arc {
    /// Endpoint to center parameterization conversion.
    ///
    /// Implements the standard conversion: requested radii that cannot
    /// reach the endpoints are scaled up to the feasible minimum, and the
    /// center candidate is selected from the large-arc/sweep flags.
    pub fn from_svg_arc(arc: &SvgArc) -> Arc {
        debug_assert!(!arc.from.x.is_nan());
        debug_assert!(!arc.from.y.is_nan());
        debug_assert!(!arc.to.x.is_nan());
        debug_assert!(!arc.to.y.is_nan());
        debug_assert!(!arc.radii.x.is_nan());
        debug_assert!(!arc.radii.y.is_nan());
        debug_assert!(!arc.x_rotation.get().is_nan());

        let mut rx = arc.radii.x.abs();
        let mut ry = arc.radii.y.abs();

        let xr = arc.x_rotation.get() % (2.0 * PI);
        let cos_phi = xr.cos();
        let sin_phi = xr.sin();
        let hd_x = (arc.from.x - arc.to.x) / 2.0;
        let hd_y = (arc.from.y - arc.to.y) / 2.0;
        let hs_x = (arc.from.x + arc.to.x) / 2.0;
        let hs_y = (arc.from.y + arc.to.y) / 2.0;

        // F6.5.1
        let p = point(
            cos_phi * hd_x + sin_phi * hd_y,
            -sin_phi * hd_x + cos_phi * hd_y,
        );

        // F6.6: if the radii cannot span the endpoints, scale them up
        // uniformly to the smallest feasible ellipse.
        let lambda = (p.x / rx) * (p.x / rx) + (p.y / ry) * (p.y / ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;

        debug_assert_ne!(sum_of_sq, 0.0);

        // F6.5.2
        let sign_coe = if arc.flags.large_arc == arc.flags.sweep {
            -1.0
        } else {
            1.0
        };
        let coe = sign_coe * ((rxry * rxry - sum_of_sq) / sum_of_sq).abs().sqrt();
        let transformed_cx = coe * rxpy / ry;
        let transformed_cy = -coe * rypx / rx;

        // F6.5.3
        let center = point(
            cos_phi * transformed_cx - sin_phi * transformed_cy + hs_x,
            sin_phi * transformed_cx + cos_phi * transformed_cy + hs_y,
        );

        // F6.5.5 / F6.5.6: angles of the start and end vectors on the
        // unit circle.
        let a = vector((p.x - transformed_cx) / rx, (p.y - transformed_cy) / ry);
        let b = vector((-p.x - transformed_cx) / rx, (-p.y - transformed_cy) / ry);

        let start_angle = a.y.atan2(a.x);
        let mut sweep_angle = (b.y.atan2(b.x) - start_angle) % (2.0 * PI);

        if arc.flags.sweep && sweep_angle < 0.0 {
            sweep_angle += 2.0 * PI;
        } else if !arc.flags.sweep && sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        }

        Arc {
            center,
            radii: vector(rx, ry),
            start_angle: Angle::radians(start_angle),
            sweep_angle: Angle::radians(sweep_angle),
            x_rotation: arc.x_rotation,
        }
    }

    /// Sample the arc at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let angle = Angle::radians(self.start_angle.get() + self.sweep_angle.get() * t);
        self.center + sample_ellipse(self.radii, self.x_rotation, angle).to_vector()
    }

    /// Tangent vector (non normalized) at t.
    pub fn sample_tangent(&self, t: f64) -> Vector {
        let angle = self.start_angle.get() + self.sweep_angle.get() * t;
        Rotation::new(self.x_rotation).transform_vector(vector(
            -self.radii.x * angle.sin(),
            self.radii.y * angle.cos(),
        ))
    }

    /// Approximate the arc with a sequence of cubic bézier segments, one
    /// per angular slice of at most 90 degrees.
    pub fn for_each_cubic_bezier<F: FnMut(&CubicBezierSegment)>(&self, callback: &mut F) {
        for curve in &self.to_cubic_beziers() {
            callback(curve);
        }
    }

    /// The cubic bézier approximation of the arc.
    ///
    /// A full turn splits into four quarter-turn slices, so the result
    /// always fits the inline capacity.
    pub fn to_cubic_beziers(&self) -> ArrayVec<CubicBezierSegment, 8> {
        let mut curves = ArrayVec::new();

        let sweep = self.sweep_angle.get();
        let num_segments = (sweep.abs() / (PI / 2.0)).ceil().max(1.0);
        let n = num_segments as u32;
        let step = sweep / num_segments;

        // Tangent scale for a cubic approximation of an elliptic slice.
        let k = (4.0 / 3.0) * (step / 4.0).tan();

        for i in 0..n {
            let t0 = i as f64 / num_segments;
            let t1 = (i + 1) as f64 / num_segments;

            let from = self.sample(t0);
            let to = self.sample(t1);
            // sample_tangent is the derivative with respect to the ellipse
            // angle, which is what `k` is calibrated against.
            let ctrl1 = from + self.sample_tangent(t0) * k;
            let ctrl2 = to - self.sample_tangent(t1) * k;

            curves.push(CubicBezierSegment {
                from,
                ctrl1,
                ctrl2,
                to,
            });
        }

        curves
    }
}

fn sample_ellipse(radii: Vector, x_rotation: Angle, angle: Angle) -> Point {
    Rotation::new(x_rotation).transform_point(point(
        radii.x * angle.get().cos(),
        radii.y * angle.get().sin(),
    ))
}
