use crate::{point, Box2D, Point, Vector, COINCIDENCE_EPSILON};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// A line segment going from `from` to `to`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f64) -> Point {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.to_vector().length()
    }

    #[inline]
    pub fn square_length(&self) -> f64 {
        self.to_vector().square_length()
    }

    /// Whether the endpoints are closer than the coincidence epsilon.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.square_length() <= COINCIDENCE_EPSILON * COINCIDENCE_EPSILON
    }

    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// The line this segment is on.
    #[inline]
    pub fn to_line(&self) -> Line {
        Line {
            point: self.from,
            vector: self.to_vector(),
        }
    }

    pub fn bounding_box(&self) -> Box2D {
        Box2D {
            min: point(self.from.x.min(self.to.x), self.from.y.min(self.to.y)),
            max: point(self.from.x.max(self.to.x), self.from.y.max(self.to.y)),
        }
    }

    /// Parameter of the intersection with the horizontal line at `y`, if any.
    ///
    /// The range is half-open (`from.y <= y < to.y` or the reverse) so
    /// that an endpoint shared by two consecutive edges is only counted
    /// once when accumulating winding along a scanline.
    pub fn horizontal_line_intersection_t(&self, y: f64) -> Option<f64> {
        let y0 = self.from.y;
        let y1 = self.to.y;

        if y0 == y1 {
            return None;
        }

        let min = y0.min(y1);
        let max = y0.max(y1);
        if y < min || y >= max {
            return None;
        }

        Some((y - y0) / (y1 - y0))
    }

    /// Distance from `p` to the closest position on this segment.
    pub fn distance_to_point(&self, p: Point) -> f64 {
        self.square_distance_to_point(p).sqrt()
    }

    pub fn square_distance_to_point(&self, p: Point) -> f64 {
        (self.closest_point(p) - p).square_length()
    }

    /// The position on the segment (not the supporting line) closest to `p`.
    pub fn closest_point(&self, p: Point) -> Point {
        let v = self.to_vector();
        let l2 = v.square_length();
        if l2 <= COINCIDENCE_EPSILON * COINCIDENCE_EPSILON {
            return self.from;
        }

        let t = ((p - self.from).dot(v) / l2).max(0.0).min(1.0);

        self.sample(t)
    }
}

/// An infinite line defined by a point and a direction vector.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Line {
    pub point: Point,
    pub vector: Vector,
}

impl Line {
    /// The intersection of two lines, or `None` if they are (close to) parallel.
    pub fn intersection(&self, other: &Self) -> Option<Point> {
        let det = self.vector.cross(other.vector);
        if det.abs() <= f64::EPSILON {
            return None;
        }

        let t = (other.point - self.point).cross(other.vector) / det;

        Some(self.point + self.vector * t)
    }
}
