//! Non-zero winding scanline rasterization over closed contours.
//!
//! All contours of a shape share one edge table; winding accumulates
//! across them, which is what makes the non-zero rule handle
//! self-overlapping strokes and multi-contour shapes without explicit
//! hole bookkeeping.

use crate::geom::{point, Box2D, LineSegment, Point, COINCIDENCE_EPSILON};
use crate::path::{FillRule, SubPath};

/// One non-horizontal edge of a contour, normalized so `y1 < y2`.
///
/// `x1` is the x coordinate at `y1` and `x2` the one at `y2`;
/// `direction` is `-1` when the original edge pointed downward
/// (towards increasing y) and `1` otherwise.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub direction: i32,
}

/// An edge crossing a scanline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Crossing {
    pub x: f64,
    pub direction: i32,
}

/// The edge table of one or more closed contours.
///
/// Built per render call and discarded afterwards.
#[derive(Clone, Debug, Default)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    min: Point,
    max: Point,
}

impl EdgeTable {
    /// Build the table from the given contours.
    ///
    /// Sub-paths are treated as closed polygons (the closing edge is
    /// implied when absent). Sub-paths with fewer than 3 points have no
    /// interior and are skipped. Horizontal edges never cross a
    /// scanline at a single y and are filtered out.
    pub fn build(sub_paths: &[SubPath]) -> Self {
        let mut table = EdgeTable {
            edges: Vec::new(),
            min: point(f64::MAX, f64::MAX),
            max: point(f64::MIN, f64::MIN),
        };

        for sub_path in sub_paths {
            if sub_path.points.len() < 3 {
                continue;
            }

            for p in &sub_path.points {
                table.min.x = table.min.x.min(p.x);
                table.min.y = table.min.y.min(p.y);
                table.max.x = table.max.x.max(p.x);
                table.max.y = table.max.y.max(p.y);
            }

            let points = &sub_path.points;
            for i in 0..points.len() {
                let from = points[i];
                let to = points[(i + 1) % points.len()];
                table.push_edge(from, to);
            }
        }

        table
    }

    fn push_edge(&mut self, from: Point, to: Point) {
        if from.y == to.y {
            return;
        }

        let edge = if from.y < to.y {
            // The original edge points downward.
            Edge {
                x1: from.x,
                y1: from.y,
                x2: to.x,
                y2: to.y,
                direction: -1,
            }
        } else {
            Edge {
                x1: to.x,
                y1: to.y,
                x2: from.x,
                y2: from.y,
                direction: 1,
            }
        };

        self.edges.push(edge);
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The bounding box of the contours the table was built from.
    pub fn bounding_box(&self) -> Box2D {
        if self.is_empty() {
            return Box2D::zero();
        }

        Box2D {
            min: self.min,
            max: self.max,
        }
    }

    /// All crossings of the horizontal scanline at `y`, sorted by x.
    ///
    /// Each crossing interpolates the edge linearly; the `y1 <= y < y2`
    /// range is half-open so a vertex shared by two chained edges is
    /// counted exactly once.
    pub fn crossings_at(&self, y: f64) -> Vec<Crossing> {
        let mut crossings = Vec::new();

        for edge in &self.edges {
            if y < edge.y1 || y >= edge.y2 {
                continue;
            }

            let t = (y - edge.y1) / (edge.y2 - edge.y1);
            crossings.push(Crossing {
                x: edge.x1 + t * (edge.x2 - edge.x1),
                direction: edge.direction,
            });
        }

        crossings.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());

        crossings
    }

    /// The interior spans of the scanline at `y` under `fill_rule`,
    /// as `(x_start, x_end)` pairs.
    pub fn spans_at(&self, y: f64, fill_rule: FillRule) -> Vec<(f64, f64)> {
        let crossings = self.crossings_at(y);
        let mut spans = Vec::new();

        let mut winding = 0;
        let mut span_start = None;
        for crossing in &crossings {
            let was_in = fill_rule.is_in(winding);
            winding += crossing.direction;
            let is_in = fill_rule.is_in(winding);

            match (was_in, is_in) {
                (false, true) => span_start = Some(crossing.x),
                (true, false) => {
                    if let Some(start) = span_start.take() {
                        if crossing.x > start {
                            spans.push((start, crossing.x));
                        }
                    }
                }
                _ => {}
            }
        }

        spans
    }

    /// The winding number of `p`: the accumulated direction of all
    /// crossings left of it on its scanline.
    pub fn winding_at(&self, p: Point) -> i32 {
        let mut winding = 0;

        for edge in &self.edges {
            if p.y < edge.y1 || p.y >= edge.y2 {
                continue;
            }

            let t = (p.y - edge.y1) / (edge.y2 - edge.y1);
            let x = edge.x1 + t * (edge.x2 - edge.x1);
            if x <= p.x {
                winding += edge.direction;
            }
        }

        winding
    }

    /// Whether `p` is inside the shape under `fill_rule`.
    pub fn hit_test(&self, p: Point, fill_rule: FillRule) -> bool {
        fill_rule.is_in(self.winding_at(p))
    }
}

/// The boundary segments of the given contours, closing edge included,
/// degenerate segments skipped.
///
/// Unlike the edge table this keeps horizontal segments: they do not
/// affect winding but they do bound the shape, and the distance-based
/// coverage engine needs them.
pub fn contour_segments(sub_paths: &[SubPath]) -> Vec<LineSegment> {
    let mut segments = Vec::new();

    for sub_path in sub_paths {
        if sub_path.points.len() < 3 {
            continue;
        }

        let points = &sub_path.points;
        for i in 0..points.len() {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> SubPath {
        SubPath {
            points: vec![
                point(x0, y0),
                point(x1, y0),
                point(x1, y1),
                point(x0, y1),
            ],
            closed: true,
        }
    }

    fn reversed(sub_path: &SubPath) -> SubPath {
        let mut points = sub_path.points.clone();
        points.reverse();
        SubPath {
            points,
            closed: sub_path.closed,
        }
    }

    #[test]
    fn horizontal_edges_are_filtered() {
        let table = EdgeTable::build(&[square(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(table.edges().len(), 2);
        for edge in table.edges() {
            assert!(edge.y1 < edge.y2);
        }
    }

    #[test]
    fn spans_of_a_square() {
        let table = EdgeTable::build(&[square(2.0, 0.0, 8.0, 10.0)]);

        let spans = table.spans_at(5.0, FillRule::NonZero);
        assert_eq!(spans, vec![(2.0, 8.0)]);

        assert!(table.spans_at(-1.0, FillRule::NonZero).is_empty());
        assert!(table.spans_at(10.5, FillRule::NonZero).is_empty());
    }

    #[test]
    fn orientation_does_not_change_the_fill() {
        let cw = square(0.0, 0.0, 10.0, 10.0);
        let ccw = reversed(&cw);

        let table_cw = EdgeTable::build(&[cw]);
        let table_ccw = EdgeTable::build(&[ccw]);

        for y in 0..10 {
            let y = y as f64 + 0.5;
            assert_eq!(
                table_cw.spans_at(y, FillRule::NonZero),
                table_ccw.spans_at(y, FillRule::NonZero),
            );
        }
    }

    #[test]
    fn self_overlap_fills_once_under_non_zero() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = a.clone();
        let table = EdgeTable::build(&[a, b]);

        // The winding number doubles but the spans do not toggle off.
        assert_eq!(table.winding_at(point(5.0, 5.0)).abs(), 2);
        assert_eq!(table.spans_at(5.0, FillRule::NonZero), vec![(0.0, 10.0)]);

        // Under even-odd the same shape cancels itself out.
        assert!(table.spans_at(5.0, FillRule::EvenOdd).is_empty());
    }

    #[test]
    fn hole_via_winding() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let inner = reversed(&square(3.0, 3.0, 7.0, 7.0));
        let table = EdgeTable::build(&[outer, inner]);

        assert!(table.hit_test(point(1.0, 5.0), FillRule::NonZero));
        assert!(!table.hit_test(point(5.0, 5.0), FillRule::NonZero));
        assert!(!table.hit_test(point(11.0, 5.0), FillRule::NonZero));

        let spans = table.spans_at(5.0, FillRule::NonZero);
        assert_eq!(spans, vec![(0.0, 3.0), (7.0, 10.0)]);
    }

    #[test]
    fn shared_vertices_count_once() {
        // A diamond: the scanline through the left/right vertices must
        // report a consistent winding, not a doubled one.
        let diamond = SubPath {
            points: vec![
                point(5.0, 0.0),
                point(10.0, 5.0),
                point(5.0, 10.0),
                point(0.0, 5.0),
            ],
            closed: true,
        };
        let table = EdgeTable::build(&[diamond]);

        assert!(table.hit_test(point(5.0, 5.0), FillRule::NonZero));
        let spans = table.spans_at(5.0, FillRule::NonZero);
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn degenerate_sub_paths_are_skipped() {
        let table = EdgeTable::build(&[
            SubPath {
                points: vec![point(0.0, 0.0), point(10.0, 10.0)],
                closed: false,
            },
            SubPath {
                points: vec![],
                closed: false,
            },
        ]);

        assert!(table.is_empty());
        assert!(contour_segments(&[SubPath {
            points: vec![point(0.0, 0.0), point(10.0, 10.0)],
            closed: false,
        }])
        .is_empty());
    }

    #[test]
    fn contour_segments_keep_horizontals() {
        let segments = contour_segments(&[square(0.0, 0.0, 10.0, 10.0)]);
        assert_eq!(segments.len(), 4);
    }
}
