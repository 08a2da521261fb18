use crate::command::{PathCommand, Position};
use crate::geom::{
    point, vector, Angle, ArcFlags, CubicBezierSegment, Point, QuadraticBezierSegment, SvgArc,
    COINCIDENCE_EPSILON,
};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// One move-to-delimited portion of a flattened path.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SubPath {
    pub points: Vec<Point>,
    /// Whether the sub-path was explicitly closed with a close command.
    pub closed: bool,
}

/// Interpreter state threaded through one flattening pass.
///
/// Holds the cursor, the first point of the current sub-path and the
/// control points needed to resolve smooth curve commands. Owned by a
/// single pass and discarded at the end of it.
pub struct PathContext {
    tolerance: f64,
    current: Point,
    first: Point,
    prev_cubic_ctrl: Option<Point>,
    prev_quadratic_ctrl: Option<Point>,
    sub_paths: Vec<SubPath>,
    points: Vec<Point>,
    closed: bool,
    in_sub_path: bool,
}

impl PathContext {
    pub fn new(tolerance: f64) -> Self {
        debug_assert!(tolerance > 0.0);
        PathContext {
            tolerance,
            current: point(0.0, 0.0),
            first: point(0.0, 0.0),
            prev_cubic_ctrl: None,
            prev_quadratic_ctrl: None,
            sub_paths: Vec::new(),
            points: Vec::new(),
            closed: false,
            in_sub_path: false,
        }
    }

    /// Interpret one command, appending to the current sub-path.
    pub fn execute(&mut self, command: &PathCommand) {
        match *command {
            PathCommand::MoveTo { x, y, position } => {
                let to = self.resolve(x, y, position);
                self.end_sub_path();
                self.points.push(to);
                self.first = to;
                self.current = to;
                self.in_sub_path = true;
            }
            PathCommand::LineTo { x, y, position } => {
                let to = self.resolve(x, y, position);
                self.line_to(to);
            }
            PathCommand::HorizontalLineTo { x, position } => {
                let x = if position.is_relative() {
                    self.current.x + x
                } else {
                    x
                };
                let to = point(x, self.current.y);
                self.line_to(to);
            }
            PathCommand::VerticalLineTo { y, position } => {
                let y = if position.is_relative() {
                    self.current.y + y
                } else {
                    y
                };
                let to = point(self.current.x, y);
                self.line_to(to);
            }
            PathCommand::CubicCurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
                position,
            } => {
                let ctrl1 = self.resolve(x1, y1, position);
                let ctrl2 = self.resolve(x2, y2, position);
                let to = self.resolve(x, y, position);
                self.cubic_to(ctrl1, ctrl2, to);
            }
            PathCommand::SmoothCubicCurveTo { x2, y2, x, y, position } => {
                let ctrl1 = self.smooth_ctrl(self.prev_cubic_ctrl);
                let ctrl2 = self.resolve(x2, y2, position);
                let to = self.resolve(x, y, position);
                self.cubic_to(ctrl1, ctrl2, to);
            }
            PathCommand::QuadraticCurveTo { x1, y1, x, y, position } => {
                let ctrl = self.resolve(x1, y1, position);
                let to = self.resolve(x, y, position);
                self.quadratic_to(ctrl, to);
            }
            PathCommand::SmoothQuadraticCurveTo { x, y, position } => {
                let ctrl = self.smooth_ctrl(self.prev_quadratic_ctrl);
                let to = self.resolve(x, y, position);
                self.quadratic_to(ctrl, to);
            }
            PathCommand::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                x,
                y,
                position,
            } => {
                let to = self.resolve(x, y, position);
                let arc = SvgArc {
                    from: self.current,
                    to,
                    radii: vector(rx, ry),
                    x_rotation: Angle::degrees(x_rotation),
                    flags: ArcFlags { large_arc, sweep },
                };

                if arc.is_straight_line() {
                    self.line_to(to);
                } else {
                    let tolerance = self.tolerance;
                    let mut points = std::mem::take(&mut self.points);
                    let before = points.len();
                    arc.to_arc().for_each_cubic_bezier(&mut |curve| {
                        curve.for_each_flattened(tolerance, &mut |p| points.push(p));
                    });
                    if points.len() == before {
                        points.push(to);
                    } else {
                        // Snap the conversion's rounding back onto the
                        // declared endpoint.
                        *points.last_mut().unwrap() = to;
                    }
                    self.points = points;
                    self.current = to;
                    self.prev_cubic_ctrl = None;
                    self.prev_quadratic_ctrl = None;
                }
            }
            PathCommand::ClosePath => {
                if (self.current - self.first).length() > COINCIDENCE_EPSILON {
                    self.points.push(self.first);
                }
                self.closed = true;
                self.current = self.first;
                self.prev_cubic_ctrl = None;
                self.prev_quadratic_ctrl = None;
                self.end_sub_path();
            }
        }
    }

    /// Finish the pass and return the flattened sub-paths.
    pub fn build(mut self) -> Vec<SubPath> {
        self.end_sub_path();
        self.sub_paths
    }

    fn resolve(&self, x: f64, y: f64, position: Position) -> Point {
        if position.is_relative() {
            self.current + vector(x, y)
        } else {
            point(x, y)
        }
    }

    fn smooth_ctrl(&self, prev_ctrl: Option<Point>) -> Point {
        // The reflection of the previous control point through the
        // current position; without a preceding matching curve the
        // control point collapses onto the cursor.
        if let Some(prev_ctrl) = prev_ctrl {
            self.current + (self.current - prev_ctrl)
        } else {
            self.current
        }
    }

    fn line_to(&mut self, to: Point) {
        self.points.push(to);
        self.current = to;
        self.prev_cubic_ctrl = None;
        self.prev_quadratic_ctrl = None;
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        let curve = CubicBezierSegment {
            from: self.current,
            ctrl1,
            ctrl2,
            to,
        };
        let mut points = std::mem::take(&mut self.points);
        curve.for_each_flattened(self.tolerance, &mut |p| points.push(p));
        self.points = points;
        self.current = to;
        self.prev_cubic_ctrl = Some(ctrl2);
        self.prev_quadratic_ctrl = None;
    }

    fn quadratic_to(&mut self, ctrl: Point, to: Point) {
        let curve = QuadraticBezierSegment {
            from: self.current,
            ctrl,
            to,
        };
        let mut points = std::mem::take(&mut self.points);
        curve.for_each_flattened(self.tolerance, &mut |p| points.push(p));
        self.points = points;
        self.current = to;
        self.prev_quadratic_ctrl = Some(ctrl);
        self.prev_cubic_ctrl = None;
    }

    fn end_sub_path(&mut self) {
        if self.in_sub_path && !self.points.is_empty() {
            self.sub_paths.push(SubPath {
                points: std::mem::take(&mut self.points),
                closed: self.closed,
            });
        } else {
            self.points.clear();
        }
        self.closed = false;
        self.in_sub_path = false;
    }
}

/// Flatten a command sequence into one polyline per sub-path.
pub fn flatten(commands: &[PathCommand], tolerance: f64) -> Vec<SubPath> {
    let mut ctx = PathContext::new(tolerance);
    for command in commands {
        ctx.execute(command);
    }

    ctx.build()
}

/// Flatten a command sequence into a single continuous polyline.
pub fn flatten_single(commands: &[PathCommand], tolerance: f64) -> Vec<Point> {
    let mut points = Vec::new();
    for sub_path in flatten(commands, tolerance) {
        points.extend(sub_path.points);
    }

    points
}

/// Report, for each sub-path in order, whether it is explicitly closed.
pub fn close_flags(commands: &[PathCommand]) -> Vec<bool> {
    let mut flags = Vec::new();
    for command in commands {
        match command {
            PathCommand::MoveTo { .. } => flags.push(false),
            PathCommand::ClosePath => {
                if let Some(last) = flags.last_mut() {
                    *last = true;
                }
            }
            _ => {}
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn lines() {
        let commands = parse("M 0 0 L 10 0 l 0 10 H 0 V 0").unwrap();
        let sub_paths = flatten(&commands, 0.1);

        assert_eq!(sub_paths.len(), 1);
        assert!(!sub_paths[0].closed);
        assert_eq!(
            sub_paths[0].points,
            vec![
                point(0.0, 0.0),
                point(10.0, 0.0),
                point(10.0, 10.0),
                point(0.0, 10.0),
                point(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn close_appends_start_only_on_drift() {
        let drifted = parse("M 0 0 L 10 0 L 10 10 Z").unwrap();
        let sub_paths = flatten(&drifted, 0.1);
        assert_eq!(sub_paths[0].points.len(), 4);
        assert_eq!(*sub_paths[0].points.last().unwrap(), point(0.0, 0.0));
        assert!(sub_paths[0].closed);

        let back_at_start = parse("M 0 0 L 10 0 L 10 10 L 0 0 Z").unwrap();
        let sub_paths = flatten(&back_at_start, 0.1);
        // No duplicate coincident point.
        assert_eq!(sub_paths[0].points.len(), 4);
    }

    #[test]
    fn multiple_sub_paths() {
        let commands = parse("M 0 0 L 1 0 Z M 5 5 L 6 5 L 6 6").unwrap();
        let sub_paths = flatten(&commands, 0.1);

        assert_eq!(sub_paths.len(), 2);
        assert!(sub_paths[0].closed);
        assert!(!sub_paths[1].closed);
        assert_eq!(close_flags(&commands), vec![true, false]);
    }

    #[test]
    fn curve_endpoints_are_exact() {
        let commands = parse("M 10 10 C 20 0 40 0 50 10 Q 60 20 70 10").unwrap();
        let points = flatten_single(&commands, 0.01);

        assert_eq!(points[0], point(10.0, 10.0));
        assert!(points.contains(&point(50.0, 10.0)));
        assert_eq!(*points.last().unwrap(), point(70.0, 10.0));
    }

    #[test]
    fn smooth_cubic_reflects_control() {
        // S after C reflects the previous second control point; the
        // resulting pair of curves is C1 continuous at the junction, so
        // the polyline has no corner there.
        let commands = parse("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0").unwrap();
        let points = flatten_single(&commands, 0.001);
        assert_eq!(*points.last().unwrap(), point(20.0, 0.0));

        // Without a preceding cubic, the first control point of S
        // collapses onto the cursor: the curve starts tangent to the
        // chord direction of its own control polygon.
        let lone = parse("M 0 0 S 10 10 20 0").unwrap();
        let lone_points = flatten_single(&lone, 0.001);
        assert_eq!(lone_points[0], point(0.0, 0.0));
        assert_eq!(*lone_points.last().unwrap(), point(20.0, 0.0));
    }

    #[test]
    fn smooth_reflection_resets_after_line() {
        // A line between two T commands resets the reflected control
        // point, so the second T degrades to a straight segment.
        let commands = parse("M 0 0 Q 5 10 10 0 L 20 0 T 30 0").unwrap();
        let sub_paths = flatten(&commands, 0.001);
        let points = &sub_paths[0].points;

        // Every point of the trailing T span lies on y = 0.
        let tail: Vec<_> = points
            .iter()
            .filter(|p| p.x >= 20.0 - 1e-9)
            .collect();
        assert!(tail.len() >= 2);
        for p in tail {
            assert!(p.y.abs() < 1e-9);
        }
    }

    #[test]
    fn arc_flattens_to_endpoint() {
        let commands = parse("M 0 0 A 5 5 0 0 1 10 0").unwrap();
        let points = flatten_single(&commands, 0.01);

        assert_eq!(points[0], point(0.0, 0.0));
        assert_eq!(*points.last().unwrap(), point(10.0, 0.0));
        assert!(points.len() > 3);
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        let commands = parse("M 0 0 A 0 5 0 0 1 10 4").unwrap();
        let points = flatten_single(&commands, 0.01);

        assert_eq!(points, vec![point(0.0, 0.0), point(10.0, 4.0)]);
    }

    #[test]
    fn relative_commands_track_the_cursor() {
        let commands = parse("m 1 1 l 2 0 v 2 h -2 z").unwrap();
        let sub_paths = flatten(&commands, 0.1);

        assert_eq!(
            sub_paths[0].points,
            vec![
                point(1.0, 1.0),
                point(3.0, 1.0),
                point(3.0, 3.0),
                point(1.0, 3.0),
                point(1.0, 1.0),
            ]
        );
    }
}
