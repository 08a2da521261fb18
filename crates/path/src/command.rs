use std::fmt;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Whether a command's coordinates are absolute or relative to the
/// current position.
///
/// In path data, an upper-case command letter selects absolute
/// coordinates, a lower-case one relative coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Position {
    Absolute,
    Relative,
}

impl Position {
    #[inline]
    pub fn is_relative(self) -> bool {
        self == Position::Relative
    }
}

/// One command of a path, carrying its raw numeric parameters.
///
/// Commands are produced by the parser and immutable from then on;
/// relative coordinates are only resolved against the cursor when the
/// path is flattened.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathCommand {
    /// `M`/`m`: start a new sub-path.
    MoveTo { x: f64, y: f64, position: Position },
    /// `L`/`l`: straight line to a point.
    LineTo { x: f64, y: f64, position: Position },
    /// `H`/`h`: horizontal line, keeping the current y.
    HorizontalLineTo { x: f64, position: Position },
    /// `V`/`v`: vertical line, keeping the current x.
    VerticalLineTo { y: f64, position: Position },
    /// `C`/`c`: cubic bézier curve with two control points.
    CubicCurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
        position: Position,
    },
    /// `S`/`s`: cubic curve whose first control point is the reflection
    /// of the previous cubic's second control point.
    SmoothCubicCurveTo {
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
        position: Position,
    },
    /// `Q`/`q`: quadratic bézier curve with one control point.
    QuadraticCurveTo {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
        position: Position,
    },
    /// `T`/`t`: quadratic curve whose control point is the reflection of
    /// the previous quadratic's control point.
    SmoothQuadraticCurveTo { x: f64, y: f64, position: Position },
    /// `A`/`a`: elliptic arc in endpoint parameterization.
    ArcTo {
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
        position: Position,
    },
    /// `Z`/`z`: close the current sub-path.
    ClosePath,
}

impl PathCommand {
    /// The command letter, in the case matching the coordinate mode.
    pub fn letter(&self) -> char {
        fn select(upper: char, lower: char, position: Position) -> char {
            if position.is_relative() {
                lower
            } else {
                upper
            }
        }

        match *self {
            PathCommand::MoveTo { position, .. } => select('M', 'm', position),
            PathCommand::LineTo { position, .. } => select('L', 'l', position),
            PathCommand::HorizontalLineTo { position, .. } => select('H', 'h', position),
            PathCommand::VerticalLineTo { position, .. } => select('V', 'v', position),
            PathCommand::CubicCurveTo { position, .. } => select('C', 'c', position),
            PathCommand::SmoothCubicCurveTo { position, .. } => select('S', 's', position),
            PathCommand::QuadraticCurveTo { position, .. } => select('Q', 'q', position),
            PathCommand::SmoothQuadraticCurveTo { position, .. } => select('T', 't', position),
            PathCommand::ArcTo { position, .. } => select('A', 'a', position),
            PathCommand::ClosePath => 'Z',
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        match *self {
            PathCommand::MoveTo { x, y, .. }
            | PathCommand::LineTo { x, y, .. }
            | PathCommand::SmoothQuadraticCurveTo { x, y, .. } => write!(f, " {} {}", x, y),
            PathCommand::HorizontalLineTo { x, .. } => write!(f, " {}", x),
            PathCommand::VerticalLineTo { y, .. } => write!(f, " {}", y),
            PathCommand::CubicCurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
                ..
            } => write!(f, " {} {} {} {} {} {}", x1, y1, x2, y2, x, y),
            PathCommand::SmoothCubicCurveTo { x2, y2, x, y, .. } => {
                write!(f, " {} {} {} {}", x2, y2, x, y)
            }
            PathCommand::QuadraticCurveTo { x1, y1, x, y, .. } => {
                write!(f, " {} {} {} {}", x1, y1, x, y)
            }
            PathCommand::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                x,
                y,
                ..
            } => write!(
                f,
                " {} {} {} {} {} {} {}",
                rx,
                ry,
                x_rotation,
                large_arc as u8,
                sweep as u8,
                x,
                y
            ),
            PathCommand::ClosePath => Ok(()),
        }
    }
}

/// Serialize a command sequence back to path data.
///
/// The output parses back to the same sequence.
pub fn write_svg_path(commands: &[PathCommand]) -> String {
    let mut out = String::new();
    for (i, command) in commands.iter().enumerate() {
        if i != 0 {
            out.push(' ');
        }
        use std::fmt::Write;
        write!(out, "{}", command).unwrap();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let cmd = PathCommand::MoveTo {
            x: 10.0,
            y: 10.5,
            position: Position::Absolute,
        };
        assert_eq!(cmd.to_string(), "M 10 10.5");

        let cmd = PathCommand::ArcTo {
            rx: 5.0,
            ry: 5.0,
            x_rotation: 0.0,
            large_arc: true,
            sweep: false,
            x: 1.0,
            y: 2.0,
            position: Position::Relative,
        };
        assert_eq!(cmd.to_string(), "a 5 5 0 1 0 1 2");
    }

    #[test]
    fn write_sequence() {
        let commands = [
            PathCommand::MoveTo {
                x: 0.0,
                y: 0.0,
                position: Position::Absolute,
            },
            PathCommand::LineTo {
                x: 1.0,
                y: 0.0,
                position: Position::Absolute,
            },
            PathCommand::ClosePath,
        ];

        assert_eq!(write_svg_path(&commands), "M 0 0 L 1 0 Z");
    }
}
