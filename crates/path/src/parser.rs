use crate::command::{PathCommand, Position};

use thiserror::Error;

/// Errors produced while parsing path data.
///
/// Parsing is all-or-nothing: the first error aborts the parse and no
/// partial command sequence is returned. Running out of input in the
/// middle of a command's parameter list surfaces as a `Number` (or
/// `Flag`) error at the position where the parameter was expected.
#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line} Column {column}: Expected number, got {src:?}.")]
    Number { src: String, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Expected flag (0/1), got {src:?}.")]
    Flag { src: char, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Invalid command {command:?}.")]
    Command {
        command: char,
        line: i32,
        column: i32,
    },
    #[error("Line {line} Column {column}: Expected move-to command, got {command:?}.")]
    MissingMoveTo {
        command: char,
        line: i32,
        column: i32,
    },
}

/// Parse path data into a command sequence.
///
/// Commands keep their raw parameters and their absolute/relative flag;
/// nothing is resolved against a cursor here (that happens when the
/// path is flattened).
pub fn parse(src: &str) -> Result<Vec<PathCommand>, ParseError> {
    let mut commands = Vec::new();
    let mut parser = PathParser::new();
    parser.parse(&mut Source::new(src.chars()), &mut commands)?;

    Ok(commands)
}

// A buffered iterator of characters keeping track of line and column.
struct Source<Iter> {
    src: Iter,
    current: char,
    line: i32,
    col: i32,
    finished: bool,
}

impl<Iter: Iterator<Item = char>> Source<Iter> {
    fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter();

        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };

        let line = if current == '\n' { 1 } else { 0 };

        Source {
            current,
            finished,
            src,
            line,
            col: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.finished && (self.current.is_whitespace() || self.current == ',') {
            self.advance_one();
        }
    }

    fn advance_one(&mut self) {
        if self.finished {
            return;
        }
        match self.src.next() {
            Some('\n') => {
                self.current = '\n';
                self.line += 1;
                self.col = -1;
            }
            Some(c) => {
                self.current = c;
                self.col += 1;
            }
            None => {
                self.current = '~';
                self.finished = true;
            }
        }
    }
}

#[derive(Default)]
struct PathParser {
    float_buffer: String,
}

impl PathParser {
    fn new() -> Self {
        Self::default()
    }

    fn parse(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
        output: &mut Vec<PathCommand>,
    ) -> Result<(), ParseError> {
        let mut need_start = true;
        let mut implicit_cmd = 'M';

        src.skip_whitespace();

        while !src.finished {
            let mut cmd = src.current;
            let cmd_line = src.line;
            let cmd_col = src.col;

            if cmd.is_ascii_alphabetic() {
                src.advance_one();
            } else {
                // A parameter with no leading letter repeats the previous
                // command (a bare pair after a move-to is a line-to).
                cmd = implicit_cmd;
            }

            // Only the very first command and commands right after a close
            // are required to be move-tos.
            if need_start && cmd != 'm' && cmd != 'M' {
                return Err(ParseError::MissingMoveTo {
                    command: cmd,
                    line: cmd_line,
                    column: cmd_col,
                });
            }

            let position = if cmd.is_lowercase() {
                Position::Relative
            } else {
                Position::Absolute
            };

            match cmd {
                'm' | 'M' => {
                    let (x, y) = self.parse_pair(src)?;
                    output.push(PathCommand::MoveTo { x, y, position });
                    need_start = false;
                }
                'l' | 'L' => {
                    let (x, y) = self.parse_pair(src)?;
                    output.push(PathCommand::LineTo { x, y, position });
                }
                'h' | 'H' => {
                    let x = self.parse_number(src)?;
                    output.push(PathCommand::HorizontalLineTo { x, position });
                }
                'v' | 'V' => {
                    let y = self.parse_number(src)?;
                    output.push(PathCommand::VerticalLineTo { y, position });
                }
                'c' | 'C' => {
                    let (x1, y1) = self.parse_pair(src)?;
                    let (x2, y2) = self.parse_pair(src)?;
                    let (x, y) = self.parse_pair(src)?;
                    output.push(PathCommand::CubicCurveTo {
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                        position,
                    });
                }
                's' | 'S' => {
                    let (x2, y2) = self.parse_pair(src)?;
                    let (x, y) = self.parse_pair(src)?;
                    output.push(PathCommand::SmoothCubicCurveTo { x2, y2, x, y, position });
                }
                'q' | 'Q' => {
                    let (x1, y1) = self.parse_pair(src)?;
                    let (x, y) = self.parse_pair(src)?;
                    output.push(PathCommand::QuadraticCurveTo { x1, y1, x, y, position });
                }
                't' | 'T' => {
                    let (x, y) = self.parse_pair(src)?;
                    output.push(PathCommand::SmoothQuadraticCurveTo { x, y, position });
                }
                'a' | 'A' => {
                    let rx = self.parse_number(src)?;
                    let ry = self.parse_number(src)?;
                    let x_rotation = self.parse_number(src)?;
                    let large_arc = self.parse_flag(src)?;
                    let sweep = self.parse_flag(src)?;
                    let (x, y) = self.parse_pair(src)?;
                    output.push(PathCommand::ArcTo {
                        rx,
                        ry,
                        x_rotation,
                        large_arc,
                        sweep,
                        x,
                        y,
                        position,
                    });
                }
                'z' | 'Z' => {
                    output.push(PathCommand::ClosePath);
                    need_start = true;
                }
                _ => {
                    return Err(ParseError::Command {
                        command: cmd,
                        line: cmd_line,
                        column: cmd_col,
                    });
                }
            }

            implicit_cmd = match cmd {
                'm' => 'l',
                'M' => 'L',
                'z' => 'm',
                'Z' => 'M',
                c => c,
            };

            src.skip_whitespace();
        }

        Ok(())
    }

    fn parse_pair(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<(f64, f64), ParseError> {
        let x = self.parse_number(src)?;
        let y = self.parse_number(src)?;

        Ok((x, y))
    }

    fn parse_number(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f64, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        let line = src.line;
        let column = src.col;

        if src.current == '-' {
            self.float_buffer.push('-');
            src.advance_one();
        }

        while src.current.is_ascii_digit() {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        if src.current == '.' {
            self.float_buffer.push('.');
            src.advance_one();

            while src.current.is_ascii_digit() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        if src.current == 'e' || src.current == 'E' {
            self.float_buffer.push(src.current);
            src.advance_one();

            if src.current == '-' {
                self.float_buffer.push('-');
                src.advance_one();
            }

            while src.current.is_ascii_digit() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        match self.float_buffer.parse::<f64>() {
            Ok(val) => Ok(val),
            Err(_) => Err(ParseError::Number {
                src: std::mem::take(&mut self.float_buffer),
                line,
                column,
            }),
        }
    }

    fn parse_flag(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<bool, ParseError> {
        src.skip_whitespace();
        match src.current {
            '1' => {
                src.advance_one();
                Ok(true)
            }
            '0' => {
                src.advance_one();
                Ok(false)
            }
            _ => Err(ParseError::Flag {
                src: src.current,
                line: src.line,
                column: src.col,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(parse(""), Ok(Vec::new()));
        assert_eq!(parse("  "), Ok(Vec::new()));
    }

    #[test]
    fn simple_path() {
        let commands = parse("M10,10 L20,20 C30,10 40,10 50,20 Z").unwrap();

        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo {
                    x: 10.0,
                    y: 10.0,
                    position: Position::Absolute,
                },
                PathCommand::LineTo {
                    x: 20.0,
                    y: 20.0,
                    position: Position::Absolute,
                },
                PathCommand::CubicCurveTo {
                    x1: 30.0,
                    y1: 10.0,
                    x2: 40.0,
                    y2: 10.0,
                    x: 50.0,
                    y: 20.0,
                    position: Position::Absolute,
                },
                PathCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn adjacent_signs() {
        // "-5-3" reads as two numbers.
        let commands = parse("M-5-3l-1-2").unwrap();

        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo {
                    x: -5.0,
                    y: -3.0,
                    position: Position::Absolute,
                },
                PathCommand::LineTo {
                    x: -1.0,
                    y: -2.0,
                    position: Position::Relative,
                },
            ]
        );
    }

    #[test]
    fn implicit_repetition() {
        let commands = parse("M 0 0 L 1 1 2 2 3 3").unwrap();
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[3],
            PathCommand::LineTo {
                x: 3.0,
                y: 3.0,
                position: Position::Absolute,
            }
        );
    }

    #[test]
    fn implicit_line_after_move() {
        // Per the path grammar a bare pair after a move-to is a line-to.
        let commands = parse("m 1 2 3 4").unwrap();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo {
                    x: 1.0,
                    y: 2.0,
                    position: Position::Relative,
                },
                PathCommand::LineTo {
                    x: 3.0,
                    y: 4.0,
                    position: Position::Relative,
                },
            ]
        );
    }

    #[test]
    fn dot_separated_numbers() {
        // Equivalent to "M 0.6 0.5".
        let commands = parse("M 0.6.5").unwrap();
        assert_eq!(
            commands,
            vec![PathCommand::MoveTo {
                x: 0.6,
                y: 0.5,
                position: Position::Absolute,
            }]
        );
    }

    #[test]
    fn scientific_notation() {
        parse("M 1e-2 -1E3").unwrap();
        parse("M 1e-9 0").unwrap();
        parse("M 1.e-9 1.4e-4z").unwrap();
        parse("M0 1.6e-9L0 1.4e-4").unwrap();
    }

    #[test]
    fn arc_flags() {
        let commands = parse("M 0 0 A 5 5 0 0110 10").unwrap();
        assert_eq!(
            commands[1],
            PathCommand::ArcTo {
                rx: 5.0,
                ry: 5.0,
                x_rotation: 0.0,
                large_arc: false,
                sweep: true,
                x: 10.0,
                y: 10.0,
                position: Position::Absolute,
            }
        );

        match parse("M 0 0 A 5 5 0 2 0 10 10") {
            Err(ParseError::Flag { src: '2', .. }) => {}
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn invalid_command() {
        match parse("M 0 0 x 1 1") {
            Err(ParseError::Command { command: 'x', .. }) => {}
            other => panic!("{:?}", other),
        }

        let err = parse("\n M 0 \n0 1 x 1 1 1").unwrap_err();
        assert_eq!(
            err,
            ParseError::Command {
                command: 'x',
                line: 2,
                column: 4,
            }
        );
    }

    #[test]
    fn bad_numbers() {
        let bad_number = |src: &str| match parse(src) {
            Err(ParseError::Number { .. }) => true,
            other => {
                println!("{:?}", other);
                false
            }
        };

        assert!(bad_number("M 0 --1"));
        assert!(bad_number("M 0 1ee2"));
        assert!(bad_number("M 0 1e--1"));
        assert!(bad_number("M 0 *2"));
        assert!(bad_number("M 0 e"));
        assert!(bad_number("M 0 1e"));
        assert!(bad_number("M 0 +1"));
    }

    #[test]
    fn insufficient_parameters() {
        // The parameter list ends mid-command.
        match parse("M 10") {
            Err(ParseError::Number { .. }) => {}
            other => panic!("{:?}", other),
        }
        match parse("M 0 0 C 1 2 3 4 5") {
            Err(ParseError::Number { .. }) => {}
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn need_start() {
        match parse("L 1 1") {
            Err(ParseError::MissingMoveTo { command: 'L', .. }) => {}
            other => panic!("{:?}", other),
        }

        match parse("M 0 0 Z L 1 1") {
            Err(ParseError::MissingMoveTo { command: 'L', .. }) => {}
            other => panic!("{:?}", other),
        }

        // An implicit pair after a close re-opens with a move-to.
        let commands = parse("M 0 0 L 1 0 Z 5 5 L 6 6").unwrap();
        assert_eq!(
            commands[3],
            PathCommand::MoveTo {
                x: 5.0,
                y: 5.0,
                position: Position::Relative,
            }
        );
    }
}
