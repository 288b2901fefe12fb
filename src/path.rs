// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Path data interpretation.
//!
//! Supports the `M`, `L`, `C` and `Z` commands in both absolute and relative
//! forms. All produced coordinates are absolute.

use std::fmt::Write;

use crate::stream::{ByteExt, Stream};

/// A drawing primitive with absolute coordinates.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DrawingOp {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CubicTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    ClosePath,
}

/// A kind of a path data error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PathErrorKind {
    /// A letter that is not a supported command.
    UnknownCommand(char),
    /// The first command is not a moveto.
    MissingMoveTo,
    /// A command has fewer valid numbers than it requires.
    MissingArgument(char),
    /// Numbers right after a closepath.
    UnexpectedNumber,
}

/// A path data error with a byte offset into the source string.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PathSyntaxError {
    /// What went wrong.
    pub kind: PathErrorKind,
    /// A byte offset of the offending input.
    pub offset: usize,
}

impl std::fmt::Display for PathSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            PathErrorKind::UnknownCommand(c) => {
                write!(f, "unknown path command '{}'", c)?;
            }
            PathErrorKind::MissingMoveTo => {
                write!(f, "path data must start with a moveto")?;
            }
            PathErrorKind::MissingArgument(c) => {
                write!(f, "missing or invalid argument for '{}'", c)?;
            }
            PathErrorKind::UnexpectedNumber => {
                write!(f, "unexpected number after a closepath")?;
            }
        }

        write!(f, " at offset {}", self.offset)
    }
}

impl std::error::Error for PathSyntaxError {}

/// A pull-based path data parser.
///
/// Yields absolute drawing operations and stops after the first error.
///
/// # Example
///
/// ```
/// use svglayer::{DrawingOp, PathParser};
///
/// let mut p = PathParser::from("M10 20 l5 5");
/// assert_eq!(p.next(), Some(Ok(DrawingOp::MoveTo { x: 10.0, y: 20.0 })));
/// assert_eq!(p.next(), Some(Ok(DrawingOp::LineTo { x: 15.0, y: 25.0 })));
/// assert_eq!(p.next(), None);
/// ```
#[derive(Clone, Debug)]
pub struct PathParser<'a> {
    stream: Stream<'a>,
    prev_cmd: Option<u8>,
    current: (f64, f64),
    subpath_start: (f64, f64),
    pending: Option<DrawingOp>,
    finished: bool,
}

impl<'a> From<&'a str> for PathParser<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        PathParser {
            stream: Stream::from(text),
            prev_cmd: None,
            current: (0.0, 0.0),
            subpath_start: (0.0, 0.0),
            pending: None,
            finished: false,
        }
    }
}

impl<'a> Iterator for PathParser<'a> {
    type Item = Result<DrawingOp, PathSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(op) = self.pending.take() {
            return Some(Ok(op));
        }

        if self.finished {
            return None;
        }

        self.stream.skip_spaces();
        let first = self.stream.curr_byte()?;

        let res = self.next_impl(first);
        if res.is_err() {
            self.finished = true;
        }

        Some(res)
    }
}

impl<'a> PathParser<'a> {
    fn next_impl(&mut self, first: u8) -> Result<DrawingOp, PathSyntaxError> {
        let s = &mut self.stream;
        let start = s.pos();

        let cmd = if is_cmd(first) {
            s.advance(1);
            first
        } else if first.is_number_start() {
            match self.prev_cmd {
                None => return Err(error(PathErrorKind::MissingMoveTo, start)),
                Some(b'Z' | b'z') => return Err(error(PathErrorKind::UnexpectedNumber, start)),
                Some(c) => c,
            }
        } else {
            let c = s.curr_char().unwrap_or('\u{FFFD}');
            return Err(error(PathErrorKind::UnknownCommand(c), start));
        };

        if self.prev_cmd.is_none() && !matches!(cmd, b'M' | b'm') {
            return Err(error(PathErrorKind::MissingMoveTo, start));
        }

        // A drawing command right after a closepath starts a new subpath.
        let needs_move = matches!(self.prev_cmd, Some(b'Z' | b'z'))
            && !matches!(cmd, b'M' | b'm' | b'Z' | b'z');

        let op = match cmd {
            b'M' | b'm' => {
                let (x, y) = self.parse_point(cmd)?;
                self.current = (x, y);
                self.subpath_start = (x, y);
                // Following coordinate pairs are implicit lineto commands.
                self.prev_cmd = Some(if cmd == b'M' { b'L' } else { b'l' });
                DrawingOp::MoveTo { x, y }
            }
            b'L' | b'l' => {
                let (x, y) = self.parse_point(cmd)?;
                self.current = (x, y);
                self.prev_cmd = Some(cmd);
                DrawingOp::LineTo { x, y }
            }
            b'C' | b'c' => {
                let (x1, y1) = self.parse_point(cmd)?;
                let (x2, y2) = self.parse_point(cmd)?;
                let (x, y) = self.parse_point(cmd)?;
                self.current = (x, y);
                self.prev_cmd = Some(cmd);
                DrawingOp::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                }
            }
            _ => {
                self.stream.skip_separator();
                self.current = self.subpath_start;
                self.prev_cmd = Some(cmd);
                DrawingOp::ClosePath
            }
        };

        if needs_move {
            self.pending = Some(op);
            let (x, y) = self.subpath_start;
            return Ok(DrawingOp::MoveTo { x, y });
        }

        Ok(op)
    }

    /// Parses a coordinate pair, resolving relative commands
    /// against the point at the start of the segment.
    ///
    /// The current point is updated only after a whole segment is parsed,
    /// so all relative points of `c` share one origin.
    fn parse_point(&mut self, cmd: u8) -> Result<(f64, f64), PathSyntaxError> {
        let mut x = self.parse_arg(cmd)?;
        let mut y = self.parse_arg(cmd)?;

        if cmd.is_ascii_lowercase() {
            x += self.current.0;
            y += self.current.1;
        }

        Ok((x, y))
    }

    fn parse_arg(&mut self, cmd: u8) -> Result<f64, PathSyntaxError> {
        match self.stream.parse_list_number() {
            Some(n) => Ok(n),
            None => Err(error(PathErrorKind::MissingArgument(cmd as char), self.stream.pos())),
        }
    }
}

#[inline]
fn error(kind: PathErrorKind, offset: usize) -> PathSyntaxError {
    PathSyntaxError { kind, offset }
}

#[inline]
fn is_cmd(c: u8) -> bool {
    matches!(c, b'M' | b'm' | b'L' | b'l' | b'C' | b'c' | b'Z' | b'z')
}

/// Parses path data into absolute drawing operations.
///
/// On error, returns everything parsed before it together with the error.
pub fn parse(text: &str) -> (Vec<DrawingOp>, Option<PathSyntaxError>) {
    let mut ops = Vec::new();
    for res in PathParser::from(text) {
        match res {
            Ok(op) => ops.push(op),
            Err(e) => return (ops, Some(e)),
        }
    }

    (ops, None)
}

/// Writes drawing operations as absolute path data.
///
/// Numbers are written in the shortest form that parses back
/// into the exact same value.
pub fn write_path_data(ops: &[DrawingOp]) -> String {
    let mut s = String::new();
    for op in ops {
        if !s.is_empty() {
            s.push(' ');
        }

        // Writing into a `String` cannot fail.
        let _ = match *op {
            DrawingOp::MoveTo { x, y } => write!(s, "M {} {}", x, y),
            DrawingOp::LineTo { x, y } => write!(s, "L {} {}", x, y),
            DrawingOp::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => write!(s, "C {} {} {} {} {} {}", x1, y1, x2, y2, x, y),
            DrawingOp::ClosePath => write!(s, "Z"),
        };
    }

    s
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $( $op:expr ),*) => (
            #[test]
            fn $name() {
                let mut s = PathParser::from($text);
                $(
                    assert_eq!(s.next().unwrap().unwrap(), $op);
                )*

                if let Some(res) = s.next() {
                    assert!(res.is_err());
                }
            }
        )
    }

    test!(null, "", );
    test!(spaces_only, "  \n ", );
    test!(not_a_path, "q", );
    test!(not_a_move_to, "L 20 30", );
    test!(stop_on_err, "M 10 20 L 30 40 L 50",
        DrawingOp::MoveTo { x: 10.0, y: 20.0 },
        DrawingOp::LineTo { x: 30.0, y: 40.0 }
    );

    test!(implicit_line_after_move, "M0 0 L10 0 10-5 Z",
        DrawingOp::MoveTo { x: 0.0, y: 0.0 },
        DrawingOp::LineTo { x: 10.0, y: 0.0 },
        DrawingOp::LineTo { x: 10.0, y: -5.0 },
        DrawingOp::ClosePath
    );

    test!(implicit_line_after_move_only, "M 10 20 30 40",
        DrawingOp::MoveTo { x: 10.0, y: 20.0 },
        DrawingOp::LineTo { x: 30.0, y: 40.0 }
    );

    test!(implicit_relative_line, "m 10 20 5 5 5 5",
        DrawingOp::MoveTo { x: 10.0, y: 20.0 },
        DrawingOp::LineTo { x: 15.0, y: 25.0 },
        DrawingOp::LineTo { x: 20.0, y: 30.0 }
    );

    test!(relative_cubic, "M 10 10 c 1 2 3 4 5 6 c 1 1 1 1 1 1",
        DrawingOp::MoveTo { x: 10.0, y: 10.0 },
        DrawingOp::CubicTo { x1: 11.0, y1: 12.0, x2: 13.0, y2: 14.0, x: 15.0, y: 16.0 },
        DrawingOp::CubicTo { x1: 16.0, y1: 17.0, x2: 16.0, y2: 17.0, x: 16.0, y: 17.0 }
    );

    test!(implicit_cubic, "M0,0 C1,1,2,2,3,3 4,4,5,5,6,6",
        DrawingOp::MoveTo { x: 0.0, y: 0.0 },
        DrawingOp::CubicTo { x1: 1.0, y1: 1.0, x2: 2.0, y2: 2.0, x: 3.0, y: 3.0 },
        DrawingOp::CubicTo { x1: 4.0, y1: 4.0, x2: 5.0, y2: 5.0, x: 6.0, y: 6.0 }
    );

    test!(compact_numbers, "M.5.5L-1-1",
        DrawingOp::MoveTo { x: 0.5, y: 0.5 },
        DrawingOp::LineTo { x: -1.0, y: -1.0 }
    );

    test!(exponents, "M1e1 2E-1",
        DrawingOp::MoveTo { x: 10.0, y: 0.2 }
    );

    test!(line_after_close_starts_subpath, "M 10 10 L 20 10 Z l 5 5",
        DrawingOp::MoveTo { x: 10.0, y: 10.0 },
        DrawingOp::LineTo { x: 20.0, y: 10.0 },
        DrawingOp::ClosePath,
        DrawingOp::MoveTo { x: 10.0, y: 10.0 },
        DrawingOp::LineTo { x: 15.0, y: 15.0 }
    );

    test!(relative_move_after_close, "m 10 10 l 10 0 z m 1 1",
        DrawingOp::MoveTo { x: 10.0, y: 10.0 },
        DrawingOp::LineTo { x: 20.0, y: 10.0 },
        DrawingOp::ClosePath,
        DrawingOp::MoveTo { x: 11.0, y: 11.0 }
    );

    test!(repeated_close, "M 10 20 L 30 40 Z Z",
        DrawingOp::MoveTo { x: 10.0, y: 20.0 },
        DrawingOp::LineTo { x: 30.0, y: 40.0 },
        DrawingOp::ClosePath,
        DrawingOp::ClosePath
    );

    test!(comma_after_close, "M 1 1 Z, M 2 2",
        DrawingOp::MoveTo { x: 1.0, y: 1.0 },
        DrawingOp::ClosePath,
        DrawingOp::MoveTo { x: 2.0, y: 2.0 }
    );

    macro_rules! test_err {
        ($name:ident, $text:expr, $kind:expr, $offset:expr, $len:expr) => (
            #[test]
            fn $name() {
                let (ops, err) = parse($text);
                assert_eq!(ops.len(), $len);
                assert_eq!(err, Some(PathSyntaxError { kind: $kind, offset: $offset }));
            }
        )
    }

    test_err!(err_unknown_command, "M 0 0 Q 1 1 2 2", PathErrorKind::UnknownCommand('Q'), 6, 1);
    test_err!(err_non_ascii, "M 0 0 Ж", PathErrorKind::UnknownCommand('Ж'), 6, 1);
    test_err!(err_starts_with_line, "L 1 1", PathErrorKind::MissingMoveTo, 0, 0);
    test_err!(err_starts_with_number, "1 1", PathErrorKind::MissingMoveTo, 0, 0);
    test_err!(err_missing_y, "M 10", PathErrorKind::MissingArgument('M'), 4, 0);
    test_err!(err_bad_number, "M 1 1 L 2 x", PathErrorKind::MissingArgument('L'), 10, 1);
    test_err!(err_short_cubic, "M 0 0 C 1 1 2 2", PathErrorKind::MissingArgument('C'), 15, 1);
    test_err!(err_number_after_close, "M 0 0 L 1 1 Z 5 5", PathErrorKind::UnexpectedNumber, 14, 3);

    #[test]
    fn errors_stop_iteration() {
        let mut p = PathParser::from("M 0 0 X L 1 1");
        assert!(p.next().unwrap().is_ok());
        assert!(p.next().unwrap().is_err());
        assert!(p.next().is_none());
    }

    #[test]
    fn absolute_form_is_idempotent() {
        let source = "m 10.5 20 l 1e-3 -4 c .1 .2 .3 .4 .5 .6 z l 3 3 M 0 0 100 100";
        let (ops, err) = parse(source);
        assert!(err.is_none());

        let written = write_path_data(&ops);
        let (reparsed, err) = parse(&written);
        assert!(err.is_none());
        assert_eq!(reparsed, ops);
        assert_eq!(write_path_data(&reparsed), written);
    }

    #[test]
    fn write_simple() {
        let (ops, _) = parse("M0 0 L10 0 10-5 Z");
        assert_eq!(write_path_data(&ops), "M 0 0 L 10 0 L 10 -5 Z");
    }

    #[test]
    fn error_display() {
        let (_, err) = parse("M 0 0 Q");
        assert_eq!(err.unwrap().to_string(), "unknown path command 'Q' at offset 6");
    }
}
