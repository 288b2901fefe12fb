// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use crate::path::{self, DrawingOp, PathSyntaxError};
use crate::style::{self, Property, Style, StyleValueError};
use crate::SVG_NS;

/// A path shape.
///
/// `path` element in SVG.
#[derive(Clone, PartialEq, Debug)]
pub struct Path {
    /// Element's ID.
    ///
    /// Can be empty.
    pub id: String,

    /// Absolute drawing operations.
    ///
    /// Contains everything parsed before the first error, if any.
    pub data: Vec<DrawingOp>,

    /// The `d` attribute as written in the source document.
    pub source: String,

    /// Resolved style.
    pub style: Style,
}

/// A rectangle shape.
///
/// `rect` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct Rect {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: Style,
}

/// A drawable element.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum Shape {
    Path(Path),
    Rect(Rect),
}

impl Shape {
    /// Returns shape's ID.
    pub fn id(&self) -> &str {
        match self {
            Shape::Path(ref p) => &p.id,
            Shape::Rect(ref r) => &r.id,
        }
    }

    /// Returns shape's style.
    pub fn style(&self) -> &Style {
        match self {
            Shape::Path(ref p) => &p.style,
            Shape::Rect(ref r) => &r.style,
        }
    }
}

/// A recoverable problem found while extracting shapes.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum Diagnostic {
    /// Path data is malformed. The geometry before the error is kept.
    Path {
        element_id: String,
        error: PathSyntaxError,
    },
    /// A style value was rejected and replaced by a default.
    Style {
        element_id: String,
        error: StyleValueError,
    },
    /// A required geometry attribute is missing. The element is skipped.
    MissingAttribute {
        element_id: String,
        name: &'static str,
    },
    /// A geometry attribute is malformed. The element is skipped.
    InvalidAttribute {
        element_id: String,
        name: &'static str,
        value: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Diagnostic::Path { element_id, error } => {
                write!(f, "'{}': {}", element_id, error)
            }
            Diagnostic::Style { element_id, error } => {
                write!(f, "'{}': {}", element_id, error)
            }
            Diagnostic::MissingAttribute { element_id, name } => {
                write!(f, "'{}': the '{}' attribute is not set", element_id, name)
            }
            Diagnostic::InvalidAttribute {
                element_id,
                name,
                value,
            } => {
                write!(f, "'{}': invalid '{}' value '{}'", element_id, name, value)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ShapeKind {
    Path,
    Rect,
}

/// Raw shape attributes borrowed from the document.
///
/// Holds plain strings only, so it can be converted on any thread.
#[derive(Clone, Debug)]
pub(crate) struct ShapeSource<'a> {
    kind: ShapeKind,
    id: &'a str,
    geometry: [Option<&'a str>; 4],
    style: Option<&'a str>,
    presentation: Vec<(&'a str, &'a str)>,
}

const RECT_ATTRIBUTES: [&str; 4] = ["x", "y", "width", "height"];

impl<'a> ShapeSource<'a> {
    /// Collects attributes of a `path` or `rect` element.
    pub(crate) fn from_node(node: roxmltree::Node<'a, '_>) -> Option<Self> {
        if !node.is_element() || node.tag_name().namespace() != Some(SVG_NS) {
            return None;
        }

        let (kind, geometry) = match node.tag_name().name() {
            "path" => (ShapeKind::Path, [node.attribute("d"), None, None, None]),
            "rect" => (ShapeKind::Rect, RECT_ATTRIBUTES.map(|name| node.attribute(name))),
            "g" | "title" | "desc" | "metadata" => return None,
            name => {
                log::debug!("Unsupported element '{}' is skipped.", name);
                return None;
            }
        };

        let presentation = node
            .attributes()
            .filter(|a| a.namespace().is_none() && Property::from_name(a.name()).is_some())
            .map(|a| (a.name(), a.value()))
            .collect();

        Some(ShapeSource {
            kind,
            id: node.attribute("id").unwrap_or_default(),
            geometry,
            style: node.attribute("style"),
            presentation,
        })
    }

    /// Interprets geometry and style.
    ///
    /// Returns `None` when the element cannot produce a shape.
    pub(crate) fn convert(&self) -> (Option<Shape>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();

        let (style, errors) = style::resolve(self.style, self.presentation.iter().copied());
        diagnostics.extend(errors.into_iter().map(|error| Diagnostic::Style {
            element_id: self.id.to_string(),
            error,
        }));

        let shape = match self.kind {
            ShapeKind::Path => self.convert_path(style, &mut diagnostics),
            ShapeKind::Rect => self.convert_rect(style, &mut diagnostics),
        };

        (shape, diagnostics)
    }

    fn convert_path(&self, style: Style, diagnostics: &mut Vec<Diagnostic>) -> Option<Shape> {
        let source = match self.geometry[0] {
            Some(d) => d,
            None => {
                diagnostics.push(Diagnostic::MissingAttribute {
                    element_id: self.id.to_string(),
                    name: "d",
                });
                return None;
            }
        };

        let (data, error) = path::parse(source);
        if let Some(error) = error {
            diagnostics.push(Diagnostic::Path {
                element_id: self.id.to_string(),
                error,
            });
        }

        Some(Shape::Path(Path {
            id: self.id.to_string(),
            data,
            source: source.to_string(),
            style,
        }))
    }

    fn convert_rect(&self, style: Style, diagnostics: &mut Vec<Diagnostic>) -> Option<Shape> {
        let mut numbers = [0.0; 4];
        for (i, &name) in RECT_ATTRIBUTES.iter().enumerate() {
            let value = match self.geometry[i] {
                Some(v) => v,
                // `x` and `y` are optional.
                None if i < 2 => continue,
                None => {
                    diagnostics.push(Diagnostic::MissingAttribute {
                        element_id: self.id.to_string(),
                        name,
                    });
                    return None;
                }
            };

            match parse_coordinate(value) {
                Some(n) if i < 2 || n >= 0.0 => numbers[i] = n,
                _ => {
                    diagnostics.push(Diagnostic::InvalidAttribute {
                        element_id: self.id.to_string(),
                        name,
                        value: value.to_string(),
                    });
                    return None;
                }
            }
        }

        let [x, y, width, height] = numbers;
        Some(Shape::Rect(Rect {
            id: self.id.to_string(),
            x,
            y,
            width,
            height,
            style,
        }))
    }
}

/// Parses a user space coordinate. Absolute unit suffixes are ignored.
fn parse_coordinate(value: &str) -> Option<f64> {
    let length = svgtypes::Length::from_str(value).ok()?;
    match length.unit {
        svgtypes::LengthUnit::Percent | svgtypes::LengthUnit::Em | svgtypes::LengthUnit::Ex => None,
        _ if length.number.is_finite() => Some(length.number),
        _ => None,
    }
}
