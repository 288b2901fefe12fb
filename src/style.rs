// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Style resolution.
//!
//! Maps `style` declarations and presentation attributes of a single element
//! onto a fixed set of fill and stroke properties.

use std::fmt::Write;
use std::str::FromStr;

use crate::Color;

/// A line join.
///
/// `stroke-linejoin` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    fn as_str(self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::LineJoin {
        match self {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Resolved paint and stroke properties of a shape.
///
/// Only the element's own `style` and presentation attributes are used.
/// Nothing is inherited from ancestors.
#[derive(Clone, PartialEq, Debug)]
pub struct Style {
    /// `None` means no fill.
    pub fill: Option<Color>,
    /// In the `0..=1` range.
    pub fill_opacity: f64,
    /// `None` means no stroke.
    pub stroke: Option<Color>,
    /// Never negative.
    pub stroke_width: f64,
    /// In the `0..=1` range.
    pub stroke_opacity: f64,
    /// Miter by default.
    pub stroke_linejoin: LineJoin,
    /// Never less than 1.
    pub stroke_miterlimit: f64,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            fill: Some(Color::black()),
            fill_opacity: 1.0,
            stroke: None,
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            stroke_linejoin: LineJoin::default(),
            stroke_miterlimit: 4.0,
        }
    }
}

impl Style {
    /// Checks that the stroke will be painted.
    pub fn has_stroke(&self) -> bool {
        self.stroke.is_some() && self.stroke_width > 0.0
    }

    /// Serializes all properties as a CSS declaration list.
    ///
    /// Properties are always written in the same order,
    /// so equal styles produce equal strings.
    pub fn to_css(&self) -> String {
        let paint = |c: Option<Color>| match c {
            Some(c) => c.to_string(),
            None => "none".to_string(),
        };

        let mut s = String::new();
        let _ = write!(
            s,
            "fill:{};fill-opacity:{};stroke:{};stroke-width:{};\
             stroke-opacity:{};stroke-linejoin:{};stroke-miterlimit:{}",
            paint(self.fill),
            self.fill_opacity,
            paint(self.stroke),
            self.stroke_width,
            self.stroke_opacity,
            self.stroke_linejoin.as_str(),
            self.stroke_miterlimit,
        );
        s
    }
}

/// A style property known to the resolver.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Property {
    Fill,
    FillOpacity,
    Stroke,
    StrokeWidth,
    StrokeOpacity,
    StrokeLinejoin,
    StrokeMiterlimit,
}

impl Property {
    /// Parses a property from its CSS name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fill" => Some(Property::Fill),
            "fill-opacity" => Some(Property::FillOpacity),
            "stroke" => Some(Property::Stroke),
            "stroke-width" => Some(Property::StrokeWidth),
            "stroke-opacity" => Some(Property::StrokeOpacity),
            "stroke-linejoin" => Some(Property::StrokeLinejoin),
            "stroke-miterlimit" => Some(Property::StrokeMiterlimit),
            _ => None,
        }
    }

    /// Returns the CSS name.
    pub fn name(self) -> &'static str {
        match self {
            Property::Fill => "fill",
            Property::FillOpacity => "fill-opacity",
            Property::Stroke => "stroke",
            Property::StrokeWidth => "stroke-width",
            Property::StrokeOpacity => "stroke-opacity",
            Property::StrokeLinejoin => "stroke-linejoin",
            Property::StrokeMiterlimit => "stroke-miterlimit",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Why a property value was rejected.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValueErrorReason {
    /// Not a color or `none`.
    InvalidColor,
    /// A paint server reference, like `url(#gradient)`.
    UnsupportedPaint,
    /// Not a number.
    InvalidNumber,
    /// A number outside the allowed range. The value was clamped.
    OutOfRange,
    /// A negative number where it is not allowed.
    Negative,
    /// A unit that cannot be resolved without context, like `%` or `em`.
    UnsupportedUnit,
    /// An unknown keyword.
    InvalidKeyword,
}

impl std::fmt::Display for ValueErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            ValueErrorReason::InvalidColor => "not a color",
            ValueErrorReason::UnsupportedPaint => "unsupported paint",
            ValueErrorReason::InvalidNumber => "not a number",
            ValueErrorReason::OutOfRange => "out of range",
            ValueErrorReason::Negative => "negative value",
            ValueErrorReason::UnsupportedUnit => "unsupported unit",
            ValueErrorReason::InvalidKeyword => "unknown keyword",
        };
        f.write_str(s)
    }
}

/// A rejected style property value.
#[derive(Clone, PartialEq, Debug)]
pub struct StyleValueError {
    /// The property this value was set for.
    pub property: Property,
    /// The value as written.
    pub value: String,
    /// Why the value was rejected.
    pub reason: ValueErrorReason,
}

impl std::fmt::Display for StyleValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "invalid '{}' value '{}': {}",
            self.property.name(),
            self.value,
            self.reason
        )
    }
}

impl std::error::Error for StyleValueError {}

/// Resolves a shape style from its `style` attribute and presentation attributes.
///
/// Declarations in `style` take precedence over presentation attributes.
/// Invalid values fall back to defaults (or get clamped) and are reported.
///
/// # Example
///
/// ```
/// use svglayer::{Color, style};
///
/// let (s, errors) = style::resolve(Some("fill:#ff0000;stroke:none"), []);
/// assert_eq!(s.fill, Some(Color::new_rgb(255, 0, 0)));
/// assert_eq!(s.stroke, None);
/// assert!(errors.is_empty());
/// ```
pub fn resolve<'a, I>(style: Option<&'a str>, presentation: I) -> (Style, Vec<StyleValueError>)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut decls: [Option<&str>; 7] = [None; 7];

    for (name, value) in presentation {
        if let Some(p) = Property::from_name(name) {
            decls[p.index()] = Some(value);
        }
    }

    if let Some(style) = style {
        for decl in simplecss::DeclarationTokenizer::from(style) {
            if let Some(p) = Property::from_name(decl.name) {
                decls[p.index()] = Some(decl.value);
            }
        }
    }

    let mut resolver = Resolver {
        decls,
        errors: Vec::new(),
    };

    let def = Style::default();
    let style = Style {
        fill: resolver.resolve(Property::Fill, def.fill, parse_paint),
        fill_opacity: resolver.resolve_opacity(Property::FillOpacity),
        stroke: resolver.resolve(Property::Stroke, def.stroke, parse_paint),
        stroke_width: resolver.resolve(Property::StrokeWidth, def.stroke_width, parse_stroke_width),
        stroke_opacity: resolver.resolve_opacity(Property::StrokeOpacity),
        stroke_linejoin: resolver.resolve(
            Property::StrokeLinejoin,
            def.stroke_linejoin,
            parse_linejoin,
        ),
        stroke_miterlimit: resolver.resolve(
            Property::StrokeMiterlimit,
            def.stroke_miterlimit,
            parse_miterlimit,
        ),
    };

    (style, resolver.errors)
}

struct Resolver<'a> {
    decls: [Option<&'a str>; 7],
    errors: Vec<StyleValueError>,
}

impl<'a> Resolver<'a> {
    fn resolve<T, F>(&mut self, property: Property, default: T, parse: F) -> T
    where
        F: Fn(&str) -> Result<T, ValueErrorReason>,
    {
        let value = match self.decls[property.index()] {
            Some(v) => v.trim(),
            None => return default,
        };

        match parse(value) {
            Ok(v) => v,
            Err(reason) => {
                self.report(property, value, reason);
                default
            }
        }
    }

    fn resolve_opacity(&mut self, property: Property) -> f64 {
        let value = match self.decls[property.index()] {
            Some(v) => v.trim(),
            None => return 1.0,
        };

        match parse_opacity(value) {
            Some(n) if (0.0..=1.0).contains(&n) => n,
            Some(n) => {
                self.report(property, value, ValueErrorReason::OutOfRange);
                n.clamp(0.0, 1.0)
            }
            None => {
                self.report(property, value, ValueErrorReason::InvalidNumber);
                1.0
            }
        }
    }

    fn report(&mut self, property: Property, value: &str, reason: ValueErrorReason) {
        self.errors.push(StyleValueError {
            property,
            value: value.to_string(),
            reason,
        });
    }
}

fn parse_paint(value: &str) -> Result<Option<Color>, ValueErrorReason> {
    match svgtypes::Paint::from_str(value) {
        Ok(svgtypes::Paint::None) => Ok(None),
        // Re-parsed to apply the color name restrictions.
        Ok(svgtypes::Paint::Color(_)) => Color::from_str(value)
            .map(Some)
            .map_err(|_| ValueErrorReason::InvalidColor),
        Ok(_) => Err(ValueErrorReason::UnsupportedPaint),
        Err(_) => Err(ValueErrorReason::InvalidColor),
    }
}

fn parse_number(value: &str) -> Option<f64> {
    svgtypes::Number::from_str(value)
        .ok()
        .map(|n| n.0)
        .filter(|n| n.is_finite())
}

fn parse_opacity(value: &str) -> Option<f64> {
    match value.strip_suffix('%') {
        Some(percent) => parse_number(percent).map(|n| n / 100.0),
        None => parse_number(value),
    }
}

fn parse_stroke_width(value: &str) -> Result<f64, ValueErrorReason> {
    let length = svgtypes::Length::from_str(value).map_err(|_| ValueErrorReason::InvalidNumber)?;

    // Absolute units are dropped, not converted.
    if matches!(
        length.unit,
        svgtypes::LengthUnit::Percent | svgtypes::LengthUnit::Em | svgtypes::LengthUnit::Ex
    ) {
        return Err(ValueErrorReason::UnsupportedUnit);
    }

    if !length.number.is_finite() {
        return Err(ValueErrorReason::InvalidNumber);
    }

    if length.number < 0.0 {
        return Err(ValueErrorReason::Negative);
    }

    Ok(length.number)
}

fn parse_linejoin(value: &str) -> Result<LineJoin, ValueErrorReason> {
    match value {
        "miter" => Ok(LineJoin::Miter),
        "round" => Ok(LineJoin::Round),
        "bevel" => Ok(LineJoin::Bevel),
        _ => Err(ValueErrorReason::InvalidKeyword),
    }
}

fn parse_miterlimit(value: &str) -> Result<f64, ValueErrorReason> {
    let n = parse_number(value).ok_or(ValueErrorReason::InvalidNumber)?;
    if n < 1.0 {
        return Err(ValueErrorReason::OutOfRange);
    }

    Ok(n)
}
