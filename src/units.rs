// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mapping of the document coordinate space onto a pixel grid.

use crate::Error;

/// The default relative tolerance between the horizontal and vertical scale.
pub const DEFAULT_TOLERANCE: f64 = 0.005;

/// A document coordinate system box, usually taken from `viewBox`.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CanvasBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasBox {
    /// Creates a new `CanvasBox`.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        CanvasBox {
            x,
            y,
            width,
            height,
        }
    }

    fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// A physical length unit.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Unit {
    None,
    Px,
    Mm,
    Cm,
    In,
    Pt,
    Pc,
}

impl Unit {
    /// Returns the size of one unit in inches.
    ///
    /// A unitless number is treated as a CSS pixel.
    pub fn to_inches(self) -> f64 {
        match self {
            Unit::None | Unit::Px => 1.0 / 96.0,
            Unit::Mm => 1.0 / 25.4,
            Unit::Cm => 1.0 / 2.54,
            Unit::In => 1.0,
            Unit::Pt => 1.0 / 72.0,
            Unit::Pc => 1.0 / 6.0,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Px => "px",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Pt => "pt",
            Unit::Pc => "pc",
        }
    }
}

/// A length with a physical unit.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Length {
    pub number: f64,
    pub unit: Unit,
}

impl Length {
    /// Creates a new `Length`.
    #[inline]
    pub fn new(number: f64, unit: Unit) -> Self {
        Length { number, unit }
    }

    /// Converts a parsed SVG length.
    ///
    /// Returns `None` for relative units, which have no physical size.
    pub fn from_svg(length: svgtypes::Length) -> Option<Self> {
        let unit = match length.unit {
            svgtypes::LengthUnit::None => Unit::None,
            svgtypes::LengthUnit::Px => Unit::Px,
            svgtypes::LengthUnit::Mm => Unit::Mm,
            svgtypes::LengthUnit::Cm => Unit::Cm,
            svgtypes::LengthUnit::In => Unit::In,
            svgtypes::LengthUnit::Pt => Unit::Pt,
            svgtypes::LengthUnit::Pc => Unit::Pc,
            svgtypes::LengthUnit::Em
            | svgtypes::LengthUnit::Ex
            | svgtypes::LengthUnit::Percent => return None,
        };

        Some(Length::new(length.number, unit))
    }

    /// Returns the length in inches.
    #[inline]
    pub fn to_inches(&self) -> f64 {
        self.number * self.unit.to_inches()
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.number, self.unit.as_str())
    }
}

/// A physical document size, from the root `width` and `height`.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DeclaredSize {
    pub width: Length,
    pub height: Length,
}

/// How a canvas is mapped onto a pixel box with a different aspect ratio.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AspectPolicy {
    /// Fail with `DimensionMismatch` when the horizontal and vertical scale
    /// differ by more than the relative `tolerance`.
    Strict {
        /// Relative tolerance, like `0.005` for 0.5%.
        tolerance: f64,
    },
    /// Scale uniformly by the smaller factor and center the canvas.
    Fit,
}

impl Default for AspectPolicy {
    fn default() -> Self {
        AspectPolicy::Strict {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// A pixel box and the transform from document units into it.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RenderTarget {
    /// Width in pixels. Always positive.
    pub width: u32,
    /// Height in pixels. Always positive.
    pub height: u32,
    /// Pixels per document unit.
    pub scale: f64,
    /// Horizontal offset in pixels applied after scaling.
    pub translate_x: f64,
    /// Vertical offset in pixels applied after scaling.
    pub translate_y: f64,
}

impl RenderTarget {
    /// Returns a document-to-pixel transform.
    pub fn transform(&self) -> tiny_skia::Transform {
        let s = self.scale as f32;
        tiny_skia::Transform::from_row(
            s,
            0.0,
            0.0,
            s,
            self.translate_x as f32,
            self.translate_y as f32,
        )
    }
}

/// Resolves a pixel box using the default, strict aspect policy.
pub fn resolve(
    canvas: Option<CanvasBox>,
    size: Option<DeclaredSize>,
    dpi: Option<f64>,
) -> Result<RenderTarget, Error> {
    resolve_with(canvas, size, dpi, AspectPolicy::default())
}

/// Resolves a pixel box.
///
/// Without `dpi` the canvas maps one unit to one pixel. With `dpi`,
/// the declared physical size decides the pixel box and the canvas is
/// scaled into it.
pub fn resolve_with(
    canvas: Option<CanvasBox>,
    size: Option<DeclaredSize>,
    dpi: Option<f64>,
    policy: AspectPolicy,
) -> Result<RenderTarget, Error> {
    let canvas = match canvas {
        Some(c) if c.is_valid() => c,
        _ => return Err(Error::InvalidCanvas),
    };

    let (dpi, size) = match (dpi, size) {
        (Some(dpi), Some(size)) => (dpi, size),
        (Some(_), None) => {
            log::warn!("The document has no physical size. DPI will be ignored.");
            return Ok(natural(canvas));
        }
        (None, _) => return Ok(natural(canvas)),
    };

    let width = to_pixels(size.width.to_inches() * dpi);
    let height = to_pixels(size.height.to_inches() * dpi);

    let scale_x = width as f64 / canvas.width;
    let scale_y = height as f64 / canvas.height;

    let (scale, offset_x, offset_y) = match policy {
        AspectPolicy::Strict { tolerance } => {
            let diff = (scale_x - scale_y).abs() / scale_x.max(scale_y);
            if diff > tolerance {
                return Err(Error::DimensionMismatch { scale_x, scale_y });
            }

            (scale_x, 0.0, 0.0)
        }
        AspectPolicy::Fit => {
            let scale = scale_x.min(scale_y);
            let offset_x = (width as f64 - canvas.width * scale) / 2.0;
            let offset_y = (height as f64 - canvas.height * scale) / 2.0;
            (scale, offset_x, offset_y)
        }
    };

    Ok(RenderTarget {
        width,
        height,
        scale,
        translate_x: offset_x - canvas.x * scale,
        translate_y: offset_y - canvas.y * scale,
    })
}

fn natural(canvas: CanvasBox) -> RenderTarget {
    RenderTarget {
        width: to_pixels(canvas.width),
        height: to_pixels(canvas.height),
        scale: 1.0,
        translate_x: -canvas.x,
        translate_y: -canvas.y,
    }
}

#[inline]
fn to_pixels(n: f64) -> u32 {
    // `as` saturates, so huge values end up as `u32::MAX`.
    (n.round() as u32).max(1)
}
