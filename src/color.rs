// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;


/// An opaque RGB color.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Constructs a new `Color` from RGB values.
    #[inline]
    pub fn new_rgb(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue }
    }

    /// Constructs a new `Color` set to black.
    #[inline]
    pub fn black() -> Color {
        Color::new_rgb(0, 0, 0)
    }

    /// Constructs a new `Color` set to white.
    #[inline]
    pub fn white() -> Color {
        Color::new_rgb(255, 255, 255)
    }

    /// Converts into a `tiny_skia` color with the given opacity.
    pub fn to_skia(self, opacity: f64) -> tiny_skia::Color {
        let mut c = tiny_skia::Color::from_rgba8(self.red, self.green, self.blue, 255);
        c.apply_opacity(opacity as f32);
        c
    }
}

/// A color parsing error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InvalidColor;

impl std::fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "invalid color")
    }
}

impl std::error::Error for InvalidColor {}

impl From<svgtypes::Color> for Color {
    /// The alpha channel is dropped.
    #[inline]
    fn from(c: svgtypes::Color) -> Self {
        Color::new_rgb(c.red, c.green, c.blue)
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    /// Parses a color from `#rrggbb`, `#rgb`, `rgb(r, g, b)` or a color name.
    ///
    /// Only the basic color names are accepted.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();

        if text.bytes().all(|c| c.is_ascii_alphabetic()) && !is_known_name(text) {
            return Err(InvalidColor);
        }

        svgtypes::Color::from_str(text)
            .map(Color::from)
            .map_err(|_| InvalidColor)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

const NAMES: &[&str] = &[
    "black", "white", "red", "green", "blue", "yellow", "cyan", "aqua", "magenta", "fuchsia",
    "gray", "grey", "silver", "maroon", "olive", "lime", "teal", "navy", "purple",
];

fn is_known_name(name: &str) -> bool {
    NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test {
        ($name:ident, $text:expr, $color:expr) => {
            #[test]
            fn $name() {
                assert_eq!(Color::from_str($text), Ok($color));
            }
        };
    }

    test!(hex_long, "#ff0000", Color::new_rgb(255, 0, 0));
    test!(hex_long_upper, "#00FF7F", Color::new_rgb(0, 255, 127));
    test!(hex_short, "#f0a", Color::new_rgb(255, 0, 170));
    test!(named, "navy", Color::new_rgb(0, 0, 128));
    test!(named_mixed_case, "Green", Color::new_rgb(0, 128, 0));
    test!(named_alias, "grey", Color::new_rgb(128, 128, 128));
    test!(rgb_ints, "rgb(10, 20, 30)", Color::new_rgb(10, 20, 30));
    test!(rgb_percent, "rgb(100%, 50%, 0%)", Color::new_rgb(255, 128, 0));
    test!(padded, "  #000  ", Color::black());

    macro_rules! test_err {
        ($name:ident, $text:expr) => {
            #[test]
            fn $name() {
                assert_eq!(Color::from_str($text), Err(InvalidColor));
            }
        };
    }

    test_err!(hex_wrong_len, "#ff000");
    test_err!(hex_not_hex, "#gg0000");
    test_err!(unknown_name, "chartreuse");
    test_err!(current_color, "currentColor");
    test_err!(transparent, "transparent");
    test_err!(rgb_unclosed, "rgb(1, 2, 3");
    test_err!(rgb_missing_channel, "rgb(1, 2)");
    test_err!(rgb_trailing, "rgb(1, 2, 3) x");
    test_err!(empty, "");

    #[test]
    fn alpha_is_dropped() {
        let c = svgtypes::Color::new_rgba(10, 20, 30, 128);
        assert_eq!(Color::from(c), Color::new_rgb(10, 20, 30));
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Color::new_rgb(171, 205, 239).to_string(), "#abcdef");
    }
}
