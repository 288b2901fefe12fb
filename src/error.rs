// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

/// List of all fatal errors.
#[derive(Debug)]
pub enum Error {
    /// The document has no usable canvas box.
    ///
    /// Either `viewBox` is missing (and no `width`/`height` fallback exists)
    /// or its width or height is not positive.
    InvalidCanvas,

    /// The per-axis scale factors derived from the declared physical size
    /// disagree by more than the allowed tolerance.
    DimensionMismatch {
        /// Horizontal pixels per document unit.
        scale_x: f64,
        /// Vertical pixels per document unit.
        scale_y: f64,
    },

    /// A requested layer does not exist in the document.
    LayerNotFound {
        /// The requested name or id.
        name: String,
        /// Names of all layers in document order.
        available: Vec<String>,
    },

    /// Reading or writing a file failed.
    Io(PathBuf, std::io::Error),

    /// Only UTF-8 content is supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// Failed to parse an SVG data.
    ParsingFailed(roxmltree::Error),

    /// The root element is not an `svg` element.
    NotAnSvg,

    /// Failed to allocate a pixel buffer of the requested size.
    NoCanvas,

    /// Failed to encode the pixel buffer as PNG.
    EncodingFailed(String),
}

impl Error {
    /// Returns `true` for errors caused by a wrong layer selection.
    pub fn is_selection_error(&self) -> bool {
        matches!(self, Error::LayerNotFound { .. })
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::InvalidCanvas => {
                write!(f, "the document has no valid canvas box")
            }
            Error::DimensionMismatch { scale_x, scale_y } => {
                write!(
                    f,
                    "declared size and canvas box have different aspect ratios \
                     (horizontal scale {:.4}, vertical scale {:.4})",
                    scale_x, scale_y
                )
            }
            Error::LayerNotFound {
                ref name,
                ref available,
            } => {
                write!(f, "layer '{}' not found. ", name)?;
                if available.is_empty() {
                    write!(f, "The document has no layers")
                } else {
                    write!(f, "Available layers: {}", available.join(", "))
                }
            }
            Error::Io(ref path, ref e) => {
                write!(f, "'{}': {}", path.display(), e)
            }
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::NotAnSvg => {
                write!(f, "the root element is not an SVG element")
            }
            Error::NoCanvas => {
                write!(f, "failed to allocate a pixel buffer")
            }
            Error::EncodingFailed(ref e) => {
                write!(f, "failed to encode an image cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(_, e) => Some(e),
            Error::ParsingFailed(e) => Some(e),
            _ => None,
        }
    }
}
