// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::units::AspectPolicy;
use crate::Color;

/// Raster output options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Target resolution.
    ///
    /// Applies only when the document declares a physical size.
    /// `None` maps one document unit to one pixel.
    ///
    /// Default: `None`
    pub dpi: Option<f64>,

    /// How a declared size that disagrees with the canvas box is handled.
    ///
    /// Default: strict, with 0.5% tolerance
    pub aspect: AspectPolicy,

    /// An image background color.
    ///
    /// `None` equals to transparent.
    ///
    /// Default: `None`
    pub background: Option<Color>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            dpi: None,
            aspect: AspectPolicy::default(),
            background: None,
        }
    }
}
