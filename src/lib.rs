// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svglayer` extracts Inkscape layers from SVG documents.

Selected layers can be rendered into a raster image, at the document's
natural size or at a given resolution, or written back as a standalone
SVG document.

Only `path` (with `M`, `L`, `C` and `Z` commands) and `rect` elements
are supported, styled by a solid fill and stroke.

```
use svglayer::{Document, Options};

let text = "\
<svg xmlns='http://www.w3.org/2000/svg'
     xmlns:inkscape='http://www.inkscape.org/namespaces/inkscape'
     width='20mm' height='10mm' viewBox='0 0 20 10'>
  <g id='layer1' inkscape:groupmode='layer' inkscape:label='Main'>
    <rect width='20' height='10' style='fill:#ff0000'/>
  </g>
</svg>";

let doc = Document::parse(text).unwrap();
let layers = doc.select_layers(&["Main"]).unwrap();
let extraction = svglayer::extract(&layers);

let opt = Options { dpi: Some(254.0), ..Options::default() };
let target = doc.render_target(&opt).unwrap();
assert_eq!((target.width, target.height), (200, 100));

let pixmap = svglayer::render(&extraction.shapes(), &target, opt.background).unwrap();
assert_eq!(pixmap.width(), 200);
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::uninlined_format_args)]

mod color;
mod document;
mod error;
mod layer;
mod options;
pub mod path;
mod render;
mod shape;
mod stream;
pub mod style;
pub mod units;
mod writer;

pub use crate::color::{Color, InvalidColor};
pub use crate::document::{decompress_svgz, load_text, read_file, Document};
pub use crate::error::Error;
pub use crate::layer::{extract, is_layer, Extraction, Layer, LayerContent};
pub use crate::options::Options;
pub use crate::path::{DrawingOp, PathParser, PathSyntaxError};
pub use crate::render::{render, render_to_canvas, save_png};
pub use crate::shape::{Diagnostic, Path, Rect, Shape};
pub use crate::style::{LineJoin, Style, StyleValueError};
pub use crate::units::{AspectPolicy, CanvasBox, DeclaredSize, RenderTarget};
pub use crate::writer::{export, Indent, WriteOptions};

pub use roxmltree;
pub use tiny_skia;

/// The SVG namespace.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// The Inkscape namespace.
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

/// The Sodipodi namespace, used by Inkscape for editor state.
pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";

pub(crate) trait OptionLog {
    fn log_none<F: FnOnce()>(self, f: F) -> Self;
}

impl<T> OptionLog for Option<T> {
    #[inline]
    fn log_none<F: FnOnce()>(self, f: F) -> Self {
        self.or_else(|| {
            f();
            None
        })
    }
}
