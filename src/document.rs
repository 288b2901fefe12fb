// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;
use std::str::FromStr;

use crate::layer::{self, Layer};
use crate::units::{self, CanvasBox, DeclaredSize, Length, RenderTarget};
use crate::{Error, OptionLog, Options, SVG_NS};

/// A parsed layered SVG document.
///
/// Borrows the input text. Immutable once loaded.
pub struct Document<'input> {
    xml: roxmltree::Document<'input>,
    canvas: Option<CanvasBox>,
    size: Option<DeclaredSize>,
}

impl<'input> Document<'input> {
    /// Parses a document from a string.
    ///
    /// # Example
    ///
    /// ```
    /// let text = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 20 10'/>";
    /// let doc = svglayer::Document::parse(text).unwrap();
    /// assert_eq!(doc.canvas().map(|c| c.width), Some(20.0));
    /// ```
    pub fn parse(text: &'input str) -> Result<Self, Error> {
        let xml_opt = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };

        let xml = roxmltree::Document::parse_with_options(text, xml_opt)?;
        Self::from_xmltree(xml)
    }

    /// Wraps an already parsed XML tree.
    pub fn from_xmltree(xml: roxmltree::Document<'input>) -> Result<Self, Error> {
        let root = xml.root_element();
        if !root.has_tag_name((SVG_NS, "svg")) {
            return Err(Error::NotAnSvg);
        }

        let canvas = parse_canvas(root);
        let size = parse_declared_size(root);

        Ok(Document { xml, canvas, size })
    }

    /// Returns the root `svg` element.
    #[inline]
    pub fn root(&self) -> roxmltree::Node<'_, 'input> {
        self.xml.root_element()
    }

    /// Returns the canvas box.
    ///
    /// Taken from `viewBox`, or from `width` and `height` when `viewBox` is not set.
    #[inline]
    pub fn canvas(&self) -> Option<CanvasBox> {
        self.canvas
    }

    /// Returns the physical size declared by `width` and `height`.
    ///
    /// `None` when either is missing or uses a relative unit.
    #[inline]
    pub fn declared_size(&self) -> Option<DeclaredSize> {
        self.size
    }

    /// Returns namespace declarations of the root element as `(prefix, uri)` pairs.
    ///
    /// The predefined `xml` namespace is not included.
    pub fn namespaces(&self) -> Vec<(Option<&str>, &str)> {
        self.root()
            .namespaces()
            .filter(|ns| ns.name() != Some("xml"))
            .map(|ns| (ns.name(), ns.uri()))
            .collect()
    }

    /// Returns all layers in document order.
    pub fn layers(&self) -> Vec<Layer<'_, 'input>> {
        layer::collect(self.root())
    }

    /// Returns names of all layers in document order.
    ///
    /// Layers without a label and an ID are skipped.
    pub fn layer_names(&self) -> Vec<String> {
        names(&self.layers())
    }

    /// Finds a layer by its label or ID.
    pub fn find_layer(&self, query: &str) -> Result<Layer<'_, 'input>, Error> {
        let layers = self.layers();
        layer::find(&layers, query).ok_or_else(|| Error::LayerNotFound {
            name: query.to_string(),
            available: names(&layers),
        })
    }

    /// Finds layers by their labels or IDs.
    ///
    /// Fails on the first query that matches nothing.
    pub fn select_layers<S: AsRef<str>>(&self, queries: &[S]) -> Result<Vec<Layer<'_, 'input>>, Error> {
        queries.iter().map(|q| self.find_layer(q.as_ref())).collect()
    }

    /// Resolves the pixel box for raster output.
    pub fn render_target(&self, opt: &Options) -> Result<RenderTarget, Error> {
        units::resolve_with(self.canvas, self.size, opt.dpi, opt.aspect)
    }
}

impl std::fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("canvas", &self.canvas)
            .field("size", &self.size)
            .finish()
    }
}

fn names(layers: &[Layer]) -> Vec<String> {
    layers
        .iter()
        .map(|l| l.name())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect()
}

fn parse_canvas(root: roxmltree::Node) -> Option<CanvasBox> {
    if let Some(value) = root.attribute("viewBox") {
        // An invalid `viewBox` is not replaced by the size fallback.
        return svgtypes::ViewBox::from_str(value)
            .ok()
            .map(|vb| CanvasBox::new(vb.x, vb.y, vb.w, vb.h))
            .log_none(|| log::warn!("Invalid 'viewBox' value: '{}'.", value));
    }

    // Without `viewBox` the size numbers define the coordinate system.
    let width = parse_length(root.attribute("width")?)?;
    let height = parse_length(root.attribute("height")?)?;
    Some(CanvasBox::new(0.0, 0.0, width.number, height.number))
}

fn parse_declared_size(root: roxmltree::Node) -> Option<DeclaredSize> {
    let width = parse_length(root.attribute("width")?)?;
    let height = parse_length(root.attribute("height")?)?;
    if width.number > 0.0 && height.number > 0.0 {
        Some(DeclaredSize { width, height })
    } else {
        None
    }
}

fn parse_length(value: &str) -> Option<Length> {
    let length = svgtypes::Length::from_str(value).ok()?;
    if !length.number.is_finite() {
        return None;
    }

    Length::from_svg(length)
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}

/// Converts raw file content into a string.
///
/// GZip compressed data is decompressed first.
pub fn load_text(mut data: Vec<u8>) -> Result<String, Error> {
    if data.starts_with(&[0x1f, 0x8b]) {
        data = decompress_svgz(&data)?;
    }

    String::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)
}

/// Reads an SVG or SVGZ file into a string.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::Io(path.to_path_buf(), e))?;
    load_text(data)
}
