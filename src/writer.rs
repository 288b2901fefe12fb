// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::borrow::Cow;

pub use xmlwriter::Indent;
use xmlwriter::XmlWriter;

use crate::layer::LayerContent;
use crate::path::write_path_data;
use crate::{Document, Shape, INKSCAPE_NS, SVG_NS};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// XML writing options.
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Use single quote marks instead of double quote.
    ///
    /// Default: disabled
    pub use_single_quote: bool,

    /// Set XML nodes indention.
    ///
    /// Default: 4 spaces
    pub indent: Indent,

    /// Set XML attributes indention.
    ///
    /// Default: `None`
    pub attributes_indent: Indent,

    /// Write path data reconstructed in the absolute form
    /// instead of copying the source `d` attribute.
    ///
    /// Default: disabled
    pub absolute_paths: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            use_single_quote: false,
            indent: Indent::Spaces(4),
            attributes_indent: Indent::None,
            absolute_paths: false,
        }
    }
}

/// Writes selected layers as a standalone SVG document.
///
/// The root element keeps all attributes and namespace declarations
/// of the source root. `viewBox` is always written from the canvas box.
pub fn export(layers: &[LayerContent], document: &Document, opt: &WriteOptions) -> String {
    let mut xml = XmlWriter::new(xmlwriter::Options {
        use_single_quote: opt.use_single_quote,
        indent: opt.indent,
        attributes_indent: opt.attributes_indent,
    });

    let namespaces = Namespaces::new(document);

    xml.start_element("svg");
    for (prefix, uri) in &namespaces.list {
        match prefix {
            Some(prefix) => xml.write_attribute(&format!("xmlns:{}", prefix), &escape(uri)),
            None => xml.write_attribute("xmlns", &escape(uri)),
        }
    }

    for attr in document.root().attributes() {
        if attr.namespace().is_none() && attr.name() == "viewBox" {
            continue;
        }

        xml.write_verbatim_attribute(&namespaces, attr);
    }

    if let Some(c) = document.canvas() {
        xml.write_attribute_fmt(
            "viewBox",
            format_args!("{} {} {} {}", c.x, c.y, c.width, c.height),
        );
    }

    for content in layers {
        let layer = &content.layer;

        xml.start_element("g");
        if !layer.id().is_empty() {
            xml.write_attribute("id", &escape(layer.id()));
        }
        xml.write_attribute("inkscape:groupmode", "layer");
        if let Some(label) = layer.label() {
            xml.write_attribute("inkscape:label", &escape(label));
        }
        for attr in layer.extra_attributes() {
            xml.write_verbatim_attribute(&namespaces, attr);
        }

        for shape in &content.shapes {
            write_shape(shape, opt, &mut xml);
        }

        xml.end_element();
    }

    xml.end_document()
}

fn write_shape(shape: &Shape, opt: &WriteOptions, xml: &mut XmlWriter) {
    match shape {
        Shape::Path(ref path) => {
            xml.start_element("path");
            xml.write_id(&path.id);
            if opt.absolute_paths {
                xml.write_attribute("d", &write_path_data(&path.data));
            } else {
                xml.write_attribute("d", &escape(&path.source));
            }
            xml.write_attribute("style", &path.style.to_css());
            xml.end_element();
        }
        Shape::Rect(ref rect) => {
            xml.start_element("rect");
            xml.write_id(&rect.id);
            xml.write_attribute("x", &rect.x);
            xml.write_attribute("y", &rect.y);
            xml.write_attribute("width", &rect.width);
            xml.write_attribute("height", &rect.height);
            xml.write_attribute("style", &rect.style.to_css());
            xml.end_element();
        }
    }
}

/// Namespace declarations of the output root.
struct Namespaces<'a> {
    list: Vec<(Option<&'a str>, &'a str)>,
}

impl<'a> Namespaces<'a> {
    fn new(document: &'a Document) -> Self {
        let mut list = document.namespaces();

        if !list.iter().any(|(prefix, uri)| prefix.is_none() && *uri == SVG_NS) {
            list.retain(|(prefix, _)| prefix.is_some());
            list.insert(0, (None, SVG_NS));
        }

        if !list.iter().any(|(prefix, uri)| *prefix == Some("inkscape") && *uri == INKSCAPE_NS) {
            // Another namespace can occupy the prefix.
            list.retain(|(prefix, _)| *prefix != Some("inkscape"));
            list.push((Some("inkscape"), INKSCAPE_NS));
        }

        list.sort_by_key(|(prefix, _)| prefix.is_some());

        Namespaces { list }
    }

    /// Returns a qualified attribute name.
    fn qualified_name(&self, attr: &roxmltree::Attribute) -> Option<String> {
        let uri = match attr.namespace() {
            Some(uri) => uri,
            None => return Some(attr.name().to_string()),
        };

        if uri == XML_NS {
            return Some(format!("xml:{}", attr.name()));
        }

        let prefix = self
            .list
            .iter()
            .find(|(prefix, ns)| prefix.is_some() && *ns == uri)
            .and_then(|(prefix, _)| *prefix)?;

        Some(format!("{}:{}", prefix, attr.name()))
    }
}

trait XmlWriterExt {
    fn write_id(&mut self, id: &str);
    fn write_verbatim_attribute(&mut self, namespaces: &Namespaces, attr: roxmltree::Attribute);
}

impl XmlWriterExt for XmlWriter {
    #[inline(never)]
    fn write_id(&mut self, id: &str) {
        if !id.is_empty() {
            self.write_attribute("id", &escape(id));
        }
    }

    #[inline(never)]
    fn write_verbatim_attribute(&mut self, namespaces: &Namespaces, attr: roxmltree::Attribute) {
        match namespaces.qualified_name(&attr) {
            Some(name) => self.write_attribute(&name, &escape(attr.value())),
            None => log::warn!("Attribute '{}' has an undeclared namespace and will be skipped.", attr.name()),
        }
    }
}

/// Escapes markup characters.
///
/// `XmlWriter` takes care of quotes only.
fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut s = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            _ => s.push(c),
        }
    }

    Cow::Owned(s)
}
