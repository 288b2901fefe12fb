// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rayon::prelude::*;

use crate::shape::ShapeSource;
use crate::{Diagnostic, Shape, INKSCAPE_NS, SVG_NS};

/// A reference to an Inkscape layer inside a [`Document`](crate::Document).
///
/// A layer is a `g` element with `inkscape:groupmode="layer"`.
#[derive(Clone, Copy, Debug)]
pub struct Layer<'a, 'input: 'a> {
    node: roxmltree::Node<'a, 'input>,
    z_order: usize,
}

impl<'a, 'input: 'a> Layer<'a, 'input> {
    /// Returns the `inkscape:label` attribute.
    pub fn label(&self) -> Option<&'a str> {
        self.node.attribute((INKSCAPE_NS, "label"))
    }

    /// Returns element's ID.
    ///
    /// Can be empty.
    pub fn id(&self) -> &'a str {
        self.node.attribute("id").unwrap_or_default()
    }

    /// Returns a display name: the label, or the ID when the label is empty or missing.
    ///
    /// Can be empty.
    pub fn name(&self) -> &'a str {
        self.label()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.id())
    }

    /// Returns the layer position among all layers, in document order.
    ///
    /// Lower layers are painted first.
    pub fn z_order(&self) -> usize {
        self.z_order
    }

    /// Returns the underlying XML node.
    pub fn node(&self) -> roxmltree::Node<'a, 'input> {
        self.node
    }

    /// Checks that `other` is an ancestor of this layer.
    pub fn is_nested_in(&self, other: &Layer<'a, 'input>) -> bool {
        self.node.ancestors().skip(1).any(|n| n == other.node)
    }

    /// Returns attributes other than `id`, `inkscape:groupmode` and `inkscape:label`.
    pub fn extra_attributes(&self) -> impl Iterator<Item = roxmltree::Attribute<'a, 'input>> {
        self.node.attributes().filter(|a| {
            let known = match a.namespace() {
                None => a.name() == "id",
                Some(INKSCAPE_NS) => matches!(a.name(), "groupmode" | "label"),
                Some(_) => false,
            };
            !known
        })
    }

    /// Collects shapes of this layer and all layers nested in it.
    fn shape_sources(&self) -> Vec<ShapeSource<'a>> {
        self.node
            .descendants()
            .filter_map(ShapeSource::from_node)
            .collect()
    }
}

/// Checks that a node is an Inkscape layer.
pub fn is_layer(node: roxmltree::Node) -> bool {
    node.has_tag_name((SVG_NS, "g")) && node.attribute((INKSCAPE_NS, "groupmode")) == Some("layer")
}

/// Collects all layers under `root` in document order.
pub(crate) fn collect<'a, 'input: 'a>(root: roxmltree::Node<'a, 'input>) -> Vec<Layer<'a, 'input>> {
    root.descendants()
        .filter(|n| is_layer(*n))
        .enumerate()
        .map(|(z_order, node)| Layer { node, z_order })
        .collect()
}

/// Finds a layer by its label, then by its ID.
///
/// The first match wins.
pub fn find<'a, 'input: 'a>(layers: &[Layer<'a, 'input>], query: &str) -> Option<Layer<'a, 'input>> {
    if query.is_empty() {
        return None;
    }

    layers
        .iter()
        .find(|l| l.label() == Some(query))
        .or_else(|| layers.iter().find(|l| l.id() == query))
        .copied()
}

/// Shapes of a single selected layer.
#[derive(Clone, Debug)]
pub struct LayerContent<'a, 'input: 'a> {
    /// The source layer.
    pub layer: Layer<'a, 'input>,
    /// Shapes in document order. Includes shapes of nested layers.
    pub shapes: Vec<Shape>,
}

/// The result of shape extraction.
#[derive(Clone, Debug)]
pub struct Extraction<'a, 'input: 'a> {
    /// Selected layers in paint order.
    pub layers: Vec<LayerContent<'a, 'input>>,
    /// Problems found along the way.
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a, 'input: 'a> Extraction<'a, 'input> {
    /// Returns all shapes in paint order.
    pub fn shapes(&self) -> Vec<&Shape> {
        self.layers.iter().flat_map(|l| l.shapes.iter()).collect()
    }

    /// Checks that no shapes were extracted.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|l| l.shapes.is_empty())
    }
}

/// Extracts shapes from the selected layers.
///
/// Layers are sorted by z-order and deduplicated. A layer nested in
/// another selected layer is dropped, since its shapes are already
/// included by the outer one.
///
/// Elements are interpreted in parallel, but the output order always
/// matches the document order.
pub fn extract<'a, 'input: 'a>(layers: &[Layer<'a, 'input>]) -> Extraction<'a, 'input> {
    let mut selected = layers.to_vec();
    selected.sort_by_key(|l| l.z_order);
    selected.dedup_by_key(|l| l.z_order);

    let outer: Vec<_> = selected
        .iter()
        .filter(|l| !selected.iter().any(|other| l.is_nested_in(other)))
        .copied()
        .collect();

    let mut contents = Vec::with_capacity(outer.len());
    let mut diagnostics = Vec::new();
    for layer in outer {
        let sources = layer.shape_sources();
        let converted: Vec<_> = sources.par_iter().map(ShapeSource::convert).collect();

        let mut shapes = Vec::with_capacity(converted.len());
        for (shape, diags) in converted {
            diagnostics.extend(diags);
            shapes.extend(shape);
        }

        log::debug!("Layer '{}' has {} shapes.", layer.name(), shapes.len());
        contents.push(LayerContent { layer, shapes });
    }

    Extraction {
        layers: contents,
        diagnostics,
    }
}
