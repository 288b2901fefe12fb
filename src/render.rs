// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::borrow::Borrow;
use std::path::Path;
use std::rc::Rc;

use crate::path::DrawingOp;
use crate::units::RenderTarget;
use crate::{Color, Error, Shape, Style};

struct FillPath {
    color: tiny_skia::Color,
    path: Rc<tiny_skia::Path>,
}

struct StrokePath {
    color: tiny_skia::Color,
    stroke: tiny_skia::Stroke,
    path: Rc<tiny_skia::Path>,
}

enum Node {
    FillPath(FillPath),
    StrokePath(StrokePath),
}

/// Renders shapes into a new pixmap of the target size.
///
/// Shapes are painted in the given order. `background` fills
/// the pixmap first; without it the pixmap stays transparent.
pub fn render<S: Borrow<Shape>>(
    shapes: &[S],
    target: &RenderTarget,
    background: Option<Color>,
) -> Result<tiny_skia::Pixmap, Error> {
    let mut pixmap = tiny_skia::Pixmap::new(target.width, target.height).ok_or(Error::NoCanvas)?;

    if let Some(c) = background {
        pixmap.fill(c.to_skia(1.0));
    }

    render_to_canvas(shapes, target, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Renders shapes onto an existing canvas.
///
/// The canvas is expected to have the target size.
/// Geometry outside of it is clipped.
pub fn render_to_canvas<S: Borrow<Shape>>(
    shapes: &[S],
    target: &RenderTarget,
    pixmap: &mut tiny_skia::PixmapMut,
) {
    let ts = target.transform();
    for shape in shapes {
        for node in convert(shape.borrow()) {
            match node {
                Node::FillPath(ref path) => render_fill_path(path, ts, pixmap),
                Node::StrokePath(ref path) => render_stroke_path(path, ts, pixmap),
            }
        }
    }
}

/// Encodes a pixmap as PNG and writes it to a file.
pub fn save_png<P: AsRef<Path>>(pixmap: &tiny_skia::Pixmap, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    let data = pixmap
        .encode_png()
        .map_err(|e| Error::EncodingFailed(e.to_string()))?;
    std::fs::write(path, data).map_err(|e| Error::Io(path.to_path_buf(), e))
}

fn convert(shape: &Shape) -> Vec<Node> {
    let path = match to_skia_path(shape) {
        Some(path) => Rc::new(path),
        None => {
            log::debug!("Shape '{}' has no drawable geometry.", shape.id());
            return Vec::new();
        }
    };

    let style = shape.style();

    let mut nodes = Vec::with_capacity(2);
    if let Some(fill) = convert_fill_path(style, path.clone()) {
        nodes.push(Node::FillPath(fill));
    }

    if let Some(stroke) = convert_stroke_path(style, path) {
        nodes.push(Node::StrokePath(stroke));
    }

    nodes
}

fn to_skia_path(shape: &Shape) -> Option<tiny_skia::Path> {
    match shape {
        Shape::Path(ref p) => {
            let mut builder = tiny_skia::PathBuilder::new();
            for op in &p.data {
                match *op {
                    DrawingOp::MoveTo { x, y } => builder.move_to(x as f32, y as f32),
                    DrawingOp::LineTo { x, y } => builder.line_to(x as f32, y as f32),
                    DrawingOp::CubicTo {
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                    } => builder.cubic_to(
                        x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
                    ),
                    DrawingOp::ClosePath => builder.close(),
                }
            }

            // A lone moveto produces no path.
            builder.finish()
        }
        Shape::Rect(ref r) => {
            if !(r.width > 0.0 && r.height > 0.0) {
                return None;
            }

            let rect = tiny_skia::Rect::from_xywh(
                r.x as f32,
                r.y as f32,
                r.width as f32,
                r.height as f32,
            )?;
            Some(tiny_skia::PathBuilder::from_rect(rect))
        }
    }
}

fn convert_fill_path(style: &Style, path: Rc<tiny_skia::Path>) -> Option<FillPath> {
    let color = style.fill?;

    // Horizontal and vertical lines cannot be filled. Skip.
    if path.bounds().width() == 0.0 || path.bounds().height() == 0.0 {
        return None;
    }

    Some(FillPath {
        color: color.to_skia(style.fill_opacity),
        path,
    })
}

fn convert_stroke_path(style: &Style, path: Rc<tiny_skia::Path>) -> Option<StrokePath> {
    if !style.has_stroke() {
        return None;
    }

    let color = style.stroke?;
    let stroke = tiny_skia::Stroke {
        width: style.stroke_width as f32,
        miter_limit: style.stroke_miterlimit as f32,
        line_join: style.stroke_linejoin.to_skia(),
        ..tiny_skia::Stroke::default()
    };

    Some(StrokePath {
        color: color.to_skia(style.stroke_opacity),
        stroke,
        path,
    })
}

fn render_fill_path(path: &FillPath, transform: tiny_skia::Transform, pixmap: &mut tiny_skia::PixmapMut) {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(path.color);
    paint.anti_alias = true;

    pixmap.fill_path(&path.path, &paint, tiny_skia::FillRule::Winding, transform, None);
}

fn render_stroke_path(path: &StrokePath, transform: tiny_skia::Transform, pixmap: &mut tiny_skia::PixmapMut) {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(path.color);
    paint.anti_alias = true;

    pixmap.stroke_path(&path.path, &paint, &path.stroke, transform, None);
}
