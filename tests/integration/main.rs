use once_cell::sync::Lazy;
use rgb::{FromSlice, RGBA8};

use svglayer::{Document, Options};

mod cli;
mod export;
mod render;

pub static DRAWING: Lazy<String> =
    Lazy::new(|| svglayer::read_file("tests/files/drawing.svg").unwrap());

pub static LETTER: Lazy<String> =
    Lazy::new(|| svglayer::read_file("tests/files/letter.svg").unwrap());

pub const WHITE: RGBA8 = RGBA8 { r: 255, g: 255, b: 255, a: 255 };
pub const RED: RGBA8 = RGBA8 { r: 255, g: 0, b: 0, a: 255 };
pub const GREEN: RGBA8 = RGBA8 { r: 0, g: 255, b: 0, a: 255 };
pub const BLUE: RGBA8 = RGBA8 { r: 0, g: 0, b: 255, a: 255 };
pub const TRANSPARENT: RGBA8 = RGBA8 { r: 0, g: 0, b: 0, a: 0 };

/// Renders the named layers of `text` and returns the pixmap.
pub fn render_layers(text: &str, names: &[&str], opt: &Options) -> tiny_skia::Pixmap {
    let doc = Document::parse(text).unwrap();
    let layers = doc.select_layers(names).unwrap();
    let extraction = svglayer::extract(&layers);
    let target = doc.render_target(opt).unwrap();
    svglayer::render(&extraction.shapes(), &target, opt.background).unwrap()
}

/// Returns a pixel color. Only fully opaque or fully transparent
/// pixels are compared, so premultiplication does not matter.
pub fn pixel(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> RGBA8 {
    let idx = (y * pixmap.width() + x) as usize;
    pixmap.data().as_rgba()[idx]
}
