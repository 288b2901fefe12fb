use std::path::PathBuf;
use std::process::{Command, Output};

use svglayer::Document;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svglayer"))
        .args(args)
        .output()
        .unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("svglayer-{}-{}", std::process::id(), name))
}

#[test]
fn list_layers() {
    let out = run(&["--list-layers", "tests/files/drawing.svg"]);
    assert_eq!(out.status.code(), Some(0));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with("Layers in tests/files/drawing.svg:"));
    assert!(stdout.contains("  1. Background\n"));
    assert!(stdout.contains("  4. Notes\n"));
}

#[test]
fn missing_layer() {
    let output = temp_path("missing.png");
    let out = run(&[
        "-l",
        "Nope",
        "-o",
        output.to_str().unwrap(),
        "tests/files/drawing.svg",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!output.exists());

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("layer 'Nope' not found"));
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("  2. Shapes\n"));
}

#[test]
fn no_layers_selected() {
    let out = run(&["-o", "out.png", "tests/files/drawing.svg"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn aspect_mismatch() {
    let output = temp_path("letter.png");
    let out = run(&[
        "-l",
        "Page",
        "--dpi",
        "30",
        "-o",
        output.to_str().unwrap(),
        "tests/files/letter.svg",
    ]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!output.exists());
}

#[test]
fn missing_input() {
    let out = run(&["--list-layers", "tests/files/no-such-file.svg"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn raster_and_vector() {
    let png = temp_path("shapes.png");
    let svg = temp_path("shapes.svg");
    let out = run(&[
        "--quiet",
        "-l",
        "Shapes",
        "--dpi",
        "127",
        "-o",
        png.to_str().unwrap(),
        "-o",
        svg.to_str().unwrap(),
        "tests/files/drawing.svg",
    ]);
    assert_eq!(out.status.code(), Some(0));

    let pixmap = tiny_skia::Pixmap::load_png(&png).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (500, 250));

    let text = std::fs::read_to_string(&svg).unwrap();
    let doc = Document::parse(&text).unwrap();
    assert_eq!(doc.layer_names(), ["Shapes"]);

    std::fs::remove_file(png).unwrap();
    std::fs::remove_file(svg).unwrap();
}

#[test]
fn forced_format() {
    let output = temp_path("forced.out");
    let out = run(&[
        "-l",
        "Background",
        "-f",
        "svg",
        "-o",
        output.to_str().unwrap(),
        "tests/files/drawing.svg",
    ]);
    assert_eq!(out.status.code(), Some(0));

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("<svg"));
    std::fs::remove_file(output).unwrap();
}

#[test]
fn failed_output_does_not_stop_others() {
    let png = temp_path("sibling.png");
    let svg = temp_path("sibling.svg");
    let out = run(&[
        "-l",
        "Page",
        "--dpi",
        "30",
        "-o",
        png.to_str().unwrap(),
        "-o",
        svg.to_str().unwrap(),
        "tests/files/letter.svg",
    ]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!png.exists());
    assert!(svg.exists());

    std::fs::remove_file(svg).unwrap();
}

#[test]
fn fractional_dpi() {
    let png = temp_path("fractional.png");
    let out = run(&[
        "-l",
        "Shapes",
        "--dpi",
        "50.8",
        "-o",
        png.to_str().unwrap(),
        "tests/files/drawing.svg",
    ]);
    assert_eq!(out.status.code(), Some(0));

    let pixmap = tiny_skia::Pixmap::load_png(&png).unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (200, 100));
    std::fs::remove_file(png).unwrap();
}

#[test]
fn dpi_out_of_bounds() {
    let out = run(&["-l", "Shapes", "--dpi", "4000.5", "-o", "out.png", "tests/files/drawing.svg"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn background_color() {
    let png = temp_path("background.png");
    let out = run(&[
        "-l",
        "Details",
        "--background",
        "rgb(0, 0, 255)",
        "-o",
        png.to_str().unwrap(),
        "tests/files/drawing.svg",
    ]);
    assert_eq!(out.status.code(), Some(0));

    let pixmap = tiny_skia::Pixmap::load_png(&png).unwrap();
    let c = pixmap.pixel(5, 5).unwrap();
    assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0, 0, 255, 255));
    std::fs::remove_file(png).unwrap();
}
