use svglayer::{AspectPolicy, Color, Document, Error, Options};

use crate::{pixel, render_layers, BLUE, DRAWING, GREEN, LETTER, RED, TRANSPARENT, WHITE};

#[test]
fn natural_size() {
    let pixmap = render_layers(&DRAWING, &["Shapes"], &Options::default());
    assert_eq!((pixmap.width(), pixmap.height()), (100, 50));
    assert_eq!(pixel(&pixmap, 20, 20), RED);
    assert_eq!(pixel(&pixmap, 75, 15), BLUE);
    assert_eq!(pixel(&pixmap, 50, 44), GREEN);
    assert_eq!(pixel(&pixmap, 50, 45), GREEN);
    assert_eq!(pixel(&pixmap, 5, 5), TRANSPARENT);
}

#[test]
fn with_dpi() {
    let opt = Options {
        dpi: Some(254.0),
        ..Options::default()
    };
    let pixmap = render_layers(&DRAWING, &["Shapes"], &opt);
    assert_eq!((pixmap.width(), pixmap.height()), (1000, 500));
    assert_eq!(pixel(&pixmap, 200, 200), RED);
    assert_eq!(pixel(&pixmap, 750, 150), BLUE);
    assert_eq!(pixel(&pixmap, 500, 445), GREEN);
    assert_eq!(pixel(&pixmap, 50, 50), TRANSPARENT);
}

#[test]
fn layers_are_painted_in_document_order() {
    // The request order does not matter.
    let pixmap = render_layers(&DRAWING, &["Shapes", "Background"], &Options::default());
    assert_eq!(pixel(&pixmap, 5, 5), WHITE);
    assert_eq!(pixel(&pixmap, 20, 20), RED);
}

#[test]
fn nested_layer_alone() {
    let pixmap = render_layers(&DRAWING, &["Details"], &Options::default());
    assert_eq!(pixel(&pixmap, 50, 45), GREEN);
    assert_eq!(pixel(&pixmap, 20, 20), TRANSPARENT);
}

#[test]
fn background_color() {
    let opt = Options {
        background: Some(Color::new_rgb(0, 0, 255)),
        ..Options::default()
    };
    let pixmap = render_layers(&DRAWING, &["Details"], &opt);
    assert_eq!(pixel(&pixmap, 5, 5), BLUE);
}

#[test]
fn letter_size_strict() {
    let doc = Document::parse(&LETTER).unwrap();
    let opt = Options {
        dpi: Some(300.0),
        ..Options::default()
    };
    assert!(matches!(
        doc.render_target(&opt),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn letter_size_fit() {
    let opt = Options {
        dpi: Some(30.0),
        aspect: AspectPolicy::Fit,
        ..Options::default()
    };
    let pixmap = render_layers(&LETTER, &["Page"], &opt);
    assert_eq!((pixmap.width(), pixmap.height()), (255, 330));

    // The canvas is narrower than the page, so the sides stay empty.
    assert_eq!(pixel(&pixmap, 2, 165).a, 0);
    assert_eq!(pixel(&pixmap, 127, 165).a, 255);
    assert_eq!(pixel(&pixmap, 252, 165).a, 0);
}
