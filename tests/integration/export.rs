use svglayer::{Diagnostic, Document, Error, WriteOptions, SODIPODI_NS};

use crate::DRAWING;

fn shapes_of(text: &str, names: &[&str]) -> Vec<svglayer::Shape> {
    let doc = Document::parse(text).unwrap();
    let layers = doc.select_layers(names).unwrap();
    let extraction = svglayer::extract(&layers);
    extraction.shapes().into_iter().cloned().collect()
}

fn export_layers(text: &str, names: &[&str], opt: &WriteOptions) -> String {
    let doc = Document::parse(text).unwrap();
    let layers = doc.select_layers(names).unwrap();
    let extraction = svglayer::extract(&layers);
    svglayer::export(&extraction.layers, &doc, opt)
}

#[test]
fn list_layers() {
    let doc = Document::parse(&DRAWING).unwrap();
    assert_eq!(doc.layer_names(), ["Background", "Shapes", "Details", "Notes"]);
}

#[test]
fn unknown_layer() {
    let doc = Document::parse(&DRAWING).unwrap();
    match doc.select_layers(&["Shapes", "Missing"]) {
        Err(e @ Error::LayerNotFound { .. }) => {
            assert_eq!(
                e.to_string(),
                "layer 'Missing' not found. Available layers: Background, Shapes, Details, Notes"
            );
        }
        r => panic!("unexpected result: {:?}", r.map(|v| v.len())),
    }
}

#[test]
fn layer_by_id() {
    let by_id = shapes_of(&DRAWING, &["layer2"]);
    let by_label = shapes_of(&DRAWING, &["Shapes"]);
    assert_eq!(by_id, by_label);
}

#[test]
fn non_layer_groups_are_ignored() {
    let doc = Document::parse(&DRAWING).unwrap();
    assert!(doc.find_layer("not-a-layer").is_err());

    let all = shapes_of(&DRAWING, &["Background", "Shapes", "Notes"]);
    assert!(all.iter().all(|s| s.id() != "ignored"));
}

#[test]
fn diagnostics() {
    let doc = Document::parse(&DRAWING).unwrap();
    let layers = doc.select_layers(&["Notes"]).unwrap();
    let extraction = svglayer::extract(&layers);

    let ids: Vec<_> = extraction.shapes().iter().map(|s| s.id()).collect();
    assert_eq!(ids, ["curve"]);

    assert_eq!(extraction.diagnostics.len(), 3);
    assert!(matches!(
        extraction.diagnostics[2],
        Diagnostic::MissingAttribute { name: "height", .. }
    ));
}

#[test]
fn broken_path_keeps_valid_prefix() {
    let doc = Document::parse(&DRAWING).unwrap();
    let layers = doc.select_layers(&["Details"]).unwrap();
    let extraction = svglayer::extract(&layers);

    assert_eq!(extraction.shapes().len(), 2);
    assert_eq!(extraction.diagnostics.len(), 1);
    match extraction.diagnostics[0] {
        Diagnostic::Path { ref element_id, .. } => assert_eq!(element_id, "broken-line"),
        ref d => panic!("unexpected diagnostic: {}", d),
    }
}

#[test]
fn round_trip() {
    let names = ["Background", "Shapes", "Notes"];
    let exported = export_layers(&DRAWING, &names, &WriteOptions::default());
    assert_eq!(shapes_of(&exported, &names), shapes_of(&DRAWING, &names));
}

#[test]
fn round_trip_with_absolute_paths() {
    let opt = WriteOptions {
        absolute_paths: true,
        ..WriteOptions::default()
    };
    let exported = export_layers(&DRAWING, &["Shapes"], &opt);

    let before = shapes_of(&DRAWING, &["Shapes"]);
    let after = shapes_of(&exported, &["Shapes"]);
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after.iter()) {
        match (a, b) {
            (svglayer::Shape::Path(a), svglayer::Shape::Path(b)) => {
                assert_eq!(a.data, b.data);
                assert_eq!(a.style, b.style);
            }
            _ => assert_eq!(a, b),
        }
    }
}

#[test]
fn exported_document() {
    let exported = export_layers(&DRAWING, &["Details"], &WriteOptions::default());
    let doc = Document::parse(&exported).unwrap();

    assert_eq!(doc.canvas(), Document::parse(&DRAWING).unwrap().canvas());
    assert_eq!(doc.layer_names(), ["Details"]);
    assert_eq!(
        doc.root().attribute((SODIPODI_NS, "docname")),
        Some("drawing.svg")
    );

    // Only layers and their shapes are written.
    assert!(!exported.contains("namedview"));
    assert!(!exported.contains("red-box"));
}

#[test]
fn nested_layers_are_flattened() {
    let exported = export_layers(&DRAWING, &["Shapes", "Details"], &WriteOptions::default());
    let doc = Document::parse(&exported).unwrap();
    assert_eq!(doc.layer_names(), ["Shapes"]);

    let ids: Vec<_> = shapes_of(&exported, &["Shapes"])
        .iter()
        .map(|s| s.id().to_string())
        .collect();
    assert_eq!(ids, ["red-box", "blue-triangle", "broken-line", "green-line"]);
}
