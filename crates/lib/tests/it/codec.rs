use std::fs;
use std::io::Write as _;

use strata::codec::{CodecError, Format};
use strata::dom::Value;
use strata::morph::Morpher;

use crate::helpers::{leaf_text, yaml};

#[test]
fn yaml_and_json_decode_to_the_same_tree() {
    let from_yaml = yaml("server:\n  port: 8080\n  hosts:\n    - alpha\n    - beta\n");
    let from_json = Format::Json
        .decode_str(r#"{"server": {"port": 8080, "hosts": ["alpha", "beta"]}}"#)
        .unwrap();
    assert_eq!(from_yaml, from_json);
}

#[test]
fn properties_encode_is_flat_and_sorted() {
    let doc = yaml("z: last\na:\n  b: 1\n  list:\n    - x\n");
    let text = Format::Properties.encode_to_string(&doc).unwrap();
    assert_eq!(text, "a.b=1\na.list[0]=x\nz=last\n");
}

#[test]
fn properties_decode_builds_nested_trees() {
    let doc = Format::Properties
        .decode_str("server.port=8080\nserver.hosts[0]=alpha\n# comment\n\n! also comment\n")
        .unwrap();
    assert_eq!(leaf_text(&doc, "server.port"), "8080");
    assert_eq!(leaf_text(&doc, "server.hosts[0]"), "alpha");
    // Properties values are always text.
    assert_eq!(doc.leaf("server.port"), Some(&Value::Text("8080".into())));
}

#[test]
fn non_container_top_level_is_rejected() {
    for (format, input) in [(Format::Yaml, "- a\n- b\n"), (Format::Json, "[1, 2]")] {
        let err = format.decode_str(input).unwrap_err();
        assert!(err.is_top_level_not_container(), "{format:?}");
    }
}

#[test]
fn transcode_converts_between_formats() {
    let mut out = Vec::new();
    Morpher::transcode(
        &mut r#"{"a": {"b": "v"}}"#.as_bytes(),
        Format::Json,
        &mut out,
        Format::Properties,
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a.b=v\n");
}

#[test]
fn extension_dispatch_reads_files() {
    let dir = tempfile::tempdir().unwrap();
    let yaml_file = dir.path().join("config.yml");
    fs::write(&yaml_file, "key: from-yaml\n").unwrap();
    let props_file = dir.path().join("config.properties");
    let mut file = fs::File::create(&props_file).unwrap();
    writeln!(file, "key=from-props").unwrap();

    for (path, expected) in [(yaml_file, "from-yaml"), (props_file, "from-props")] {
        let format = Format::from_extension(&path).unwrap();
        let doc = format.decode(&mut fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(leaf_text(&doc, "key"), expected);
    }
    assert_eq!(Format::from_extension("config.ini"), None);
}

#[test]
fn json_round_trip_preserves_number_kinds() {
    let text = r#"{"i": -1, "u": 18446744073709551615, "f": 0.5}"#;
    let doc = Format::Json.decode_str(text).unwrap();
    assert_eq!(doc.leaf("i"), Some(&Value::Int(-1)));
    assert_eq!(doc.leaf("u"), Some(&Value::Uint(u64::MAX)));
    assert_eq!(doc.leaf("f"), Some(&Value::Float(0.5)));

    let encoded = Format::Json.encode_to_string(&doc).unwrap();
    assert_eq!(Format::Json.decode_str(&encoded).unwrap(), doc);
}

#[test]
fn properties_errors_carry_line_numbers() {
    let err = Format::Properties
        .decode_str("good=1\nbad-line-without-separator\n")
        .unwrap_err();
    match err {
        CodecError::InvalidInput { reason } => assert!(reason.contains('2'), "{reason}"),
        other => panic!("unexpected error: {other}"),
    }
}
