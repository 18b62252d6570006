use strata::path::{pointer, property, Component, Path, PathSyntax, UniversalPath};

#[test]
fn property_grammar_round_trips() {
    for input in [
        "server.port",
        "a.list[0].name",
        "deep[1][2]",
        r"dotted\.key.plain",
    ] {
        let parsed = property::parse(input).unwrap();
        assert_eq!(property::serialize(&parsed), input, "{input}");
    }
}

#[test]
fn pointer_grammar_round_trips() {
    for input in ["/server/port", "/a/0/name", "/esc~0tilde/esc~1slash", "/list/-"] {
        let parsed = pointer::parse(input).unwrap();
        assert_eq!(pointer::serialize(&parsed), input, "{input}");
    }
}

#[test]
fn both_grammars_reach_the_same_components() {
    let from_property = property::parse("server.hosts[0].name").unwrap();
    let from_pointer = pointer::parse("/server/hosts/0/name").unwrap();
    assert_eq!(from_property.len(), from_pointer.len());
    // The pointer segment `0` stays a key but acts as an index.
    assert_eq!(
        from_pointer.components()[2].as_index(),
        from_property.components()[2].as_index(),
    );
}

#[test]
fn after_last_marker_parses_only_from_pointers() {
    let parsed = pointer::parse("/list/-").unwrap();
    assert!(parsed.last().unwrap().is_after_last());
    // A property path `-` is an ordinary key.
    let parsed = property::parse("list.-").unwrap();
    assert_eq!(parsed.last().unwrap().as_key(), Some("-"));
}

#[test]
fn paths_compose_structurally() {
    let base = Path::from_components(["server", "hosts"]);
    let extended = base.child(0usize).child("name");
    assert_eq!(extended.to_string(), "server.hosts[0].name");
    assert_eq!(extended.parent().unwrap(), base.child(0usize));
    assert_eq!(
        base.join(&Path::from_components(["extra"])).to_string(),
        "server.hosts.extra"
    );

    let (first, rest) = extended.split_first().unwrap();
    assert_eq!(first, &Component::key("server"));
    assert_eq!(rest.len(), 3);
}

#[test]
fn universal_path_accepts_bare_and_tagged_forms() {
    let plain: UniversalPath = serde_json::from_str(r#""a.b[1]""#).unwrap();
    assert_eq!(plain.parse().unwrap().to_string(), "a.b[1]");

    let tagged: UniversalPath =
        serde_json::from_str(r#"{"value": "/a/b/1", "syntax": "rfc6901"}"#).unwrap();
    let parsed = tagged.parse().unwrap();
    assert_eq!(parsed.components()[0].as_key(), Some("a"));
    assert_eq!(parsed.components()[2].as_index(), Some(1));
}

#[test]
fn syntaxes_serialize_any_path() {
    let path = property::parse("a.list[2]").unwrap();
    assert_eq!(PathSyntax::Properties.serialize(&path), "a.list[2]");
    assert_eq!(PathSyntax::Rfc6901.serialize(&path), "/a/list/2");
}
