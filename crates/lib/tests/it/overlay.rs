use strata::dom::{MergeOptions, Node, Value};
use strata::overlay::{AddOptions, AddPolicy, DocumentSet, Manifest, ManifestKind, Overlay};

use crate::helpers::{leaf_text, path, yaml};

fn layered() -> Overlay {
    let mut overlay = Overlay::new();
    overlay.add("defaults", yaml("timeout: 30\nretries: 3\nname: base\n"));
    overlay.add("site", yaml("timeout: 60\nregion: eu\n"));
    overlay
}

#[test]
fn lookup_any_prefers_earlier_layers() {
    let overlay = layered();
    let (layer, node) = overlay.lookup_any(&path("timeout")).unwrap();
    assert_eq!(layer, "defaults");
    assert_eq!(node, &Node::from(30i64));

    let (layer, _) = overlay.lookup_any(&path("region")).unwrap();
    assert_eq!(layer, "site");
    assert!(overlay.lookup_any(&path("absent")).is_none());
}

#[test]
fn merged_view_is_right_biased() {
    let merged = layered().merged(&MergeOptions::default());
    // "site" was added after "defaults", so its timeout wins.
    assert_eq!(merged.leaf("timeout"), Some(&Value::Int(60)));
    assert_eq!(leaf_text(&merged, "name"), "base");
    assert_eq!(leaf_text(&merged, "region"), "eu");
}

#[test]
fn re_adding_a_layer_keeps_its_position() {
    let mut overlay = layered();
    overlay.add("defaults", yaml("timeout: 15\n"));
    assert_eq!(overlay.layer_names(), ["defaults", "site"]);
    // Merged order is unchanged, so "site" still wins.
    let merged = overlay.merged(&MergeOptions::default());
    assert_eq!(merged.leaf("timeout"), Some(&Value::Int(60)));
}

#[test]
fn put_and_populate_create_layers_on_demand() {
    let mut overlay = Overlay::new();
    overlay.put("fresh", &path("a.b"), "v").unwrap();
    overlay
        .populate("fresh", &path("sub"), yaml("x: 1\n"))
        .unwrap();
    assert_eq!(overlay.layer_names(), ["fresh"]);
    assert_eq!(
        overlay.lookup("fresh", &path("a.b")),
        Some(&Node::from("v"))
    );
    assert_eq!(
        overlay.lookup("fresh", &path("sub.x")),
        Some(&Node::from(1i64))
    );
}

#[test]
fn search_reports_coordinates_per_layer() {
    let overlay = layered();
    let hits = overlay.search(|_, value| matches!(value, Value::Int(_)));
    let rendered: Vec<String> = hits.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["defaults:retries", "defaults:timeout", "site:timeout"]);
}

#[test]
fn search_with_serializes_pointer_coordinates() {
    let mut overlay = Overlay::new();
    overlay.add("site", yaml("server:\n  hosts:\n    - alpha\n    - beta\n"));

    let hits = overlay.search_with(
        |_, value| matches!(value, Value::Text(_)),
        strata::path::PathSyntax::Rfc6901,
    );
    let rendered: Vec<String> = hits.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["site:/server/hosts/0", "site:/server/hosts/1"]);
}

#[test]
fn tagged_subsets_select_insertion_ordered_layers() {
    let mut set = DocumentSet::new();
    set.add(yaml("a: 1\n"), AddOptions::named("base").tag("prod").tag("dev"))
        .unwrap();
    set.add(yaml("b: 2\n"), AddOptions::named("prod-only").tag("prod"))
        .unwrap();
    set.add(yaml("c: 3\n"), AddOptions::named("dev-only").tag("dev"))
        .unwrap();

    let prod = set.tagged_subset(["prod"]);
    assert_eq!(prod.layer_names(), ["base", "prod-only"]);

    // The wildcard tag matches every document.
    assert_eq!(set.as_one().layer_names(), ["base", "prod-only", "dev-only"]);
}

#[test]
fn unnamed_documents_and_duplicate_policies() {
    let mut set = DocumentSet::new();
    let generated = set.add(yaml("x: 1\n"), AddOptions::default()).unwrap();
    assert_eq!(generated, "default__1");

    set.add(yaml("y: 1\n"), AddOptions::named("fixed")).unwrap();
    let err = set
        .add(
            yaml("y: 2\n"),
            AddOptions::named("fixed").policy(AddPolicy::MustCreate),
        )
        .unwrap_err();
    assert!(err.is_layer_exists());

    // MergeTags keeps the original content but unions the tags.
    set.add(
        yaml("y: 3\n"),
        AddOptions::named("fixed")
            .tag("extra")
            .policy(AddPolicy::MergeTags),
    )
    .unwrap();
    assert_eq!(set.get("fixed").unwrap().leaf("y"), Some(&Value::Int(1)));
    assert!(set.tags("fixed").unwrap().contains("extra"));
}

const SECRET: &str = "\
kind: Secret
metadata:
  name: app-secrets
stringData:
  app.yaml: |
    db:
      url: jdbc:postgresql://localhost/app
  notes.txt: not a config
data:
  blob.bin: AQID
";

#[test]
fn manifests_expose_text_and_binary_entries() {
    let manifest = Manifest::parse(SECRET).unwrap();
    assert_eq!(manifest.kind(), ManifestKind::Secret);
    assert_eq!(manifest.name(), Some("app-secrets"));
    assert_eq!(
        manifest.binary_data().unwrap()["blob.bin"],
        vec![1u8, 2, 3]
    );
}

#[test]
fn manifest_entries_become_documents() {
    let manifest = Manifest::parse(SECRET).unwrap();
    let mut set = DocumentSet::new();
    let added = set
        .add_documents_from_manifest(&manifest, &AddOptions::default().tag("secret"))
        .unwrap();
    // notes.txt has no codec and is skipped.
    assert_eq!(added, ["app.yaml"]);
    assert_eq!(
        leaf_text(set.get("app.yaml").unwrap(), "db.url"),
        "jdbc:postgresql://localhost/app"
    );
    assert!(set.tags("app.yaml").unwrap().contains("secret"));
}

#[test]
fn config_map_entries_become_property_leaves() {
    let manifest = Manifest::parse(
        "\
kind: ConfigMap
metadata:
  name: app-config
data:
  server.port: '8080'
  server.host: localhost
",
    )
    .unwrap();
    let mut set = DocumentSet::new();
    let name = set
        .add_properties_from_manifest(&manifest, AddOptions::default())
        .unwrap();
    assert_eq!(name, "app-config");
    let doc = set.get("app-config").unwrap();
    assert_eq!(leaf_text(doc, "server.port"), "8080");
    assert_eq!(leaf_text(doc, "server.host"), "localhost");
}
