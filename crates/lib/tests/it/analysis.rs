use strata::analysis::{
    deduplicate, find_common, impact, resolve, resolve_dependencies, resolve_overlay,
};
use strata::dom::{MergeOptions, Value};
use strata::overlay::{AddOptions, DocumentSet, Overlay};

use crate::helpers::{leaf_text, yaml};

#[test]
fn nested_defaults_resolve_inside_quotes() {
    let overlay_doc = yaml(
        "\
defaults:
  username: user1
  password: pwd1
connection: username=\"${defaults.username:admin}\" password=\"${defaults.password:${defaults.missing:secret}}\";
",
    );
    let flat = overlay_doc.flatten();
    let lookup = |key: &str| flat.get(key).map(Value::render);

    let resolved = resolve(&flat["connection"].render(), &lookup).unwrap();
    assert_eq!(resolved, "username=\"user1\" password=\"pwd1\";");
}

#[test]
fn unresolved_placeholders_stay_verbatim() {
    let lookup = |_: &str| None;
    let input = "${ghost} and ${present:fine}";
    assert_eq!(resolve(input, &lookup).unwrap(), "${ghost} and fine");
}

#[test]
fn cycles_are_detected() {
    let lookup = |key: &str| match key {
        "a" => Some("${b}".to_string()),
        "b" => Some("${a}".to_string()),
        _ => None,
    };
    let err = resolve("${a}", &lookup).unwrap_err();
    assert!(err.is_cyclic());
}

#[test]
fn overlay_resolution_reports_failed_keys_with_coordinates() {
    let mut overlay = Overlay::new();
    overlay.add("base", yaml("host: db.local\nurl: jdbc://${host}/app\n"));
    overlay.add("site", yaml("broken: ${nowhere}\n"));

    let report = resolve_overlay::<fn(&str) -> bool>(&overlay, None).unwrap();
    assert_eq!(leaf_text(&report.resolved, "url"), "jdbc://db.local/app");
    assert_eq!(leaf_text(&report.resolved, "broken"), "${nowhere}");

    let coords = &report.failed["broken"];
    assert_eq!(coords.len(), 1);
    assert_eq!(coords[0].layer, "site");
    assert_eq!(coords[0].path, "broken");
}

#[test]
fn dedup_extracts_shared_entries_and_preserves_the_merged_view() {
    let mut overlay = Overlay::new();
    overlay.add("a", yaml("shared: same\nonly_a: 1\n"));
    overlay.add("b", yaml("shared: same\nonly_b: 2\n"));

    let before = overlay.merged(&MergeOptions::default());
    let outcome = deduplicate(&overlay).unwrap();
    assert_eq!(leaf_text(&outcome.common, "shared"), "same");
    assert!(outcome.overlay.layer("a").unwrap().leaf("shared").is_none());
    assert!(outcome.overlay.layer("a").unwrap().leaf("only_a").is_some());

    // Re-adding the common layer restores the original merged view.
    let mut restored = outcome.overlay.clone();
    restored.add("common", outcome.common);
    assert_eq!(restored.merged(&MergeOptions::default()), before);
}

#[test]
fn differing_values_are_never_common() {
    let mut overlay = Overlay::new();
    overlay.add("a", yaml("k: 1\n"));
    overlay.add("b", yaml("k: 2\n"));
    assert!(find_common(&overlay).unwrap().is_empty());

    // Fewer than two layers never yields common entries.
    let mut single = Overlay::new();
    single.add("only", yaml("k: 1\n"));
    assert!(find_common(&single).unwrap().is_empty());
}

#[test]
fn dependency_report_finds_orphans() {
    let mut source = Overlay::new();
    source.add(
        "defaults",
        yaml(
            "\
defaults:
  connection:
    timeout: 30
    retryCount: 3
  host: db.local
",
        ),
    );
    let mut consumers = Overlay::new();
    consumers.add("app", yaml("url: jdbc://${defaults.host}/app\n"));

    let report = resolve_dependencies(&source, &[&consumers], None);
    assert_eq!(
        report.orphan_keys,
        ["defaults.connection.retryCount", "defaults.connection.timeout"]
    );
    let hits = &report.references["defaults.host"];
    assert!(hits.iter().any(|c| c.layer == "app"));
}

#[test]
fn default_form_references_still_count() {
    let mut source = Overlay::new();
    source.add("s", yaml("key: v\n"));
    let mut consumers = Overlay::new();
    consumers.add("c", yaml("use: ${key:fallback}\n"));

    let report = resolve_dependencies(&source, &[&consumers], None);
    assert!(report.orphan_keys.is_empty());
    assert!(report.references.contains_key("key"));
}

#[test]
fn impact_omits_unreferenced_keys() {
    let mut set = DocumentSet::new();
    set.add(yaml("url: jdbc://${db.host}/app\n"), AddOptions::named("app"))
        .unwrap();

    let report = impact(&set, &["db.host", "db.port"]);
    assert!(report.contains_key("db.host"));
    assert!(!report.contains_key("db.port"));
}
