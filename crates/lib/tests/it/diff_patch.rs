use strata::diff::{self, patch, DiffOptions, ModKind, PatchKind, PatchOp};
use strata::dom::Value;

use crate::helpers::{leaf_text, yaml};

#[test]
fn kind_changes_flatten_the_right_side() {
    let left = yaml(
        "\
leaf0: old
level1:
  level2: scalar
",
    );
    let right = yaml(
        "\
leaf0: new
level1:
  level2:
    a: 1
    b: 2
",
    );

    let mods = diff::diff(&left, &right, &DiffOptions::default());
    let summary: Vec<(ModKind, &str)> = mods.iter().map(|m| (m.kind, m.path.as_str())).collect();
    assert_eq!(
        summary,
        [
            (ModKind::Change, "leaf0"),
            (ModKind::Delete, "level1.level2"),
            (ModKind::Add, "level1.level2.a"),
            (ModKind::Add, "level1.level2.b"),
        ]
    );
}

#[test]
fn applying_a_diff_reproduces_the_right_side() {
    let left = yaml(
        "\
keep: same
drop: gone
change: before
nested:
  list:
    - 1
    - 2
",
    );
    let right = yaml(
        "\
keep: same
change: after
added:
  deep: yes
nested:
  list:
    - 1
    - 99
",
    );

    let mods = diff::diff(&left, &right, &DiffOptions::default());
    let mut replayed = left.clone();
    diff::apply(&mut replayed, &mods).unwrap();
    assert_eq!(replayed, right);
}

#[test]
fn diff_is_sorted_by_path_and_records_old_values() {
    let left = yaml("b: 1\na: 1\n");
    let right = yaml("b: 2\na: 2\n");
    let mods = diff::diff(&left, &right, &DiffOptions::default());
    assert_eq!(mods[0].path, "a");
    assert_eq!(mods[1].path, "b");
    assert_eq!(mods[0].old_value, Some(strata::dom::Node::from(1i64)));
}

#[test]
fn pointer_patches_edit_lists_in_place() {
    let mut doc = yaml(
        "\
root:
  list:
    - 0
    - 1
    - 3
",
    );
    patch::apply_all(
        &mut doc,
        &[
            PatchOp::new(PatchKind::Add, "/root/list/2", 2i64),
            PatchOp::new(PatchKind::Add, "/root/list/-", 4i64),
        ],
    )
    .unwrap();

    for (i, expected) in (0..5i64).enumerate() {
        assert_eq!(
            doc.leaf(&format!("root.list[{i}]")),
            Some(&Value::Int(expected)),
            "index {i}"
        );
    }
}

#[test]
fn remove_splices_and_replace_requires_existence() {
    let mut doc = yaml("list:\n  - a\n  - b\n  - c\nk: v\n");
    patch::apply(
        &mut doc,
        &PatchOp {
            op: PatchKind::Remove,
            path: "/list/1".into(),
            from: None,
            value: None,
        },
    )
    .unwrap();
    assert_eq!(leaf_text(&doc, "list[0]"), "a");
    assert_eq!(leaf_text(&doc, "list[1]"), "c");

    let err = patch::apply(
        &mut doc,
        &PatchOp::new(PatchKind::Replace, "/absent", "x"),
    )
    .unwrap_err();
    assert!(err.is_path_not_found());

    patch::apply(&mut doc, &PatchOp::new(PatchKind::Replace, "/k", "w")).unwrap();
    assert_eq!(leaf_text(&doc, "k"), "w");
}

#[test]
fn move_and_copy_rewire_nodes() {
    let mut doc = yaml("src:\n  inner: 1\nother: x\n");
    patch::apply(
        &mut doc,
        &PatchOp::rewire(PatchKind::Copy, "/src", "/copied"),
    )
    .unwrap();
    patch::apply(
        &mut doc,
        &PatchOp::rewire(PatchKind::Move, "/src", "/moved"),
    )
    .unwrap();

    assert!(doc.leaf("src.inner").is_none());
    assert_eq!(doc.leaf("moved.inner"), Some(&Value::Int(1)));
    assert_eq!(doc.leaf("copied.inner"), Some(&Value::Int(1)));
}

#[test]
fn test_op_gates_later_operations() {
    let mut doc = yaml("version: 2\nflag: off\n");
    let ops = [
        PatchOp::new(PatchKind::Test, "/version", 1i64),
        PatchOp::new(PatchKind::Replace, "/flag", "on"),
    ];
    let err = patch::apply_all(&mut doc, &ops).unwrap_err();
    assert!(err.is_test_failed());
    // The failed test stopped the sequence.
    assert_eq!(leaf_text(&doc, "flag"), "off");
}

#[test]
fn patches_never_create_parents() {
    let mut doc = yaml("a: 1\n");
    let err = patch::apply(
        &mut doc,
        &PatchOp::new(PatchKind::Add, "/missing/deep/leaf", 1i64),
    )
    .unwrap_err();
    assert!(err.is_path_not_found());
}

#[test]
fn property_paths_work_alongside_pointers() {
    let mut doc = yaml("server:\n  port: 1\n");
    patch::apply(
        &mut doc,
        &PatchOp::new(PatchKind::Replace, "server.port", 8080i64),
    )
    .unwrap();
    assert_eq!(doc.leaf("server.port"), Some(&Value::Int(8080)));
}
