use strata::dom::{Container, ListStrategy, MergeOptions, Node, Value};

use crate::helpers::{leaf_text, path, yaml};

#[test]
fn sealed_trees_reject_writes_until_cloned() {
    let mut doc = yaml("server:\n  port: 8080\n");
    doc.seal();
    let err = doc.set(&path("server.port"), 9090i64).unwrap_err();
    assert!(err.is_sealed());

    // Cloning produces an independent mutable tree.
    let mut copy = doc.clone();
    copy.set(&path("server.port"), 9090i64).unwrap();
    assert_eq!(copy.leaf("server.port"), Some(&Value::Int(9090)));
    assert_eq!(doc.leaf("server.port"), Some(&Value::Int(8080)));
}

#[test]
fn meld_merge_fills_list_holes() {
    let mut left = Container::new();
    left.set(&path("root.list[0]"), 123i64).unwrap();
    left.set(&path("root.list[1]"), 456i64).unwrap();
    let mut right = Container::new();
    right.set(&path("root.list[2]"), 789i64).unwrap();

    let merged = left.merge(&right, &MergeOptions::default());
    assert_eq!(merged.leaf("root.list[0]"), Some(&Value::Int(123)));
    assert_eq!(merged.leaf("root.list[1]"), Some(&Value::Int(456)));
    assert_eq!(merged.leaf("root.list[2]"), Some(&Value::Int(789)));

    // The other direction melds identically.
    let merged = right.merge(&left, &MergeOptions::default());
    assert_eq!(merged.leaf("root.list[0]"), Some(&Value::Int(123)));
    assert_eq!(merged.leaf("root.list[2]"), Some(&Value::Int(789)));
}

#[test]
fn merge_is_right_biased_and_fresh() {
    let base = yaml("a: 1\nshared: base\nnested:\n  keep: yes\n");
    let over = yaml("b: 2\nshared: over\nnested:\n  add: sure\n");

    let merged = base.merge(&over, &MergeOptions::default());
    assert_eq!(merged.leaf("a"), Some(&Value::Int(1)));
    assert_eq!(merged.leaf("b"), Some(&Value::Int(2)));
    assert_eq!(leaf_text(&merged, "shared"), "over");
    assert!(merged.leaf("nested.keep").is_some());
    assert!(merged.leaf("nested.add").is_some());

    // Merging sealed inputs still yields a mutable result.
    let mut sealed = base.clone();
    sealed.seal();
    let mut merged = sealed.merge(&over, &MergeOptions::default());
    merged.set(&path("post"), true).unwrap();
}

#[test]
fn append_strategy_concatenates_lists() {
    let left = yaml("hosts:\n  - alpha\n");
    let right = yaml("hosts:\n  - beta\n");
    let options = MergeOptions {
        lists: ListStrategy::Append,
    };
    let merged = left.merge(&right, &options);
    assert_eq!(leaf_text(&merged, "hosts[0]"), "alpha");
    assert_eq!(leaf_text(&merged, "hosts[1]"), "beta");
}

#[test]
fn plain_round_trip_preserves_value_kinds() {
    let doc = yaml("i: -3\nu: 18446744073709551615\nf: 1.5\nb: true\ns: text\nn: null\n");
    assert_eq!(doc.leaf("i"), Some(&Value::Int(-3)));
    assert_eq!(doc.leaf("u"), Some(&Value::Uint(u64::MAX)));
    assert_eq!(doc.leaf("f"), Some(&Value::Float(1.5)));
    assert_eq!(doc.leaf("b"), Some(&Value::Bool(true)));
    assert_eq!(doc.leaf("n"), Some(&Value::Null));

    let plain = Node::Container(doc.clone()).to_plain();
    let back = Node::from_plain(plain);
    assert_eq!(back, Node::Container(doc));
}

#[test]
fn flatten_addresses_every_leaf() {
    let doc = yaml("a:\n  b: 1\n  list:\n    - x\n    - y\n");
    let flat = doc.flatten();
    assert_eq!(
        flat.keys().collect::<Vec<_>>(),
        ["a.b", "a.list[0]", "a.list[1]"]
    );
}
