//! Structural diff between containers.
//!
//! [`diff`] walks two containers in lockstep and emits an ordered list
//! of [`Modification`] entries. Nodes of different kinds are replaced
//! wholesale: a delete of the old node followed by adds at every leaf
//! of the new one. Lists use replacement semantics by default; a
//! custom list strategy can be supplied through [`DiffOptions`].
//! [`apply`] replays a modification list onto a container, so
//! `apply(a, diff(a, b))` reproduces `b`.

use std::sync::Arc;

use crate::dom::{Container, List, Node};
use crate::path::{Component, Path, PathSyntax};

mod errors;
pub mod patch;

pub use errors::DiffError;
pub use patch::{PatchKind, PatchOp};

/// The kind of a single modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModKind {
    /// A node present only on the right.
    Add,
    /// A leaf whose value changed.
    Change,
    /// A node present only on the left.
    Delete,
}

/// One entry of a structural diff.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Modification {
    /// What happened at the path.
    pub kind: ModKind,
    /// Property-path of the affected node.
    pub path: String,
    /// The new node, for adds and changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Node>,
    /// The replaced node, for changes and deletes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Node>,
}

impl Modification {
    fn add(path: &Path, value: Node) -> Self {
        Modification {
            kind: ModKind::Add,
            path: PathSyntax::Properties.serialize(path),
            value: Some(value),
            old_value: None,
        }
    }

    fn change(path: &Path, value: Node, old_value: Node) -> Self {
        Modification {
            kind: ModKind::Change,
            path: PathSyntax::Properties.serialize(path),
            value: Some(value),
            old_value: Some(old_value),
        }
    }

    fn delete(path: &Path, old_value: Node) -> Self {
        Modification {
            kind: ModKind::Delete,
            path: PathSyntax::Properties.serialize(path),
            value: None,
            old_value: Some(old_value),
        }
    }
}

/// How two lists at the same path are compared.
#[derive(Clone, Default)]
pub enum ListDiff {
    /// Unequal lists are replaced wholesale.
    #[default]
    Replace,
    /// A caller-supplied list comparison.
    Custom(Arc<dyn Fn(&Path, &List, &List) -> Vec<Modification> + Send + Sync>),
}

impl std::fmt::Debug for ListDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListDiff::Replace => f.write_str("Replace"),
            ListDiff::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options for [`diff`].
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// List comparison strategy.
    pub lists: ListDiff,
}

/// Computes the ordered modification list turning `left` into `right`.
pub fn diff(left: &Container, right: &Container, options: &DiffOptions) -> Vec<Modification> {
    let mut out = Vec::new();
    diff_containers(&Path::root(), left, right, options, &mut out);
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

fn diff_containers(
    path: &Path,
    left: &Container,
    right: &Container,
    options: &DiffOptions,
    out: &mut Vec<Modification>,
) {
    for (key, left_child) in left.children() {
        let child_path = path.child(Component::Key(key.clone()));
        match right.child(key) {
            Some(right_child) => diff_nodes(&child_path, left_child, right_child, options, out),
            None => out.push(Modification::delete(&child_path, left_child.clone())),
        }
    }
    for (key, right_child) in right.children() {
        if !left.contains_key(key) {
            let child_path = path.child(Component::Key(key.clone()));
            add_flattened(&child_path, right_child, out);
        }
    }
}

fn diff_nodes(
    path: &Path,
    left: &Node,
    right: &Node,
    options: &DiffOptions,
    out: &mut Vec<Modification>,
) {
    if !left.same_kind(right) {
        out.push(Modification::delete(path, left.clone()));
        add_flattened(path, right, out);
        return;
    }
    match (left, right) {
        (Node::Leaf(l), Node::Leaf(r)) => {
            if l != r {
                out.push(Modification::change(
                    path,
                    Node::Leaf(r.clone()),
                    Node::Leaf(l.clone()),
                ));
            }
        }
        (Node::Container(l), Node::Container(r)) => diff_containers(path, l, r, options, out),
        (Node::List(l), Node::List(r)) => match &options.lists {
            ListDiff::Replace => {
                if l != r {
                    out.push(Modification::delete(path, left.clone()));
                    add_flattened(path, right, out);
                }
            }
            ListDiff::Custom(compare) => out.extend(compare(path, l, r)),
        },
        _ => unreachable!("same_kind holds"),
    }
}

/// Emits an `Add` at every leaf under `node`.
fn add_flattened(path: &Path, node: &Node, out: &mut Vec<Modification>) {
    match node {
        Node::Leaf(value) => out.push(Modification::add(path, Node::Leaf(value.clone()))),
        Node::Container(container) => {
            for (leaf_path, value) in container.leaves() {
                out.push(Modification::add(
                    &path.join(&leaf_path),
                    Node::Leaf(value.clone()),
                ));
            }
        }
        Node::List(list) => {
            for (index, item) in list.iter() {
                add_flattened(&path.child(Component::Index(index)), item, out);
            }
        }
    }
}

/// Replays a modification list onto a container.
pub fn apply(target: &mut Container, modifications: &[Modification]) -> Result<(), DiffError> {
    for modification in modifications {
        let path = PathSyntax::Properties.parse(&modification.path)?;
        match modification.kind {
            ModKind::Add | ModKind::Change => {
                let value = modification
                    .value
                    .clone()
                    .ok_or(DiffError::MissingField { field: "value" })?;
                target.set(&path, value)?;
            }
            ModKind::Delete => {
                target.delete(&path)?;
            }
        }
    }
    Ok(())
}
