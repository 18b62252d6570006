//! RFC 6902 patch operations evaluated against the DOM.
//!
//! Paths starting with `/` are parsed as JSON pointers, anything else
//! as a property path; both address the same tree. Parents must
//! already exist: patch never creates intermediate nodes.

use serde::{Deserialize, Serialize};

use crate::dom::{Container, List, Node};
use crate::path::{Component, Path, PathSyntax};

use super::DiffError;

/// The six RFC 6902 operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

/// One patch operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOp {
    /// The operation kind.
    pub op: PatchKind,
    /// Target path.
    pub path: String,
    /// Source path for `move` and `copy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Literal value for `add`, `replace` and `test`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Node>,
}

impl PatchOp {
    /// A literal-value operation.
    pub fn new(op: PatchKind, path: impl Into<String>, value: impl Into<Node>) -> Self {
        PatchOp {
            op,
            path: path.into(),
            from: None,
            value: Some(value.into()),
        }
    }

    /// A `move` or `copy` operation.
    pub fn rewire(op: PatchKind, from: impl Into<String>, path: impl Into<String>) -> Self {
        PatchOp {
            op,
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }
}

/// Parses a patch path: `/`-prefixed strings are JSON pointers,
/// everything else a property path.
fn parse_path(input: &str) -> Result<Path, DiffError> {
    let syntax = if input.starts_with('/') {
        PathSyntax::Rfc6901
    } else {
        PathSyntax::Properties
    };
    Ok(syntax.parse(input)?)
}

/// Applies a sequence of operations in order, stopping at the first
/// failure.
pub fn apply_all(target: &mut Container, ops: &[PatchOp]) -> Result<(), DiffError> {
    for op in ops {
        apply(target, op)?;
    }
    Ok(())
}

/// Applies one operation.
pub fn apply(target: &mut Container, op: &PatchOp) -> Result<(), DiffError> {
    let path = parse_path(&op.path)?;
    match op.op {
        PatchKind::Add => {
            let value = required_value(op)?;
            insert_at(target, &path, value, false, &op.path)
        }
        PatchKind::Replace => {
            let value = required_value(op)?;
            insert_at(target, &path, value, true, &op.path)
        }
        PatchKind::Remove => {
            remove_at(target, &path, &op.path)?;
            Ok(())
        }
        PatchKind::Move => {
            let from_str = required_from(op)?;
            let from = parse_path(from_str)?;
            let removed = remove_at(target, &from, from_str)?;
            insert_at(target, &path, removed, false, &op.path)
        }
        PatchKind::Copy => {
            let from_str = required_from(op)?;
            let from = parse_path(from_str)?;
            let node = target
                .get(&from)
                .cloned()
                .ok_or_else(|| DiffError::PathNotFound {
                    path: from_str.to_string(),
                })?;
            insert_at(target, &path, node, false, &op.path)
        }
        PatchKind::Test => {
            let value = required_value(op)?;
            let existing = target.get(&path).ok_or_else(|| DiffError::PathNotFound {
                path: op.path.clone(),
            })?;
            if existing != &value {
                return Err(DiffError::TestFailed {
                    path: op.path.clone(),
                });
            }
            Ok(())
        }
    }
}

fn required_value(op: &PatchOp) -> Result<Node, DiffError> {
    op.value
        .clone()
        .ok_or(DiffError::MissingField { field: "value" })
}

fn required_from(op: &PatchOp) -> Result<&str, DiffError> {
    op.from
        .as_deref()
        .ok_or(DiffError::MissingField { field: "from" })
}

enum ParentMut<'a> {
    Root(&'a mut Container),
    Node(&'a mut Node),
}

fn locate_parent<'a>(
    root: &'a mut Container,
    path: &Path,
    original: &str,
) -> Result<(ParentMut<'a>, Component), DiffError> {
    // Callers guarantee a non-empty path.
    let Some(last) = path.last().cloned() else {
        return Err(DiffError::PathNotFound {
            path: original.to_string(),
        });
    };
    let parent = path.parent().unwrap_or_default();
    if parent.is_empty() {
        return Ok((ParentMut::Root(root), last));
    }
    let node = root
        .get_mut(&parent)
        .ok_or_else(|| DiffError::PathNotFound {
            path: original.to_string(),
        })?;
    Ok((ParentMut::Node(node), last))
}

fn insert_at(
    root: &mut Container,
    path: &Path,
    node: Node,
    must_exist: bool,
    original: &str,
) -> Result<(), DiffError> {
    if path.is_empty() {
        // Whole-document replacement.
        return match node {
            Node::Container(c) => {
                *root = c;
                Ok(())
            }
            _ => Err(DiffError::PathNotFound {
                path: original.to_string(),
            }),
        };
    }
    match locate_parent(root, path, original)? {
        (ParentMut::Root(c), last) => insert_container(c, last, node, must_exist, original),
        (ParentMut::Node(Node::Container(c)), last) => {
            insert_container(c, last, node, must_exist, original)
        }
        (ParentMut::Node(Node::List(l)), last) => {
            insert_list(l, last, node, must_exist, original)
        }
        (ParentMut::Node(_), _) => Err(DiffError::PathNotFound {
            path: original.to_string(),
        }),
    }
}

fn insert_container(
    container: &mut Container,
    last: Component,
    node: Node,
    must_exist: bool,
    original: &str,
) -> Result<(), DiffError> {
    let key = match last {
        Component::Key(k) => k,
        Component::Index(i) => i.to_string(),
        Component::AfterLast => "-".to_string(),
    };
    if must_exist && !container.contains_key(&key) {
        return Err(DiffError::PathNotFound {
            path: original.to_string(),
        });
    }
    container.insert(key, node)?;
    Ok(())
}

fn insert_list(
    list: &mut List,
    last: Component,
    node: Node,
    must_exist: bool,
    original: &str,
) -> Result<(), DiffError> {
    if let Some(index) = last.as_index() {
        if must_exist {
            list.must_set(index, node)?;
        } else {
            list.insert(index, node)?;
        }
        return Ok(());
    }
    if last.is_after_last() && !must_exist {
        list.push(node)?;
        return Ok(());
    }
    Err(DiffError::PathNotFound {
        path: original.to_string(),
    })
}

fn remove_at(root: &mut Container, path: &Path, original: &str) -> Result<Node, DiffError> {
    let not_found = || DiffError::PathNotFound {
        path: original.to_string(),
    };
    if path.is_empty() {
        return Err(not_found());
    }
    match locate_parent(root, path, original)? {
        (ParentMut::Root(c), last) => remove_from_container(c, last, not_found),
        (ParentMut::Node(Node::Container(c)), last) => remove_from_container(c, last, not_found),
        (ParentMut::Node(Node::List(l)), last) => {
            let index = last.as_index().ok_or_else(not_found)?;
            l.splice_out(index)?.ok_or_else(not_found)
        }
        (ParentMut::Node(_), _) => Err(not_found()),
    }
}

fn remove_from_container(
    container: &mut Container,
    last: Component,
    not_found: impl Fn() -> DiffError,
) -> Result<Node, DiffError> {
    let key = match last {
        Component::Key(k) => k,
        Component::Index(i) => i.to_string(),
        Component::AfterLast => return Err(not_found()),
    };
    container.remove(&key)?.ok_or_else(not_found)
}
