//! Point-wise combination of document trees.

use std::fmt;
use std::sync::Arc;

use super::{Container, List, Node, Value};

/// How two lists at the same path combine.
#[derive(Clone, Default)]
pub enum ListStrategy {
    /// Positional meld: overlapping indices combine, holes defer to the
    /// other side. The default.
    #[default]
    Meld,
    /// Concatenate left then right.
    Append,
    /// Caller-supplied combination.
    Custom(Arc<dyn Fn(&List, &List) -> List + Send + Sync>),
}

impl fmt::Debug for ListStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListStrategy::Meld => write!(f, "Meld"),
            ListStrategy::Append => write!(f, "Append"),
            ListStrategy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Options for [`Container::merge`].
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// List combination strategy.
    pub lists: ListStrategy,
}

impl MergeOptions {
    /// Options with the append list strategy.
    pub fn appending() -> Self {
        MergeOptions {
            lists: ListStrategy::Append,
        }
    }
}

impl Container {
    /// Returns a fresh container combining `self` (left) and `other`
    /// (right).
    ///
    /// Keys are unioned; keys present on both sides recurse. Shape
    /// conflicts and leaf-against-leaf conflicts resolve right-wins.
    /// Lists combine per [`MergeOptions::lists`]. The output is always an
    /// independent mutable tree, and is deterministic regardless of the
    /// insertion order of either side.
    pub fn merge(&self, other: &Container, options: &MergeOptions) -> Container {
        let mut result = self.clone();
        for (key, right) in other.children() {
            match result.child(key) {
                Some(left) => {
                    let merged = merge_nodes(left, right, options);
                    result.insert_unchecked(key.clone(), merged);
                }
                None => result.insert_unchecked(key.clone(), right.clone()),
            }
        }
        result
    }
}

fn merge_nodes(left: &Node, right: &Node, options: &MergeOptions) -> Node {
    match (left, right) {
        (Node::Container(a), Node::Container(b)) => Node::Container(a.merge(b, options)),
        (Node::List(a), Node::List(b)) => Node::List(merge_lists(a, b, options)),
        // Shape or leaf conflict: right wins.
        _ => right.clone(),
    }
}

fn merge_lists(left: &List, right: &List, options: &MergeOptions) -> List {
    match &options.lists {
        ListStrategy::Meld => meld(left, right, options),
        ListStrategy::Append => {
            let mut out = List::new();
            for slot in left.items().iter().chain(right.items()) {
                match slot {
                    Some(node) => out.push_unchecked(node.clone()),
                    None => *out.slot_mut(out.len()) = None,
                }
            }
            out
        }
        ListStrategy::Custom(f) => f(left, right),
    }
}

fn meld(left: &List, right: &List, options: &MergeOptions) -> List {
    let len = left.len().max(right.len());
    let mut out = List::new();
    for i in 0..len {
        let merged = match (left.get(i), right.get(i)) {
            (Some(a), Some(b)) => match (a, b) {
                (Node::Container(_), Node::Container(_)) | (Node::List(_), Node::List(_)) => {
                    Some(merge_nodes(a, b, options))
                }
                // Coalesce: first non-null value wins.
                _ => {
                    if matches!(a, Node::Leaf(Value::Null)) {
                        Some(b.clone())
                    } else {
                        Some(a.clone())
                    }
                }
            },
            (Some(a), None) => Some(a.clone()),
            (None, Some(b)) => Some(b.clone()),
            (None, None) => None,
        };
        *out.slot_mut(i) = merged;
    }
    out
}
