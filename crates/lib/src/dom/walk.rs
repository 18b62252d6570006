//! Tree traversal: walking, flattening and searching.

use std::collections::{BTreeMap, VecDeque};

use super::{Container, DomError, Node, Value};
use crate::path::{Component, Path, property};

/// Order in which [`Container::walk`] visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Breadth-first, the default.
    #[default]
    Bfs,
    /// Depth-first, pre-order.
    Dfs,
}

fn child_entries(node: &Node) -> Vec<(Component, &Node)> {
    match node {
        Node::Container(c) => c
            .children()
            .map(|(k, v)| (Component::Key(k.clone()), v))
            .collect(),
        Node::List(l) => l.iter().map(|(i, v)| (Component::Index(i), v)).collect(),
        Node::Leaf(_) => Vec::new(),
    }
}

impl Container {
    /// Visits every node reachable from this container.
    ///
    /// The visitor receives the path relative to this container and the
    /// node; returning `false` prunes the branch (the node's children are
    /// not visited). The root itself is not visited.
    pub fn walk<F>(&self, traversal: Traversal, visitor: &mut F)
    where
        F: FnMut(&Path, &Node) -> bool,
    {
        match traversal {
            Traversal::Bfs => {
                let mut queue: VecDeque<(Path, &Node)> = VecDeque::new();
                for (key, node) in self.children() {
                    queue.push_back((Path::root().child(key.as_str()), node));
                }
                while let Some((path, node)) = queue.pop_front() {
                    if !visitor(&path, node) {
                        continue;
                    }
                    for (component, child) in child_entries(node) {
                        queue.push_back((path.child(component), child));
                    }
                }
            }
            Traversal::Dfs => {
                for (key, node) in self.children() {
                    walk_dfs(&Path::root().child(key.as_str()), node, visitor);
                }
            }
        }
    }

    /// Enumerates every reachable leaf with its structured path.
    pub fn leaves(&self) -> Vec<(Path, &Value)> {
        let mut out = Vec::new();
        for (key, node) in self.children() {
            collect_leaves(&Path::root().child(key.as_str()), node, &mut out);
        }
        out
    }

    /// Returns a mapping from serialized property paths to leaf values.
    pub fn flatten(&self) -> BTreeMap<String, Value> {
        self.leaves()
            .into_iter()
            .map(|(path, value)| (property::serialize(&path), value.clone()))
            .collect()
    }

    /// Returns the sorted serialized paths of leaves matching `predicate`.
    pub fn search<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&Value) -> bool,
    {
        let mut paths: Vec<String> = self
            .leaves()
            .into_iter()
            .filter(|(_, value)| predicate(value))
            .map(|(path, _)| property::serialize(&path))
            .collect();
        paths.sort();
        paths
    }

    /// Removes empty containers anywhere below this one.
    ///
    /// Containers that become empty once their own empty children are
    /// removed are removed as well. List elements are compacted in place
    /// but never removed, so indices stay stable.
    pub fn compact(&mut self) -> Result<(), DomError> {
        if self.is_sealed() {
            return Err(DomError::Sealed {
                path: String::new(),
            });
        }
        compact_container(self);
        Ok(())
    }
}

fn walk_dfs<F>(path: &Path, node: &Node, visitor: &mut F)
where
    F: FnMut(&Path, &Node) -> bool,
{
    if !visitor(path, node) {
        return;
    }
    for (component, child) in child_entries(node) {
        walk_dfs(&path.child(component), child, visitor);
    }
}

fn collect_leaves<'a>(path: &Path, node: &'a Node, out: &mut Vec<(Path, &'a Value)>) {
    match node {
        Node::Leaf(value) => out.push((path.clone(), value)),
        Node::List(list) => {
            for (index, child) in list.iter() {
                collect_leaves(&path.child(index), child, out);
            }
        }
        Node::Container(container) => {
            for (key, child) in container.children() {
                collect_leaves(&path.child(key.as_str()), child, out);
            }
        }
    }
}

fn compact_container(container: &mut Container) {
    let empties: Vec<String> = {
        let mut empties = Vec::new();
        let keys: Vec<String> = container.keys().cloned().collect();
        for key in keys {
            if let Some(child) = container.child_mut(&key) {
                compact_node(child);
                if matches!(child, Node::Container(c) if c.is_empty()) {
                    empties.push(key);
                }
            }
        }
        empties
    };
    for key in empties {
        let _ = container.remove(&key);
    }
}

fn compact_node(node: &mut Node) {
    match node {
        Node::Container(c) => compact_container(c),
        Node::List(l) => {
            for i in 0..l.len() {
                if let Some(child) = l.get_mut(i) {
                    compact_node(child);
                }
            }
        }
        Node::Leaf(_) => {}
    }
}
