//! Keyed container node.

use std::collections::BTreeMap;

use super::{DomError, List, Node, Value};
use crate::path::{Component, Path, PathError, property};

/// Unordered mapping from string keys to nodes.
///
/// Storage is a `BTreeMap` so that iteration, flattening and encoding are
/// deterministic regardless of insertion order. Key order carries no
/// semantic meaning.
///
/// A container is a *builder* until [`Container::seal`] is called; a sealed
/// container rejects every mutator. Cloning a container (sealed or not)
/// produces an independent mutable tree.
#[derive(Debug, Default)]
pub struct Container {
    children: BTreeMap<String, Node>,
    sealed: bool,
}

impl Clone for Container {
    fn clone(&self) -> Self {
        // Clones are always fresh builders.
        Container {
            children: self.children.clone(),
            sealed: false,
        }
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        // Seal state is a mutation discipline, not a value.
        self.children == other.children
    }
}

impl Container {
    /// Creates a new empty mutable container.
    pub fn new() -> Self {
        Container::default()
    }

    /// Returns true once sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Seals this container and every nested container and list.
    pub fn seal(&mut self) {
        self.sealed = true;
        for child in self.children.values_mut() {
            child.seal();
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if there are no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child lookup; `None` is the absence sentinel.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Mutable direct child lookup.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    /// True if a direct child with this key exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Iterates over direct children. Callers must not assume any
    /// semantically meaningful order.
    pub fn children(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.children.iter()
    }

    /// Iterates over direct child keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.children.keys()
    }

    fn check_mutable(&self) -> Result<(), DomError> {
        if self.sealed {
            return Err(DomError::Sealed {
                path: String::new(),
            });
        }
        Ok(())
    }

    /// Inserts a direct child, returning the previous node at this key.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Result<Option<Node>, DomError> {
        self.check_mutable()?;
        Ok(self.children.insert(key.into(), node.into()))
    }

    pub(crate) fn insert_unchecked(&mut self, key: String, node: Node) {
        self.children.insert(key, node);
    }

    /// Inserts a leaf value.
    pub fn add_value(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<(), DomError> {
        self.insert(key, Node::Leaf(value.into())).map(|_| ())
    }

    /// Inserts an empty child container and returns a mutable reference.
    pub fn add_container(&mut self, key: impl Into<String>) -> Result<&mut Container, DomError> {
        let key = key.into();
        self.insert(key.clone(), Container::new())?;
        match self.children.get_mut(&key) {
            Some(Node::Container(c)) => Ok(c),
            _ => unreachable!("freshly inserted container"),
        }
    }

    /// Inserts an empty child list and returns a mutable reference.
    pub fn add_list(&mut self, key: impl Into<String>) -> Result<&mut List, DomError> {
        let key = key.into();
        self.insert(key.clone(), List::new())?;
        match self.children.get_mut(&key) {
            Some(Node::List(l)) => Ok(l),
            _ => unreachable!("freshly inserted list"),
        }
    }

    /// Removes a direct child, returning it.
    pub fn remove(&mut self, key: &str) -> Result<Option<Node>, DomError> {
        self.check_mutable()?;
        Ok(self.children.remove(key))
    }

    /// Removes every child.
    pub fn clear(&mut self) -> Result<(), DomError> {
        self.check_mutable()?;
        self.children.clear();
        Ok(())
    }

    /// Builder method: insert and return self.
    pub fn with(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.children.insert(key.into(), node.into());
        self
    }

    /// Parses `path` as a property path and resolves it.
    pub fn lookup(&self, path: &str) -> Result<Option<&Node>, PathError> {
        Ok(self.get(&property::parse(path)?))
    }

    /// Convenience: resolve a property path to a leaf value.
    pub fn leaf(&self, path: &str) -> Option<&Value> {
        self.lookup(path).ok().flatten().and_then(Node::as_leaf)
    }

    /// Path-typed read. See [`Node::get`] for addressing rules.
    pub fn get(&self, path: &Path) -> Option<&Node> {
        if path.is_empty() {
            return None;
        }
        let (first, rest) = path.split_first()?;
        let child = match first {
            Component::Key(k) => self.child(k)?,
            Component::Index(i) => self.child(&i.to_string())?,
            Component::AfterLast => return None,
        };
        if rest.is_empty() { Some(child) } else { child.get(&rest) }
    }

    /// Path-typed mutable read.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Node> {
        if path.is_empty() {
            return None;
        }
        let (first, rest) = path.split_first()?;
        let first = first.clone();
        let child = match first {
            Component::Key(k) => self.child_mut(&k)?,
            Component::Index(i) => self.child_mut(&i.to_string())?,
            Component::AfterLast => return None,
        };
        if rest.is_empty() {
            Some(child)
        } else {
            child.get_mut(&rest)
        }
    }

    /// Sets `node` at `path`, creating intermediate nodes along the way.
    ///
    /// The shape of a created intermediate follows the next component:
    /// explicit indices and the append marker produce lists, keys produce
    /// containers. An existing intermediate of the wrong shape is replaced.
    /// A sealed intermediate is swapped for an ephemeral mutable clone; the
    /// container this is invoked on must itself be mutable.
    ///
    /// Returns the node previously at `path`, if any.
    pub fn set(&mut self, path: &Path, node: impl Into<Node>) -> Result<Option<Node>, DomError> {
        self.check_mutable()?;
        if path.is_empty() {
            return Err(DomError::InvalidPath {
                path: "(empty path)".to_string(),
            });
        }
        set_in_container(self, path.components(), node.into())
    }

    /// Removes the node at `path`. Missing paths yield `Ok(None)`.
    ///
    /// List positions are spliced out; container keys are deleted.
    pub fn delete(&mut self, path: &Path) -> Result<Option<Node>, DomError> {
        self.check_mutable()?;
        if path.is_empty() {
            return Err(DomError::InvalidPath {
                path: "(empty path)".to_string(),
            });
        }
        delete_in_container(self, path.components())
    }
}

/// Shape an intermediate must have to satisfy the upcoming component.
fn wants_list(next: &Component) -> bool {
    matches!(next, Component::Index(_) | Component::AfterLast)
}

fn container_key(component: &Component) -> Result<String, DomError> {
    match component {
        Component::Key(k) => Ok(k.clone()),
        Component::Index(i) => Ok(i.to_string()),
        Component::AfterLast => Err(DomError::TypeMismatch {
            expected: "list".to_string(),
            actual: "container".to_string(),
        }),
    }
}

fn set_in_container(
    container: &mut Container,
    components: &[Component],
    node: Node,
) -> Result<Option<Node>, DomError> {
    let key = container_key(&components[0])?;
    if components.len() == 1 {
        return Ok(container.children.insert(key, node));
    }

    let next = &components[1];
    let entry = container.children.entry(key).or_insert_with(|| {
        if wants_list(next) {
            Node::List(List::new())
        } else {
            Node::Container(Container::new())
        }
    });

    // Replace wrong-shape intermediates; unseal sealed ones via clone.
    if wants_list(next) {
        if !entry.is_list() {
            *entry = Node::List(List::new());
        }
    } else if !entry.is_container() {
        *entry = Node::Container(Container::new());
    }
    if entry.is_sealed() {
        *entry = entry.clone();
    }

    match entry {
        Node::Container(c) => set_in_container(c, &components[1..], node),
        Node::List(l) => set_in_list(l, &components[1..], node),
        Node::Leaf(_) => unreachable!("intermediate was just shaped"),
    }
}

fn set_in_list(
    list: &mut List,
    components: &[Component],
    node: Node,
) -> Result<Option<Node>, DomError> {
    let index = match &components[0] {
        Component::AfterLast => list.len(),
        c => c.as_index().ok_or_else(|| DomError::InvalidPath {
            path: c.to_string(),
        })?,
    };

    if components.len() == 1 {
        return Ok(list.set_grow(index, node));
    }

    let next = &components[1];
    let slot = list.slot_mut(index);
    let needs_fresh = match slot.as_ref() {
        None => true,
        Some(existing) => {
            if wants_list(next) {
                !existing.is_list()
            } else {
                !existing.is_container()
            }
        }
    };
    if needs_fresh {
        *slot = Some(if wants_list(next) {
            Node::List(List::new())
        } else {
            Node::Container(Container::new())
        });
    }
    let entry = slot.as_mut().expect("slot was just filled");
    if entry.is_sealed() {
        *entry = entry.clone();
    }

    match entry {
        Node::Container(c) => set_in_container(c, &components[1..], node),
        Node::List(l) => set_in_list(l, &components[1..], node),
        Node::Leaf(_) => unreachable!("intermediate was just shaped"),
    }
}

fn delete_in_container(
    container: &mut Container,
    components: &[Component],
) -> Result<Option<Node>, DomError> {
    let key = match container_key(&components[0]) {
        Ok(key) => key,
        Err(_) => return Ok(None),
    };
    if components.len() == 1 {
        return Ok(container.children.remove(&key));
    }
    match container.children.get_mut(&key) {
        Some(entry) => {
            if entry.is_sealed() {
                *entry = entry.clone();
            }
            match entry {
                Node::Container(c) => delete_in_container(c, &components[1..]),
                Node::List(l) => delete_in_list(l, &components[1..]),
                Node::Leaf(_) => Ok(None),
            }
        }
        None => Ok(None),
    }
}

fn delete_in_list(list: &mut List, components: &[Component]) -> Result<Option<Node>, DomError> {
    let Some(index) = components[0].as_index() else {
        return Ok(None);
    };
    if components.len() == 1 {
        return list.splice_out(index);
    }
    match list.get_mut(index) {
        Some(entry) => {
            if entry.is_sealed() {
                *entry = entry.clone();
            }
            match entry {
                Node::Container(c) => delete_in_container(c, &components[1..]),
                Node::List(l) => delete_in_list(l, &components[1..]),
                Node::Leaf(_) => Ok(None),
            }
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::property::must_parse;

    #[test]
    fn set_creates_intermediates() {
        let mut doc = Container::new();
        doc.set(&must_parse("a.b.c"), Node::from(1i64)).unwrap();
        assert_eq!(doc.leaf("a.b.c"), Some(&Value::Int(1)));

        // Numeric component creates a list intermediate.
        doc.set(&must_parse("a.list[2]"), Node::from("x")).unwrap();
        let list = doc
            .lookup("a.list")
            .unwrap()
            .and_then(Node::as_list)
            .unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.get(0).is_none()); // hole
        assert_eq!(doc.leaf("a.list[2]"), Some(&Value::from("x")));
    }

    #[test]
    fn set_replaces_wrong_shape_intermediate() {
        let mut doc = Container::new();
        doc.set(&must_parse("a"), Node::from(1i64)).unwrap();
        doc.set(&must_parse("a.b"), Node::from(2i64)).unwrap();
        assert_eq!(doc.leaf("a.b"), Some(&Value::Int(2)));
    }

    #[test]
    fn sealed_rejects_mutation() {
        let mut doc = Container::new();
        doc.set(&must_parse("a.b"), Node::from(1i64)).unwrap();
        doc.seal();

        let err = doc.set(&must_parse("a.c"), Node::from(2i64)).unwrap_err();
        assert!(err.is_sealed());
        let err = doc.remove("a").unwrap_err();
        assert!(err.is_sealed());
    }

    #[test]
    fn sealed_intermediate_is_unsealed_by_clone() {
        let mut inner = Container::new();
        inner.set(&must_parse("x"), Node::from(1i64)).unwrap();
        inner.seal();

        let mut doc = Container::new();
        doc.insert("inner", inner).unwrap();
        // Root is mutable; traversal clones through the sealed child.
        doc.set(&must_parse("inner.y"), Node::from(2i64)).unwrap();
        assert_eq!(doc.leaf("inner.x"), Some(&Value::Int(1)));
        assert_eq!(doc.leaf("inner.y"), Some(&Value::Int(2)));
    }

    #[test]
    fn clone_is_independent_and_mutable() {
        let mut doc = Container::new();
        doc.set(&must_parse("a.b"), Node::from(1i64)).unwrap();
        doc.seal();

        let mut copy = doc.clone();
        assert!(!copy.is_sealed());
        copy.set(&must_parse("a.b"), Node::from(9i64)).unwrap();
        assert_eq!(doc.leaf("a.b"), Some(&Value::Int(1)));
        assert_eq!(copy.leaf("a.b"), Some(&Value::Int(9)));
    }

    #[test]
    fn delete_splices_lists_and_removes_keys() {
        let mut doc = Container::new();
        doc.set(&must_parse("l[0]"), Node::from("a")).unwrap();
        doc.set(&must_parse("l[1]"), Node::from("b")).unwrap();
        doc.set(&must_parse("l[2]"), Node::from("c")).unwrap();

        let removed = doc.delete(&must_parse("l[1]")).unwrap();
        assert_eq!(removed, Some(Node::from("b")));
        assert_eq!(doc.leaf("l[1]"), Some(&Value::from("c")));

        assert!(doc.delete(&must_parse("missing.path")).unwrap().is_none());
        assert!(doc.delete(&must_parse("l")).unwrap().is_some());
        assert!(doc.is_empty());
    }

    #[test]
    fn empty_path_is_invalid_for_set() {
        let mut doc = Container::new();
        let err = doc.set(&Path::root(), Node::from(1i64)).unwrap_err();
        assert!(matches!(err, DomError::InvalidPath { .. }));
    }
}
