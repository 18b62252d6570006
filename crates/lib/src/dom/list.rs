//! Ordered sequence node.

use super::{DomError, Node};

/// Ordered sequence of nodes, addressable by zero-based index.
///
/// Positions may be holes: [`List::set`] grows the list with holes when the
/// index is past the end, and a hole reads as absent. Textual encoders
/// render holes as explicit nulls.
#[derive(Debug, Default)]
pub struct List {
    items: Vec<Option<Node>>,
    sealed: bool,
}

impl Clone for List {
    fn clone(&self) -> Self {
        // Clones are always fresh builders.
        List {
            items: self.items.clone(),
            sealed: false,
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl List {
    /// Creates a new empty mutable list.
    pub fn new() -> Self {
        List::default()
    }

    /// Returns true once sealed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Seals this list and every nested container and list.
    pub fn seal(&mut self) {
        self.sealed = true;
        for item in self.items.iter_mut().flatten() {
            item.seal();
        }
    }

    /// Number of positions, holes included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the list has no positions at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the underlying slots; `None` entries are holes.
    pub fn items(&self) -> &[Option<Node>] {
        &self.items
    }

    /// Reads the node at `index`; holes and out-of-bounds read as absent.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)?.as_ref()
    }

    /// Mutable read at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)?.as_mut()
    }

    /// Iterates over present nodes with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (i, node)))
    }

    fn check_mutable(&self) -> Result<(), DomError> {
        if self.sealed {
            return Err(DomError::Sealed {
                path: String::new(),
            });
        }
        Ok(())
    }

    /// Sets the node at `index`, growing the list with holes as needed.
    /// Returns the node previously at the position.
    pub fn set(&mut self, index: usize, node: impl Into<Node>) -> Result<Option<Node>, DomError> {
        self.check_mutable()?;
        Ok(self.set_grow(index, node.into()))
    }

    /// Sets the node at `index`, failing instead of growing.
    pub fn must_set(&mut self, index: usize, node: impl Into<Node>) -> Result<Option<Node>, DomError> {
        self.check_mutable()?;
        if index >= self.items.len() {
            return Err(DomError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.set_grow(index, node.into()))
    }

    pub(crate) fn set_grow(&mut self, index: usize, node: Node) -> Option<Node> {
        if index >= self.items.len() {
            self.items.resize_with(index + 1, || None);
        }
        self.items[index].replace(node)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Option<Node> {
        if index >= self.items.len() {
            self.items.resize_with(index + 1, || None);
        }
        &mut self.items[index]
    }

    /// Appends a node at the end.
    pub fn push(&mut self, node: impl Into<Node>) -> Result<usize, DomError> {
        self.check_mutable()?;
        self.items.push(Some(node.into()));
        Ok(self.items.len() - 1)
    }

    pub(crate) fn push_unchecked(&mut self, node: Node) {
        self.items.push(Some(node));
    }

    /// Inserts a node at `index`, shifting later positions right.
    pub fn insert(&mut self, index: usize, node: impl Into<Node>) -> Result<(), DomError> {
        self.check_mutable()?;
        if index > self.items.len() {
            return Err(DomError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, Some(node.into()));
        Ok(())
    }

    /// Removes the position at `index`, shifting later positions left.
    /// Out-of-bounds indices yield `Ok(None)`.
    pub fn splice_out(&mut self, index: usize) -> Result<Option<Node>, DomError> {
        self.check_mutable()?;
        if index >= self.items.len() {
            return Ok(None);
        }
        Ok(self.items.remove(index))
    }

    /// Removes every position.
    pub fn clear(&mut self) -> Result<(), DomError> {
        self.check_mutable()?;
        self.items.clear();
        Ok(())
    }

    /// Builder method: append and return self.
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.items.push(Some(node.into()));
        self
    }

    /// Builder method: append a hole and return self.
    pub fn with_hole(mut self) -> Self {
        self.items.push(None);
        self
    }
}

impl<T: Into<Node>> FromIterator<T> for List {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        for node in iter {
            list.items.push(Some(node.into()));
        }
        list
    }
}
