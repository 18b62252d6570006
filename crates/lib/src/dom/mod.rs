//! Document object model: the polymorphic tree of containers, lists and
//! leaves.
//!
//! A [`Node`] is exactly one of three shapes: a [`Container`] (string-keyed
//! mapping), a [`List`] (index-addressed sequence that may contain holes),
//! or a leaf holding a scalar [`Value`]. Containers and lists carry a
//! builder/sealed discipline: [`Node::seal`] freezes a subtree and every
//! mutator on a sealed node fails with [`DomError::Sealed`]; cloning always
//! yields a fresh mutable tree.
//!
//! # Usage
//!
//! ```
//! use strata::dom::{Container, Node, Value};
//! use strata::path::property;
//!
//! let mut doc = Container::new();
//! doc.set(&property::must_parse("server.port"), Node::from(8080i64)).unwrap();
//! doc.set(&property::must_parse("server.hosts[0]"), Node::from("alpha")).unwrap();
//!
//! assert_eq!(doc.leaf("server.port"), Some(&Value::Int(8080)));
//! ```

use serde::{Deserialize, Serialize, de::Deserializer, ser::Serializer};

pub mod container;
pub mod list;
pub mod merge;
pub mod query;
pub mod value;
pub mod walk;

mod errors;

pub use container::Container;
pub use errors::DomError;
pub use list::List;
pub use merge::{ListStrategy, MergeOptions};
pub use query::QueryEngine;
pub use value::Value;
pub use walk::Traversal;

use crate::path::{Component, Path};

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar leaf.
    Leaf(Value),
    /// An ordered sequence, possibly with holes.
    List(List),
    /// A keyed mapping.
    Container(Container),
}

impl Node {
    /// Returns the shape name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Leaf(_) => "leaf",
            Node::List(_) => "list",
            Node::Container(_) => "container",
        }
    }

    /// Returns true if this node is a container.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }

    /// Returns true if this node is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    /// Returns true if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// True iff both nodes have the same shape, values ignored.
    pub fn same_kind(&self, other: &Node) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Typed view as a leaf value.
    pub fn as_leaf(&self) -> Option<&Value> {
        match self {
            Node::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Typed view as a list.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    /// Typed view as a container.
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Node::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable view as a leaf value.
    pub fn as_leaf_mut(&mut self) -> Option<&mut Value> {
        match self {
            Node::Leaf(v) => Some(v),
            _ => None,
        }
    }

    /// Mutable view as a list.
    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    /// Mutable view as a container.
    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Node::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Typed view as a container, failing with a type error otherwise.
    pub fn expect_container(&self) -> Result<&Container, DomError> {
        self.as_container()
            .ok_or_else(|| DomError::mismatch("container", self))
    }

    /// Typed view as a list, failing with a type error otherwise.
    pub fn expect_list(&self) -> Result<&List, DomError> {
        self.as_list().ok_or_else(|| DomError::mismatch("list", self))
    }

    /// Typed view as a leaf, failing with a type error otherwise.
    pub fn expect_leaf(&self) -> Result<&Value, DomError> {
        self.as_leaf().ok_or_else(|| DomError::mismatch("leaf", self))
    }

    /// True if this node (container or list) has been sealed.
    pub fn is_sealed(&self) -> bool {
        match self {
            Node::Leaf(_) => false,
            Node::List(l) => l.is_sealed(),
            Node::Container(c) => c.is_sealed(),
        }
    }

    /// Seals this subtree; all nested containers and lists become sealed.
    pub fn seal(&mut self) {
        match self {
            Node::Leaf(_) => {}
            Node::List(l) => l.seal(),
            Node::Container(c) => c.seal(),
        }
    }

    /// Navigates relative to this node.
    ///
    /// Returns `None` for absence; a leaf whose value is null is still
    /// `Some`. Index components navigate containers through their decimal
    /// string form; digit-only keys navigate lists as indices (RFC 6901
    /// evaluation rules).
    pub fn get(&self, path: &Path) -> Option<&Node> {
        let mut cur = self;
        for component in path.components() {
            cur = match cur {
                Node::Container(c) => match component {
                    Component::Key(k) => c.child(k)?,
                    Component::Index(i) => c.child(&i.to_string())?,
                    Component::AfterLast => return None,
                },
                Node::List(l) => l.get(component.as_index()?)?,
                Node::Leaf(_) => return None,
            };
        }
        Some(cur)
    }

    /// Mutable navigation; same addressing rules as [`Node::get`].
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let mut cur = self;
        for component in path.components() {
            cur = match cur {
                Node::Container(c) => match component {
                    Component::Key(k) => c.child_mut(k)?,
                    Component::Index(i) => c.child_mut(&i.to_string())?,
                    Component::AfterLast => return None,
                },
                Node::List(l) => l.get_mut(component.as_index()?)?,
                Node::Leaf(_) => return None,
            };
        }
        Some(cur)
    }

    /// Recursive conversion to a plain JSON value, used for template
    /// binding and codec bridging. Holes in lists render as null.
    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Node::Leaf(v) => match v {
                Value::Null => serde_json::Value::Null,
                Value::Bool(b) => serde_json::Value::Bool(*b),
                Value::Int(n) => serde_json::Value::from(*n),
                Value::Uint(n) => serde_json::Value::from(*n),
                Value::Float(x) => serde_json::Number::from_f64(*x)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
                Value::Text(s) => serde_json::Value::String(s.clone()),
            },
            Node::List(l) => serde_json::Value::Array(
                l.items()
                    .iter()
                    .map(|slot| match slot {
                        Some(node) => node.to_plain(),
                        None => serde_json::Value::Null,
                    })
                    .collect(),
            ),
            Node::Container(c) => serde_json::Value::Object(
                c.children()
                    .map(|(k, v)| (k.clone(), v.to_plain()))
                    .collect(),
            ),
        }
    }

    /// Constructs a node from a plain JSON value.
    pub fn from_plain(value: serde_json::Value) -> Node {
        match value {
            serde_json::Value::Null => Node::Leaf(Value::Null),
            serde_json::Value::Bool(b) => Node::Leaf(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Leaf(Value::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Node::Leaf(Value::Uint(u))
                } else {
                    Node::Leaf(Value::Float(n.as_f64().unwrap_or_default()))
                }
            }
            serde_json::Value::String(s) => Node::Leaf(Value::Text(s)),
            serde_json::Value::Array(items) => {
                let mut list = List::new();
                for item in items {
                    list.push_unchecked(Node::from_plain(item));
                }
                Node::List(list)
            }
            serde_json::Value::Object(entries) => {
                let mut container = Container::new();
                for (k, v) in entries {
                    container.insert_unchecked(k, Node::from_plain(v));
                }
                Node::Container(container)
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plain().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Node::from_plain(value))
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::Leaf(value)
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Node::Container(container)
    }
}

impl From<List> for Node {
    fn from(list: List) -> Self {
        Node::List(list)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Leaf(Value::from(value))
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Leaf(Value::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Leaf(Value::Int(value))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Leaf(Value::Bool(value))
    }
}
