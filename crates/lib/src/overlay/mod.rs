//! Ordered, named layers of documents with a merged read-through view.
//!
//! An [`Overlay`] keeps containers in insertion order under unique layer
//! names. Lookups either target one layer or scan all layers in order
//! (first hit wins); [`Overlay::merged`] folds the layers left to right
//! into a fresh container using the DOM merge strategies. A
//! [`Coordinate`] names a node by layer and serialized path, which is
//! how the analytics report locations across layers.

use std::collections::HashMap;

use crate::dom::{Container, MergeOptions, Node, Traversal, Value};
use crate::path::{Path, PathSyntax};

pub mod docset;
pub mod manifest;

mod errors;

pub use docset::{AddOptions, AddPolicy, DocumentSet};
pub use errors::OverlayError;
pub use manifest::{Manifest, ManifestKind};

/// The position of a node inside an overlay: layer name plus
/// serialized path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Name of the layer holding the node.
    pub layer: String,
    /// Serialized path of the node inside that layer.
    pub path: String,
}

impl Coordinate {
    /// Builds a coordinate from a layer name and serialized path.
    pub fn new(layer: impl Into<String>, path: impl Into<String>) -> Self {
        Coordinate {
            layer: layer.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.layer, self.path)
    }
}

/// An ordered collection of named document layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    names: Vec<String>,
    layers: HashMap<String, Container>,
}

impl Overlay {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Test for an overlay with no layers.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Layer names in insertion order.
    pub fn layer_names(&self) -> &[String] {
        &self.names
    }

    /// The container backing a layer.
    pub fn layer(&self, name: &str) -> Option<&Container> {
        self.layers.get(name)
    }

    /// Mutable access to a layer's container.
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.layers.get_mut(name)
    }

    /// Layers in insertion order.
    pub fn layers(&self) -> impl Iterator<Item = (&str, &Container)> {
        self.names
            .iter()
            .map(|name| (name.as_str(), &self.layers[name]))
    }

    /// Adds a layer, replacing the content of an existing layer of the
    /// same name while keeping its position.
    pub fn add(&mut self, name: impl Into<String>, container: Container) {
        let name = name.into();
        if !self.layers.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.layers.insert(name, container);
    }

    /// Removes a layer, returning its container.
    pub fn remove(&mut self, name: &str) -> Option<Container> {
        let container = self.layers.remove(name)?;
        self.names.retain(|n| n != name);
        Some(container)
    }

    /// Sets a single leaf in a layer, creating the layer and any
    /// intermediate nodes as needed.
    pub fn put(
        &mut self,
        layer: &str,
        path: &Path,
        value: impl Into<Value>,
    ) -> Result<(), OverlayError> {
        self.layer_or_default(layer)
            .set(path, Node::Leaf(value.into()))?;
        Ok(())
    }

    /// Grafts a container at `path` inside a layer, creating the layer
    /// and intermediates as needed.
    pub fn populate(
        &mut self,
        layer: &str,
        path: &Path,
        dict: Container,
    ) -> Result<(), OverlayError> {
        let target = self.layer_or_default(layer);
        if path.is_empty() {
            *target = dict;
        } else {
            target.set(path, Node::Container(dict))?;
        }
        Ok(())
    }

    fn layer_or_default(&mut self, name: &str) -> &mut Container {
        match self.layers.entry(name.to_string()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                self.names.push(name.to_string());
                entry.insert(Container::new())
            }
        }
    }

    /// Resolves a path inside one layer.
    pub fn lookup(&self, layer: &str, path: &Path) -> Option<&Node> {
        self.layers.get(layer)?.get(path)
    }

    /// Resolves a path against every layer in insertion order; the
    /// first layer holding the path wins.
    pub fn lookup_any(&self, path: &Path) -> Option<(&str, &Node)> {
        self.names.iter().find_map(|name| {
            self.layers[name]
                .get(path)
                .map(|node| (name.as_str(), node))
        })
    }

    /// Folds all layers into one fresh container, merging in insertion
    /// order with the supplied options. The result does not alias the
    /// source layers.
    pub fn merged(&self, options: &MergeOptions) -> Container {
        let mut out = Container::new();
        for name in &self.names {
            out = out.merge(&self.layers[name], options);
        }
        out
    }

    /// Every coordinate whose leaf satisfies `predicate`, in layer
    /// insertion order with paths sorted within a layer. Paths are
    /// serialized as property paths; see [`Overlay::search_with`] for
    /// other grammars.
    pub fn search<F>(&self, predicate: F) -> Vec<Coordinate>
    where
        F: Fn(&Path, &Value) -> bool,
    {
        self.search_with(predicate, PathSyntax::Properties)
    }

    /// [`Overlay::search`] with coordinate paths serialized in the
    /// given syntax.
    pub fn search_with<F>(&self, predicate: F, syntax: PathSyntax) -> Vec<Coordinate>
    where
        F: Fn(&Path, &Value) -> bool,
    {
        let mut found = Vec::new();
        for name in &self.names {
            for (path, value) in self.layers[name].leaves() {
                if predicate(&path, value) {
                    found.push(Coordinate::new(name.clone(), syntax.serialize(&path)));
                }
            }
        }
        found
    }

    /// Visits every node of every layer; the visitor returning `false`
    /// prunes that branch. Layers are visited in insertion order.
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &Path, &Node) -> bool,
    {
        for name in &self.names {
            self.layers[name].walk(Traversal::Bfs, &mut |path, node| {
                visitor(name, path, node)
            });
        }
    }
}
