//! Fluent document transformation helper.
//!
//! A [`Morpher`] wraps a target container and chains filtered copies,
//! merges and point mutations before handing the container back with
//! [`Morpher::finish`]. [`Morpher::transcode`] is the generic
//! format-to-format pipe built from the codec pairs.

use std::io::{Read, Write};

use crate::codec::{CodecError, Format};
use crate::dom::{Container, DomError, MergeOptions, Node};
use crate::path::Path;

/// A fluent builder over a target container.
#[derive(Debug, Default)]
pub struct Morpher {
    target: Container,
}

impl Morpher {
    /// Starts from an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing container.
    pub fn over(target: Container) -> Self {
        Morpher { target }
    }

    /// Copies every leaf of `source` accepted by `filter` into the
    /// target, recreating intermediate structure.
    pub fn add_with_filter<F>(mut self, source: &Container, filter: F) -> Result<Self, DomError>
    where
        F: Fn(&Path, &Node) -> bool,
    {
        for (path, value) in source.leaves() {
            let node = Node::Leaf(value.clone());
            if filter(&path, &node) {
                self.target.set(&path, node)?;
            }
        }
        Ok(self)
    }

    /// Merges `source` into the target.
    pub fn merge(mut self, source: &Container, options: &MergeOptions) -> Self {
        self.target = self.target.merge(source, options);
        self
    }

    /// Applies `f` to the node at `path`; the path must resolve.
    pub fn mutate<F>(mut self, path: &Path, f: F) -> Result<Self, DomError>
    where
        F: FnOnce(&mut Node),
    {
        match self.target.get_mut(path) {
            Some(node) => {
                f(node);
                Ok(self)
            }
            None => Err(DomError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Returns the accumulated container.
    pub fn finish(self) -> Container {
        self.target
    }

    /// Decodes from `reader` in one format and re-encodes to `writer`
    /// in another.
    pub fn transcode(
        reader: &mut dyn Read,
        from: Format,
        writer: &mut dyn Write,
        to: Format,
    ) -> Result<(), CodecError> {
        let doc = from.decode(reader)?;
        to.encode(writer, &doc)
    }
}
