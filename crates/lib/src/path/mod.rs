//! Path algebra for addressing nodes in a document tree.
//!
//! A [`Path`] is an ordered sequence of [`Component`]s. Two concrete syntaxes
//! produce and render the same abstraction: dotted property paths
//! (`server.hosts[0].name`, see [`property`]) and RFC 6901 JSON pointers
//! (`/server/hosts/0/name`, see [`pointer`]). Both parsers are total over
//! their grammar and round-trip through their serializers.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod pointer;
pub mod property;

mod errors;

pub use errors::PathError;

/// A single step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// String key for container navigation.
    Key(String),
    /// Zero-based index for list navigation.
    Index(usize),
    /// RFC 6901 `-`: the position one past the end of a list.
    AfterLast,
}

impl Component {
    /// Creates a key component.
    pub fn key(s: impl Into<String>) -> Self {
        Component::Key(s.into())
    }

    /// Returns the component as a list index when it can act as one.
    ///
    /// `Index` components convert directly; `Key` components made purely of
    /// digits convert too, which is how pointer segments like `/list/2`
    /// navigate lists (spec'd by RFC 6901 evaluation rules).
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Component::Index(i) => Some(*i),
            Component::Key(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            _ => None,
        }
    }

    /// Returns the key name, if this is a key component.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Component::Key(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for the append marker.
    pub fn is_after_last(&self) -> bool {
        matches!(self, Component::AfterLast)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Key(s) => write!(f, "{s}"),
            Component::Index(i) => write!(f, "{i}"),
            Component::AfterLast => write!(f, "-"),
        }
    }
}

impl From<&str> for Component {
    fn from(s: &str) -> Self {
        Component::Key(s.to_string())
    }
}

impl From<String> for Component {
    fn from(s: String) -> Self {
        Component::Key(s)
    }
}

impl From<usize> for Component {
    fn from(i: usize) -> Self {
        Component::Index(i)
    }
}

/// An owned sequence of components addressing a node in a document.
///
/// The empty path points at the root. `Display` renders the property
/// syntax, which is also the default serialization used for coordinates,
/// flattening and diff output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    components: Vec<Component>,
}

impl Path {
    /// Creates the empty path (points at the root).
    pub fn root() -> Self {
        Path::default()
    }

    /// Creates a path from a sequence of components.
    pub fn from_components(
        components: impl IntoIterator<Item = impl Into<Component>>,
    ) -> Self {
        Path {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the components in order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Returns true if the path has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns the final component, or `None` for the empty path.
    pub fn last(&self) -> Option<&Component> {
        self.components.last()
    }

    /// Returns the path with the final component removed, or `None` for
    /// the empty path.
    pub fn parent(&self) -> Option<Path> {
        if self.components.is_empty() {
            return None;
        }
        Some(Path {
            components: self.components[..self.components.len() - 1].to_vec(),
        })
    }

    /// Returns a new path extended by one component.
    pub fn child(&self, component: impl Into<Component>) -> Path {
        let mut components = self.components.clone();
        components.push(component.into());
        Path { components }
    }

    /// Appends a component in place.
    pub fn push(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    /// Returns a new path that is `self` followed by `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Path { components }
    }

    /// Splits into the first component and the remaining path.
    pub fn split_first(&self) -> Option<(&Component, Path)> {
        let (first, rest) = self.components.split_first()?;
        Some((
            first,
            Path {
                components: rest.to_vec(),
            },
        ))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", property::serialize(self))
    }
}

impl FromIterator<Component> for Path {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        Path::from_components(iter)
    }
}

/// Names a concrete path grammar for [`UniversalPath`] dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathSyntax {
    /// Dotted property paths with bracketed indices.
    Properties,
    /// RFC 6901 JSON pointers.
    Rfc6901,
}

impl PathSyntax {
    /// Parses a string in this syntax.
    pub fn parse(self, s: &str) -> Result<Path, PathError> {
        match self {
            PathSyntax::Properties => property::parse(s),
            PathSyntax::Rfc6901 => pointer::parse(s),
        }
    }

    /// Parses a statically known path, panicking on error.
    pub fn must_parse(self, s: &str) -> Path {
        match self {
            PathSyntax::Properties => property::must_parse(s),
            PathSyntax::Rfc6901 => pointer::must_parse(s),
        }
    }

    /// Renders a path in this syntax.
    pub fn serialize(self, path: &Path) -> String {
        match self {
            PathSyntax::Properties => property::serialize(path),
            PathSyntax::Rfc6901 => pointer::serialize(path),
        }
    }
}

/// A path field that accepts either a bare string (property syntax) or an
/// explicit `{value, syntax}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniversalPath {
    /// Bare string, parsed with the property syntax.
    Plain(String),
    /// Explicit syntax selection.
    Tagged {
        /// The path text.
        value: String,
        /// The grammar `value` is written in.
        syntax: PathSyntax,
    },
}

impl UniversalPath {
    /// Parses into the common path abstraction.
    pub fn parse(&self) -> Result<Path, PathError> {
        match self {
            UniversalPath::Plain(s) => property::parse(s),
            UniversalPath::Tagged { value, syntax } => syntax.parse(value),
        }
    }

    /// The raw path text.
    pub fn as_str(&self) -> &str {
        match self {
            UniversalPath::Plain(s) => s,
            UniversalPath::Tagged { value, .. } => value,
        }
    }
}

/// Names a query grammar for [`UniversalQuery`] dispatch. Evaluation
/// is delegated to an external engine; this crate only carries the
/// text and its declared grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuerySyntax {
    /// RFC 9535 JSONPath.
    Rfc9535,
    /// JMESPath.
    Jmespath,
}

/// A query field that accepts either a bare string (RFC 9535 JSONPath)
/// or an explicit `{value, syntax}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniversalQuery {
    /// Bare string, treated as RFC 9535 JSONPath.
    Plain(String),
    /// Explicit grammar selection.
    Tagged {
        /// The query text.
        value: String,
        /// The grammar `value` is written in.
        syntax: QuerySyntax,
    },
}

impl UniversalQuery {
    /// The grammar this query is written in.
    pub fn syntax(&self) -> QuerySyntax {
        match self {
            UniversalQuery::Plain(_) => QuerySyntax::Rfc9535,
            UniversalQuery::Tagged { syntax, .. } => *syntax,
        }
    }

    /// The raw query text.
    pub fn as_str(&self) -> &str {
        match self {
            UniversalQuery::Plain(s) => s,
            UniversalQuery::Tagged { value, .. } => value,
        }
    }
}

impl From<&str> for UniversalQuery {
    fn from(s: &str) -> Self {
        UniversalQuery::Plain(s.to_string())
    }
}

impl From<&str> for UniversalPath {
    fn from(s: &str) -> Self {
        UniversalPath::Plain(s.to_string())
    }
}
