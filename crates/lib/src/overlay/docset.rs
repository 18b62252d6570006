//! Tagged document sets with subset selection.
//!
//! A [`DocumentSet`] is an overlay whose layers additionally carry
//! tags. Every document implicitly carries the wildcard tag `*`, added
//! at insertion time, so a selector asking for `*` matches everything
//! without the selector having to special-case it. Unnamed documents
//! get `default__N` names from a per-set counter.

use std::collections::BTreeSet;

use tracing::warn;

use crate::codec::Format;
use crate::dom::{Container, Value};
use crate::path::PathSyntax;

use super::{Manifest, Overlay, OverlayError};

/// The implicit tag carried by every document.
pub const WILDCARD_TAG: &str = "*";

/// What to do when a document is re-added under an existing name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddPolicy {
    /// Replace the existing document and its tags.
    #[default]
    Replace,
    /// Keep the existing document, union the tag sets.
    MergeTags,
    /// Fail with [`OverlayError::LayerExists`] on a duplicate name.
    MustCreate,
}

/// Options for [`DocumentSet::add`].
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Explicit document name; auto-generated when absent.
    pub name: Option<String>,
    /// Tags to attach; the wildcard tag is added on top.
    pub tags: BTreeSet<String>,
    /// Duplicate-name policy.
    pub policy: AddPolicy,
}

impl AddOptions {
    /// Options with a fixed name.
    pub fn named(name: impl Into<String>) -> Self {
        AddOptions {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Adds a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Selects the duplicate-name policy.
    pub fn policy(mut self, policy: AddPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Clone)]
struct Document {
    name: String,
    tags: BTreeSet<String>,
    content: Container,
}

/// An insertion-ordered set of named, tagged documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    documents: Vec<Document>,
    unnamed_counter: u64,
}

impl DocumentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Test for a set with no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.name.as_str()).collect()
    }

    /// The content of a named document.
    pub fn get(&self, name: &str) -> Option<&Container> {
        self.documents
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.content)
    }

    /// The tags of a named document.
    pub fn tags(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.documents
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.tags)
    }

    /// Adds a document, returning its (possibly generated) name.
    pub fn add(
        &mut self,
        content: Container,
        options: AddOptions,
    ) -> Result<String, OverlayError> {
        let name = match options.name {
            Some(name) => name,
            None => self.next_unnamed(),
        };
        let mut tags = options.tags;
        tags.insert(WILDCARD_TAG.to_string());

        if let Some(existing) = self.documents.iter_mut().find(|d| d.name == name) {
            match options.policy {
                AddPolicy::Replace => {
                    existing.tags = tags;
                    existing.content = content;
                }
                AddPolicy::MergeTags => {
                    existing.tags.extend(tags);
                }
                AddPolicy::MustCreate => {
                    return Err(OverlayError::LayerExists { layer: name });
                }
            }
            return Ok(name);
        }

        self.documents.push(Document {
            name: name.clone(),
            tags,
            content,
        });
        Ok(name)
    }

    fn next_unnamed(&mut self) -> String {
        self.unnamed_counter += 1;
        format!("default__{}", self.unnamed_counter)
    }

    /// An overlay view over the documents whose tag set intersects the
    /// requested tags, in insertion order.
    pub fn tagged_subset<I, S>(&self, tags: I) -> Overlay
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: BTreeSet<String> =
            tags.into_iter().map(|t| t.as_ref().to_string()).collect();
        let mut overlay = Overlay::new();
        for doc in &self.documents {
            if doc.tags.iter().any(|t| wanted.contains(t)) {
                overlay.add(doc.name.clone(), doc.content.clone());
            }
        }
        overlay
    }

    /// An overlay view over every document.
    pub fn as_one(&self) -> Overlay {
        self.tagged_subset([WILDCARD_TAG])
    }

    /// Ingests each decodable manifest entry as its own document, named
    /// after the entry. Entries with an unrecognized extension are
    /// skipped.
    pub fn add_documents_from_manifest(
        &mut self,
        manifest: &Manifest,
        options: &AddOptions,
    ) -> Result<Vec<String>, OverlayError> {
        let mut added = Vec::new();
        for (entry, text) in manifest.string_data() {
            let Some(format) = Format::from_extension(&entry) else {
                warn!(entry, "skipping manifest entry with unsupported extension");
                continue;
            };
            let content = format.decode_str(&text)?;
            let opts = AddOptions {
                name: Some(entry.clone()),
                tags: options.tags.clone(),
                policy: options.policy,
            };
            added.push(self.add(content, opts)?);
        }
        Ok(added)
    }

    /// Ingests the manifest's entries as one properties-style document:
    /// each entry key is a property path and each value a text leaf.
    pub fn add_properties_from_manifest(
        &mut self,
        manifest: &Manifest,
        options: AddOptions,
    ) -> Result<String, OverlayError> {
        let mut content = Container::new();
        for (entry, text) in manifest.string_data() {
            let path = PathSyntax::Properties.parse(&entry)?;
            content.set(&path, Value::Text(text))?;
        }
        let options = AddOptions {
            name: options.name.or_else(|| manifest.name().map(String::from)),
            ..options
        };
        self.add(content, options)
    }
}
