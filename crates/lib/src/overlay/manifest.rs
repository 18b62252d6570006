//! Kubernetes manifest facade.
//!
//! A thin YAML wrapper over `Secret` and `ConfigMap` documents,
//! exposing their data entries as strings or decoded bytes. This lives
//! in the core because manifests are a primary ingestion path into
//! document sets.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use base64ct::{Base64, Encoding};

use crate::codec::Format;
use crate::dom::{Container, Node, Value};

use super::OverlayError;

/// The manifest kinds this facade understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// A Kubernetes `Secret`.
    Secret,
    /// A Kubernetes `ConfigMap`.
    ConfigMap,
}

/// A parsed Kubernetes manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    kind: ManifestKind,
    doc: Container,
}

impl Manifest {
    /// Parses a YAML manifest; the document must carry a supported
    /// top-level `kind`.
    pub fn from_reader(reader: &mut dyn Read) -> Result<Self, OverlayError> {
        let doc = Format::Yaml.decode(reader)?;
        let kind = match doc.leaf("kind") {
            Some(Value::Text(kind)) => match kind.as_str() {
                "Secret" => ManifestKind::Secret,
                "ConfigMap" => ManifestKind::ConfigMap,
                other => {
                    return Err(OverlayError::UnsupportedKind {
                        kind: other.to_string(),
                    });
                }
            },
            _ => return Err(OverlayError::MissingField { field: "kind" }),
        };
        Ok(Manifest { kind, doc })
    }

    /// Parses a manifest held in a string.
    pub fn parse(input: &str) -> Result<Self, OverlayError> {
        Self::from_reader(&mut input.as_bytes())
    }

    /// The manifest kind.
    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    /// The manifest's `metadata.name`, if present.
    pub fn name(&self) -> Option<&str> {
        self.doc.leaf("metadata.name").and_then(Value::as_text)
    }

    /// Text entries: `stringData` for secrets, `data` for config maps.
    pub fn string_data(&self) -> BTreeMap<String, String> {
        let field = match self.kind {
            ManifestKind::Secret => "stringData",
            ManifestKind::ConfigMap => "data",
        };
        self.text_entries(field)
    }

    /// Base64 entries decoded to bytes: `data` for secrets,
    /// `binaryData` for config maps.
    pub fn binary_data(&self) -> Result<BTreeMap<String, Vec<u8>>, OverlayError> {
        let field = match self.kind {
            ManifestKind::Secret => "data",
            ManifestKind::ConfigMap => "binaryData",
        };
        let mut out = BTreeMap::new();
        for (entry, text) in self.text_entries(field) {
            let bytes = Base64::decode_vec(&text)
                .map_err(|_| OverlayError::InvalidBase64 { entry: entry.clone() })?;
            out.insert(entry, bytes);
        }
        Ok(out)
    }

    fn text_entries(&self, field: &str) -> BTreeMap<String, String> {
        let Some(Node::Container(map)) = self.doc.child(field) else {
            return BTreeMap::new();
        };
        map.children()
            .filter_map(|(key, node)| match node {
                Node::Leaf(value) => Some((key.clone(), value.render())),
                _ => None,
            })
            .collect()
    }

    /// Re-emits the manifest as YAML, with empty maps tidied away.
    pub fn write_to(&self, writer: &mut dyn Write) -> Result<(), OverlayError> {
        let mut doc = self.doc.clone();
        doc.compact()?;
        Format::Yaml.encode(writer, &doc)?;
        Ok(())
    }
}

/// Base64-encodes bytes the way manifest `data` entries expect.
pub fn encode_entry(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}
