//! Codec back-ends mapping byte streams to and from the DOM.
//!
//! Three textual formats are supported: YAML, JSON and Java-style
//! properties. Each back-end exposes a decoder/encoder pair with the
//! common [`Decoder`]/[`Encoder`] signatures; [`Format`] dispatches
//! between them and [`Format::from_extension`] is the file-extension
//! lookup table.

use std::io::{Read, Write};
use std::path::Path as FsPath;

pub mod json;
pub mod properties;
pub mod yaml;

mod errors;

pub use errors::CodecError;

use crate::dom::Container;

/// Reads a container from a byte stream.
pub type Decoder = fn(&mut dyn Read) -> Result<Container, CodecError>;

/// Writes a container to a byte stream.
pub type Encoder = fn(&mut dyn Write, &Container) -> Result<(), CodecError>;

/// A supported textual format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// YAML documents.
    Yaml,
    /// JSON documents.
    Json,
    /// Java-style `key=value` property files.
    Properties,
}

impl Format {
    /// Dispatches by file extension; unknown extensions are unsupported.
    pub fn from_extension(path: impl AsRef<FsPath>) -> Option<Format> {
        match path.as_ref().extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "properties" => Some(Format::Properties),
            _ => None,
        }
    }

    /// The decoder for this format.
    pub fn decoder(self) -> Decoder {
        match self {
            Format::Yaml => yaml::decode,
            Format::Json => json::decode,
            Format::Properties => properties::decode,
        }
    }

    /// The encoder for this format.
    pub fn encoder(self) -> Encoder {
        match self {
            Format::Yaml => yaml::encode,
            Format::Json => json::encode,
            Format::Properties => properties::encode,
        }
    }

    /// Decodes a container from a reader.
    pub fn decode(self, reader: &mut dyn Read) -> Result<Container, CodecError> {
        (self.decoder())(reader)
    }

    /// Encodes a container to a writer.
    pub fn encode(self, writer: &mut dyn Write, container: &Container) -> Result<(), CodecError> {
        (self.encoder())(writer, container)
    }

    /// Decodes a container from a string.
    pub fn decode_str(self, input: &str) -> Result<Container, CodecError> {
        self.decode(&mut input.as_bytes())
    }

    /// Encodes a container into a string.
    pub fn encode_to_string(self, container: &Container) -> Result<String, CodecError> {
        let mut buf = Vec::new();
        self.encode(&mut buf, container)?;
        String::from_utf8(buf).map_err(|e| CodecError::InvalidInput {
            reason: format!("encoder produced non-UTF-8 output: {e}"),
        })
    }
}
