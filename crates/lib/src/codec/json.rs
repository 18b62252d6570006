//! JSON codec, a thin bridge over the plain-data conversion on [`Node`].

use std::io::{Read, Write};

use crate::dom::{Container, Node};

use super::CodecError;

/// Decodes a JSON document into a container. The top-level value must
/// be an object.
pub fn decode(reader: &mut dyn Read) -> Result<Container, CodecError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    match Node::from_plain(value) {
        Node::Container(c) => Ok(c),
        _ => Err(CodecError::TopLevelNotContainer { format: "JSON" }),
    }
}

/// Encodes a container as pretty-printed JSON.
pub fn encode(writer: &mut dyn Write, container: &Container) -> Result<(), CodecError> {
    let value = to_value(container);
    serde_json::to_writer_pretty(&mut *writer, &value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Plain-data projection of a container; list holes become nulls.
pub(crate) fn to_value(container: &Container) -> serde_json::Value {
    let map = container
        .children()
        .map(|(k, v)| (k.clone(), v.to_plain()))
        .collect();
    serde_json::Value::Object(map)
}
