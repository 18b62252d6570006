//! Java-style property file codec.
//!
//! Each line is `path=value` where the left-hand side is a property
//! path (dots descend, `[i]` indexes lists, `\.` escapes a literal
//! dot). Values are kept as text; blank lines and `#`/`!` comment
//! lines are skipped. Encoding flattens the document back to one line
//! per leaf, sorted by path.

use std::io::{Read, Write};

use crate::dom::{Container, Value};
use crate::path::PathSyntax;

use super::CodecError;

/// Decodes a property file into a container.
pub fn decode(reader: &mut dyn Read) -> Result<Container, CodecError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let mut doc = Container::new();
    for (lineno, raw) in input.lines().enumerate() {
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(CodecError::InvalidInput {
                reason: format!("line {}: missing '=' separator", lineno + 1),
            });
        };
        let path = PathSyntax::Properties.parse(key.trim())?;
        if path.is_empty() {
            return Err(CodecError::InvalidInput {
                reason: format!("line {}: empty property key", lineno + 1),
            });
        }
        doc.set(&path, Value::Text(value.trim().to_string()))?;
    }
    Ok(doc)
}

/// Encodes a container by flattening every leaf to a `path=value` line.
pub fn encode(writer: &mut dyn Write, container: &Container) -> Result<(), CodecError> {
    for (key, value) in container.flatten() {
        writeln!(writer, "{}={}", key, value.render())?;
    }
    Ok(())
}
