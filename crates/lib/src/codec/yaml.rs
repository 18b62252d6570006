//! YAML codec.
//!
//! Anchors and aliases are resolved by the parser before we see the
//! value tree, and tags are stripped down to the tagged value.

use std::io::{Read, Write};

use serde_yaml::Value as Yaml;

use crate::dom::{Container, List, Node, Value};

use super::CodecError;

/// Decodes a YAML document into a container. The top-level value must
/// be a mapping.
pub fn decode(reader: &mut dyn Read) -> Result<Container, CodecError> {
    let value: Yaml = serde_yaml::from_reader(reader)?;
    match node_from_yaml(value)? {
        Node::Container(c) => Ok(c),
        _ => Err(CodecError::TopLevelNotContainer { format: "YAML" }),
    }
}

/// Encodes a container as YAML.
pub fn encode(writer: &mut dyn Write, container: &Container) -> Result<(), CodecError> {
    let value = container_to_yaml(container);
    serde_yaml::to_writer(writer, &value)?;
    Ok(())
}

fn node_from_yaml(value: Yaml) -> Result<Node, CodecError> {
    Ok(match value {
        Yaml::Null => Node::Leaf(Value::Null),
        Yaml::Bool(b) => Node::Leaf(Value::Bool(b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Leaf(Value::Int(i))
            } else if let Some(u) = n.as_u64() {
                Node::Leaf(Value::Uint(u))
            } else {
                Node::Leaf(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Yaml::String(s) => Node::Leaf(Value::Text(s)),
        Yaml::Sequence(seq) => {
            let mut list = List::new();
            for item in seq {
                list.push_unchecked(node_from_yaml(item)?);
            }
            Node::List(list)
        }
        Yaml::Mapping(map) => {
            let mut container = Container::new();
            for (key, value) in map {
                container.insert_unchecked(key_string(key)?, node_from_yaml(value)?);
            }
            Node::Container(container)
        }
        Yaml::Tagged(tagged) => node_from_yaml(tagged.value)?,
    })
}

/// Mapping keys are coerced to strings; collection keys are rejected.
fn key_string(key: Yaml) -> Result<String, CodecError> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Sequence(_) => Err(CodecError::UnsupportedKey { kind: "sequence" }),
        Yaml::Mapping(_) => Err(CodecError::UnsupportedKey { kind: "mapping" }),
        Yaml::Tagged(tagged) => key_string(tagged.value),
    }
}

fn container_to_yaml(container: &Container) -> Yaml {
    let mut map = serde_yaml::Mapping::new();
    for (key, child) in container.children() {
        map.insert(Yaml::String(key.clone()), node_to_yaml(child));
    }
    Yaml::Mapping(map)
}

fn node_to_yaml(node: &Node) -> Yaml {
    match node {
        Node::Leaf(Value::Null) => Yaml::Null,
        Node::Leaf(Value::Bool(b)) => Yaml::Bool(*b),
        Node::Leaf(Value::Int(i)) => Yaml::Number((*i).into()),
        Node::Leaf(Value::Uint(u)) => Yaml::Number((*u).into()),
        Node::Leaf(Value::Float(f)) => Yaml::Number((*f).into()),
        Node::Leaf(Value::Text(s)) => Yaml::String(s.clone()),
        Node::List(list) => Yaml::Sequence(
            (0..list.len())
                .map(|i| list.get(i).map(node_to_yaml).unwrap_or(Yaml::Null))
                .collect(),
        ),
        Node::Container(c) => container_to_yaml(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;

    #[test]
    fn nested_round_trip() {
        let input = "server:\n  port: 8080\n  hosts:\n    - a\n    - b\ndebug: true\n";
        let doc = decode(&mut input.as_bytes()).unwrap();
        assert_eq!(doc.leaf("server.port"), Some(&Value::Int(8080)));
        assert_eq!(
            doc.get(&Path::from_components(["debug"])),
            Some(&Node::Leaf(Value::Bool(true)))
        );

        let text = super::super::Format::Yaml.encode_to_string(&doc).unwrap();
        let again = decode(&mut text.as_bytes()).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let doc = decode(&mut "1: one\ntrue: yes\n".as_bytes()).unwrap();
        assert_eq!(doc.leaf("1"), Some(&Value::Text("one".into())));
        assert!(doc.contains_key("true"));
    }

    #[test]
    fn aliases_are_resolved() {
        let input = "base: &b\n  a: 1\ncopy: *b\n";
        let doc = decode(&mut input.as_bytes()).unwrap();
        assert_eq!(doc.leaf("copy.a"), Some(&Value::Int(1)));
    }

    #[test]
    fn scalar_document_is_rejected() {
        assert!(decode(&mut "just a string".as_bytes())
            .unwrap_err()
            .is_top_level_not_container());
    }
}
