use strata::codec::Format;
use strata::dom::Container;
use strata::path::{property, Path};

/// Decodes a YAML document into a container, panicking on bad input.
pub fn yaml(text: &str) -> Container {
    Format::Yaml.decode_str(text).expect("test document is valid YAML")
}

/// Parses a property path, panicking on bad input.
pub fn path(s: &str) -> Path {
    property::must_parse(s)
}

/// The rendered text of the leaf at `path`, panicking when absent.
pub fn leaf_text(doc: &Container, path: &str) -> String {
    doc.leaf(path)
        .unwrap_or_else(|| panic!("no leaf at {path}"))
        .render()
}
