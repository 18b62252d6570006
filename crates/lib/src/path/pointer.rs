//! RFC 6901 JSON-pointer syntax.
//!
//! `~1` decodes to `/`, `~0` decodes to `~`, and the segment `-` is the
//! append marker. Digit-only segments are kept as keys; navigation treats
//! them as list indices when the node under the cursor is a list (see
//! [`Component::as_index`]).

use super::{Component, Path, PathError};

/// Parses a JSON-pointer string.
pub fn parse(input: &str) -> Result<Path, PathError> {
    if input.is_empty() {
        return Ok(Path::root());
    }
    if !input.starts_with('/') {
        return Err(PathError::MissingLeadingSlash {
            input: input.to_string(),
        });
    }

    let components: Vec<_> = input
        .split('/')
        .skip(1)
        .map(|segment| {
            if segment == "-" {
                Component::AfterLast
            } else {
                Component::Key(segment.replace("~1", "/").replace("~0", "~"))
            }
        })
        .collect();

    Ok(Path::from_components(components))
}

/// Parses a JSON-pointer string, panicking on malformed input.
pub fn must_parse(input: &str) -> Path {
    match parse(input) {
        Ok(path) => path,
        Err(err) => panic!("invalid JSON pointer: {err}"),
    }
}

/// Renders a path in JSON-pointer syntax. The empty path renders as `""`.
pub fn serialize(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        out.push('/');
        match component {
            Component::Key(key) => {
                out.push_str(&key.replace('~', "~0").replace('/', "~1"));
            }
            Component::Index(i) => out.push_str(&i.to_string()),
            Component::AfterLast => out.push('-'),
        }
    }
    out
}
