//! Dotted property-path syntax.
//!
//! ```text
//! path      = segment ('.' segment)*
//! segment   = name ('[' index ']')*
//! name      = (char | '\.')*        backslash-dot is a literal dot
//! index     = digits | '-'          '-' is the append marker
//! ```
//!
//! The empty string parses to the empty path (the root).

use super::{Component, Path, PathError};

/// Parses a property-path string.
pub fn parse(input: &str) -> Result<Path, PathError> {
    if input.is_empty() {
        return Ok(Path::root());
    }

    let mut components = Vec::new();
    let mut name = String::new();
    let mut segment_start = 0usize;
    let mut segment_has_parts = false;
    let mut chars = input.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => {
                // One rune of lookahead for the escape rule.
                if matches!(chars.peek(), Some((_, '.'))) {
                    chars.next();
                    name.push('.');
                } else {
                    name.push('\\');
                }
            }
            '[' => {
                if !name.is_empty() {
                    components.push(Component::Key(std::mem::take(&mut name)));
                    segment_has_parts = true;
                }
                let mut index = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    index.push(c);
                }
                if !closed {
                    return Err(PathError::UnterminatedIndex {
                        input: input.to_string(),
                    });
                }
                if index == "-" {
                    components.push(Component::AfterLast);
                } else {
                    let parsed =
                        index
                            .parse::<usize>()
                            .map_err(|_| PathError::InvalidIndex {
                                input: input.to_string(),
                                index: index.clone(),
                            })?;
                    components.push(Component::Index(parsed));
                }
                segment_has_parts = true;
                // After a bracket only another bracket, a dot, or the end
                // of input may follow.
                match chars.peek() {
                    None | Some((_, '[')) | Some((_, '.')) => {}
                    Some((at, found)) => {
                        return Err(PathError::UnexpectedChar {
                            input: input.to_string(),
                            at: *at,
                            found: *found,
                        });
                    }
                }
            }
            '.' => {
                if !name.is_empty() {
                    components.push(Component::Key(std::mem::take(&mut name)));
                } else if !segment_has_parts {
                    return Err(PathError::EmptySegment {
                        input: input.to_string(),
                        at: segment_start,
                    });
                }
                segment_start = at + 1;
                segment_has_parts = false;
            }
            _ => name.push(c),
        }
    }

    if !name.is_empty() {
        components.push(Component::Key(name));
    } else if !segment_has_parts {
        return Err(PathError::EmptySegment {
            input: input.to_string(),
            at: segment_start,
        });
    }

    Ok(Path::from_components(components))
}

/// Parses a property-path string, panicking on malformed input.
///
/// Intended for path literals; use [`parse`] for untrusted input.
pub fn must_parse(input: &str) -> Path {
    match parse(input) {
        Ok(path) => path,
        Err(err) => panic!("invalid property path: {err}"),
    }
}

/// Renders a path in property syntax.
pub fn serialize(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                for c in key.chars() {
                    if c == '.' {
                        out.push('\\');
                    }
                    out.push(c);
                }
            }
            Component::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
            Component::AfterLast => out.push_str("[-]"),
        }
    }
    out
}
