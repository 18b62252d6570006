//! Placeholder resolution.
//!
//! Placeholders use the `${KEY}` / `${KEY:default}` syntax and may
//! nest (`${a.${b}}`). Resolution is depth-first with a visited set,
//! so a cyclic reference fails instead of recursing forever. Keys that
//! cannot be resolved are left in place verbatim.

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use crate::dom::{Container, MergeOptions, Node, Value};
use crate::overlay::{Coordinate, Overlay};
use crate::path::PathSyntax;

use super::AnalysisError;

const PREFIX: &str = "${";
const SUFFIX: char = '}';
const SEPARATOR: char = ':';

/// Cheap pre-check: the string contains `${` followed by `}`.
pub fn possibly_placeholder(input: &str) -> bool {
    match input.find(PREFIX) {
        Some(idx) => input[idx..].contains(SUFFIX),
        None => false,
    }
}

/// Resolves every placeholder in `input` through `lookup`.
///
/// A key absent from the lookup falls back to the text after the first
/// `:` inside the key, when present; otherwise the placeholder stays
/// as-is. Resolved values are themselves scanned for placeholders.
pub fn resolve<F>(input: &str, lookup: &F) -> Result<String, AnalysisError>
where
    F: Fn(&str) -> Option<String>,
{
    if !possibly_placeholder(input) {
        return Ok(input.to_string());
    }
    let mut visited = HashSet::new();
    substitute(input, lookup, &mut visited)
}

fn substitute<F>(
    input: &str,
    lookup: &F,
    visited: &mut HashSet<String>,
) -> Result<String, AnalysisError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = input.to_string();
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find(PREFIX) {
        let start = search_from + offset;
        let Some(end) = matching_suffix(&result, start + PREFIX.len()) else {
            break;
        };
        let placeholder = result[start + PREFIX.len()..end].to_string();
        if !visited.insert(placeholder.clone()) {
            return Err(AnalysisError::CyclicReference { key: placeholder });
        }

        // The key itself may contain nested placeholders.
        let key = substitute(&placeholder, lookup, visited)?;
        let value = match lookup(&key) {
            Some(v) => Some(v),
            None => match key.split_once(SEPARATOR) {
                Some((name, default)) => {
                    Some(lookup(name).unwrap_or_else(|| default.to_string()))
                }
                None => None,
            },
        };

        match value {
            Some(v) => {
                let v = substitute(&v, lookup, visited)?;
                trace!(key, value = %v, "substituted placeholder");
                result.replace_range(start..=end, &v);
                search_from = start + v.len();
            }
            None => {
                // Unresolved, skip past and keep scanning.
                search_from = end + 1;
            }
        }
        visited.remove(&placeholder);
    }
    Ok(result)
}

/// Index of the `}` closing the placeholder whose text starts at
/// `from`, honoring nested `${`.
fn matching_suffix(input: &str, from: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        if input[i..].starts_with(PREFIX) {
            depth += 1;
            i += PREFIX.len();
        } else if bytes[i] == SUFFIX as u8 {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
            i += 1;
        } else {
            i += 1;
        }
    }
    None
}

/// The outcome of resolving an overlay's merged view.
#[derive(Debug, Default)]
pub struct ResolveReport {
    /// The merged view with placeholders substituted.
    pub resolved: Container,
    /// Keys whose value still holds a placeholder after resolution,
    /// with every coordinate holding that key.
    pub failed: BTreeMap<String, Vec<Coordinate>>,
}

/// Resolves every leaf of the overlay's merged view, looking keys up
/// in the same merged view. Keys rejected by `filter` are copied
/// through untouched.
pub fn resolve_overlay<F>(
    overlay: &Overlay,
    filter: Option<&F>,
) -> Result<ResolveReport, AnalysisError>
where
    F: Fn(&str) -> bool,
{
    let merged = overlay.merged(&MergeOptions::default());
    let flat = merged.flatten();
    let lookup = |key: &str| flat.get(key).map(Value::render);

    let mut report = ResolveReport::default();
    for (key, value) in &flat {
        let path = PathSyntax::Properties.parse(key)?;
        let rendered = value.render();
        let skip = filter.map(|f| !f(key)).unwrap_or(false);
        if skip || !possibly_placeholder(&rendered) {
            report.resolved.set(&path, Node::Leaf(value.clone()))?;
            continue;
        }
        let resolved = resolve(&rendered, &lookup)?;
        if resolved == rendered {
            report.failed.insert(
                key.clone(),
                overlay
                    .layers()
                    .filter(|(_, layer)| layer.get(&path).is_some())
                    .map(|(name, _)| Coordinate::new(name, key.clone()))
                    .collect(),
            );
        }
        report.resolved.set(&path, Value::Text(resolved))?;
    }
    Ok(report)
}
