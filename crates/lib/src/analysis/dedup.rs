//! Cross-layer deduplication.
//!
//! Entries that carry the same value in every layer of an overlay are
//! factored out into a common container; the remaining layers keep
//! only what differs. Merging the slimmed layers back together with
//! the common part reproduces the original merged view.

use std::collections::BTreeMap;

use crate::dom::{Container, Node, Value};
use crate::morph::Morpher;
use crate::overlay::Overlay;
use crate::path::{Path, PathSyntax};

use super::AnalysisError;

/// A filter deciding whether a leaf takes part in deduplication.
/// Rejected leaves always stay in their layer.
pub type DedupFilter<'a> = &'a dyn Fn(&Path, &Node) -> bool;

/// The result of [`deduplicate`].
#[derive(Debug)]
pub struct DedupOutcome {
    /// The overlay with common entries removed from every layer.
    pub overlay: Overlay,
    /// The entries shared by every layer.
    pub common: Container,
}

/// The entries that appear with an equal value in every layer. Returns
/// an empty container for overlays with fewer than two layers.
pub fn find_common(overlay: &Overlay) -> Result<Container, AnalysisError> {
    find_common_filtered(overlay, None)
}

fn find_common_filtered(
    overlay: &Overlay,
    filter: Option<DedupFilter<'_>>,
) -> Result<Container, AnalysisError> {
    let mut common = Container::new();
    if overlay.len() < 2 {
        return Ok(common);
    }

    let flats: Vec<BTreeMap<String, Value>> = overlay
        .layers()
        .map(|(_, layer)| layer.flatten())
        .collect();
    let Some((first, rest)) = flats.split_first() else {
        return Ok(common);
    };

    for (key, value) in first {
        if !rest.iter().all(|flat| flat.get(key) == Some(value)) {
            continue;
        }
        let path = PathSyntax::Properties.parse(key)?;
        if let Some(filter) = filter {
            if !filter(&path, &Node::Leaf(value.clone())) {
                continue;
            }
        }
        common.set(&path, Node::Leaf(value.clone()))?;
    }
    Ok(common)
}

/// Splits an overlay into layer-specific remainders and the common
/// entries shared by every layer.
pub fn deduplicate(overlay: &Overlay) -> Result<DedupOutcome, AnalysisError> {
    deduplicate_filtered(overlay, None)
}

/// [`deduplicate`] with a filter suppressing specific leaves from
/// consideration (typical use: skip list contents).
pub fn deduplicate_filtered(
    overlay: &Overlay,
    filter: Option<DedupFilter<'_>>,
) -> Result<DedupOutcome, AnalysisError> {
    let common = find_common_filtered(overlay, filter)?;
    if common.is_empty() {
        return Ok(DedupOutcome {
            overlay: overlay.clone(),
            common,
        });
    }

    let common_flat = common.flatten();
    let mut slimmed = Overlay::new();
    for (name, layer) in overlay.layers() {
        let remainder = Morpher::new()
            .add_with_filter(layer, |path, node| {
                let key = PathSyntax::Properties.serialize(path);
                match (common_flat.get(&key), node) {
                    (Some(shared), Node::Leaf(value)) => shared != value,
                    _ => true,
                }
            })?
            .finish();
        slimmed.add(name, remainder);
    }
    Ok(DedupOutcome {
        overlay: slimmed,
        common,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MergeOptions;

    fn path(s: &str) -> Path {
        PathSyntax::Properties.must_parse(s)
    }

    fn sample() -> Overlay {
        let mut overlay = Overlay::new();
        overlay.put("a", &path("shared.k"), "same").unwrap();
        overlay.put("a", &path("only.a"), 1i64).unwrap();
        overlay.put("b", &path("shared.k"), "same").unwrap();
        overlay.put("b", &path("only.b"), 2i64).unwrap();
        overlay
    }

    #[test]
    fn common_requires_equality_in_every_layer() {
        let common = find_common(&sample()).unwrap();
        assert_eq!(common.leaf("shared.k"), Some(&Value::Text("same".into())));
        assert!(common.leaf("only.a").is_none());
    }

    #[test]
    fn single_layer_has_no_common_part() {
        let mut overlay = Overlay::new();
        overlay.put("solo", &path("k"), 1i64).unwrap();
        assert!(find_common(&overlay).unwrap().is_empty());
    }

    #[test]
    fn deduplicate_removes_common_entries_from_layers() {
        let outcome = deduplicate(&sample()).unwrap();
        let a = outcome.overlay.layer("a").unwrap();
        assert!(a.leaf("shared.k").is_none());
        assert_eq!(a.leaf("only.a"), Some(&Value::Int(1)));
    }

    #[test]
    fn merged_view_is_preserved() {
        let original = sample();
        let outcome = deduplicate(&original).unwrap();

        let mut rebuilt = Overlay::new();
        rebuilt.add("common", outcome.common.clone());
        for (name, layer) in outcome.overlay.layers() {
            rebuilt.add(name, layer.clone());
        }
        let options = MergeOptions::default();
        assert_eq!(rebuilt.merged(&options), original.merged(&options));
    }

    #[test]
    fn filter_suppresses_paths_from_consideration() {
        let mut overlay = sample();
        overlay.put("a", &path("skip.me"), "x").unwrap();
        overlay.put("b", &path("skip.me"), "x").unwrap();

        let filter: DedupFilter<'_> = &|p, _| !p.to_string().starts_with("skip");
        let outcome = deduplicate_filtered(&overlay, Some(filter)).unwrap();
        assert!(outcome.common.leaf("skip.me").is_none());
        assert_eq!(
            outcome.overlay.layer("a").unwrap().leaf("skip.me"),
            Some(&Value::Text("x".into()))
        );
    }
}
