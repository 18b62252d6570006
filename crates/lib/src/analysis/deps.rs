//! Dependency and impact analysis over placeholder references.

use std::collections::BTreeMap;

use tracing::debug;

use crate::dom::MergeOptions;
use crate::overlay::{Coordinate, DocumentSet, Overlay};

/// A filter restricting which keys of the source view are analysed.
pub type KeyFilter<'a> = &'a dyn Fn(&str) -> bool;

/// Where each key of a source overlay is referenced.
#[derive(Debug, Default)]
pub struct DependencyReport {
    /// Key to every coordinate whose value references it.
    pub references: BTreeMap<String, Vec<Coordinate>>,
    /// Every analysed key, sorted.
    pub all_keys: Vec<String>,
    /// Keys referenced nowhere, sorted.
    pub orphan_keys: Vec<String>,
}

fn references_key(value: &str, key: &str) -> bool {
    value.contains(&format!("${{{key}}}")) || value.contains(&format!("${{{key}:"))
}

/// For every key in the source overlay's merged view, finds each
/// coordinate in the source and reference overlays whose value
/// mentions it as `${key}` or `${key:…}`.
pub fn resolve_dependencies(
    source: &Overlay,
    references: &[&Overlay],
    filter: Option<KeyFilter<'_>>,
) -> DependencyReport {
    let merged = source.merged(&MergeOptions::default());
    let mut report = DependencyReport::default();

    for key in merged.flatten().keys() {
        if let Some(filter) = filter {
            if !filter(key) {
                continue;
            }
        }
        let mut hits = Vec::new();
        for overlay in std::iter::once(source).chain(references.iter().copied()) {
            hits.extend(overlay.search(|_, value| references_key(&value.render(), key)));
        }
        if hits.is_empty() {
            report.orphan_keys.push(key.clone());
        } else {
            report.references.insert(key.clone(), hits);
        }
        report.all_keys.push(key.clone());
    }
    debug!(
        keys = report.all_keys.len(),
        orphans = report.orphan_keys.len(),
        "dependency resolution complete"
    );
    report
}

/// For each candidate key, every coordinate in the document set whose
/// value references it. Keys with no hits are omitted.
pub fn impact<S: AsRef<str>>(
    set: &DocumentSet,
    keys: &[S],
) -> BTreeMap<String, Vec<Coordinate>> {
    let overlay = set.as_one();
    let mut out = BTreeMap::new();
    for key in keys {
        let key = key.as_ref();
        let hits = overlay.search(|_, value| references_key(&value.render(), key));
        if !hits.is_empty() {
            out.insert(key.to_string(), hits);
        }
    }
    out
}
