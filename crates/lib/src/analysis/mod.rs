//! Analysis passes over layered documents.
//!
//! Three families: cross-layer deduplication ([`dedup`]), `${…}`
//! placeholder resolution ([`placeholder`]), and reference tracking
//! ([`deps`] for dependency and impact reports).

pub mod dedup;
pub mod deps;
pub mod placeholder;

mod errors;

pub use dedup::{DedupOutcome, deduplicate, deduplicate_filtered, find_common};
pub use deps::{DependencyReport, impact, resolve_dependencies};
pub use errors::AnalysisError;
pub use placeholder::{ResolveReport, possibly_placeholder, resolve, resolve_overlay};
