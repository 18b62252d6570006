/*! Integration tests for Strata.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - dom: document trees, sealing and merge behavior
 * - paths: the two path grammars and their round trips
 * - codec: YAML/JSON/properties decode and encode
 * - overlay: layered documents, document sets and manifests
 * - analysis: placeholder resolution, dedup and dependency reports
 * - diff_patch: structural diff and RFC 6902 patches
 * - pipeline: the declarative executor end to end
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("strata=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod analysis;
mod codec;
mod diff_patch;
mod dom;
mod helpers;
mod overlay;
mod paths;
mod pipeline;
