//! Shared test utilities for tree engine testing

use crate::{
    record::{GroupRecord, LeafRecord},
    tree::{PathTreeBuilder, Tree},
};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Leaf record with a synthetic URL derived from its path.
pub fn leaf(full_path: &str, id: i64, display_name: &str) -> LeafRecord {
    LeafRecord::new(
        full_path,
        id,
        display_name,
        &format!("https://git.example.com/{full_path}"),
    )
    .unwrap()
}

/// Group record with a synthetic URL derived from its path.
pub fn group(full_path: &str, display_name: &str) -> GroupRecord {
    GroupRecord::new(
        full_path,
        display_name,
        &format!("https://git.example.com/groups/{full_path}"),
    )
    .unwrap()
}

/// Minimal catalog: two teams, three services.
pub fn team_records() -> Vec<LeafRecord> {
    vec![
        leaf("teamA/svc1", 1, "Service 1"),
        leaf("teamA/svc2", 2, "Service 2"),
        leaf("teamB/svc3", 3, "Service 3"),
    ]
}

/// A deeper catalog exercising depth-3 paths and a root-level leaf.
pub fn nested_records() -> Vec<LeafRecord> {
    vec![
        leaf("platform/core/ingest", 10, "Ingest"),
        leaf("platform/core/api", 11, "API"),
        leaf("platform/edge/cdn", 12, "CDN"),
        leaf("tools/linter", 13, "Linter"),
        leaf("sandbox", 14, "Sandbox"),
    ]
}

/// Build a tree from leaf records, asserting no warnings were produced.
pub fn build_clean(records: &[LeafRecord]) -> Tree {
    init_logging();
    let (tree, warnings) = PathTreeBuilder::build(&[], records);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    tree
}
