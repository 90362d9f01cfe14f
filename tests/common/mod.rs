//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use canopy_core::record::{GroupRecord, LeafRecord};
use tracing_subscriber::EnvFilter;

/// Idempotent tracing init so failing tests print their span context.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn leaf(full_path: &str, id: i64, display_name: &str) -> LeafRecord {
    LeafRecord::new(
        full_path,
        id,
        display_name,
        &format!("https://example.com/{full_path}"),
    )
    .expect("fixture record is well formed")
}

pub fn group(full_path: &str, display_name: &str) -> GroupRecord {
    GroupRecord::new(
        full_path,
        display_name,
        &format!("https://example.com/groups/{full_path}"),
    )
    .expect("fixture record is well formed")
}

/// Two top-level teams, three services.
pub fn team_records() -> Vec<LeafRecord> {
    vec![
        leaf("teamA/svc1", 1, "Service 1"),
        leaf("teamA/svc2", 2, "Service 2"),
        leaf("teamB/svc3", 3, "Service 3"),
    ]
}

/// Three levels of nesting plus a root-level leaf.
pub fn nested_records() -> Vec<LeafRecord> {
    vec![
        leaf("platform/core/ingest", 10, "Ingest"),
        leaf("platform/core/api", 11, "API"),
        leaf("platform/edge/cdn", 12, "CDN"),
        leaf("tools/linter", 13, "Linter"),
        leaf("sandbox", 14, "Sandbox"),
    ]
}
