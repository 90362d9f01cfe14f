//! End-to-end pipeline tests: stateless rebuilds driven through
//! [`TreeOrchestrator`] with persisted per-user state in between.

mod common;

use canopy_core::{
    error::TreeWarning,
    orchestrator::{SnapshotScope, TreeAction, TreeOrchestrator, TreeRequest},
    select::SelectionState,
    state::{MemoryStateStore, StateStore, TomlStateStore},
    tree::NodeSnapshot,
};
use common::{init_logging, nested_records, team_records};

/// Depth-first search through a snapshot forest by full path.
fn find<'a>(nodes: &'a [NodeSnapshot], full_path: &str) -> Option<&'a NodeSnapshot> {
    for node in nodes {
        if node.full_path == full_path {
            return Some(node);
        }
        if let Some(found) = find(&node.children, full_path) {
            return Some(found);
        }
    }
    None
}

#[test]
fn read_only_request_renders_defaults_and_persists_nothing() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
    let request = TreeRequest::for_user("alice");

    let response = orchestrator
        .handle(&[], &team_records(), &request)
        .expect("pipeline succeeds");

    assert!(response.warnings.is_empty());
    assert_eq!(response.nodes.len(), 2);
    let team_a = find(&response.nodes, "teamA").unwrap();
    assert!(team_a.expanded);
    assert!(!team_a.is_leaf);
    assert_eq!(team_a.children.len(), 2);

    let state = orchestrator.store().get("alice").unwrap();
    assert!(state.expanded.is_empty());
    assert!(state.selected.is_empty());
}

#[test]
fn collapse_persists_a_single_entry_and_survives_the_next_request() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
    let records = team_records();

    let collapse = TreeRequest::for_user("alice")
        .with_action(TreeAction::Collapse("teamA".to_string()));
    let response = orchestrator.handle(&[], &records, &collapse).unwrap();
    assert!(!find(&response.nodes, "teamA").unwrap().expanded);

    let state = orchestrator.store().get("alice").unwrap();
    assert_eq!(state.expanded.len(), 1);
    assert_eq!(state.expanded.get("teamA"), Some(&false));

    // The flag round-trips through a full stateless rebuild
    let reread = orchestrator
        .handle(&[], &records, &TreeRequest::for_user("alice"))
        .unwrap();
    assert!(!find(&reread.nodes, "teamA").unwrap().expanded);
    assert!(find(&reread.nodes, "teamB").unwrap().expanded);
}

#[test]
fn expand_toggle_on_a_leaf_is_ignored() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
    let request = TreeRequest::for_user("alice")
        .with_action(TreeAction::Expand("teamA/svc1".to_string()));

    let response = orchestrator.handle(&[], &team_records(), &request).unwrap();

    assert!(response.warnings.is_empty());
    let state = orchestrator.store().get("alice").unwrap();
    assert!(state.expanded.is_empty());
}

#[test]
fn expand_toggle_on_a_vanished_path_warns() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
    let request = TreeRequest::for_user("alice")
        .with_action(TreeAction::Collapse("teamC".to_string()));

    let response = orchestrator.handle(&[], &team_records(), &request).unwrap();

    assert_eq!(
        response.warnings,
        vec![TreeWarning::PathNotFound {
            path: "teamC".to_string()
        }]
    );
    assert!(orchestrator.store().get("alice").unwrap().expanded.is_empty());
}

#[test]
fn selection_persists_and_reaggregates_next_request() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
    let records = team_records();

    let select = TreeRequest::for_user("alice")
        .with_action(TreeAction::Select("teamA".to_string(), true));
    let response = orchestrator.handle(&[], &records, &select).unwrap();
    assert_eq!(
        find(&response.nodes, "teamA").unwrap().selection,
        SelectionState::Selected
    );

    let state = orchestrator.store().get("alice").unwrap();
    assert_eq!(state.selected, [1, 2].into());

    // A later read-only request derives the same aggregate from the set
    let reread = orchestrator
        .handle(&[], &records, &TreeRequest::for_user("alice"))
        .unwrap();
    let team_a = find(&reread.nodes, "teamA").unwrap();
    assert!(team_a.selected);
    assert_eq!(
        find(&reread.nodes, "teamB").unwrap().selection,
        SelectionState::Unselected
    );
}

#[test]
fn selection_of_vanished_leaves_is_retained_but_not_rendered() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());

    let select = TreeRequest::for_user("alice")
        .with_action(TreeAction::Select("teamA/svc1".to_string(), true));
    orchestrator.handle(&[], &team_records(), &select).unwrap();

    // svc1 disappears from the record set; its ID stays in the stored set
    let shrunk = vec![common::leaf("teamB/svc3", 3, "Service 3")];
    let response = orchestrator
        .handle(&[], &shrunk, &TreeRequest::for_user("alice"))
        .unwrap();
    assert!(find(&response.nodes, "teamA/svc1").is_none());
    assert_eq!(orchestrator.store().get("alice").unwrap().selected, [1].into());
}

#[test]
fn search_does_not_persist_forced_expansion() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
    let records = nested_records();

    orchestrator
        .handle(
            &[],
            &records,
            &TreeRequest::for_user("alice")
                .with_action(TreeAction::Collapse("platform".to_string())),
        )
        .unwrap();

    // The search forces platform open in the response...
    let searched = orchestrator
        .handle(
            &[],
            &records,
            &TreeRequest::for_user("alice").with_search("ingest"),
        )
        .unwrap();
    let platform = find(&searched.nodes, "platform").unwrap();
    assert!(platform.expanded);
    assert!(find(&searched.nodes, "platform/core/ingest").is_some());

    // ...but the persisted flag and the next unfiltered response still say
    // collapsed
    let state = orchestrator.store().get("alice").unwrap();
    assert_eq!(state.expanded.get("platform"), Some(&false));
    let unfiltered = orchestrator
        .handle(&[], &records, &TreeRequest::for_user("alice"))
        .unwrap();
    assert!(!find(&unfiltered.nodes, "platform").unwrap().expanded);
}

#[test]
fn search_prunes_non_matches_below_the_top_level() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());

    let response = orchestrator
        .handle(
            &[],
            &team_records(),
            &TreeRequest::for_user("alice").with_search("svc3"),
        )
        .unwrap();

    // Top-level groups survive as context rows, non-matching leaves do not
    assert!(find(&response.nodes, "teamA").is_some());
    assert!(find(&response.nodes, "teamA/svc1").is_none());
    assert!(find(&response.nodes, "teamB/svc3").is_some());
}

#[test]
fn search_by_display_name_reaches_the_leaf() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());

    let response = orchestrator
        .handle(
            &[],
            &team_records(),
            &TreeRequest::for_user("alice").with_search("Service 1"),
        )
        .unwrap();

    let svc1 = find(&response.nodes, "teamA/svc1").expect("display-name match retained");
    assert!(svc1.is_leaf);
    assert!(find(&response.nodes, "teamA").unwrap().expanded);
    assert!(find(&response.nodes, "teamA/svc2").is_none());
}

#[test]
fn partial_scope_returns_the_mutated_subtree_only() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());

    let request = TreeRequest::for_user("alice")
        .with_action(TreeAction::Expand("platform/core".to_string()))
        .partial();
    assert_eq!(request.scope, SnapshotScope::Partial);
    let response = orchestrator
        .handle(&[], &nested_records(), &request)
        .unwrap();

    assert_eq!(response.nodes.len(), 1);
    assert_eq!(response.nodes[0].full_path, "platform/core");
    assert!(response.nodes[0].expanded);
    assert!(find(&response.nodes, "tools").is_none());
}

#[test]
fn partial_scope_without_a_mutation_falls_back_to_full() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());

    let response = orchestrator
        .handle(
            &[],
            &team_records(),
            &TreeRequest::for_user("alice").partial(),
        )
        .unwrap();

    assert_eq!(response.nodes.len(), 2);
}

#[test]
fn users_never_share_state() {
    init_logging();
    let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
    let records = team_records();

    orchestrator
        .handle(
            &[],
            &records,
            &TreeRequest::for_user("alice")
                .with_action(TreeAction::Collapse("teamA".to_string())),
        )
        .unwrap();

    let bob = orchestrator
        .handle(&[], &records, &TreeRequest::for_user("bob"))
        .unwrap();
    assert!(find(&bob.nodes, "teamA").unwrap().expanded);
}

#[test]
fn toml_store_round_trips_through_the_pipeline() {
    init_logging();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tree_state.toml");
    let records = team_records();

    {
        let orchestrator = TreeOrchestrator::new(TomlStateStore::new(path.clone()));
        orchestrator
            .handle(
                &[],
                &records,
                &TreeRequest::for_user("alice")
                    .with_action(TreeAction::Select("teamB".to_string(), true)),
            )
            .unwrap();
    }

    // A fresh store over the same file sees the persisted selection
    let orchestrator = TreeOrchestrator::new(TomlStateStore::new(path));
    let response = orchestrator
        .handle(&[], &records, &TreeRequest::for_user("alice"))
        .unwrap();
    assert!(find(&response.nodes, "teamB").unwrap().selected);
    assert_eq!(orchestrator.store().get("alice").unwrap().selected, [3].into());
}
