//! # canopy-core
//!
//! A stateless hierarchical path-tree engine for catalog monitoring dashboards.
//!
//! canopy-core rebuilds a navigable tree from flat, slash-delimited catalog
//! records on every request. Records carry no parent references; structure is
//! derived purely from shared path prefixes. Per-user UI state (which groups
//! are expanded, which leaves are selected) survives across stateless
//! request/response cycles through a small persisted state model keyed by path
//! identity, never through a long-lived tree.
//!
//! ## Overview
//!
//! Three concerns compose per request, in a fixed order:
//!
//! 1. **Structural derivation** — [`tree::PathTreeBuilder`] folds the flat
//!    record set into an arena tree keyed by full path.
//! 2. **Persisted state application** — [`state::StateStore`] supplies the
//!    per-user expand mapping and selected-leaf set; expansion defaults to
//!    open at depth 1 and closed below.
//! 3. **Search filtering and selection aggregation** — [`filter`] prunes the
//!    rendered snapshot to matches and their ancestors (forcing those
//!    ancestors open for the response), while [`select`] computes each
//!    group's tri-state selection bottom-up over the *unpruned* tree so
//!    hidden selections are never lost.
//!
//! [`orchestrator::TreeOrchestrator`] sequences the pipeline and emits a
//! serializable snapshot (full tree, or the subtree around a mutation for
//! partial refreshes) plus any non-fatal build warnings.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_core::{
//!     orchestrator::{TreeOrchestrator, TreeRequest},
//!     record::LeafRecord,
//!     state::MemoryStateStore,
//! };
//!
//! fn main() -> Result<(), canopy_core::CanopyError> {
//!     let records = vec![
//!         LeafRecord::new("platform/ingest", 1, "Ingest", "https://git.example.com/platform/ingest")?,
//!         LeafRecord::new("platform/api", 2, "API", "https://git.example.com/platform/api")?,
//!     ];
//!
//!     let orchestrator = TreeOrchestrator::new(MemoryStateStore::default());
//!     let response = orchestrator.handle(&[], &records, &TreeRequest::for_user("alice"))?;
//!
//!     for node in &response.nodes {
//!         println!("{} ({} children)", node.full_path, node.children.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Tolerance
//!
//! Build problems never abort a request. A record with an empty path segment
//! is skipped, a leaf/structural path collision resolves leaf-wins, and a
//! mutation aimed at a path the rebuilt tree no longer contains is ignored —
//! each accumulates a [`TreeWarning`] that travels with the response so the
//! caller can surface it.
//!
//! ## Module Guide
//!
//! Start with [`orchestrator::TreeOrchestrator`] for the request pipeline,
//! then [`tree`] for the arena structure and builder. [`state`] defines the
//! persistence boundary; [`MemoryStateStore`](state::MemoryStateStore) makes
//! the engine trivially testable, [`TomlStateStore`](state::TomlStateStore)
//! persists to a single TOML file.

pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod paths;
pub mod record;
pub mod select;
pub mod state;
pub mod tree;


pub use error::*;
