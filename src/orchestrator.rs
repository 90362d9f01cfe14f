//! The per-request pipeline: build → expand state → mutation → search →
//! selection → persist → snapshot.
//!
//! Each request rebuilds the whole tree synchronously and single-threaded; no
//! node is shared across requests. The only shared state is the per-user
//! [`UserTreeState`](crate::state::UserTreeState) behind the store, written
//! back exactly once per request before the response is produced. The
//! mutation (if any) runs strictly before search filtering so a freshly
//! toggled node's state is reflected even when the active query would prune
//! it, and the caller may discard a computed snapshot without side effects.

use serde::{Deserialize, Serialize};

use crate::{
    error::{CanopyError, TreeWarning},
    filter::apply_search,
    paths::parent,
    record::{GroupRecord, LeafRecord},
    select::{apply_selection, toggle_selection},
    state::{apply_expand_state, StateStore},
    tree::{NodeId, NodeSnapshot, PathTreeBuilder, Tree},
};

/// The single mutation a request may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeAction {
    #[default]
    None,
    Expand(String),
    Collapse(String),
    /// Select or deselect the subtree rooted at the path.
    Select(String, bool),
}

/// How much of the tree the caller wants back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotScope {
    #[default]
    Full,
    /// Only the subtree around the mutated path (its lowest visible
    /// ancestor); falls back to the full tree for global actions.
    Partial,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRequest {
    /// Opaque user key scoping the persisted state.
    pub user: String,
    pub action: TreeAction,
    /// Case-insensitive substring filter; `None` or empty means no filter.
    pub search: Option<String>,
    pub scope: SnapshotScope,
}

impl TreeRequest {
    /// A read-only full-tree request.
    pub fn for_user(user: impl Into<String>) -> TreeRequest {
        TreeRequest {
            user: user.into(),
            ..TreeRequest::default()
        }
    }

    pub fn with_action(mut self, action: TreeAction) -> TreeRequest {
        self.action = action;
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> TreeRequest {
        self.search = Some(query.into());
        self
    }

    pub fn partial(mut self) -> TreeRequest {
        self.scope = SnapshotScope::Partial;
        self
    }
}

/// Snapshot plus the non-fatal warnings accumulated while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeResponse {
    /// Top-level nodes for a full snapshot, or the single subtree root for a
    /// partial one. The tree root itself is never rendered.
    pub nodes: Vec<NodeSnapshot>,
    pub warnings: Vec<TreeWarning>,
}

/// Sequences the request pipeline over a [`StateStore`].
#[derive(Debug)]
pub struct TreeOrchestrator<S: StateStore> {
    store: S,
}

impl<S: StateStore> TreeOrchestrator<S> {
    pub fn new(store: S) -> TreeOrchestrator<S> {
        TreeOrchestrator { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one request against the current flat record set.
    ///
    /// Recoverable problems (malformed records, collisions, mutations aimed
    /// at vanished paths) surface as warnings in the response; only store
    /// failures abort the request.
    #[tracing::instrument(skip(self, groups, leaves), fields(user = %request.user))]
    pub fn handle(
        &self,
        groups: &[GroupRecord],
        leaves: &[LeafRecord],
        request: &TreeRequest,
    ) -> Result<TreeResponse, CanopyError> {
        let (mut tree, mut warnings) = PathTreeBuilder::build(groups, leaves);
        let mut state = self.store.get(&request.user)?;
        apply_expand_state(&mut tree, &state.expanded);

        let mut mutated_path: Option<&str> = None;
        match &request.action {
            TreeAction::None => {}
            TreeAction::Expand(path) | TreeAction::Collapse(path) => {
                let open = matches!(request.action, TreeAction::Expand(_));
                match tree.lookup(path) {
                    Some(id) if !tree.node(id).is_leaf() => {
                        tree.node_mut(id).expanded = open;
                        // Exactly one mapping entry changes; sibling and
                        // descendant entries stay latent.
                        state.expanded.insert(path.clone(), open);
                        mutated_path = Some(path.as_str());
                    }
                    Some(_) => {
                        tracing::debug!(%path, "expand toggle on a leaf is meaningless, ignoring");
                    }
                    None => {
                        tracing::warn!(%path, "expand toggle targets a path absent from this tree");
                        warnings.push(TreeWarning::PathNotFound { path: path.clone() });
                    }
                }
            }
            TreeAction::Select(path, on) => match toggle_selection(&mut tree, path, *on, &mut state.selected) {
                Some(warning) => warnings.push(warning),
                None => mutated_path = Some(path.as_str()),
            },
        }

        if let Some(query) = request.search.as_deref().filter(|q| !q.is_empty()) {
            apply_search(&mut tree, query);
        }

        // Re-aggregate from the persisted set over the unpruned tree.
        apply_selection(&mut tree, &state.selected);

        // Persist before the response is produced; last write wins.
        self.store.put(&request.user, state)?;

        let base = match (request.scope, mutated_path) {
            (SnapshotScope::Partial, Some(path)) => lowest_visible_ancestor(&tree, path),
            _ => tree.root(),
        };
        Ok(TreeResponse {
            nodes: tree.snapshot(base),
            warnings,
        })
    }
}

/// The mutated node itself when the filter left it visible, else the nearest
/// visible ancestor, else the root.
fn lowest_visible_ancestor(tree: &Tree, path: &str) -> NodeId {
    let mut cursor = path;
    loop {
        if let Some(id) = tree.lookup(cursor) {
            if tree.node(id).visible {
                return id;
            }
        }
        match parent(cursor) {
            Some(up) => cursor = up,
            None => return tree.root(),
        }
    }
}
