//! Selection marking, tri-state aggregation, and toggle propagation.
//!
//! Leaves are selected by membership in the persisted ID set; every
//! structural node's state is then derived in a single post-order pass. The
//! historical dashboard collapsed this to a boolean (a partially selected
//! group rendered exactly like an unselected one) — the tri-state keeps that
//! boolean reachable via [`SelectionState::is_selected`] while letting
//! renderers distinguish partial groups.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::TreeWarning,
    tree::{NodeId, Tree},
};

/// Aggregate selection of a node.
///
/// A structural node is `Selected` iff it has at least one child and all of
/// its children (leaves and subgroups alike) are `Selected`; `Partial` iff
/// some but not all of its descendant leaves are selected. Leaves are never
/// `Partial`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    Unselected,
    Partial,
    Selected,
}

impl SelectionState {
    /// The tri-state collapsed to the original boolean contract.
    pub fn is_selected(&self) -> bool {
        matches!(self, SelectionState::Selected)
    }
}

fn aggregate(tree: &Tree, id: NodeId) -> SelectionState {
    let children = tree.children(id);
    if children.is_empty() {
        return SelectionState::Unselected;
    }
    let mut all_selected = true;
    let mut any_marked = false;
    for child in children {
        match tree.node(child).selection {
            SelectionState::Selected => any_marked = true,
            SelectionState::Partial => {
                all_selected = false;
                any_marked = true;
            }
            SelectionState::Unselected => all_selected = false,
        }
    }
    if all_selected {
        SelectionState::Selected
    } else if any_marked {
        SelectionState::Partial
    } else {
        SelectionState::Unselected
    }
}

/// Mark every leaf by membership in `selected`, then derive each structural
/// node's aggregate bottom-up. Runs over the unpruned tree, so selections
/// hidden by an active search filter are never lost.
pub fn apply_selection(tree: &mut Tree, selected: &BTreeSet<i64>) {
    for id in tree.post_order() {
        let state = match tree.node(id).leaf_payload() {
            Some(payload) => {
                if selected.contains(&payload.id) {
                    SelectionState::Selected
                } else {
                    SelectionState::Unselected
                }
            }
            // Post-order: children are already settled.
            None => aggregate(tree, id),
        };
        tree.node_mut(id).selection = state;
    }
}

/// Toggle the selection rooted at `path`.
///
/// Selecting a structural node marks every descendant leaf (propagate-down);
/// deselecting clears them. Ancestors up to the root are then recomputed
/// bottom-up so a group is never shown selected unless literally all its
/// current descendants are. The persisted set is updated in place. A path
/// absent from the rebuilt tree is a no-op [`TreeWarning::PathNotFound`].
///
/// The ancestor pass aggregates over sibling flags as they currently stand,
/// so on a freshly built tree the caller must seed those flags with
/// [`apply_selection`] first (or re-run it afterwards, as the request
/// pipeline does) for the aggregates to reflect the persisted set.
pub fn toggle_selection(
    tree: &mut Tree,
    path: &str,
    on: bool,
    selected: &mut BTreeSet<i64>,
) -> Option<TreeWarning> {
    let Some(target) = tree.lookup(path) else {
        tracing::warn!(%path, "selection toggle targets a path absent from this tree");
        return Some(TreeWarning::PathNotFound {
            path: path.to_string(),
        });
    };

    for leaf in tree.descendant_leaves(target) {
        let id = tree
            .node(leaf)
            .leaf_payload()
            .expect("descendant_leaves yields leaves")
            .id;
        if on {
            selected.insert(id);
        } else {
            selected.remove(&id);
        }
        tree.node_mut(leaf).selection = if on {
            SelectionState::Selected
        } else {
            SelectionState::Unselected
        };
    }

    // Settle the target's own subtree, then propagate up. Branches between
    // the target and its leaves all flip to the same state, except childless
    // branches which can never report selected.
    if !tree.node(target).is_leaf() {
        resettle_branches(tree, target);
    }
    for ancestor in tree.ancestors(target) {
        let state = aggregate(tree, ancestor);
        tree.node_mut(ancestor).selection = state;
    }
    None
}

fn resettle_branches(tree: &mut Tree, base: NodeId) {
    for child in tree.children(base) {
        if !tree.node(child).is_leaf() {
            resettle_branches(tree, child);
        }
    }
    let state = aggregate(tree, base);
    tree.node_mut(base).selection = state;
}
