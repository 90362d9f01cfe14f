//! Search-driven retention, pruning, and ancestor-forced expansion.
//!
//! A non-empty query retains every node whose name, full path, or display
//! name contains it (case-insensitive substring) plus the ancestors of each
//! match; everything
//! else is marked invisible and pruned at snapshot time. Any structural node
//! with a retained-match descendant is forced open for the duration of the
//! response — a transient override that is never written back to the
//! persisted expand mapping. Selection aggregation runs over the unpruned
//! tree, so this module only flips flags and never removes nodes.

use crate::tree::Tree;

/// Apply `query` to the tree's `matched`/`visible`/`expanded` flags.
///
/// An empty query is a no-op: the tree is returned untouched, expand flags
/// exactly as the expand state left them.
pub fn apply_search(tree: &mut Tree, query: &str) {
    if query.is_empty() {
        return;
    }
    let needle = query.to_lowercase();

    let mut retained = 0usize;
    for id in tree.post_order() {
        if id == tree.root() {
            continue;
        }
        // Post-order guarantees children are flagged before their parent.
        let subtree_matched = tree
            .children(id)
            .iter()
            .any(|child| tree.node(*child).visible);
        let node = tree.node_mut(id);
        // Users search what they see, which is the display name for records
        // that carry one; path segments alone would miss those queries.
        let display_matched = node
            .leaf_payload()
            .map(|payload| payload.display_name.as_str())
            .or_else(|| node.group_payload().map(|payload| payload.display_name.as_str()))
            .is_some_and(|name| name.to_lowercase().contains(&needle));
        node.matched = node.name.to_lowercase().contains(&needle)
            || node.full_path.to_lowercase().contains(&needle)
            || display_matched;
        // Top-level nodes stay visible as collapsed context rows even with
        // no match inside; everything deeper is pruned unless retained.
        node.visible = node.matched || subtree_matched || node.depth == 1;
        if node.visible {
            retained += 1;
        }
        // Ancestor-forced expansion: a match below this group must be
        // reachable in the response, whatever the persisted flag says.
        if !node.is_leaf() && subtree_matched {
            node.expanded = true;
        }
    }
    tracing::debug!(%query, retained, "search filter applied");
}
