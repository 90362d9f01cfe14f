//! `PathTreeBuilder` — flat records in, rooted tree out.
//!
//! For each record the builder splits the path into ordered segments and
//! walks from the root, creating a structural node for every segment but the
//! last; the last becomes (or overwrites) the record's own node. Given the
//! same record set the result is structurally identical regardless of input
//! ordering (collisions excepted, where the later record wins by policy).
//!
//! Failures are per-record and accumulated, never fatal: a malformed path
//! skips that record, and a leaf/structural path clash resolves leaf-wins
//! with a [`TreeWarning::PathCollision`].

use crate::{
    error::TreeWarning,
    paths::{path_join, split_segments},
    record::{GroupRecord, LeafRecord},
    tree::node::{NodeId, NodeKind, Tree},
};

#[derive(Debug)]
pub struct PathTreeBuilder {
    tree: Tree,
    warnings: Vec<TreeWarning>,
}

impl Default for PathTreeBuilder {
    fn default() -> PathTreeBuilder {
        PathTreeBuilder::new()
    }
}

impl PathTreeBuilder {
    pub fn new() -> PathTreeBuilder {
        PathTreeBuilder {
            tree: Tree::new(),
            warnings: Vec::new(),
        }
    }

    /// Build a tree from group annotations and leaf records in one call.
    /// Groups are inserted first so leaf-wins collisions are decided by the
    /// leaf no matter how the caller ordered the two sets.
    pub fn build(groups: &[GroupRecord], leaves: &[LeafRecord]) -> (Tree, Vec<TreeWarning>) {
        let mut builder = PathTreeBuilder::new();
        for group in groups {
            builder.insert_group(group);
        }
        for leaf in leaves {
            builder.insert_leaf(leaf);
        }
        builder.finish()
    }

    pub fn finish(self) -> (Tree, Vec<TreeWarning>) {
        tracing::debug!(
            leaves = self.tree.leaf_count(),
            branches = self.tree.branch_count(),
            warnings = self.warnings.len(),
            "path tree build finished"
        );
        (self.tree, self.warnings)
    }

    /// Insert one leaf record. A record whose path has a single segment is
    /// attached directly under the root as a leaf.
    pub fn insert_leaf(&mut self, record: &LeafRecord) {
        let Some((cursor, terminal, terminal_path)) = self.descend(&record.full_path) else {
            return;
        };
        match self.tree.child(cursor, terminal) {
            Some(existing) if self.tree.node(existing).is_leaf() => {
                // Same-path duplicate: the later record overwrites the
                // earlier. Defined merge policy, not a warning condition.
                self.tree.node_mut(existing).kind = NodeKind::Leaf {
                    payload: record.into(),
                };
            }
            Some(existing) => {
                tracing::warn!(path = %terminal_path, "leaf record collides with structural node, leaf wins");
                self.warnings.push(TreeWarning::PathCollision {
                    path: terminal_path,
                });
                self.tree.convert_to_leaf(existing, record.into());
            }
            None => {
                self.tree.add_child(
                    cursor,
                    terminal,
                    NodeKind::Leaf {
                        payload: record.into(),
                    },
                );
            }
        }
    }

    /// Insert one group record, annotating (or creating) the structural node
    /// at its path. A leaf already holding the path wins; the group record is
    /// dropped with a collision warning.
    pub fn insert_group(&mut self, record: &GroupRecord) {
        let Some((cursor, terminal, terminal_path)) = self.descend(&record.full_path) else {
            return;
        };
        match self.tree.child(cursor, terminal) {
            Some(existing) if self.tree.node(existing).is_leaf() => {
                tracing::warn!(path = %terminal_path, "group record collides with leaf node, leaf wins");
                self.warnings.push(TreeWarning::PathCollision {
                    path: terminal_path,
                });
            }
            Some(existing) => {
                self.tree.node_mut(existing).kind = NodeKind::Branch {
                    payload: Some(record.into()),
                };
            }
            None => {
                self.tree.add_child(
                    cursor,
                    terminal,
                    NodeKind::Branch {
                        payload: Some(record.into()),
                    },
                );
            }
        }
    }

    /// Walk (creating structural nodes as needed) to the parent of the path's
    /// terminal segment. Returns the parent id, the terminal segment, and the
    /// full terminal path, or `None` when the record cannot be placed — in
    /// which case the warning has already been recorded.
    fn descend<'a>(&mut self, full_path: &'a str) -> Option<(NodeId, &'a str, String)> {
        let Some(segments) = split_segments(full_path) else {
            tracing::warn!(path = %full_path, "skipping record with malformed path");
            self.warnings.push(TreeWarning::MalformedPath {
                path: full_path.to_string(),
            });
            return None;
        };
        let mut cursor = self.tree.root();
        let mut prefix = String::new();
        let (terminal, intermediate) = segments.split_last().expect("split_segments is non-empty");
        for segment in intermediate {
            let segment_path = path_join(&prefix, segment);
            match self.tree.child(cursor, segment) {
                Some(existing) if self.tree.node(existing).is_leaf() => {
                    // A leaf sits where this record needs a structural node.
                    // Leaf wins; the record is dropped.
                    tracing::warn!(path = %segment_path, "record descends through a leaf path, leaf wins");
                    self.warnings.push(TreeWarning::PathCollision { path: segment_path });
                    return None;
                }
                Some(existing) => cursor = existing,
                None => {
                    cursor = self
                        .tree
                        .add_child(cursor, segment, NodeKind::Branch { payload: None });
                }
            }
            prefix = segment_path;
        }
        let terminal_path = path_join(&prefix, terminal);
        Some((cursor, terminal, terminal_path))
    }
}
