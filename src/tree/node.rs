//! The arena tree: nodes stored in a flat `Vec`, children referenced by
//! index through a lexicographic name map.
//!
//! A [`Tree`] is rebuilt from scratch on every request and discarded at
//! response time; nothing here survives between requests. Storing nodes in an
//! arena keeps parent and child references index-shaped (no ownership cycles)
//! while preserving O(n) rebuild and O(depth) mutation cost.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    paths::path_join,
    record::{GroupPayload, LeafPayload},
    select::SelectionState,
};

/// Index of a node within its [`Tree`]'s arena. Only ever minted by the tree
/// that owns the slot, so an id is valid for exactly one tree instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

/// Structural role of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Grouping level synthesized from shared path prefixes. Carries display
    /// metadata only when a group record's path matched it.
    Branch { payload: Option<GroupPayload> },
    /// Terminal, monitorable item.
    Leaf { payload: LeafPayload },
}

/// The tree's sole entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// The single path segment this node represents. Non-empty, no `/`;
    /// the root alone has an empty name.
    pub name: String,
    /// `/`-joined segments from the root; unique within one tree instance
    /// and the node's stable identity across requests.
    pub full_path: String,
    /// Distance from the root (root = 0). The root is never rendered.
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
    /// Children keyed by segment name; iteration order is lexicographic for
    /// deterministic rendering. Empty for leaves.
    pub children: BTreeMap<String, NodeId>,
    /// Recomputed every request from the persisted expand mapping; defaults
    /// to open at depth 1 and closed below. Always false on leaves.
    pub expanded: bool,
    /// Tri-state selection, recomputed every request.
    pub selection: SelectionState,
    /// Search flags, set only while a query is active.
    pub matched: bool,
    pub visible: bool,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn leaf_payload(&self) -> Option<&LeafPayload> {
        match &self.kind {
            NodeKind::Leaf { payload } => Some(payload),
            NodeKind::Branch { .. } => None,
        }
    }

    pub fn group_payload(&self) -> Option<&GroupPayload> {
        match &self.kind {
            NodeKind::Branch { payload } => payload.as_ref(),
            NodeKind::Leaf { .. } => None,
        }
    }
}

/// Serializable view of one node and its visible descendants, emitted for the
/// external renderer. Children are ordered lexicographically by segment name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub full_path: String,
    pub depth: usize,
    pub is_leaf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf: Option<LeafPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupPayload>,
    pub expanded: bool,
    pub selection: SelectionState,
    /// The tri-state collapsed to the original boolean contract:
    /// true iff `selection` is [`SelectionState::Selected`].
    pub selected: bool,
    pub children: Vec<NodeSnapshot>,
}

/// Arena-backed path tree, keyed by full path.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    by_path: BTreeMap<String, NodeId>,
}

// Every arena operation assumes the root occupies slot 0, so a derived
// (rootless) Default would be an invalid value.
impl Default for Tree {
    fn default() -> Tree {
        Tree::new()
    }
}

impl Tree {
    /// A tree holding only the (unrendered) root. An empty record set
    /// degenerates to exactly this: a valid empty state, not an error.
    pub fn new() -> Tree {
        let root = Node {
            name: String::new(),
            full_path: String::new(),
            depth: 0,
            parent: None,
            kind: NodeKind::Branch { payload: None },
            children: BTreeMap::new(),
            expanded: true,
            selection: SelectionState::Unselected,
            matched: false,
            visible: true,
        };
        Tree {
            nodes: vec![root],
            by_path: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Look a node up by its full path. The root's empty path is not indexed.
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.by_path
            .values()
            .filter(|id| self.node(**id).is_leaf())
            .count()
    }

    /// Structural nodes, the unrendered root excluded.
    pub fn branch_count(&self) -> usize {
        self.by_path
            .values()
            .filter(|id| !self.node(**id).is_leaf())
            .count()
    }

    /// Every indexed full path with its node id, in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = (&String, &NodeId)> {
        self.by_path.iter()
    }

    /// Direct child of `parent` by segment name.
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent).children.get(name).copied()
    }

    /// Direct children in lexicographic segment order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).children.values().copied().collect()
    }

    /// Walk from `id`'s parent up to (and including) the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.node(id).parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.node(parent).parent;
        }
        chain
    }

    /// Every leaf at or below `id`, in lexicographic traversal order.
    pub fn descendant_leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if self.node(next).is_leaf() {
                leaves.push(next);
            } else {
                stack.extend(self.node(next).children.values().rev().copied());
            }
        }
        leaves
    }

    /// Depth-first post-order over the live tree (detached arena slots are
    /// unreachable and skipped). Children are finished before their parent,
    /// which is the order bottom-up aggregation needs.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root(), false)];
        while let Some((id, expanded_children)) = stack.pop() {
            if expanded_children {
                order.push(id);
            } else {
                stack.push((id, true));
                stack.extend(
                    self.node(id)
                        .children
                        .values()
                        .rev()
                        .map(|child| (*child, false)),
                );
            }
        }
        order
    }

    /// Append a new child under `parent` and index its path.
    ///
    /// The caller guarantees no child of that name exists yet; builders check
    /// with [`Tree::child`] first and apply the collision policy themselves.
    pub fn add_child(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        let full_path = path_join(&self.node(parent).full_path, name);
        let depth = self.node(parent).depth + 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            full_path: full_path.clone(),
            depth,
            parent: Some(parent),
            kind,
            children: BTreeMap::new(),
            expanded: depth == 1,
            selection: SelectionState::Unselected,
            matched: false,
            visible: true,
        });
        self.node_mut(parent).children.insert(name.to_string(), id);
        self.by_path.insert(full_path, id);
        id
    }

    /// Turn a structural node into a leaf, discarding its subtree (leaf-wins
    /// collision policy). Detached arena slots stay allocated but drop out of
    /// the path index and all child maps, so no traversal reaches them.
    pub fn convert_to_leaf(&mut self, id: NodeId, payload: LeafPayload) {
        for descendant in self.descendants(id) {
            let path = self.node(descendant).full_path.clone();
            self.by_path.remove(&path);
            self.node_mut(descendant).children.clear();
        }
        let node = self.node_mut(id);
        node.children.clear();
        node.kind = NodeKind::Leaf { payload };
        node.expanded = false;
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.values().copied().collect();
        while let Some(next) = stack.pop() {
            found.push(next);
            stack.extend(self.node(next).children.values().copied());
        }
        found
    }

    /// Snapshot the subtree rooted at `base`, pruning nodes the active search
    /// filter marked invisible. For the root, the (unrendered) root itself is
    /// skipped and its visible children are returned; any other base yields a
    /// single-element vector.
    pub fn snapshot(&self, base: NodeId) -> Vec<NodeSnapshot> {
        if base == self.root() {
            self.node(base)
                .children
                .values()
                .filter(|child| self.node(**child).visible)
                .map(|child| self.snapshot_node(*child))
                .collect()
        } else {
            vec![self.snapshot_node(base)]
        }
    }

    fn snapshot_node(&self, id: NodeId) -> NodeSnapshot {
        let node = self.node(id);
        NodeSnapshot {
            name: node.name.clone(),
            full_path: node.full_path.clone(),
            depth: node.depth,
            is_leaf: node.is_leaf(),
            leaf: node.leaf_payload().cloned(),
            group: node.group_payload().cloned(),
            expanded: node.expanded,
            selection: node.selection,
            selected: node.selection == SelectionState::Selected,
            children: node
                .children
                .values()
                .filter(|child| self.node(**child).visible)
                .map(|child| self.snapshot_node(*child))
                .collect(),
        }
    }
}
