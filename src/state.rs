//! Persisted per-user tree state and the stores that hold it.
//!
//! Only two things survive between requests: the `full_path -> expanded`
//! mapping and the selected-leaf-ID set, bundled as [`UserTreeState`] and
//! accessed through the object-safe [`StateStore`] trait. Get and put are
//! atomic, last-write-wins operations scoped by an opaque user key; two
//! racing requests from one user overwrite each other silently. The store is
//! always passed into the orchestrator explicitly — never process-wide
//! mutable state — so concurrent users cannot cross-contaminate and the
//! engine stays testable with [`MemoryStateStore`].

use std::collections::{BTreeMap, BTreeSet};
use std::{
    fs::{read_to_string, write},
    path::PathBuf,
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{error::CanopyError, tree::Tree};

/// Everything the engine persists for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTreeState {
    /// Expand/collapse flags keyed by full path. Absent entries fall back to
    /// the structural default (depth 1 expanded, deeper collapsed). Entries
    /// for collapsed ancestors' descendants stay latent, never cleared.
    #[serde(default)]
    pub expanded: BTreeMap<String, bool>,
    /// External IDs of the selected leaves.
    #[serde(default)]
    pub selected: BTreeSet<i64>,
}

/// Key-value access to [`UserTreeState`], keyed by an opaque user identifier.
///
/// The storage medium is the implementor's concern; the engine only requires
/// that `get` after `put` round-trips and that writes are last-write-wins.
pub trait StateStore: Send + Sync {
    fn get(&self, user: &str) -> Result<UserTreeState, CanopyError>;
    fn put(&self, user: &str, state: UserTreeState) -> Result<(), CanopyError>;
}

/// In-memory store for tests and for hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    users: RwLock<BTreeMap<String, UserTreeState>>,
}

impl StateStore for MemoryStateStore {
    fn get(&self, user: &str) -> Result<UserTreeState, CanopyError> {
        Ok(self.users.read().get(user).cloned().unwrap_or_default())
    }

    fn put(&self, user: &str, state: UserTreeState) -> Result<(), CanopyError> {
        self.users.write().insert(user.to_string(), state);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    users: BTreeMap<String, UserTreeState>,
}

/// File-backed store: one TOML document holding every user's state.
///
/// A missing file reads as empty state; each put rewrites the whole document.
#[derive(Debug)]
pub struct TomlStateStore {
    path: PathBuf,
}

impl TomlStateStore {
    pub fn new(path: PathBuf) -> TomlStateStore {
        TomlStateStore { path }
    }

    fn load(&self) -> Result<StateFile, CanopyError> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "state file not found, starting empty");
            return Ok(StateFile::default());
        }
        let content = read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl StateStore for TomlStateStore {
    fn get(&self, user: &str) -> Result<UserTreeState, CanopyError> {
        Ok(self.load()?.users.remove(user).unwrap_or_default())
    }

    fn put(&self, user: &str, state: UserTreeState) -> Result<(), CanopyError> {
        let mut file = self.load()?;
        file.users.insert(user.to_string(), state);
        let toml_string = toml::to_string(&file)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}

/// Apply a persisted expand mapping onto a freshly built tree.
///
/// Every structural node present in the mapping receives its stored flag;
/// absent entries fall back to `depth == 1`. Leaves never carry an expand
/// flag and the root stays open so its children are always reachable.
pub fn apply_expand_state(tree: &mut Tree, expanded: &BTreeMap<String, bool>) {
    for id in tree.post_order() {
        if id == tree.root() {
            continue;
        }
        let node = tree.node_mut(id);
        node.expanded = if node.is_leaf() {
            false
        } else {
            expanded
                .get(&node.full_path)
                .copied()
                .unwrap_or(node.depth == 1)
        };
    }
}
