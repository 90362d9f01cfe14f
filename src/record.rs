//! Flat catalog records — the engine's sole structural input.
//!
//! A record describes one remotely hosted entity by a slash-delimited full
//! path plus metadata, with no explicit parent reference. Where the records
//! come from (API client, cache store) is a collaborator's concern; the
//! engine only ever sees an ordered sequence of them.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CanopyError;

/// A monitorable item: a terminal record that becomes a leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRecord {
    /// Slash-delimited path, e.g. `platform/services/ingest`.
    pub full_path: String,
    /// External identifier of the underlying item. Selection state is keyed
    /// on this, not on the path.
    pub id: i64,
    pub display_name: String,
    pub url: Url,
}

impl LeafRecord {
    pub fn new(
        full_path: impl Into<String>,
        id: i64,
        display_name: impl Into<String>,
        url: &str,
    ) -> Result<LeafRecord, CanopyError> {
        Ok(LeafRecord {
            full_path: full_path.into(),
            id,
            display_name: display_name.into(),
            url: Url::parse(url)?,
        })
    }
}

/// An organizational group known to the remote catalog.
///
/// Structural nodes are synthesized purely from shared path prefixes and need
/// no record of their own; a `GroupRecord` whose path matches a structural
/// node merely annotates it with display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub full_path: String,
    pub display_name: String,
    pub url: Url,
}

impl GroupRecord {
    pub fn new(
        full_path: impl Into<String>,
        display_name: impl Into<String>,
        url: &str,
    ) -> Result<GroupRecord, CanopyError> {
        Ok(GroupRecord {
            full_path: full_path.into(),
            display_name: display_name.into(),
            url: Url::parse(url)?,
        })
    }
}

/// Payload carried by a leaf node, copied out of its [`LeafRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPayload {
    pub id: i64,
    pub display_name: String,
    pub url: Url,
}

impl From<&LeafRecord> for LeafPayload {
    fn from(record: &LeafRecord) -> LeafPayload {
        LeafPayload {
            id: record.id,
            display_name: record.display_name.clone(),
            url: record.url.clone(),
        }
    }
}

/// Optional annotation carried by a structural node whose path matched a
/// [`GroupRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPayload {
    pub display_name: String,
    pub url: Url,
}

impl From<&GroupRecord> for GroupPayload {
    fn from(record: &GroupRecord) -> GroupPayload {
        GroupPayload {
            display_name: record.display_name.clone(),
            url: record.url.clone(),
        }
    }
}
