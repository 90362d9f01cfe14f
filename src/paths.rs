//! Slash-delimited path string utilities.
//!
//! Full paths are the stable node identity across requests, so every split
//! and join here must be exact: no normalization, no separator guessing, and
//! empty segments are rejected rather than silently collapsed.

/// Split a full path into its ordered segments.
///
/// Returns `None` when the path is empty or any segment is empty (consecutive
/// slashes, or a leading/trailing slash). Callers treat `None` as a malformed
/// record, not a fatal error.
pub fn split_segments(path: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Join a parent path and a child segment. An empty base (the unrendered
/// root) yields the bare segment so depth-1 paths carry no leading slash.
pub fn path_join(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// The parent path, or `None` for depth-1 paths (whose parent is the root).
pub fn parent(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}

/// Distance from the root; the root's own (empty) path has depth 0.
pub fn depth(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split('/').count()
    }
}
