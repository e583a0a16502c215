//! Canonical casing: re-derive a path using the names stored on disk.
//!
//! Every segment below the source root is matched against the real directory
//! listing: an exact match wins, otherwise the first case-insensitive match in
//! sorted order. The result does not depend on whether the underlying
//! filesystem is case-sensitive.

use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::source_tree::SourceTree;

/// How path segments are compared against directory entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    /// Byte-for-byte names only.
    Exact,
    /// Exact names first, then case-folded.
    IgnoreCase,
}

/// Pick the entry matching `segment`.
pub fn match_entry<'a>(entries: &'a [String], segment: &str, matching: Matching) -> Option<&'a str> {
    if let Some(exact) = entries.iter().find(|e| e.as_str() == segment) {
        return Some(exact.as_str());
    }
    if matching == Matching::Exact {
        return None;
    }

    let folded = segment.to_lowercase();
    entries
        .iter()
        .find(|e| e.to_lowercase() == folded)
        .map(String::as_str)
}

/// Walk `path` segment by segment from the tree root, returning it spelled
/// with the matched on-disk names.
///
/// `Ok(None)` when the path is outside the root, contains non-normal
/// components, or a segment has no match. A directory that cannot be listed
/// is an error.
pub fn locate(tree: &SourceTree, path: &Path, matching: Matching) -> Result<Option<PathBuf>> {
    let Ok(rel) = path.strip_prefix(&tree.root) else {
        return Ok(None);
    };

    let mut current = tree.root.clone();
    for component in rel.components() {
        let Component::Normal(segment) = component else {
            return Ok(None);
        };
        let Some(segment) = segment.to_str() else {
            return Ok(None);
        };
        // A file cannot have children.
        if !current.is_dir() {
            return Ok(None);
        }

        let entries = tree.entries(&current)?;
        let Some(matched) = match_entry(&entries, segment, matching) else {
            return Ok(None);
        };
        current.push(matched);
    }

    Ok(Some(current))
}

/// Re-express `path` (which must lie under the tree root) with on-disk casing.
pub fn canonicalize(tree: &SourceTree, path: &Path) -> Result<Option<PathBuf>> {
    locate(tree, path, Matching::IgnoreCase)
}

pub fn is_file(tree: &SourceTree, path: &Path, matching: Matching) -> Result<bool> {
    Ok(locate(tree, path, matching)?.is_some_and(|p| p.is_file()))
}

pub fn is_dir(tree: &SourceTree, path: &Path, matching: Matching) -> Result<bool> {
    Ok(locate(tree, path, matching)?.is_some_and(|p| p.is_dir()))
}
