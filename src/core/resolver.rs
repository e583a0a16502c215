//! Import resolution: map a written relative import onto a file under the root.

use std::path::{Path, PathBuf};

use crate::canonical::{self, Matching};
use crate::error::Result;
use crate::source_tree::SourceTree;
use crate::utils::paths;

/// How a written import reached its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The written path, optionally with an extension appended.
    File,
    /// `<index_name><ext>` inside the directory named by the written path.
    DirectoryIndex,
}

/// The file an import points to. `path` keeps the casing as written; it is
/// known to exist but is not yet canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    /// Extension added during resolution (empty when the written path named
    /// the file verbatim).
    pub appended_extension: String,
    pub resolution: Resolution,
}

/// Whether an import specifier is relative (`.`, `..`, `./…`, `../…`).
pub fn is_relative(written: &str) -> bool {
    written == "."
        || written == ".."
        || written.starts_with("./")
        || written.starts_with("../")
}

/// Split an import specifier into its filesystem path and any `?query` /
/// `#fragment` suffix.
pub fn split_suffix(written: &str) -> (&str, &str) {
    match written.find(['?', '#']) {
        Some(idx) => written.split_at(idx),
        None => (written, ""),
    }
}

fn with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(ext);
    PathBuf::from(raw)
}

/// Resolve `written` as imported from `importer`.
///
/// Tries the path verbatim, then with each resolve extension, then an index
/// file inside a directory of that name. The whole sequence runs first with
/// exact names and only then case-folded, so an import that already names an
/// existing file is never retargeted. Non-relative imports and targets
/// outside the root resolve to `None`.
pub fn resolve_import(
    tree: &SourceTree,
    importer: &Path,
    written: &str,
) -> Result<Option<ResolvedTarget>> {
    if !is_relative(written) {
        return Ok(None);
    }

    let (path_part, _suffix) = split_suffix(written);
    let Some(importer_dir) = importer.parent() else {
        return Ok(None);
    };
    let candidate = paths::normalize(&importer_dir.join(path_part));

    if !tree.contains(&candidate) {
        return Ok(None);
    }

    for matching in [Matching::Exact, Matching::IgnoreCase] {
        if let Some(target) = resolve_candidate(tree, &candidate, matching)? {
            return Ok(Some(target));
        }
    }

    Ok(None)
}

fn resolve_candidate(
    tree: &SourceTree,
    candidate: &Path,
    matching: Matching,
) -> Result<Option<ResolvedTarget>> {
    let extensions = std::iter::once("").chain(
        tree.config
            .resolve_extensions
            .iter()
            .map(String::as_str),
    );
    for ext in extensions {
        let path = with_extension(candidate, ext);
        if canonical::is_file(tree, &path, matching)? {
            return Ok(Some(ResolvedTarget {
                path,
                appended_extension: ext.to_string(),
                resolution: Resolution::File,
            }));
        }
    }

    if canonical::is_dir(tree, candidate, matching)? {
        for ext in &tree.config.index_extensions {
            let path = candidate.join(format!("{}{}", tree.config.index_name, ext));
            if canonical::is_file(tree, &path, matching)? {
                return Ok(Some(ResolvedTarget {
                    path,
                    appended_extension: ext.clone(),
                    resolution: Resolution::DirectoryIndex,
                }));
            }
        }
    }

    Ok(None)
}
