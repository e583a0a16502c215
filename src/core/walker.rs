//! Enumerate the script files of a source tree.

use std::path::{Path, PathBuf};

use glob_match::glob_match;

use crate::error::{Error, Result};
use crate::source_tree::SourceTree;
use crate::utils::io;

/// All script files under the root, sorted by path.
///
/// Descends into every subdirectory except those named in `skip_dirs`.
/// Script files matching an `exclude` glob are left out. Any unreadable
/// directory is an error.
pub fn walk_files(tree: &SourceTree) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_recursive(tree, &tree.root, &mut files)?;

    if !tree.config.exclude.is_empty() {
        files.retain(|f| !is_excluded(tree, f));
    }

    files.sort();
    Ok(files)
}

fn walk_recursive(tree: &SourceTree, dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for path in io::list_dir(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let metadata = std::fs::metadata(&path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("stat {}", path.display())))
        })?;

        if metadata.is_dir() {
            if tree.config.skip_dirs.contains(&name) {
                continue;
            }
            walk_recursive(tree, &path, files)?;
        } else if tree.config.is_script(&name) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_excluded(tree: &SourceTree, file: &Path) -> bool {
    let relative = tree.relative(file);
    tree.config
        .exclude
        .iter()
        .any(|pattern| glob_match(pattern, &relative))
}
