use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::CasefixConfig;
use crate::error::{Error, Result};
use crate::utils::{io, paths};

/// Compiled-in source root, relative to the current directory.
pub const DEFAULT_ROOT: &str = "src";

/// A project source tree: the absolute root plus the configuration every
/// component consults. Established once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct SourceTree {
    pub root: PathBuf,
    pub config: CasefixConfig,
    /// Sorted entry names per directory, read at most once.
    listings: RefCell<HashMap<PathBuf, Rc<[String]>>>,
}

impl SourceTree {
    /// Open a source tree. Fails if `root` is missing or not a directory.
    pub fn open(root: &Path, config: CasefixConfig) -> Result<Self> {
        let absolute = fs::canonicalize(root).map_err(|e| {
            Error::source_root_not_found(root.display().to_string(), Some(e.to_string()))
        })?;

        if !absolute.is_dir() {
            return Err(Error::source_root_not_found(
                root.display().to_string(),
                Some("not a directory".to_string()),
            ));
        }

        Ok(Self {
            root: absolute,
            config,
            listings: RefCell::new(HashMap::new()),
        })
    }

    /// Sorted entry names of `dir`.
    ///
    /// A run never renames entries, so each directory is listed once and the
    /// listing is reused for the life of the tree. Listing failures are
    /// returned, not cached.
    pub fn entries(&self, dir: &Path) -> Result<Rc<[String]>> {
        let cached = self.listings.borrow().get(dir).cloned();
        if let Some(names) = cached {
            return Ok(names);
        }

        let names: Rc<[String]> = io::list_dir_names(dir)?.into();
        self.listings
            .borrow_mut()
            .insert(dir.to_path_buf(), Rc::clone(&names));
        Ok(names)
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Root-relative display path.
    pub fn relative(&self, path: &Path) -> String {
        paths::display_relative(&self.root, path)
    }
}
