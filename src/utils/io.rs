//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Read a file as UTF-8 text.
///
/// Returns `Ok(None)` when the file is readable but not valid UTF-8; any
/// other failure is an error.
pub fn read_text(path: &Path, operation: &str) -> Result<Option<String>> {
    let bytes =
        fs::read(path).map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;
    Ok(String::from_utf8(bytes).ok())
}

/// Write content to a file atomically: write a sibling `.tmp` file, then
/// rename it over the target.
///
/// A crash mid-write leaves either the old content or the new content, never
/// a truncated file. Symlinks are resolved first so the link target is
/// replaced rather than the link, and an existing file keeps its permissions.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(Error::internal_io(e.to_string(), Some(operation.to_string()))),
    };

    let invalid = || {
        Error::internal_io(
            format!("Invalid path: {}", target.display()),
            Some(operation.to_string()),
        )
    };
    let parent = target.parent().ok_or_else(invalid)?;
    let filename = target.file_name().ok_or_else(invalid)?;
    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation))))?;

    if let Ok(metadata) = fs::metadata(&target) {
        if let Err(e) = fs::set_permissions(&tmp_path, metadata.permissions()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("{} (copy permissions)", operation)),
            ));
        }
    }

    fs::rename(&tmp_path, &target).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation)))
    })
}

/// List the entry names of a directory, sorted.
///
/// Names that are not valid UTF-8 are skipped since they can never match an
/// import written in source text.
pub fn list_dir_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
        })?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// List the entries of a directory as full paths, sorted.
pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
        })?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.txt"), "test read");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn read_text_returns_none_for_binary() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();

        assert_eq!(read_text(temp.path(), "test read").unwrap(), None);
    }

    #[test]
    fn write_file_atomic_returns_error_for_invalid_path() {
        let result = write_file_atomic(
            Path::new("/nonexistent/dir/file.txt"),
            "content",
            "test write",
        );
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn write_file_atomic_replaces_content_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("App.tsx");
        fs::write(&file, "old").unwrap();

        write_file_atomic(&file, "new", "test write").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "new");
        assert_eq!(list_dir_names(dir.path()).unwrap(), vec!["App.tsx"]);
    }

    #[cfg(unix)]
    #[test]
    fn write_file_atomic_keeps_permissions_and_symlinks() {
        use std::os::unix::fs::{symlink, PermissionsExt};

        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.ts");
        let link = dir.path().join("link.ts");
        fs::write(&real, "old").unwrap();
        fs::set_permissions(&real, fs::Permissions::from_mode(0o640)).unwrap();
        symlink(&real, &link).unwrap();

        write_file_atomic(&link, "new", "test write").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "new");
        let mode = fs::metadata(&real).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn list_dir_names_is_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.ts"), "").unwrap();
        fs::write(dir.path().join("A.ts"), "").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let names = list_dir_names(dir.path()).unwrap();
        assert_eq!(names, vec!["A.ts", "b.ts", "c"]);
    }
}
