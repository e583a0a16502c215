//! Run the rewriter over every script file of a source tree.

use serde::Serialize;

use crate::error::Result;
use crate::rewriter::{self, FileOutcome, ImportFix, SkippedFile};
use crate::source_tree::SourceTree;
use crate::walker;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute corrections without writing files.
    pub dry_run: bool,
}

/// Result of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub root: String,
    pub files_scanned: usize,
    pub files_changed: usize,
    pub fixes: Vec<ImportFix>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
    /// Whether changes were written to disk.
    pub applied: bool,
}

/// Progress reported while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    /// Script files found by the walk, before any is rewritten.
    Scanning(usize),
    /// An import was corrected. Outside a dry run the file is already written.
    Fixed(&'a ImportFix),
    Skipped(&'a SkippedFile),
}

/// Walk the tree and rewrite each script file in turn.
///
/// Unresolvable imports are skipped silently; any filesystem error aborts the
/// run.
pub fn run(tree: &SourceTree, options: RunOptions) -> Result<RunSummary> {
    run_with(tree, options, |_| {})
}

/// Like [`run`], calling `on_event` as each file is handled so progress
/// survives a run that aborts partway.
pub fn run_with<F>(tree: &SourceTree, options: RunOptions, mut on_event: F) -> Result<RunSummary>
where
    F: FnMut(RunEvent<'_>),
{
    let files = walker::walk_files(tree)?;
    log_status!(
        "walk",
        "Found {} script files under {}",
        files.len(),
        tree.root.display()
    );
    on_event(RunEvent::Scanning(files.len()));

    let mut summary = RunSummary {
        root: tree.root.display().to_string(),
        files_scanned: files.len(),
        files_changed: 0,
        fixes: Vec::new(),
        skipped: Vec::new(),
        applied: false,
    };

    for file in &files {
        match rewriter::rewrite_file(tree, file, !options.dry_run)? {
            FileOutcome::Unchanged => {}
            FileOutcome::Changed(fixes) => {
                log_status!(
                    "rewrite",
                    "{}: {} import(s) corrected",
                    tree.relative(file),
                    fixes.len()
                );
                for fix in &fixes {
                    on_event(RunEvent::Fixed(fix));
                }
                summary.files_changed += 1;
                summary.fixes.extend(fixes);
            }
            FileOutcome::Skipped(skipped) => {
                log_status!("skip", "{}: {}", skipped.file, skipped.reason);
                on_event(RunEvent::Skipped(&skipped));
                summary.skipped.push(skipped);
            }
        }
    }

    summary.applied = !options.dry_run && summary.files_changed > 0;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CasefixConfig;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &std::path::Path, file: &str, content: &str) {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn run_fixes_and_counts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "utils/Helper.ts", "export const h = 1;\n");
        write(dir.path(), "App.tsx", "import { h } from './Utils/helper';\n");
        write(dir.path(), "Clean.ts", "import { h } from './utils/Helper';\n");
        write(dir.path(), "logo.png", "");

        let tree = SourceTree::open(dir.path(), CasefixConfig::default()).unwrap();
        let summary = run(&tree, RunOptions::default()).unwrap();

        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.fixes.len(), 1);
        assert_eq!(summary.fixes[0].file, "App.tsx");
        assert!(summary.applied);
        assert_eq!(
            fs::read_to_string(dir.path().join("App.tsx")).unwrap(),
            "import { h } from './utils/Helper';\n"
        );
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "utils/Helper.ts", "");
        write(dir.path(), "App.tsx", "import { h } from './Utils/helper';\n");

        let tree = SourceTree::open(dir.path(), CasefixConfig::default()).unwrap();
        let summary = run(&tree, RunOptions { dry_run: true }).unwrap();

        assert_eq!(summary.fixes.len(), 1);
        assert!(!summary.applied);
        assert_eq!(
            fs::read_to_string(dir.path().join("App.tsx")).unwrap(),
            "import { h } from './Utils/helper';\n"
        );
    }

    #[test]
    fn binary_file_does_not_abort_run() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "utils/Helper.ts", "");
        write(dir.path(), "App.tsx", "import { h } from './Utils/helper';\n");
        fs::write(dir.path().join("bundle.js"), [0xffu8, 0x00, 0xfe]).unwrap();

        let tree = SourceTree::open(dir.path(), CasefixConfig::default()).unwrap();
        let summary = run(&tree, RunOptions::default()).unwrap();

        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].file, "bundle.js");
    }

    #[test]
    fn events_are_reported_per_file_as_the_run_goes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "utils/Helper.ts", "");
        write(dir.path(), "A.ts", "import { h } from './Utils/helper';\n");
        write(dir.path(), "B.ts", "import { h } from './utils/helper';\n");

        let tree = SourceTree::open(dir.path(), CasefixConfig::default()).unwrap();
        let mut seen = Vec::new();
        let summary = run_with(&tree, RunOptions::default(), |event| {
            seen.push(match event {
                RunEvent::Scanning(n) => format!("scan {}", n),
                RunEvent::Fixed(fix) => format!("{} {}", fix.file, fix.to),
                RunEvent::Skipped(skipped) => format!("skip {}", skipped.file),
            });
        })
        .unwrap();

        assert_eq!(
            seen,
            vec!["scan 3", "A.ts ./utils/Helper", "B.ts ./utils/Helper"]
        );
        assert_eq!(summary.fixes.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn fixes_before_a_fatal_error_are_still_reported() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "utils/Helper.ts", "");
        write(dir.path(), "A.ts", "import { h } from './Utils/helper';\n");
        write(dir.path(), "B.ts", "import { h } from './Utils/helper';\n");
        let locked = dir.path().join("B.ts");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can read it anyway.
        if fs::read(&locked).is_ok() {
            return;
        }

        let tree = SourceTree::open(dir.path(), CasefixConfig::default()).unwrap();
        let mut fixed = Vec::new();
        let result = run_with(&tree, RunOptions::default(), |event| {
            if let RunEvent::Fixed(fix) = event {
                fixed.push(fix.file.clone());
            }
        });
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(result.is_err());
        assert_eq!(fixed, vec!["A.ts"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("A.ts")).unwrap(),
            "import { h } from './utils/Helper';\n"
        );
    }
}
