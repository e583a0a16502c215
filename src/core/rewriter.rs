//! Import rewriter: find relative import specifiers in a script file and
//! rewrite them to the casing stored on disk.
//!
//! 1. Scans the text for import-like statements and records the byte span of
//!    each quoted path
//! 2. Resolves and canonicalizes each relative path
//! 3. Replaces mismatched spans, last span first, so offsets stay valid
//! 4. Writes the file back only when something changed

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::canonical;
use crate::error::Result;
use crate::resolver::{self, Resolution};
use crate::source_tree::SourceTree;
use crate::utils::{io, paths};

// ============================================================================
// Types
// ============================================================================

/// Which statement form introduced an import specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import x from '...'`
    Static,
    /// `export { x } from '...'`
    ReExport,
    /// `import '...'`
    SideEffect,
    /// `require('...')` or `import('...')`
    Call,
}

/// A quoted module path found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    /// Byte range of the path text, excluding quotes.
    pub span: Range<usize>,
    pub written: String,
    pub kind: ImportKind,
}

/// A single corrected import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportFix {
    /// File path relative to root.
    pub file: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
    pub kind: ImportKind,
    /// The path as written.
    pub from: String,
    /// The path with on-disk casing.
    pub to: String,
}

/// A file that was not scanned, with a reason.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    /// File path relative to root.
    pub file: String,
    pub reason: String,
}

/// What happened to one file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Unchanged,
    Changed(Vec<ImportFix>),
    Skipped(SkippedFile),
}

// ============================================================================
// Scanning
// ============================================================================

const QUOTED: &str = r#"(?:"(?P<dq>[^"\r\n]*)"|'(?P<sq>[^'\r\n]*)')"#;

fn import_pattern(prefix: &str, suffix: &str) -> Regex {
    Regex::new(&format!("{}{}{}", prefix, QUOTED, suffix)).expect("import pattern compiles")
}

// Bindings never contain `;` or quotes.
static STATIC_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| import_pattern(r#"\bimport\s+[^;'"]*?\bfrom\s*"#, ""));

static RE_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| import_pattern(r#"\bexport\s+[^;'"]*?\bfrom\s*"#, ""));

static SIDE_EFFECT_IMPORT: LazyLock<Regex> = LazyLock::new(|| import_pattern(r"\bimport\s*", ""));

static CALL_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| import_pattern(r"\b(?:require|import)\s*\(\s*", r"\s*\)"));

fn patterns() -> [(ImportKind, &'static Regex); 4] {
    [
        (ImportKind::Static, &*STATIC_IMPORT),
        (ImportKind::ReExport, &*RE_EXPORT),
        (ImportKind::SideEffect, &*SIDE_EFFECT_IMPORT),
        (ImportKind::Call, &*CALL_IMPORT),
    ]
}

/// Find every quoted module path introduced by an import-like statement.
///
/// Results are ordered by position; a span is reported once even if several
/// statement forms match it.
pub fn scan_imports(text: &str) -> Vec<ImportReference> {
    let mut found: BTreeMap<usize, ImportReference> = BTreeMap::new();

    for (kind, re) in patterns() {
        for caps in re.captures_iter(text) {
            let Some(m) = caps.name("dq").or_else(|| caps.name("sq")) else {
                continue;
            };
            found.entry(m.start()).or_insert_with(|| ImportReference {
                span: m.range(),
                written: m.as_str().to_string(),
                kind,
            });
        }
    }

    found.into_values().collect()
}

// ============================================================================
// Correction
// ============================================================================

/// Compute the on-disk spelling of `written` as imported from `importer`.
///
/// Returns `None` when the import is not relative, does not resolve, cannot
/// be canonicalized, or is already correct.
pub fn correct_import(tree: &SourceTree, importer: &Path, written: &str) -> Result<Option<String>> {
    let Some(target) = resolver::resolve_import(tree, importer, written)? else {
        return Ok(None);
    };
    let Some(canonical) = canonical::canonicalize(tree, &target.path)? else {
        return Ok(None);
    };
    let Some(importer_dir) = importer.parent() else {
        return Ok(None);
    };
    let (path_part, suffix) = resolver::split_suffix(written);

    let names_directory = target.resolution == Resolution::DirectoryIndex
        && is_conventional_index(tree, &canonical, &target.appended_extension);

    let (dest, strip): (PathBuf, &str) = if names_directory {
        let Some(parent) = canonical.parent() else {
            return Ok(None);
        };
        (parent.to_path_buf(), "")
    } else {
        (canonical, target.appended_extension.as_str())
    };

    let mut specifier = paths::to_import_specifier(&paths::relative_path(importer_dir, &dest));
    strip_extension(&mut specifier, strip);
    if names_directory && path_part.ends_with('/') && !specifier.ends_with('/') {
        specifier.push('/');
    }
    specifier.push_str(suffix);

    Ok((specifier != written).then_some(specifier))
}

/// An index file a module resolver finds without it being named: exactly
/// `<index_name><ext>`.
fn is_conventional_index(tree: &SourceTree, canonical: &Path, ext: &str) -> bool {
    canonical
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name == format!("{}{}", tree.config.index_name, ext))
}

/// Drop a resolver-appended extension from the end of `specifier`, matching
/// it case-insensitively since the on-disk name may differ in case.
fn strip_extension(specifier: &mut String, ext: &str) {
    if ext.is_empty() || ext.len() > specifier.len() {
        return;
    }
    let cut = specifier.len() - ext.len();
    if specifier.is_char_boundary(cut) && specifier[cut..].eq_ignore_ascii_case(ext) {
        specifier.truncate(cut);
    }
}

// ============================================================================
// Rewriting
// ============================================================================

fn line_and_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => offset - nl,
        None => offset + 1,
    };
    (line, column)
}

/// Correct every import in `text`, returning the new text and the fixes made.
pub fn rewrite_source(
    tree: &SourceTree,
    file: &Path,
    text: &str,
) -> Result<(String, Vec<ImportFix>)> {
    let relative = tree.relative(file);
    let mut edits: Vec<(Range<usize>, ImportFix)> = Vec::new();

    for reference in scan_imports(text) {
        if !resolver::is_relative(&reference.written) {
            continue;
        }
        let Some(corrected) = correct_import(tree, file, &reference.written)? else {
            continue;
        };

        let (line, column) = line_and_column(text, reference.span.start);
        edits.push((
            reference.span,
            ImportFix {
                file: relative.clone(),
                line,
                column,
                kind: reference.kind,
                from: reference.written,
                to: corrected,
            },
        ));
    }

    let mut new_text = text.to_string();
    for (span, fix) in edits.iter().rev() {
        new_text.replace_range(span.clone(), &fix.to);
    }

    Ok((new_text, edits.into_iter().map(|(_, fix)| fix).collect()))
}

/// Rewrite one file in place. With `write` false, nothing is written but the
/// outcome is the same.
pub fn rewrite_file(tree: &SourceTree, file: &Path, write: bool) -> Result<FileOutcome> {
    let relative = tree.relative(file);
    let Some(text) = io::read_text(file, &format!("read {}", file.display()))? else {
        return Ok(FileOutcome::Skipped(SkippedFile {
            file: relative,
            reason: "not valid UTF-8".to_string(),
        }));
    };

    let (new_text, fixes) = rewrite_source(tree, file, &text)?;
    if fixes.is_empty() || new_text == text {
        return Ok(FileOutcome::Unchanged);
    }

    if write {
        io::write_file_atomic(file, &new_text, &format!("write {}", file.display()))?;
    }

    Ok(FileOutcome::Changed(fixes))
}
