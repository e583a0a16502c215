use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "casefix.json";

/// All configurable defaults that can be overridden via casefix.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasefixConfig {
    /// Extensions (without dot) of files that are scanned for imports.
    #[serde(default = "default_script_extensions")]
    pub script_extensions: Vec<String>,

    /// Extensions appended, in order, to an import path that does not name a file.
    #[serde(default = "default_resolve_extensions")]
    pub resolve_extensions: Vec<String>,

    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Extensions tried, in order, for `<index_name>` inside an imported directory.
    #[serde(default = "default_index_extensions")]
    pub index_extensions: Vec<String>,

    /// Directory names the walker never descends into.
    #[serde(default)]
    pub skip_dirs: Vec<String>,

    /// Glob patterns (root-relative, `/`-separated) for script files that are not scanned.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for CasefixConfig {
    fn default() -> Self {
        Self {
            script_extensions: default_script_extensions(),
            resolve_extensions: default_resolve_extensions(),
            index_name: default_index_name(),
            index_extensions: default_index_extensions(),
            skip_dirs: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_script_extensions() -> Vec<String> {
    strings(&["jsx", "js", "ts", "tsx"])
}

fn default_resolve_extensions() -> Vec<String> {
    strings(&[
        ".jsx", ".js", ".ts", ".tsx", ".css", ".json", ".png", ".jpg", ".jpeg", ".svg", ".mp4",
        ".pdf",
    ])
}

fn default_index_name() -> String {
    "index".to_string()
}

fn default_index_extensions() -> Vec<String> {
    strings(&[".jsx", ".js", ".ts", ".tsx", ".json"])
}

// =============================================================================
// Validation
// =============================================================================

impl CasefixConfig {
    /// Whether a file name carries one of the configured script extensions.
    pub fn is_script(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                self.script_extensions.iter().any(|e| e == ext)
            }
            _ => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.script_extensions.is_empty() {
            return Err(Error::config_invalid_value(
                "script_extensions",
                None,
                "At least one script extension is required",
            ));
        }

        if let Some(ext) = self
            .script_extensions
            .iter()
            .find(|e| e.is_empty() || e.contains('.') || e.contains('/'))
        {
            return Err(Error::config_invalid_value(
                "script_extensions",
                Some(ext.clone()),
                "Script extensions are bare names without a leading dot (e.g. \"tsx\")",
            ));
        }

        for (key, list) in [
            ("resolve_extensions", &self.resolve_extensions),
            ("index_extensions", &self.index_extensions),
        ] {
            if list.is_empty() {
                return Err(Error::config_invalid_value(
                    key,
                    None,
                    "At least one extension is required",
                ));
            }
            if let Some(ext) = list
                .iter()
                .find(|e| !e.starts_with('.') || e.len() < 2 || e.contains('/'))
            {
                return Err(Error::config_invalid_value(
                    key,
                    Some(ext.clone()),
                    "Extensions must start with '.' (e.g. \".tsx\")",
                ));
            }
        }

        if self.index_name.is_empty()
            || self.index_name.contains('/')
            || self.index_name.contains('\\')
        {
            return Err(Error::config_invalid_value(
                "index_name",
                Some(self.index_name.clone()),
                "Index name must be a single non-empty file name",
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load configuration.
///
/// An explicit path must exist. Without one, `casefix.json` in the current
/// directory is used when present, otherwise built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<CasefixConfig> {
    let config = match explicit {
        Some(path) => load_config_from_file(path)?,
        None => {
            let path = Path::new(CONFIG_FILE);
            if path.is_file() {
                load_config_from_file(path)?
            } else {
                CasefixConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

fn load_config_from_file(path: &Path) -> Result<CasefixConfig> {
    let content = io::read_file(path, &format!("read {}", path.display()))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}
