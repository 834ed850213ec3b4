//! Browser configuration via `wtbrowse.toml`
//!
//! Every setting has a default, so the file is optional. Command-line flags
//! override file values.

use crate::error::{BrowseError, Result};
use crate::export::ExportFormat;
use crate::session::OpenOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wtbrowse_storage::DEFAULT_CONFIG;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "wtbrowse.toml";

/// Export defaults, the `[export]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Output format: `"json"` (default) or `"csv"`.
    #[serde(default)]
    pub format: ExportFormat,
    /// Maximum records per table; unset means all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Settings loaded from `wtbrowse.toml`.
///
/// # Example
///
/// ```toml
/// engine_config = "readonly=true"
///
/// [export]
/// format = "csv"
/// limit = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserConfig {
    /// Engine configuration string passed on open.
    #[serde(default = "default_engine_config")]
    pub engine_config: String,
    /// Export defaults.
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_engine_config() -> String {
    DEFAULT_CONFIG.to_string()
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine_config: default_engine_config(),
            export: ExportConfig::default(),
        }
    }
}

impl BrowserConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# wtbrowse configuration
#
# Engine configuration string used when opening a database.
# The bundled engine only accepts read-only access.
engine_config = "readonly=true"

[export]
# Output format: "json" (default) or "csv"
format = "json"

# Maximum records exported per table (default: all)
# limit = 1000
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BrowseError::Config(e.to_string()))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrowseError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            BrowseError::Config(format!("failed to parse config file '{}': {}", path.display(), e))
        })
    }

    /// Load `explicit` if given, else `dir/wtbrowse.toml` if present, else
    /// defaults.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize this config to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| BrowseError::Config(e.to_string()))
    }

    /// Open options carrying this config's engine settings.
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions::new().engine_config(self.engine_config.clone())
    }
}
