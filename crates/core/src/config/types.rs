use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Folders to leave out of the index (relative to vault_root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which fields keep an ordered value map in addition to a presence set.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    #[serde(default = "default_value_indexed_fields")]
    pub value_indexed_fields: Vec<String>,
    /// Keep value maps for every field, ignoring the list above.
    #[serde(default)]
    pub index_all_values: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { value_indexed_fields: default_value_indexed_fields(), index_all_values: false }
    }
}

fn default_value_indexed_fields() -> Vec<String> {
    ["created", "modified", "due", "completion", "scheduled", "start", "$ctime", "$mtime"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    /// Folders to leave out of the index (resolved to absolute paths).
    pub excluded_folders: Vec<PathBuf>,
    pub logging: LoggingConfig,
    pub index: IndexConfig,
}
