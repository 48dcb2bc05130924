pub mod backlinks;
pub mod doctor;
pub mod output;
pub mod query;
pub mod stats;
pub mod tags;

use std::path::Path;

use mdquery_core::config::loader::ConfigLoader;
use mdquery_core::config::types::ResolvedConfig;
use mdquery_core::index::IndexStore;
use mdquery_core::vault::VaultNamespace;

use crate::import::{import_vault, ImportStats};
use crate::OutputFormat;

/// Load configuration and install logging, exiting on failure.
pub fn load_config(config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    crate::logging::init(&rc);
    rc
}

/// Import the configured vault, exiting on failure.
pub fn load_store(rc: &ResolvedConfig) -> (IndexStore<VaultNamespace>, ImportStats) {
    match import_vault(rc) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error importing vault: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn resolve_format(output: OutputFormat, json: bool, quiet: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if quiet {
        OutputFormat::Quiet
    } else {
        output
    }
}
