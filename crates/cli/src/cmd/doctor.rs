use mdquery_core::config::loader::{default_config_path, ConfigLoader};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            crate::logging::init(&rc);
            println!("OK   mdq doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("vault_root: {}", rc.vault_root.display());
            for folder in &rc.excluded_folders {
                println!("excluded: {}", folder.display());
            }
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }
            println!(
                "index.value_indexed_fields: {}",
                rc.index.value_indexed_fields.join(", ")
            );
            println!("index.index_all_values: {}", rc.index.index_all_values);
            if !rc.vault_root.is_dir() {
                println!("WARN vault_root is not a directory");
            }
        }
        Err(e) => {
            println!("FAIL mdq doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
