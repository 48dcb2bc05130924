//! TOML configuration: profiles, logging and index policy.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{ConfigFile, IndexConfig, LoggingConfig, Profile, ResolvedConfig};
