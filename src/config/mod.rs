//! Configuration loading, merging and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use auditor_bootstrap::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".auditor-bootstrap");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "layout:\n  venv_dir: env\n").unwrap();
//!
//! let config = load_config(temp.path(), Some(&dir.join("config.yml"))).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.layout.venv_dir, "env");
//! ```
//!
//! # Configuration File Locations
//!
//! Layers are merged in this order, later wins:
//! 1. User global config (`~/.auditor-bootstrap/config.yml`)
//! 2. Project config (`.auditor-bootstrap/config.yml`)
//! 3. Local overrides (`.auditor-bootstrap/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{
    load_config, load_merged_config, load_merged_config_with_home, ConfigPaths, CONFIG_DIR,
};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    AuthConfig, BootstrapConfig, CloudConfig, LayoutConfig, SentinelDir, TargetsConfig,
    TfvarsConfig, TimeoutConfig, ToolOverride, DEFAULT_APIS,
};
pub use validator::{validate, validate_config, ValidationError};
