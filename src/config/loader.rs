//! Configuration file discovery and loading.
//!
//! All configuration files are optional. When none exist the built-in
//! defaults describe the Lighthouse auditor project.

use crate::config::merger::merge_configs;
use crate::config::schema::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".auditor-bootstrap";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global config (`~/.auditor-bootstrap/config.yml`)
/// 2. Project config (`.auditor-bootstrap/config.yml`)
/// 3. Local overrides (`.auditor-bootstrap/config.local.yml`)
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config
    pub user_global: Option<PathBuf>,

    /// Project config
    pub project: Option<PathBuf>,

    /// Local, uncommitted overrides
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self::discover_with_home(project_root, dirs::home_dir().as_deref())
    }

    /// Discover config files, taking the user layer from `home`.
    pub fn discover_with_home(project_root: &Path, home: Option<&Path>) -> Self {
        Self {
            user_global: home.and_then(|home| existing(home.join(CONFIG_DIR).join("config.yml"))),
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.exists().then_some(path)
}

/// Load a config file as a raw YAML value (for merging).
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BootstrapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BootstrapError::Io(e)
        }
    })?;

    // An empty file parses as null; treat it as "no overrides".
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| BootstrapError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(if value.is_null() {
        serde_yaml::Value::Mapping(Default::default())
    } else {
        value
    })
}

/// Load and merge every config layer that exists for the project.
pub fn load_merged_config(project_root: &Path) -> Result<BootstrapConfig> {
    load_merged_config_with_home(project_root, dirs::home_dir().as_deref())
}

/// Like [`load_merged_config`], with the user layer read from `home`.
pub fn load_merged_config_with_home(
    project_root: &Path,
    home: Option<&Path>,
) -> Result<BootstrapConfig> {
    let paths = ConfigPaths::discover_with_home(project_root, home);
    load_layers(&paths.all_existing(), &project_root.join(CONFIG_DIR))
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file (which must
/// exist). Otherwise, discovers and merges all layers.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<BootstrapConfig> {
    match config_override {
        Some(path) => {
            let path = path.to_path_buf();
            load_layers(&[&path], &path)
        }
        None => load_merged_config(project_root),
    }
}

fn load_layers(paths: &[&PathBuf], report_path: &Path) -> Result<BootstrapConfig> {
    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::debug!(path = %path.display(), "loading config layer");
        layers.push(load_config_value(path)?);
    }

    serde_yaml::from_value(merge_configs(&layers)).map_err(|e| BootstrapError::ConfigParseError {
        path: report_path.to_path_buf(),
        message: e.to_string(),
    })
}
