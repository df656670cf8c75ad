//! Configuration schema definitions.
//!
//! This module contains the structs that map to the optional
//! `.auditor-bootstrap/config.yml` file. Every field has a default that
//! matches the Lighthouse auditor project layout, so an absent file is a
//! complete configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Expected project layout
    pub layout: LayoutConfig,

    /// Time budgets for external commands
    pub timeouts: TimeoutConfig,

    /// Per-tool overrides (version arguments, alternative binary names)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tools: BTreeMap<String, ToolOverride>,

    /// Command lines behind each target
    pub targets: TargetsConfig,

    /// Cloud project settings
    pub cloud: CloudConfig,

    /// Authentication detection settings
    pub auth: AuthConfig,

    /// Terraform variables file location
    pub tfvars: TfvarsConfig,
}

/// Where the project's marker files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Project manifest file
    pub manifest: String,

    /// Subdirectories expected next to the manifest
    pub subdirs: Vec<String>,

    /// Directory name expected at `sentinel` (no check when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_dir_name: Option<String>,

    /// Which directory `expected_dir_name` is compared with
    pub sentinel: SentinelDir,

    /// Isolated Python environment directory
    pub venv_dir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            manifest: "pyproject.toml".to_string(),
            subdirs: vec!["app".to_string(), "deployment".to_string()],
            expected_dir_name: Some("lighthouse-auditor".to_string()),
            sentinel: SentinelDir::Parent,
            venv_dir: ".venv".to_string(),
        }
    }
}

/// Directory whose name is checked against `layout.expected_dir_name`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelDir {
    /// The directory containing the project.
    #[default]
    Parent,
    /// The project directory itself.
    #[serde(rename = "self")]
    Own,
}

/// Timeouts in seconds. Zero disables the timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Version probes and status queries
    pub probe_secs: u64,

    /// Installs, venv creation, API enablement
    pub install_secs: u64,

    /// `terraform init` and `terraform apply`; off by default since a
    /// killed apply leaves the state lock held
    pub terraform_secs: u64,

    /// Interactive login flows
    pub auth_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            probe_secs: 30,
            install_secs: 900,
            terraform_secs: 0,
            auth_secs: 600,
        }
    }
}

impl TimeoutConfig {
    /// Timeout for probes, `None` when disabled.
    pub fn probe(&self) -> Option<Duration> {
        to_duration(self.probe_secs)
    }

    /// Timeout for installs, `None` when disabled.
    pub fn install(&self) -> Option<Duration> {
        to_duration(self.install_secs)
    }

    /// Timeout for terraform, `None` unless configured.
    pub fn terraform(&self) -> Option<Duration> {
        to_duration(self.terraform_secs)
    }

    /// Timeout for login flows, `None` when disabled.
    pub fn auth(&self) -> Option<Duration> {
        to_duration(self.auth_secs)
    }
}

fn to_duration(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Override for one registered tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOverride {
    /// Arguments that make the tool print its version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_args: Option<Vec<String>>,

    /// Binary names tried in order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binaries: Option<Vec<String>>,
}

/// Command lines run by each target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Python dependency install
    pub install: String,

    /// Node dependency install when `package.json` exists
    pub node_install: String,

    /// Node dependency install when there is no `package.json`
    pub node_install_fallback: String,

    /// Test commands, run in order until one fails
    pub test: Vec<String>,

    /// Backend API server
    pub backend: String,

    /// Streamlit UI
    pub ui: String,

    /// Lint commands, run in order until one fails
    pub lint: Vec<String>,

    /// Terraform root for the dev environment
    pub terraform_dir: String,

    /// Variables file, relative to `terraform_dir`
    pub terraform_var_file: String,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            install: "uv sync --dev --extra streamlit --extra jupyter --frozen".to_string(),
            node_install: "npm install".to_string(),
            node_install_fallback: "npm install lighthouse".to_string(),
            test: vec![
                "uv run pytest tests/unit".to_string(),
                "uv run pytest tests/integration".to_string(),
            ],
            backend: "uv run uvicorn app.server:app --host 0.0.0.0 --port 8000 --reload"
                .to_string(),
            ui: "uv run streamlit run frontend/streamlit_app.py \
                 --browser.serverAddress=localhost \
                 --server.enableCORS=false \
                 --server.enableXsrfProtection=false"
                .to_string(),
            lint: vec![
                "uv run codespell".to_string(),
                "uv run ruff check . --diff".to_string(),
                "uv run ruff format . --check --diff".to_string(),
                "uv run mypy .".to_string(),
            ],
            terraform_dir: "deployment/terraform/dev".to_string(),
            terraform_var_file: "vars/env.tfvars".to_string(),
        }
    }
}

/// Cloud APIs the agent needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Service names passed to `gcloud services enable`
    pub apis: Vec<String>,
}

/// The seven APIs the auditor's infrastructure depends on.
pub const DEFAULT_APIS: [&str; 7] = [
    "aiplatform.googleapis.com",
    "run.googleapis.com",
    "cloudbuild.googleapis.com",
    "artifactregistry.googleapis.com",
    "secretmanager.googleapis.com",
    "logging.googleapis.com",
    "cloudtrace.googleapis.com",
];

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            apis: DEFAULT_APIS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Authentication detection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Try machine-readable CLI output before the text heuristics
    pub structured: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { structured: true }
    }
}

/// Terraform variables file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfvarsConfig {
    /// Path relative to the project root
    pub path: String,
}

impl Default for TfvarsConfig {
    fn default() -> Self {
        Self {
            path: "deployment/terraform/vars/env.tfvars".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: BootstrapConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, BootstrapConfig::default());
        assert_eq!(config.layout.manifest, "pyproject.toml");
        assert_eq!(config.cloud.apis.len(), 7);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let yaml = r#"
layout:
  venv_dir: env
timeouts:
  probe_secs: 5
"#;
        let config: BootstrapConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.layout.venv_dir, "env");
        assert_eq!(config.layout.manifest, "pyproject.toml");
        assert_eq!(config.timeouts.probe_secs, 5);
        assert_eq!(config.timeouts.install_secs, 900);
    }

    #[test]
    fn sentinel_defaults_to_parent() {
        assert_eq!(LayoutConfig::default().sentinel, SentinelDir::Parent);
        let config: BootstrapConfig = serde_yaml::from_str("layout:\n  sentinel: self\n").unwrap();
        assert_eq!(config.layout.sentinel, SentinelDir::Own);
    }

    #[test]
    fn zero_timeout_disables() {
        let timeouts = TimeoutConfig {
            probe_secs: 0,
            ..Default::default()
        };
        assert!(timeouts.probe().is_none());
        assert_eq!(timeouts.install(), Some(Duration::from_secs(900)));
        assert!(timeouts.terraform().is_none());
    }

    #[test]
    fn tool_override_parses() {
        let yaml = r#"
tools:
  chromium:
    binaries: [chromium, google-chrome]
"#;
        let config: BootstrapConfig = serde_yaml::from_str(yaml).unwrap();
        let chromium = &config.tools["chromium"];
        assert_eq!(
            chromium.binaries.as_deref(),
            Some(&["chromium".to_string(), "google-chrome".to_string()][..])
        );
        assert!(chromium.version_args.is_none());
    }

    #[test]
    fn ui_target_is_single_spaced() {
        let targets = TargetsConfig::default();
        assert!(!targets.ui.contains("  "));
        assert!(targets.ui.ends_with("--server.enableXsrfProtection=false"));
    }
}
