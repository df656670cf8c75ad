//! auditor-bootstrap - readiness checks and developer targets for the
//! Lighthouse auditor agent.
//!
//! The crate answers "can this machine develop, test and deploy the
//! auditor?" and fixes what it safely can: it installs uv, creates the
//! virtual environment, syncs dependencies, offers cloud and GitHub
//! logins, enables Google Cloud APIs, and keeps the Terraform variables
//! file in shape. The developer targets (`test`, `lint`, `playground`,
//! `setup-dev-env`, ...) run the agent's own commands.
//!
//! # Modules
//!
//! - [`auth`] - gcloud and gh login detection and login flows
//! - [`bootstrap`] - the end-to-end readiness checklist
//! - [`cli`] - Command-line interface and argument parsing
//! - [`cloud`] - Google Cloud API enablement
//! - [`config`] - Configuration loading, merging and validation
//! - [`context`] - Shared inputs for every operation
//! - [`error`] - Error types and result aliases
//! - [`project`] - Project layout, virtual environment and dependencies
//! - [`requirements`] - Tool detection and installation
//! - [`shell`] - External command execution
//! - [`snapshot`] - Immutable view of the environment
//! - [`targets`] - Developer targets
//! - [`tfvars`] - Terraform variables file handling
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use auditor_bootstrap::tfvars::{DeploymentVars, TfvarsDocument};
//! use std::path::Path;
//!
//! let doc = TfvarsDocument::parse(Path::new("env.tfvars"), "region = \"us-central1\"\n").unwrap();
//! let issues = DeploymentVars::from_document(&doc).validate();
//! assert!(issues.iter().any(|i| i.key == "project_name"));
//! ```

pub mod auth;
pub mod bootstrap;
pub mod cli;
pub mod cloud;
pub mod config;
pub mod context;
pub mod error;
pub mod project;
pub mod requirements;
pub mod shell;
pub mod snapshot;
pub mod targets;
pub mod tfvars;
pub mod ui;

pub use error::{BootstrapError, Result};
