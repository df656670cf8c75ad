//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Set up, check and launch the Lighthouse auditor agent.
#[derive(Debug, Parser)]
#[command(name = "auditor-bootstrap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (only this file is loaded)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show command output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Answer yes to confirmations and never prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check node, npm and chromium for Lighthouse audits
    CheckDeps,

    /// Install the Node packages Lighthouse needs
    InstallNodeDeps,

    /// Install uv, Python dependencies and Node packages
    Install,

    /// Run unit then integration tests
    Test,

    /// Start the backend and the UI together
    Playground,

    /// Start the backend API server
    Backend,

    /// Start the Streamlit UI
    Ui,

    /// Deploy the dev environment with Terraform
    SetupDevEnv(SetupDevEnvArgs),

    /// Run codespell, ruff and mypy
    Lint,

    /// Walk through every setup step
    Bootstrap(BootstrapArgs),

    /// Show the environment without changing anything (default)
    #[command(visible_alias = "doctor")]
    Status,

    /// Check or perform Google Cloud and GitHub logins
    Auth(AuthArgs),

    /// Enable the Google Cloud APIs the agent uses
    Apis(ApisArgs),

    /// Read, validate and update the Terraform variables file
    Tfvars(TfvarsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `setup-dev-env` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupDevEnvArgs {
    /// Dev project to deploy to
    #[arg(long, env = "PROJECT_ID", hide_env_values = true)]
    pub project_id: Option<String>,
}

/// Arguments for the `bootstrap` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BootstrapArgs {
    /// Skip uv install, venv creation and dependency sync
    #[arg(long)]
    pub skip_install: bool,

    /// Skip login offers
    #[arg(long)]
    pub skip_auth: bool,

    /// Skip API enablement
    #[arg(long)]
    pub skip_apis: bool,

    /// Exit non-zero when a required tool is missing
    #[arg(long)]
    pub strict: bool,

    /// Project to enable APIs on (defaults to the gcloud active project)
    #[arg(long)]
    pub project_id: Option<String>,
}

/// Arguments for the `auth` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// `auth` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum AuthCommand {
    /// Show login state
    Status,

    /// Log in
    Login(LoginArgs),
}

/// Which service to log in to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthProvider {
    /// Google Cloud (`gcloud auth login --update-adc`)
    Gcloud,
    /// GitHub (`gh auth login`)
    Github,
}

/// Arguments for `auth login`.
#[derive(Debug, Clone, clap::Args)]
pub struct LoginArgs {
    /// Service to log in to
    #[arg(value_enum)]
    pub provider: AuthProvider,

    /// Log in to GitHub with a token instead of the browser
    #[arg(long)]
    pub with_token: bool,
}

/// Arguments for the `apis` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ApisArgs {
    #[command(subcommand)]
    pub command: ApisCommand,
}

/// `apis` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ApisCommand {
    /// Enable the configured APIs
    Enable(EnableArgs),
}

/// Arguments for `apis enable`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnableArgs {
    /// Project to enable APIs on (defaults to the gcloud active project)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Enable only these APIs (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub api: Vec<String>,
}

/// Arguments for the `tfvars` command.
#[derive(Debug, Clone, clap::Args)]
pub struct TfvarsArgs {
    /// Variables file (defaults to the configured path)
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: TfvarsCommand,
}

/// `tfvars` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum TfvarsCommand {
    /// Print every variable
    Show,

    /// Report missing, placeholder and malformed values
    Check,

    /// Set variables in place, e.g. `region=us-central1`
    Set {
        /// KEY=VALUE assignments
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
