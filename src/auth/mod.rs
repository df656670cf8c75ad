//! Cloud and GitHub login detection and login flows.
//!
//! - [`cloud`] - `gcloud` accounts, active project and ADC
//! - [`git`] - `gh` accounts

pub mod cloud;
pub mod git;

pub use cloud::{authenticate_cloud, check_cloud_auth, classify_gcloud_text, CloudAuthState};
pub use git::{authenticate_git, check_git_auth, classify_gh_text, GitAuthState, GitLoginMethod};

use std::fmt;

use crate::context::RunContext;
use crate::shell::Invocation;
use crate::ui::UserInterface;

/// Which detector produced an auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    /// Machine-readable CLI output
    Structured,
    /// Prose CLI output
    Text,
    /// The CLI is not installed
    Unavailable,
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Text => write!(f, "text"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Run an interactive login and report how it went.
pub(crate) fn run_login(
    ctx: &RunContext<'_>,
    invocation: Invocation,
    label: &str,
    ui: &mut dyn UserInterface,
) -> bool {
    ui.message(&format!("Running {}", invocation.display()));
    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => {
            ui.success(&format!("Logged in to {}", label));
            true
        }
        Ok(result) => {
            ui.error(&format!(
                "{} login failed (exit code {})",
                label,
                result
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ));
            false
        }
        Err(e) => {
            ui.error(&format!("{} login failed: {}", label, e));
            false
        }
    }
}
