//! External command execution and platform detection.
//!
//! - [`command`] - argument-vector execution with timeouts
//! - [`cancel`] - process-group cleanup on timeout and Ctrl+C
//! - [`platform`] - OS, shell and CI detection
//! - [`mock`] - scripted [`CommandRunner`] for tests

pub mod cancel;
pub mod command;
pub mod mock;
pub mod platform;

pub use cancel::install_interrupt_handler;
pub use command::{execute, execute_all, execute_check, spawn, CommandResult, Invocation};
pub use mock::ScriptedRunner;
pub use platform::{is_ci, LoginShell, Platform};

use crate::error::Result;

/// Runs external commands on behalf of the orchestrator.
///
/// Every operation that talks to `gcloud`, `gh`, `uv`, `npm` or
/// `terraform` goes through this trait so tests can substitute
/// [`ScriptedRunner`].
pub trait CommandRunner {
    /// Run an invocation to completion.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Run several invocations side by side and wait for all of them.
    fn run_all(&self, invocations: &[Invocation]) -> Vec<CommandResult>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        execute(invocation)
    }

    fn run_all(&self, invocations: &[Invocation]) -> Vec<CommandResult> {
        execute_all(invocations)
    }
}
