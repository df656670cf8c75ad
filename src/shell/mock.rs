//! Scripted command runner for testing.
//!
//! `ScriptedRunner` implements [`CommandRunner`] without spawning anything.
//! Responses are keyed by the displayed command line (`gh auth status`);
//! every call is recorded for later assertion.
//!
//! # Example
//!
//! ```
//! use auditor_bootstrap::shell::{CommandRunner, Invocation, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new();
//! runner.respond_ok("gh --version", "gh version 2.63.0");
//!
//! let result = runner.run(&Invocation::new("gh").arg("--version")).unwrap();
//! assert!(result.stdout.contains("2.63.0"));
//! assert_eq!(runner.calls(), vec!["gh --version".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::error::{BootstrapError, Result};

use super::{CommandResult, CommandRunner, Invocation};

#[derive(Debug, Clone)]
enum Scripted {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    TimedOut,
}

/// Command runner that replays scripted responses.
///
/// Unscripted commands behave like a program missing from PATH: they fail
/// to spawn with `CommandFailed { code: None }`.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: RefCell<HashMap<String, VecDeque<Scripted>>>,
    calls: RefCell<Vec<String>>,
    invocations: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// Create a runner with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `command` with exit code 0 and `stdout`.
    pub fn respond_ok(&self, command: &str, stdout: &str) {
        self.push(
            command,
            Scripted::Exit {
                code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
    }

    /// Respond to `command` with a non-zero exit and `stderr`.
    pub fn respond_fail(&self, command: &str, code: i32, stderr: &str) {
        self.push(
            command,
            Scripted::Exit {
                code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
    }

    /// Respond to `command` with explicit exit code and both streams.
    pub fn respond(&self, command: &str, code: i32, stdout: &str, stderr: &str) {
        self.push(
            command,
            Scripted::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
    }

    /// Make `command` time out.
    pub fn respond_timeout(&self, command: &str) {
        self.push(command, Scripted::TimedOut);
    }

    /// Every command line run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded command line starts with `prefix`.
    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    /// Stdin payloads passed to each call, in order.
    pub fn stdin_seen(&self) -> Vec<Option<String>> {
        self.invocations
            .borrow()
            .iter()
            .map(|i| i.stdin.clone())
            .collect()
    }

    /// The full invocations run so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// Queue a response; repeated keys are replayed in order and the last
    /// one sticks.
    fn push(&self, command: &str, response: Scripted) {
        self.responses
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(response);
    }

    fn next_response(&self, command: &str) -> Option<Scripted> {
        let mut responses = self.responses.borrow_mut();
        let queue = responses.get_mut(command)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let command = invocation.display();
        self.calls.borrow_mut().push(command.clone());
        self.invocations.borrow_mut().push(invocation.clone());

        match self.next_response(&command) {
            Some(Scripted::Exit {
                code,
                stdout,
                stderr,
            }) => {
                if code == 0 {
                    Ok(CommandResult::success(stdout, stderr, Duration::ZERO))
                } else {
                    Ok(CommandResult::failure(
                        Some(code),
                        stdout,
                        stderr,
                        Duration::ZERO,
                    ))
                }
            }
            Some(Scripted::TimedOut) => Err(BootstrapError::CommandTimedOut {
                command,
                seconds: invocation.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            }),
            None => Err(BootstrapError::CommandFailed {
                command,
                code: None,
            }),
        }
    }

    fn run_all(&self, invocations: &[Invocation]) -> Vec<CommandResult> {
        invocations
            .iter()
            .map(|invocation| {
                self.run(invocation).unwrap_or_else(|_| {
                    CommandResult::failure(None, String::new(), String::new(), Duration::ZERO)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscripted_command_fails_to_spawn() {
        let runner = ScriptedRunner::new();
        let err = runner.run(&Invocation::new("terraform")).unwrap_err();
        assert!(matches!(err, BootstrapError::CommandFailed { code: None, .. }));
    }

    #[test]
    fn queued_responses_replay_in_order_and_last_sticks() {
        let runner = ScriptedRunner::new();
        runner.respond_fail("gh auth status", 1, "not logged in");
        runner.respond_ok("gh auth status", "Logged in to github.com");

        let inv = Invocation::new("gh").args(["auth", "status"]);
        assert!(!runner.run(&inv).unwrap().success);
        assert!(runner.run(&inv).unwrap().success);
        assert!(runner.run(&inv).unwrap().success);
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn records_stdin() {
        let runner = ScriptedRunner::new();
        runner.respond_ok("gh auth login --with-token", "");
        let inv = Invocation::new("gh")
            .args(["auth", "login", "--with-token"])
            .stdin("secret\n");
        runner.run(&inv).unwrap();
        assert_eq!(runner.stdin_seen(), vec![Some("secret\n".to_string())]);
    }

    #[test]
    fn scripted_timeout_reports_command() {
        let runner = ScriptedRunner::new();
        runner.respond_timeout("gcloud auth list");
        let inv = Invocation::new("gcloud")
            .args(["auth", "list"])
            .timeout(Some(Duration::from_secs(5)));
        let err = runner.run(&inv).unwrap_err();
        assert!(matches!(err, BootstrapError::CommandTimedOut { seconds: 5, .. }));
    }
}
