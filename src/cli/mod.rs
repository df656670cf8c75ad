//! Command-line interface for auditor-bootstrap.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    ApisArgs, AuthArgs, BootstrapArgs, Cli, Commands, CompletionsArgs, SetupDevEnvArgs,
    TfvarsArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};
