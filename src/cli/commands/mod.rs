//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! configuration once, builds a [`RunContext`](crate::context::RunContext)
//! and routes the subcommand to its implementation.

pub mod apis;
pub mod auth;
pub mod bootstrap;
pub mod completions;
pub mod dispatcher;
pub mod status;
pub mod targets;
pub mod tfvars;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
