//! Tool detection and installation.
//!
//! This module decides whether the command-line tools the auditor needs
//! are on the search path, what version they report, and what to do when
//! one is missing.
//!
//! # Modules
//!
//! - [`probe`] - search path resolution
//! - [`registry`] - known tools, binary aliases and install guidance
//! - [`checker`] - presence and version checks
//! - [`status`] - check and install outcome types
//! - [`fetch`] - vendor install script download
//! - [`installer`] - installing missing tools

pub mod checker;
pub mod fetch;
pub mod installer;
pub mod probe;
pub mod registry;
pub mod status;

pub use checker::{check_tool, ToolChecker};
pub use fetch::{ScriptFetcher, ScriptSource, StaticScript};
pub use installer::install_tool_if_missing;
pub use probe::ToolLocator;
pub use registry::{InstallMethod, ToolRegistry, ToolSpec, CHROMIUM_GUIDANCE};
pub use status::{InstallOutcome, ToolCheckResult};
