//! Error types for bootstrap operations.
//!
//! This module defines [`BootstrapError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Operations convert subprocess failures into printed diagnostics at
//!   their own boundary; errors rarely escape to `main`
//! - Use `BootstrapError` for failures that callers match on
//! - Use `anyhow::Error` (via `BootstrapError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bootstrap operations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// External command could not be spawned or exited non-zero.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command exceeded its time budget and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// A required tool is not on the search path.
    #[error("Missing tool '{tool}': {message}")]
    ToolMissing { tool: String, message: String },

    /// A required environment variable is unset or empty.
    #[error("{name} environment variable is not set")]
    MissingEnvVar { name: String },

    /// A question came up with nobody to answer it.
    #[error("Cannot ask '{key}' without a terminal (set {env_var})")]
    PromptUnanswered { key: String, env_var: String },

    /// Terraform variables file could not be parsed.
    #[error("Failed to parse {path} line {line}: {message}")]
    TfvarsParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
