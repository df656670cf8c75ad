//! Configuration validation rules.
//!
//! - The manifest name and venv directory must be non-empty
//! - Every target command line must be non-empty
//! - API names must look like `<service>.googleapis.com`

use crate::config::schema::BootstrapConfig;
use crate::error::{BootstrapError, Result};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config key path, e.g. `targets.backend`
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &BootstrapConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let required = [
        ("layout.manifest", config.layout.manifest.as_str()),
        ("layout.venv_dir", config.layout.venv_dir.as_str()),
        ("targets.install", config.targets.install.as_str()),
        ("targets.node_install", config.targets.node_install.as_str()),
        (
            "targets.node_install_fallback",
            config.targets.node_install_fallback.as_str(),
        ),
        ("targets.backend", config.targets.backend.as_str()),
        ("targets.ui", config.targets.ui.as_str()),
        ("targets.terraform_dir", config.targets.terraform_dir.as_str()),
        (
            "targets.terraform_var_file",
            config.targets.terraform_var_file.as_str(),
        ),
        ("tfvars.path", config.tfvars.path.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError {
                field: field.to_string(),
                message: format!("'{}' must not be empty", field),
            });
        }
    }

    for (name, list) in [("targets.test", &config.targets.test), ("targets.lint", &config.targets.lint)] {
        for (i, line) in list.iter().enumerate() {
            if line.trim().is_empty() {
                errors.push(ValidationError {
                    field: format!("{}[{}]", name, i),
                    message: format!("'{}[{}]' must not be empty", name, i),
                });
            }
        }
    }

    for api in &config.cloud.apis {
        if !is_api_name(api) {
            errors.push(ValidationError {
                field: "cloud.apis".to_string(),
                message: format!("'{}' is not a service name like run.googleapis.com", api),
            });
        }
    }

    errors
}

/// Validate and fail on the first batch of errors.
pub fn validate(config: &BootstrapConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(BootstrapError::ConfigValidationError { message })
}

fn is_api_name(api: &str) -> bool {
    api.strip_suffix(".googleapis.com").is_some_and(|service| {
        !service.is_empty()
            && service
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    })
}
