//! In-place updates to a variables file.

use std::path::Path;

use crate::error::{BootstrapError, Result};

use super::parser::{TfValue, TfvarsDocument};

/// Split `KEY=VALUE`.
pub fn parse_assignment(text: &str) -> Result<(String, String)> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| BootstrapError::ConfigValidationError {
            message: format!("expected KEY=VALUE, got '{}'", text),
        })?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(BootstrapError::ConfigValidationError {
            message: format!("invalid variable name '{}'", key),
        });
    }
    Ok((key.to_string(), value.to_string()))
}

/// `true`/`false` are written unquoted, everything else as a string.
fn typed(value: &str) -> TfValue {
    match value {
        "true" => TfValue::Bool(true),
        "false" => TfValue::Bool(false),
        other => TfValue::String(other.to_string()),
    }
}

/// Apply assignments to `path`, preserving every other line.
///
/// A missing file is created. Returns the keys whose value changed.
pub fn update_vars(path: &Path, assignments: &[(String, String)]) -> Result<Vec<String>> {
    let mut doc = if path.exists() {
        TfvarsDocument::load(path)?
    } else {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        TfvarsDocument::parse(path, "")?
    };

    let mut changed = Vec::new();
    for (key, value) in assignments {
        let value = typed(value);
        if doc.get(key) != Some(&value) {
            changed.push(key.clone());
        }
        doc.set(key, value);
    }

    if !changed.is_empty() {
        doc.save()?;
        tracing::info!(path = %path.display(), keys = ?changed, "updated variables");
    }
    Ok(changed)
}
