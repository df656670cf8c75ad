//! Typed view over the deployment variables.

use std::fmt;

use regex::Regex;

use super::parser::{TfValue, TfvarsDocument};

/// Variables that must be present and non-empty.
pub const REQUIRED_KEYS: [&str; 6] = [
    "project_name",
    "prod_project_id",
    "staging_project_id",
    "cicd_runner_project_id",
    "region",
    "repository_name",
];

/// Variables holding Google Cloud project ids.
pub const PROJECT_ID_KEYS: [&str; 3] = [
    "prod_project_id",
    "staging_project_id",
    "cicd_runner_project_id",
];

/// Values the deployment consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentVars {
    pub project_name: Option<String>,
    pub prod_project_id: Option<String>,
    pub staging_project_id: Option<String>,
    pub cicd_runner_project_id: Option<String>,
    pub host_connection_name: Option<String>,
    pub repository_name: Option<String>,
    pub region: Option<String>,
    pub telemetry_logs_filter: Option<String>,
    pub feedback_logs_filter: Option<String>,
    pub repository_owner: Option<String>,
    pub github_app_installation_id: Option<String>,
    pub github_pat_secret_id: Option<String>,
    pub connection_exists: Option<bool>,
    pub repository_exists: Option<bool>,
}

/// A problem found by [`DeploymentVars::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarsIssue {
    /// Offending variable
    pub key: String,
    /// What is wrong with it
    pub message: String,
}

impl fmt::Display for VarsIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

fn text(doc: &TfvarsDocument, key: &str) -> Option<String> {
    match doc.get(key)? {
        TfValue::String(s) | TfValue::Number(s) => Some(s.clone()),
        TfValue::Bool(b) => Some(b.to_string()),
        TfValue::Raw(_) => None,
    }
}

fn flag(doc: &TfvarsDocument, key: &str) -> Option<bool> {
    match doc.get(key)? {
        TfValue::Bool(b) => Some(*b),
        TfValue::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Whether a value still holds template filler.
pub fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.is_empty()
        || lower.starts_with("your-")
        || lower.starts_with("your_")
        || lower.contains('<')
        || lower.contains("changeme")
        || lower.contains("replace-me")
        || lower == "todo"
}

/// Google Cloud project id rules: 6 to 30 characters, lowercase letters,
/// digits and hyphens, starting with a letter and not ending with a hyphen.
pub fn is_valid_project_id(value: &str) -> bool {
    Regex::new(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$")
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

impl DeploymentVars {
    /// Read the known variables from a document.
    pub fn from_document(doc: &TfvarsDocument) -> Self {
        Self {
            project_name: text(doc, "project_name"),
            prod_project_id: text(doc, "prod_project_id"),
            staging_project_id: text(doc, "staging_project_id"),
            cicd_runner_project_id: text(doc, "cicd_runner_project_id"),
            host_connection_name: text(doc, "host_connection_name"),
            repository_name: text(doc, "repository_name"),
            region: text(doc, "region"),
            telemetry_logs_filter: text(doc, "telemetry_logs_filter"),
            feedback_logs_filter: text(doc, "feedback_logs_filter"),
            repository_owner: text(doc, "repository_owner"),
            github_app_installation_id: text(doc, "github_app_installation_id"),
            github_pat_secret_id: text(doc, "github_pat_secret_id"),
            connection_exists: flag(doc, "connection_exists"),
            repository_exists: flag(doc, "repository_exists"),
        }
    }

    /// Every known variable with its value, in a stable order.
    pub fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("project_name", self.project_name.clone()),
            ("prod_project_id", self.prod_project_id.clone()),
            ("staging_project_id", self.staging_project_id.clone()),
            ("cicd_runner_project_id", self.cicd_runner_project_id.clone()),
            ("host_connection_name", self.host_connection_name.clone()),
            ("repository_name", self.repository_name.clone()),
            ("region", self.region.clone()),
            ("telemetry_logs_filter", self.telemetry_logs_filter.clone()),
            ("feedback_logs_filter", self.feedback_logs_filter.clone()),
            ("repository_owner", self.repository_owner.clone()),
            (
                "github_app_installation_id",
                self.github_app_installation_id.clone(),
            ),
            ("github_pat_secret_id", self.github_pat_secret_id.clone()),
            (
                "connection_exists",
                self.connection_exists.map(|b| b.to_string()),
            ),
            (
                "repository_exists",
                self.repository_exists.map(|b| b.to_string()),
            ),
        ]
    }

    fn value(&self, key: &str) -> Option<String> {
        self.fields()
            .into_iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v)
    }

    /// Missing required variables, placeholders and malformed project ids.
    pub fn validate(&self) -> Vec<VarsIssue> {
        let mut issues = Vec::new();
        for key in REQUIRED_KEYS {
            match self.value(key) {
                None => issues.push(VarsIssue {
                    key: key.to_string(),
                    message: "missing".to_string(),
                }),
                Some(v) if is_placeholder(&v) => issues.push(VarsIssue {
                    key: key.to_string(),
                    message: format!("placeholder value '{}'", v),
                }),
                Some(_) => {}
            }
        }
        for key in PROJECT_ID_KEYS {
            if let Some(v) = self.value(key) {
                if !is_placeholder(&v) && !is_valid_project_id(&v) {
                    issues.push(VarsIssue {
                        key: key.to_string(),
                        message: format!("'{}' is not a valid project id", v),
                    });
                }
            }
        }
        issues
    }
}
