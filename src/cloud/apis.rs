//! Enabling the Google Cloud APIs the auditor's infrastructure uses.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::context::RunContext;
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::{confirm, Prompt, UserInterface};

/// What happened to each requested API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiReport {
    /// Already enabled before this run
    pub already_enabled: Vec<String>,
    /// Enabled by this run
    pub enabled: Vec<String>,
    /// The API whose enable command failed, with the error
    pub failed: Option<(String, String)>,
    /// Skipped after the failure
    pub not_attempted: Vec<String>,
    /// The user said no; nothing was enabled
    pub declined: bool,
}

impl ApiReport {
    /// Whether every requested API is enabled now.
    pub fn is_complete(&self) -> bool {
        !self.declined && self.failed.is_none() && self.not_attempted.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    config: Option<ServiceConfig>,
}

#[derive(Debug, Deserialize)]
struct ServiceConfig {
    #[serde(default)]
    name: String,
}

/// Parse `gcloud services list --enabled --format=json` into service names.
///
/// Entries carry either `config.name` (`run.googleapis.com`) or a full
/// resource name (`projects/123/services/run.googleapis.com`).
pub fn parse_enabled_services(output: &str) -> Option<BTreeSet<String>> {
    let entries: Vec<ServiceEntry> = serde_json::from_str(output.trim()).ok()?;
    Some(
        entries
            .into_iter()
            .filter_map(|e| match e.config {
                Some(c) if !c.name.is_empty() => Some(c.name),
                _ => e.name.rsplit('/').next().map(str::to_string),
            })
            .filter(|n| !n.is_empty())
            .collect(),
    )
}

fn enabled_services(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    project_id: &str,
) -> BTreeSet<String> {
    let invocation = snapshot
        .invocation("gcloud")
        .args([
            "services".to_string(),
            "list".to_string(),
            "--enabled".to_string(),
            format!("--project={}", project_id),
            "--format=json".to_string(),
        ])
        .timeout(ctx.install_timeout());
    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => parse_enabled_services(&result.stdout).unwrap_or_default(),
        _ => {
            tracing::debug!("could not list enabled services; attempting every API");
            BTreeSet::new()
        }
    }
}

/// Enable `apis` on `project_id`, in order.
///
/// Asks for confirmation unless `--yes` was given. APIs that are already
/// enabled are skipped. The first failed enable stops the rest.
pub fn enable_cloud_apis(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    ui: &mut dyn UserInterface,
    project_id: &str,
    apis: &[String],
) -> ApiReport {
    let mut report = ApiReport::default();

    if !snapshot.has_tool("gcloud") {
        ui.warning("Cannot enable APIs: gcloud is not installed");
        report.not_attempted = apis.to_vec();
        return report;
    }

    if !ctx.assume_yes {
        let prompt = Prompt::confirm(
            "enable_apis",
            format!("Enable {} APIs on project {}?", apis.len(), project_id),
            false,
        );
        if !confirm(ui, &prompt) {
            ui.message("Skipped API enablement");
            report.declined = true;
            report.not_attempted = apis.to_vec();
            return report;
        }
    }

    let enabled = enabled_services(ctx, snapshot, project_id);

    let mut remaining = apis.iter();
    for api in remaining.by_ref() {
        if enabled.contains(api) {
            ui.success(&format!("{} already enabled", api));
            report.already_enabled.push(api.clone());
            continue;
        }

        let invocation = snapshot
            .invocation("gcloud")
            .args([
                "services".to_string(),
                "enable".to_string(),
                api.clone(),
                format!("--project={}", project_id),
            ])
            .timeout(ctx.install_timeout());
        let mut spinner = ui.start_spinner(&format!("Enabling {}", api));

        let error = match ctx.runner.run(&invocation) {
            Ok(result) if result.success => None,
            Ok(result) => Some(result.combined().trim().to_string()),
            Err(e) => Some(e.to_string()),
        };
        match error {
            None => {
                spinner.finish_success(&format!("Enabled {}", api));
                report.enabled.push(api.clone());
            }
            Some(message) => {
                spinner.finish_error(&format!("Failed to enable {}", api));
                ui.show_error_block(&invocation.display(), &message, None);
                report.failed = Some((api.clone(), message));
                break;
            }
        }
    }
    report.not_attempted = remaining.cloned().collect();

    if !report.not_attempted.is_empty() {
        ui.warning(&format!(
            "Stopped after the first failure; not attempted: {}",
            report.not_attempted.join(", ")
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BootstrapConfig, LayoutConfig, DEFAULT_APIS};
    use crate::project::verify_project_layout;
    use crate::requirements::fetch::StaticScript;
    use crate::requirements::ToolCheckResult;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use std::path::{Path, PathBuf};

    fn with_gcloud() -> EnvironmentSnapshot {
        EnvironmentSnapshot::new(verify_project_layout(Path::new("."), &LayoutConfig::default()))
            .with_tool(ToolCheckResult::found("gcloud", PathBuf::from("gcloud"), None))
    }

    fn apis() -> Vec<String> {
        DEFAULT_APIS.iter().map(|s| s.to_string()).collect()
    }

    const LIST: &str = "gcloud services list --enabled --project=auditor-dev --format=json";

    #[test]
    fn parses_both_name_shapes() {
        let json = r#"[
            {"name": "projects/123/services/run.googleapis.com", "config": {"name": "run.googleapis.com"}},
            {"name": "projects/123/services/logging.googleapis.com"}
        ]"#;
        let names = parse_enabled_services(json).unwrap();
        assert!(names.contains("run.googleapis.com"));
        assert!(names.contains("logging.googleapis.com"));
        assert!(parse_enabled_services("ERROR").is_none());
    }

    #[test]
    fn stops_at_first_failure() {
        let runner = ScriptedRunner::new();
        runner.respond_ok(LIST, "[]");
        runner.respond_ok(
            "gcloud services enable aiplatform.googleapis.com --project=auditor-dev",
            "",
        );
        runner.respond_fail(
            "gcloud services enable run.googleapis.com --project=auditor-dev",
            1,
            "PERMISSION_DENIED",
        );
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher)
            .with_assume_yes(true);
        let mut ui = MockUI::new();

        let report = enable_cloud_apis(&ctx, &with_gcloud(), &mut ui, "auditor-dev", &apis());
        assert_eq!(report.enabled, vec!["aiplatform.googleapis.com".to_string()]);
        assert_eq!(report.failed.as_ref().unwrap().0, "run.googleapis.com");
        assert_eq!(report.not_attempted.len(), 5);
        assert!(!report.is_complete());
        assert!(!runner.was_called("gcloud services enable cloudbuild"));
    }

    #[test]
    fn already_enabled_apis_are_skipped() {
        let runner = ScriptedRunner::new();
        runner.respond_ok(
            LIST,
            r#"[{"config": {"name": "aiplatform.googleapis.com"}}, {"config": {"name": "run.googleapis.com"}}]"#,
        );
        for api in &apis()[2..] {
            runner.respond_ok(
                &format!("gcloud services enable {} --project=auditor-dev", api),
                "",
            );
        }
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher)
            .with_assume_yes(true);
        let mut ui = MockUI::new();

        let report = enable_cloud_apis(&ctx, &with_gcloud(), &mut ui, "auditor-dev", &apis());
        assert_eq!(report.already_enabled.len(), 2);
        assert_eq!(report.enabled.len(), 5);
        assert!(report.is_complete());
    }

    #[test]
    fn declined_confirmation_runs_nothing() {
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher);
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        let report = enable_cloud_apis(&ctx, &with_gcloud(), &mut ui, "auditor-dev", &apis());
        assert!(report.declined);
        assert!(runner.calls().is_empty());
        assert_eq!(ui.prompts_shown(), &["enable_apis".to_string()]);
    }

    #[test]
    fn failed_listing_attempts_every_api() {
        let runner = ScriptedRunner::new();
        runner.respond_fail(LIST, 1, "");
        for api in apis() {
            runner.respond_ok(
                &format!("gcloud services enable {} --project=auditor-dev", api),
                "",
            );
        }
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(Path::new("."), BootstrapConfig::default(), &runner, &fetcher)
            .with_assume_yes(true);
        let mut ui = MockUI::new();

        let report = enable_cloud_apis(&ctx, &with_gcloud(), &mut ui, "auditor-dev", &apis());
        assert_eq!(report.enabled.len(), 7);
    }
}
