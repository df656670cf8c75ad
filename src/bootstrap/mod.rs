//! The readiness checklist.
//!
//! Runs every check in a fixed order, offers the fixes that can be
//! automated, and finishes with a summary table. A failed step never stops
//! the run; steps that depend on a missing tool report it and move on.

use crate::auth::{
    authenticate_cloud, authenticate_git, check_cloud_auth, check_git_auth, GitLoginMethod,
};
use crate::cloud::{enable_cloud_apis, ApiReport};
use crate::context::RunContext;
use crate::project::{ensure_virtual_environment, inspect_venv, install_dependencies, VenvState};
use crate::requirements::{install_tool_if_missing, InstallOutcome};
use crate::snapshot::{EnvironmentSnapshot, BOOTSTRAP_TOOLS};
use crate::ui::{confirm, Prompt, PromptOption, PromptType, Table, UserInterface};

/// Which parts of the checklist to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Skip uv install, venv creation and the dependency sync
    pub skip_install: bool,
    /// Skip login offers
    pub skip_auth: bool,
    /// Skip API enablement
    pub skip_apis: bool,
    /// Exit 1 when a required tool is missing
    pub strict: bool,
    /// Project to enable APIs on; defaults to the gcloud active project
    pub project_id: Option<String>,
}

/// Everything the checklist found and did.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// Final state of the environment
    pub snapshot: EnvironmentSnapshot,
    /// Whether the dependency sync ran and succeeded
    pub dependencies_installed: Option<bool>,
    /// API enablement result, if attempted
    pub apis: Option<ApiReport>,
}

impl BootstrapReport {
    /// Required tools that are still missing.
    pub fn missing_required(&self, ctx: &RunContext<'_>) -> Vec<String> {
        BOOTSTRAP_TOOLS
            .into_iter()
            .filter(|name| ctx.registry.get(name).is_some_and(|s| s.required))
            .filter(|name| !self.snapshot.has_tool(name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Process exit code for these options.
    pub fn exit_code(&self, ctx: &RunContext<'_>, options: &BootstrapOptions) -> i32 {
        if options.strict && !self.missing_required(ctx).is_empty() {
            1
        } else {
            0
        }
    }
}

fn report_tool(ctx: &RunContext<'_>, snapshot: &EnvironmentSnapshot, name: &str, ui: &mut dyn UserInterface) {
    match snapshot.tool(name) {
        Some(tool) if tool.installed => ui.success(&format!(
            "{} found: {}",
            name,
            tool.version_line().unwrap_or("version unknown")
        )),
        _ => {
            let guidance = ctx
                .registry
                .get(name)
                .map(|spec| spec.guidance(ctx.platform))
                .unwrap_or_else(|| format!("{} is not installed.", name));
            ui.warning(&guidance);
        }
    }
}

/// Run the checklist.
pub fn run_bootstrap(
    ctx: &RunContext<'_>,
    options: &BootstrapOptions,
    ui: &mut dyn UserInterface,
) -> BootstrapReport {
    ui.show_header("Project layout");
    let mut snapshot = EnvironmentSnapshot::capture(ctx, &BOOTSTRAP_TOOLS);
    snapshot.project().report(ui);

    ui.show_header("Python toolchain");
    report_tool(ctx, &snapshot, "python", ui);
    if snapshot.has_tool("uv") || options.skip_install {
        report_tool(ctx, &snapshot, "uv", ui);
    } else {
        let (next, outcome) = install_tool_if_missing("uv", snapshot, ctx, ui);
        snapshot = next;
        if outcome == InstallOutcome::Declined {
            ui.warning("Continuing without uv; the environment and dependencies will be skipped");
        }
    }

    let venv = if options.skip_install {
        inspect_venv(ctx, &snapshot)
    } else {
        ensure_virtual_environment(ctx, &snapshot, ui)
    };
    snapshot = snapshot.with_venv(venv);

    let dependencies_installed = if options.skip_install {
        None
    } else {
        Some(install_dependencies(ctx, &snapshot, ui))
    };

    ui.show_header("Google Cloud");
    report_tool(ctx, &snapshot, "gcloud", ui);
    snapshot = cloud_login(ctx, snapshot, options, ui);

    ui.show_header("Deployment tools");
    report_tool(ctx, &snapshot, "terraform", ui);
    report_tool(ctx, &snapshot, "gh", ui);
    snapshot = git_login(ctx, snapshot, options, ui);

    let apis = if options.skip_apis {
        None
    } else {
        ui.show_header("Cloud APIs");
        api_step(ctx, &snapshot, options, ui)
    };

    let report = BootstrapReport {
        snapshot,
        dependencies_installed,
        apis,
    };
    ui.show_header("Summary");
    ui.message(&summary_table(ctx, &report).render());
    report
}

fn cloud_login(
    ctx: &RunContext<'_>,
    snapshot: EnvironmentSnapshot,
    options: &BootstrapOptions,
    ui: &mut dyn UserInterface,
) -> EnvironmentSnapshot {
    let mut state = check_cloud_auth(ctx, &snapshot);
    if snapshot.has_tool("gcloud") && !state.authenticated && !options.skip_auth && ui.is_interactive() {
        let prompt = Prompt::confirm("gcloud_login", "Log in to Google Cloud now?", true);
        if confirm(ui, &prompt) && authenticate_cloud(ctx, &snapshot, ui) {
            state = check_cloud_auth(ctx, &snapshot);
        }
    }

    match (state.authenticated, &state.account) {
        (true, Some(account)) => ui.success(&format!("Logged in to Google Cloud as {}", account)),
        (true, None) => ui.success("Logged in to Google Cloud"),
        (false, _) if snapshot.has_tool("gcloud") => {
            ui.warning("Not logged in to Google Cloud");
            ui.show_hint("Run 'gcloud auth login --update-adc'");
        }
        (false, _) => {}
    }
    if let Some(project) = &state.project_id {
        ui.message(&format!("Active project: {}", project));
    }
    if state.adc_present {
        ui.success("Application default credentials found");
    } else {
        ui.warning("Application default credentials not found");
        ui.show_hint("Run 'gcloud auth application-default login'");
    }
    snapshot.with_cloud_auth(state)
}

fn git_login(
    ctx: &RunContext<'_>,
    snapshot: EnvironmentSnapshot,
    options: &BootstrapOptions,
    ui: &mut dyn UserInterface,
) -> EnvironmentSnapshot {
    let mut state = check_git_auth(ctx, &snapshot);
    if snapshot.has_tool("gh") && !state.authenticated && !options.skip_auth && ui.is_interactive() {
        if let Some(method) = choose_git_login(ui) {
            if authenticate_git(ctx, &snapshot, ui, method) {
                state = check_git_auth(ctx, &snapshot);
            }
        }
    }

    if state.authenticated {
        ui.success(&format!(
            "Logged in to GitHub{}",
            state
                .account
                .as_deref()
                .map(|a| format!(" as {}", a))
                .unwrap_or_default()
        ));
    } else if snapshot.has_tool("gh") {
        ui.warning("Not logged in to GitHub");
        ui.show_hint("Run 'gh auth login'");
    }
    snapshot.with_git_auth(state)
}

fn choose_git_login(ui: &mut dyn UserInterface) -> Option<GitLoginMethod> {
    let prompt = Prompt {
        key: "gh_login".to_string(),
        question: "Log in to GitHub?".to_string(),
        prompt_type: PromptType::Select {
            options: vec![
                PromptOption {
                    label: "Browser".to_string(),
                    value: "browser".to_string(),
                },
                PromptOption {
                    label: "Personal access token".to_string(),
                    value: "token".to_string(),
                },
                PromptOption {
                    label: "Skip".to_string(),
                    value: "skip".to_string(),
                },
            ],
        },
        default: Some("browser".to_string()),
    };
    let choice = ui.prompt(&prompt).ok()?.as_string();
    match choice.as_str() {
        "browser" => Some(GitLoginMethod::Browser),
        "token" => {
            let token_prompt = Prompt {
                key: "gh_token".to_string(),
                question: "GitHub token".to_string(),
                prompt_type: PromptType::Password,
                default: None,
            };
            let token = ui.prompt(&token_prompt).ok()?.as_string();
            let token = token.trim();
            (!token.is_empty()).then(|| GitLoginMethod::Token(token.to_string()))
        }
        _ => None,
    }
}

fn api_step(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    options: &BootstrapOptions,
    ui: &mut dyn UserInterface,
) -> Option<ApiReport> {
    let project_id = options
        .project_id
        .clone()
        .or_else(|| snapshot.cloud_auth().and_then(|s| s.project_id.clone()));
    let Some(project_id) = project_id else {
        ui.warning("No project id known; skipping API enablement");
        ui.show_hint("Pass --project-id or run 'gcloud config set project <id>'");
        return None;
    };
    if !snapshot.has_tool("gcloud") {
        ui.warning("Skipping API enablement: gcloud is not installed");
        return None;
    }
    Some(enable_cloud_apis(
        ctx,
        snapshot,
        ui,
        &project_id,
        &ctx.config.cloud.apis,
    ))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "ok"
    } else {
        "missing"
    }
}

/// Summary of a report as a table.
pub fn summary_table(ctx: &RunContext<'_>, report: &BootstrapReport) -> Table {
    let snapshot = &report.snapshot;
    let mut table = Table::new(&["Check", "Status", "Details"]);

    for name in BOOTSTRAP_TOOLS {
        let tool = snapshot.tool(name);
        let installed = tool.is_some_and(|t| t.installed);
        let required = ctx.registry.get(name).map_or(true, |s| s.required);
        let status = match (installed, required) {
            (true, _) => "ok",
            (false, true) => "missing",
            (false, false) => "optional",
        };
        let details = tool.and_then(|t| t.version_line()).unwrap_or("");
        table.add_row(&[name, status, details]);
    }

    let venv = match snapshot.venv() {
        Some(VenvState::Present { .. }) => ("ok", String::new()),
        Some(VenvState::Created) => ("ok", "created".to_string()),
        Some(VenvState::Absent { reason }) => ("missing", reason.clone()),
        Some(VenvState::CreationFailed { message }) => ("failed", message.clone()),
        None => ("unknown", String::new()),
    };
    table.add_row(&["virtual environment", venv.0, venv.1.as_str()]);

    if let Some(installed) = report.dependencies_installed {
        table.add_row(&["dependencies", if installed { "ok" } else { "failed" }, ""]);
    }

    if let Some(cloud) = snapshot.cloud_auth() {
        table.add_row(&[
            "gcloud auth",
            yes_no(cloud.authenticated),
            cloud.account.as_deref().unwrap_or(""),
        ]);
        table.add_row(&["application default credentials", yes_no(cloud.adc_present), ""]);
    }
    if let Some(git) = snapshot.git_auth() {
        table.add_row(&[
            "gh auth",
            yes_no(git.authenticated),
            git.account.as_deref().unwrap_or(""),
        ]);
    }
    if let Some(apis) = &report.apis {
        let status = if apis.declined {
            "skipped"
        } else if apis.is_complete() {
            "ok"
        } else {
            "failed"
        };
        let details = format!(
            "{} enabled, {} already on",
            apis.enabled.len(),
            apis.already_enabled.len()
        );
        table.add_row(&["cloud APIs", status, details.as_str()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;
    use crate::requirements::fetch::StaticScript;
    use crate::requirements::probe::ToolLocator;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn empty_machine_runs_every_step_without_commands() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![temp.path().to_path_buf()]));
        let mut ui = MockUI::new();
        let options = BootstrapOptions {
            skip_install: true,
            ..Default::default()
        };

        let report = run_bootstrap(&ctx, &options, &mut ui);
        assert!(runner.calls().is_empty());
        assert_eq!(
            ui.headers(),
            &[
                "Project layout",
                "Python toolchain",
                "Google Cloud",
                "Deployment tools",
                "Cloud APIs",
                "Summary"
            ]
        );
        assert!(ui.has_warning("No project id known"));
        assert!(report.apis.is_none());
        assert!(ui.messages().iter().any(|m| m.contains("virtual environment")));
    }

    #[test]
    fn strict_mode_fails_on_missing_required_tools() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![temp.path().to_path_buf()]));
        let mut ui = MockUI::new();
        let options = BootstrapOptions {
            skip_install: true,
            skip_apis: true,
            ..Default::default()
        };

        let report = run_bootstrap(&ctx, &options, &mut ui);
        let missing = report.missing_required(&ctx);
        assert!(missing.contains(&"uv".to_string()));
        assert!(!missing.contains(&"gh".to_string()));
        assert_eq!(report.exit_code(&ctx, &options), 0);
        let strict = BootstrapOptions {
            strict: true,
            ..options
        };
        assert_eq!(report.exit_code(&ctx, &strict), 1);
    }

    #[test]
    fn summary_lists_tools_and_auth() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![temp.path().to_path_buf()]));
        let report = BootstrapReport {
            snapshot: EnvironmentSnapshot::capture_full(&ctx),
            dependencies_installed: Some(false),
            apis: None,
        };

        let table = summary_table(&ctx, &report);
        let rendered = table.render();
        assert!(rendered.contains("terraform"));
        assert!(rendered.contains("optional"));
        assert!(rendered.contains("gcloud auth"));
        assert!(rendered.contains("dependencies"));
    }
}
