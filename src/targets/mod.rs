//! Developer targets: installing, testing, linting and launching the app.
//!
//! Each target returns a process exit code. Command lines come from the
//! `targets:` config section so a project can override any of them.

use std::fmt;

use crate::context::RunContext;
use crate::error::BootstrapError;
use crate::project::{install_dependencies, install_node_deps, local_lighthouse};
use crate::requirements::install_tool_if_missing;
use crate::shell::Invocation;
use crate::snapshot::{EnvironmentSnapshot, AUDIT_TOOLS};
use crate::ui::UserInterface;

/// Environment variable `setup-dev-env` deploys to.
pub const PROJECT_ID_VAR: &str = "PROJECT_ID";

/// The developer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    CheckDeps,
    InstallNodeDeps,
    Install,
    Test,
    Playground,
    Backend,
    Ui,
    SetupDevEnv,
    Lint,
}

impl Target {
    /// Every target, in help order.
    pub const ALL: [Target; 9] = [
        Target::CheckDeps,
        Target::InstallNodeDeps,
        Target::Install,
        Target::Test,
        Target::Playground,
        Target::Backend,
        Target::Ui,
        Target::SetupDevEnv,
        Target::Lint,
    ];

    /// Command-line name.
    pub fn name(&self) -> &'static str {
        match self {
            Target::CheckDeps => "check-deps",
            Target::InstallNodeDeps => "install-node-deps",
            Target::Install => "install",
            Target::Test => "test",
            Target::Playground => "playground",
            Target::Backend => "backend",
            Target::Ui => "ui",
            Target::SetupDevEnv => "setup-dev-env",
            Target::Lint => "lint",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run a target and return its exit code.
pub fn run_target(target: Target, ctx: &RunContext<'_>, ui: &mut dyn UserInterface) -> i32 {
    tracing::debug!(target = %target, "running target");
    match target {
        Target::CheckDeps => check_deps(ctx, ui),
        Target::InstallNodeDeps => install_node(ctx, ui),
        Target::Install => install(ctx, ui),
        Target::Test => run_sequence(ctx, ui, &ctx.config.targets.test),
        Target::Playground => playground(ctx, ui),
        Target::Backend => run_foreground(ctx, ui, &ctx.config.targets.backend),
        Target::Ui => run_foreground(ctx, ui, &ctx.config.targets.ui),
        Target::SetupDevEnv => {
            let project_id = std::env::var(PROJECT_ID_VAR).ok();
            setup_dev_env(ctx, ui, project_id.as_deref())
        }
        Target::Lint => run_sequence(ctx, ui, &ctx.config.targets.lint),
    }
}

/// Check the tools Lighthouse audits need.
///
/// Missing tools print their install guidance. Exits 1 when any is missing.
pub fn check_deps(ctx: &RunContext<'_>, ui: &mut dyn UserInterface) -> i32 {
    let snapshot = EnvironmentSnapshot::capture(ctx, &AUDIT_TOOLS);
    let mut missing = 0;

    for name in AUDIT_TOOLS {
        match snapshot.tool(name) {
            Some(tool) if tool.installed => ui.success(&format!(
                "{} {}",
                name,
                tool.version_line().unwrap_or("(version unknown)")
            )),
            _ => {
                missing += 1;
                let guidance = ctx
                    .registry
                    .get(name)
                    .map(|spec| spec.guidance(ctx.platform))
                    .unwrap_or_else(|| format!("{} is not installed.", name));
                ui.message(&guidance);
            }
        }
    }

    if !local_lighthouse(ctx).exists() {
        ui.warning("Lighthouse is not installed locally; run 'auditor-bootstrap install-node-deps'");
    }

    if missing > 0 {
        1
    } else {
        0
    }
}

fn install_node(ctx: &RunContext<'_>, ui: &mut dyn UserInterface) -> i32 {
    let snapshot = EnvironmentSnapshot::capture(ctx, &["node", "npm"]);
    if install_node_deps(ctx, &snapshot, ui) {
        0
    } else {
        1
    }
}

fn install(ctx: &RunContext<'_>, ui: &mut dyn UserInterface) -> i32 {
    let snapshot = EnvironmentSnapshot::capture(ctx, &["uv", "node", "npm"]);
    let (snapshot, _) = install_tool_if_missing("uv", snapshot, ctx, ui);
    let python = install_dependencies(ctx, &snapshot, ui);
    let node = install_node_deps(ctx, &snapshot, ui);
    if python && node {
        0
    } else {
        1
    }
}

fn attached(ctx: &RunContext<'_>, ui: &mut dyn UserInterface, line: &str) -> Option<Invocation> {
    let invocation = ctx.command_line(line).map(Invocation::interactive);
    if invocation.is_none() {
        ui.error("Empty command line in targets configuration");
    }
    invocation
}

fn exit_code_of(ctx: &RunContext<'_>, ui: &mut dyn UserInterface, invocation: &Invocation) -> i32 {
    match ctx.runner.run(invocation) {
        Ok(result) if result.success => 0,
        Ok(result) => result.exit_code.unwrap_or(1),
        Err(e @ BootstrapError::CommandFailed { code: None, .. }) => {
            ui.error(&format!("{} (is {} installed?)", e, invocation.program));
            127
        }
        Err(e) => {
            ui.error(&e.to_string());
            1
        }
    }
}

/// Run command lines in order, stopping at the first failure.
fn run_sequence(ctx: &RunContext<'_>, ui: &mut dyn UserInterface, lines: &[String]) -> i32 {
    for line in lines {
        let Some(invocation) = attached(ctx, ui, line) else {
            return 1;
        };
        ui.message(&format!("$ {}", line));
        let code = exit_code_of(ctx, ui, &invocation);
        if code != 0 {
            return code;
        }
    }
    0
}

/// Run one long-lived command attached to the terminal, without a timeout.
fn run_foreground(ctx: &RunContext<'_>, ui: &mut dyn UserInterface, line: &str) -> i32 {
    match attached(ctx, ui, line) {
        Some(invocation) => {
            ui.message(&format!("$ {}", line));
            exit_code_of(ctx, ui, &invocation)
        }
        None => 1,
    }
}

/// Start the backend and the UI side by side and wait for both.
fn playground(ctx: &RunContext<'_>, ui: &mut dyn UserInterface) -> i32 {
    let lines = [&ctx.config.targets.backend, &ctx.config.targets.ui];
    let mut invocations = Vec::new();
    for line in lines {
        let Some(invocation) = attached(ctx, ui, line) else {
            return 1;
        };
        ui.message(&format!("$ {} &", line));
        invocations.push(invocation);
    }

    let results = ctx.runner.run_all(&invocations);
    if results.iter().all(|r| r.success) {
        0
    } else {
        1
    }
}

/// Deploy the dev environment with Terraform.
///
/// Without a project id nothing is run and the exit code is 1.
pub fn setup_dev_env(
    ctx: &RunContext<'_>,
    ui: &mut dyn UserInterface,
    project_id: Option<&str>,
) -> i32 {
    let Some(project_id) = project_id.filter(|p| !p.trim().is_empty()) else {
        let err = BootstrapError::MissingEnvVar {
            name: PROJECT_ID_VAR.to_string(),
        };
        ui.error(&format!("Error: {}", err));
        return 1;
    };

    let dir = ctx.project_path(&ctx.config.targets.terraform_dir);
    let terraform = ctx
        .locator
        .find("terraform")
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "terraform".to_string());

    let init = Invocation::new(terraform.clone())
        .arg("init")
        .cwd(&dir)
        .interactive()
        .timeout(ctx.terraform_timeout());
    let apply = Invocation::new(terraform)
        .args([
            "apply".to_string(),
            "--var-file".to_string(),
            ctx.config.targets.terraform_var_file.clone(),
            "--var".to_string(),
            format!("dev_project_id={}", project_id),
            "--auto-approve".to_string(),
        ])
        .cwd(&dir)
        .interactive()
        .timeout(ctx.terraform_timeout());

    for invocation in [init, apply] {
        ui.message(&format!("$ {}", invocation.display()));
        let code = exit_code_of(ctx, ui, &invocation);
        if code != 0 {
            return code;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;
    use crate::requirements::fetch::StaticScript;
    use crate::requirements::probe::ToolLocator;
    use crate::requirements::CHROMIUM_GUIDANCE;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use std::path::Path;
    use tempfile::TempDir;

    fn context<'a>(
        root: &Path,
        runner: &'a ScriptedRunner,
        fetcher: &'a StaticScript,
    ) -> RunContext<'a> {
        RunContext::new(root, BootstrapConfig::default(), runner, fetcher)
            .with_locator(ToolLocator::new(vec![root.to_path_buf()]))
    }

    #[test]
    fn target_names_match_cli() {
        let names: Vec<&str> = Target::ALL.iter().map(Target::name).collect();
        assert_eq!(
            names,
            vec![
                "check-deps",
                "install-node-deps",
                "install",
                "test",
                "playground",
                "backend",
                "ui",
                "setup-dev-env",
                "lint"
            ]
        );
    }

    #[test]
    fn setup_dev_env_requires_project_id() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(setup_dev_env(&ctx, &mut ui, None), 1);
        assert_eq!(setup_dev_env(&ctx, &mut ui, Some("  ")), 1);
        assert!(ui.has_error("Error: PROJECT_ID environment variable is not set"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn setup_dev_env_runs_init_then_apply() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_ok("terraform init", "");
        runner.respond_ok(
            "terraform apply --var-file vars/env.tfvars --var dev_project_id=auditor-dev --auto-approve",
            "",
        );
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(setup_dev_env(&ctx, &mut ui, Some("auditor-dev")), 0);
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(runner.calls()[0], "terraform init");
        assert!(runner.invocations().iter().all(|i| i.timeout.is_none()));
    }

    #[test]
    fn terraform_timeout_is_opt_in() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_ok("terraform init", "");
        runner.respond_ok(
            "terraform apply --var-file vars/env.tfvars --var dev_project_id=auditor-dev --auto-approve",
            "",
        );
        let fetcher = StaticScript::unreachable();
        let mut config = BootstrapConfig::default();
        config.timeouts.terraform_secs = 3600;
        let ctx = RunContext::new(temp.path(), config, &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![temp.path().to_path_buf()]));
        let mut ui = MockUI::new();

        assert_eq!(setup_dev_env(&ctx, &mut ui, Some("auditor-dev")), 0);
        let apply = &runner.invocations()[1];
        assert_eq!(apply.args[0], "apply");
        assert_eq!(apply.timeout, Some(std::time::Duration::from_secs(3600)));
    }

    #[test]
    fn failed_init_skips_apply() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_fail("terraform init", 1, "backend error");
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(setup_dev_env(&ctx, &mut ui, Some("auditor-dev")), 1);
        assert!(!runner.was_called("terraform apply"));
    }

    #[test]
    fn check_deps_prints_chromium_guidance_verbatim() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(check_deps(&ctx, &mut ui), 1);
        assert!(ui.messages().iter().any(|m| m == CHROMIUM_GUIDANCE));
        assert!(ui.has_warning("Lighthouse is not installed locally"));
    }

    #[test]
    fn lint_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_ok("uv run codespell", "");
        runner.respond_fail("uv run ruff check . --diff", 1, "E501");
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(run_target(Target::Lint, &ctx, &mut ui), 1);
        assert_eq!(runner.calls().len(), 2);
        assert!(!runner.was_called("uv run mypy"));
    }

    #[test]
    fn test_target_runs_unit_then_integration() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_ok("uv run pytest tests/unit", "");
        runner.respond_ok("uv run pytest tests/integration", "");
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(run_target(Target::Test, &ctx, &mut ui), 0);
        assert_eq!(
            runner.calls(),
            vec![
                "uv run pytest tests/unit".to_string(),
                "uv run pytest tests/integration".to_string()
            ]
        );
    }

    #[test]
    fn backend_propagates_exit_code() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_fail(
            "uv run uvicorn app.server:app --host 0.0.0.0 --port 8000 --reload",
            3,
            "",
        );
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(run_target(Target::Backend, &ctx, &mut ui), 3);
    }

    #[test]
    fn missing_program_exits_127() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(run_target(Target::Ui, &ctx, &mut ui), 127);
        assert!(ui.has_error("is uv installed?"));
    }

    #[test]
    fn playground_starts_both_processes() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let config = BootstrapConfig::default();
        runner.respond_ok(&config.targets.backend, "");
        runner.respond_ok(&config.targets.ui, "");
        let fetcher = StaticScript::unreachable();
        let ctx = context(temp.path(), &runner, &fetcher);
        let mut ui = MockUI::new();

        assert_eq!(run_target(Target::Playground, &ctx, &mut ui), 0);
        assert_eq!(runner.calls().len(), 2);
    }
}
