//! Library integration tests.

use auditor_bootstrap::bootstrap::{run_bootstrap, BootstrapOptions};
use auditor_bootstrap::config::BootstrapConfig;
use auditor_bootstrap::context::RunContext;
use auditor_bootstrap::requirements::probe::ToolLocator;
use auditor_bootstrap::requirements::StaticScript;
use auditor_bootstrap::shell::ScriptedRunner;
use auditor_bootstrap::targets::{run_target, Target};
use auditor_bootstrap::tfvars::{update_vars, DeploymentVars, TfvarsDocument};
use auditor_bootstrap::ui::MockUI;
use auditor_bootstrap::BootstrapError;
use tempfile::TempDir;

#[test]
fn error_types_are_public() {
    let err = BootstrapError::MissingEnvVar {
        name: "PROJECT_ID".into(),
    };
    assert_eq!(err.to_string(), "PROJECT_ID environment variable is not set");
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> auditor_bootstrap::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use auditor_bootstrap::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["auditor-bootstrap", "--yes", "bootstrap", "--skip-apis"]);
    assert!(cli.yes);
    match cli.command {
        Some(Commands::Bootstrap(args)) => assert!(args.skip_apis),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn target_names_are_stable() {
    let names: Vec<&str> = Target::ALL.iter().map(|t| t.name()).collect();
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
            "lint",
        ]
    );
}

#[test]
fn bootstrap_on_bare_machine_reports_every_section() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("pyproject.toml"), "[project]\n").unwrap();
    let runner = ScriptedRunner::new();
    let fetcher = StaticScript::unreachable();
    let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
        .with_locator(ToolLocator::new(vec![]));
    let mut ui = MockUI::new();

    let options = BootstrapOptions {
        skip_install: true,
        ..Default::default()
    };
    let report = run_bootstrap(&ctx, &options, &mut ui);

    assert!(ui.headers().iter().any(|h| h == "Summary"));
    assert!(!report.missing_required(&ctx).is_empty());
    assert_eq!(report.exit_code(&ctx, &options), 0);
    assert!(runner.calls().is_empty());
}

#[test]
fn backend_target_runs_configured_command() {
    let temp = TempDir::new().unwrap();
    let runner = ScriptedRunner::new();
    let mut config = BootstrapConfig::default();
    config.targets.backend = "uv run uvicorn app.server:app --port 9000".to_string();
    runner.respond_ok("uv run uvicorn app.server:app --port 9000", "");
    let fetcher = StaticScript::unreachable();
    let ctx = RunContext::new(temp.path(), config, &runner, &fetcher)
        .with_locator(ToolLocator::new(vec![]));
    let mut ui = MockUI::new();

    assert_eq!(run_target(Target::Backend, &ctx, &mut ui), 0);
    assert_eq!(runner.calls(), vec!["uv run uvicorn app.server:app --port 9000"]);
}

#[test]
fn tfvars_updates_round_through_validation() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("env.tfvars");
    std::fs::write(&path, "project_name = \"your-project-name\"\n").unwrap();

    update_vars(&path, &[("project_name".to_string(), "lighthouse-auditor".to_string())]).unwrap();

    let doc = TfvarsDocument::load(&path).unwrap();
    let issues = DeploymentVars::from_document(&doc).validate();
    assert!(!issues.iter().any(|i| i.key == "project_name"));
    assert!(issues.iter().any(|i| i.key == "region"));
}
