//! The `auditor-bootstrap apis` command.

use crate::auth::check_cloud_auth;
use crate::cli::args::{ApisArgs, ApisCommand as ApisSubcommand, EnableArgs};
use crate::cloud::enable_cloud_apis;
use crate::context::RunContext;
use crate::error::Result;
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Enables Google Cloud APIs.
pub struct ApisCommand<'c, 'a> {
    ctx: &'c RunContext<'a>,
    args: ApisArgs,
}

impl<'c, 'a> ApisCommand<'c, 'a> {
    /// Create a new apis command.
    pub fn new(ctx: &'c RunContext<'a>, args: ApisArgs) -> Self {
        Self { ctx, args }
    }

    fn enable(&self, args: &EnableArgs, ui: &mut dyn UserInterface) -> CommandResult {
        let snapshot = EnvironmentSnapshot::capture(self.ctx, &["gcloud"]);
        if !snapshot.has_tool("gcloud") {
            ui.error("gcloud is not installed");
            return CommandResult::failure(1);
        }

        let project_id = args
            .project_id
            .clone()
            .or_else(|| check_cloud_auth(self.ctx, &snapshot).project_id);
        let Some(project_id) = project_id else {
            ui.error("No project id: pass --project-id or run 'gcloud config set project <id>'");
            return CommandResult::failure(1);
        };

        let apis = if args.api.is_empty() {
            &self.ctx.config.cloud.apis
        } else {
            &args.api
        };
        let report = enable_cloud_apis(self.ctx, &snapshot, ui, &project_id, apis);
        if report.declined {
            return CommandResult::failure(1);
        }
        if report.is_complete() {
            ui.success(&format!(
                "{} APIs enabled on {} ({} already on)",
                report.enabled.len(),
                project_id,
                report.already_enabled.len()
            ));
            CommandResult::success()
        } else {
            CommandResult::failure(1)
        }
    }
}

impl Command for ApisCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            ApisSubcommand::Enable(args) => Ok(self.enable(args, ui)),
        }
    }
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

    fn enable_args(project_id: Option<&str>, apis: &[&str]) -> ApisArgs {
        ApisArgs {
            command: ApisSubcommand::Enable(EnableArgs {
                project_id: project_id.map(str::to_string),
                api: apis.iter().map(|a| a.to_string()).collect(),
            }),
        }
    }

    #[test]
    fn missing_gcloud_fails() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![]));
        let mut ui = MockUI::new();

        let result = ApisCommand::new(&ctx, enable_args(Some("auditor-dev"), &[]))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("gcloud is not installed"));
    }

    #[cfg(unix)]
    #[test]
    fn enables_only_requested_apis() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let gcloud_path = temp.path().join("gcloud");
        std::fs::write(&gcloud_path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&gcloud_path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let gcloud = gcloud_path.display().to_string();

        let runner = ScriptedRunner::new();
        runner.respond_ok(
            &format!("{} services list --enabled --project=auditor-dev --format=json", gcloud),
            "[]",
        );
        runner.respond_ok(
            &format!("{} services enable run.googleapis.com --project=auditor-dev", gcloud),
            "",
        );
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![temp.path().to_path_buf()]))
            .with_assume_yes(true);
        let mut ui = MockUI::new();

        let result = ApisCommand::new(&ctx, enable_args(Some("auditor-dev"), &["run.googleapis.com"]))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_success("1 APIs enabled on auditor-dev"));
        assert_eq!(
            runner
                .calls()
                .iter()
                .filter(|c| c.contains("services enable"))
                .count(),
            1
        );
    }
}
