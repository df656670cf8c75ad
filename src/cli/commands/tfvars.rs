//! The `auditor-bootstrap tfvars` command.

use std::path::PathBuf;

use crate::cli::args::{TfvarsArgs, TfvarsCommand as TfvarsSubcommand};
use crate::context::RunContext;
use crate::error::Result;
use crate::tfvars::{parse_assignment, update_vars, DeploymentVars, TfvarsDocument};
use crate::ui::{Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Reads, validates and updates the deployment variables file.
pub struct TfvarsCommand<'c, 'a> {
    ctx: &'c RunContext<'a>,
    args: TfvarsArgs,
}

impl<'c, 'a> TfvarsCommand<'c, 'a> {
    /// Create a new tfvars command.
    pub fn new(ctx: &'c RunContext<'a>, args: TfvarsArgs) -> Self {
        Self { ctx, args }
    }

    fn path(&self) -> PathBuf {
        match &self.args.file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => self.ctx.project_root.join(file),
            None => self.ctx.project_path(&self.ctx.config.tfvars.path),
        }
    }

    fn load(&self, ui: &mut dyn UserInterface) -> Result<Option<TfvarsDocument>> {
        let path = self.path();
        if !path.exists() {
            ui.error(&format!("{} not found", path.display()));
            return Ok(None);
        }
        TfvarsDocument::load(&path).map(Some)
    }

    fn show(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(doc) = self.load(ui)? else {
            return Ok(CommandResult::failure(1));
        };
        let mut table = Table::new(&["Variable", "Value"]);
        for entry in doc.entries() {
            table.add_row(&[entry.key.clone(), entry.value.display()]);
        }
        ui.show_header(&doc.path().display().to_string());
        ui.message(&table.render());
        Ok(CommandResult::success())
    }

    fn check(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(doc) = self.load(ui)? else {
            return Ok(CommandResult::failure(1));
        };
        let issues = DeploymentVars::from_document(&doc).validate();
        if issues.is_empty() {
            ui.success(&format!("{} looks complete", doc.path().display()));
            return Ok(CommandResult::success());
        }
        for issue in &issues {
            ui.warning(&issue.to_string());
        }
        ui.show_hint("Fix them with 'auditor-bootstrap tfvars set KEY=VALUE'");
        Ok(CommandResult::failure(1))
    }

    fn set(&self, assignments: &[String], ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let parsed = assignments
            .iter()
            .map(|a| parse_assignment(a))
            .collect::<Result<Vec<_>>>()?;
        let path = self.path();
        let changed = update_vars(&path, &parsed)?;
        if changed.is_empty() {
            ui.message("No changes");
        } else {
            ui.success(&format!("Updated {} in {}", changed.join(", "), path.display()));
        }
        Ok(CommandResult::success())
    }
}

impl Command for TfvarsCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &self.args.command {
            TfvarsSubcommand::Show => self.show(ui),
            TfvarsSubcommand::Check => self.check(ui),
            TfvarsSubcommand::Set { assignments } => self.set(assignments, ui),
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
    use std::path::Path;
    use tempfile::TempDir;

    const COMPLETE: &str = r#"project_name = "lighthouse-auditor"
prod_project_id = "auditor-prod"
staging_project_id = "auditor-staging"
cicd_runner_project_id = "auditor-cicd"
region = "us-central1"
repository_name = "lighthouse-auditor"
"#;

    fn run(root: &Path, command: TfvarsSubcommand) -> (CommandResult, MockUI) {
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(root, BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![]));
        let mut ui = MockUI::new();
        let result = TfvarsCommand::new(&ctx, TfvarsArgs { file: None, command })
            .execute(&mut ui)
            .unwrap();
        (result, ui)
    }

    fn write_vars(root: &Path, text: &str) -> PathBuf {
        let path = root.join("deployment/terraform/vars/env.tfvars");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let (result, ui) = run(temp.path(), TfvarsSubcommand::Show);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("not found"));
    }

    #[test]
    fn check_passes_for_complete_file() {
        let temp = TempDir::new().unwrap();
        write_vars(temp.path(), COMPLETE);
        let (result, ui) = run(temp.path(), TfvarsSubcommand::Check);
        assert!(result.success);
        assert!(ui.has_success("looks complete"));
    }

    #[test]
    fn check_reports_placeholders() {
        let temp = TempDir::new().unwrap();
        write_vars(
            temp.path(),
            &COMPLETE.replace("auditor-prod", "your-prod-project-id"),
        );
        let (result, ui) = run(temp.path(), TfvarsSubcommand::Check);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_warning("prod_project_id"));
    }

    #[test]
    fn set_updates_in_place() {
        let temp = TempDir::new().unwrap();
        let path = write_vars(temp.path(), COMPLETE);
        let (result, ui) = run(
            temp.path(),
            TfvarsSubcommand::Set {
                assignments: vec!["region=europe-west1".to_string()],
            },
        );
        assert!(result.success);
        assert!(ui.has_success("Updated region"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("region = \"europe-west1\""));
        assert!(text.starts_with("project_name = \"lighthouse-auditor\"\n"));
    }

    #[test]
    fn show_lists_every_variable() {
        let temp = TempDir::new().unwrap();
        write_vars(temp.path(), COMPLETE);
        let (result, ui) = run(temp.path(), TfvarsSubcommand::Show);
        assert!(result.success);
        assert!(ui.has_message("cicd_runner_project_id"));
        assert!(ui.has_message("auditor-staging"));
    }
}
