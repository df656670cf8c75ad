//! The `auditor-bootstrap bootstrap` command.

use crate::bootstrap::{run_bootstrap, BootstrapOptions};
use crate::context::RunContext;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Runs the full readiness checklist.
pub struct BootstrapCommand<'c, 'a> {
    ctx: &'c RunContext<'a>,
    options: BootstrapOptions,
}

impl<'c, 'a> BootstrapCommand<'c, 'a> {
    /// Create a new bootstrap command.
    pub fn new(ctx: &'c RunContext<'a>, options: BootstrapOptions) -> Self {
        Self { ctx, options }
    }
}

impl Command for BootstrapCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = run_bootstrap(self.ctx, &self.options, ui);
        let missing = report.missing_required(self.ctx);
        if !missing.is_empty() {
            ui.warning(&format!("Still missing: {}", missing.join(", ")));
        }
        Ok(CommandResult::from_code(report.exit_code(self.ctx, &self.options)))
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

    fn run(strict: bool) -> (CommandResult, MockUI) {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![]));
        let mut ui = MockUI::new();
        let options = BootstrapOptions {
            skip_install: true,
            skip_auth: true,
            skip_apis: true,
            strict,
            project_id: None,
        };
        let result = BootstrapCommand::new(&ctx, options).execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn missing_tools_are_listed() {
        let (result, ui) = run(false);
        assert!(result.success);
        assert!(ui.has_warning("Still missing: python, uv, gcloud, terraform"));
    }

    #[test]
    fn strict_mode_fails_on_missing_tools() {
        let (result, _) = run(true);
        assert_eq!(result.exit_code, 1);
    }
}
