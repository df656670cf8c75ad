//! The `auditor-bootstrap status` command.
//!
//! Reports what is installed and logged in without changing anything.

use crate::bootstrap::{summary_table, BootstrapReport};
use crate::context::RunContext;
use crate::error::Result;
use crate::project::local_lighthouse;
use crate::snapshot::{EnvironmentSnapshot, AUDIT_TOOLS};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand<'c, 'a> {
    ctx: &'c RunContext<'a>,
}

impl<'c, 'a> StatusCommand<'c, 'a> {
    /// Create a new status command.
    pub fn new(ctx: &'c RunContext<'a>) -> Self {
        Self { ctx }
    }
}

impl Command for StatusCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let snapshot = EnvironmentSnapshot::capture_full(self.ctx);

        ui.show_header("Environment");
        snapshot.project().report(ui);

        if let Some(project) = snapshot.cloud_auth().and_then(|c| c.project_id.as_deref()) {
            ui.message(&format!("Active project: {}", project));
        }

        let report = BootstrapReport {
            snapshot,
            dependencies_installed: None,
            apis: None,
        };
        let mut table = summary_table(self.ctx, &report);
        for name in AUDIT_TOOLS {
            let tool = report.snapshot.tool(name);
            let status = if tool.is_some_and(|t| t.installed) {
                "ok"
            } else {
                "missing"
            };
            table.add_row(&[name, status, tool.and_then(|t| t.version_line()).unwrap_or("")]);
        }
        let lighthouse = if local_lighthouse(self.ctx).exists() {
            "ok"
        } else {
            "missing"
        };
        table.add_row(&["lighthouse (node_modules)", lighthouse, ""]);

        ui.message(&table.render());
        Ok(CommandResult::success())
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

    #[test]
    fn status_runs_no_commands_without_tools() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![]));
        let mut ui = MockUI::new();

        let result = StatusCommand::new(&ctx).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(runner.calls().is_empty());
        assert!(ui.has_message("chromium"));
        assert!(ui.has_message("lighthouse (node_modules)"));
    }
}
