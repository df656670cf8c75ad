//! Developer targets: `check-deps`, `install`, `test`, `lint` and friends.

use crate::context::RunContext;
use crate::error::Result;
use crate::targets::{run_target, setup_dev_env, Target};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Runs one developer target.
pub struct TargetCommand<'c, 'a> {
    ctx: &'c RunContext<'a>,
    target: Target,
    project_id: Option<String>,
}

impl<'c, 'a> TargetCommand<'c, 'a> {
    /// Create a new target command.
    pub fn new(ctx: &'c RunContext<'a>, target: Target) -> Self {
        Self {
            ctx,
            target,
            project_id: None,
        }
    }

    /// Project id for `setup-dev-env`, already read from `PROJECT_ID` by clap.
    pub fn with_project_id(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }
}

impl Command for TargetCommand<'_, '_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let code = match self.target {
            Target::SetupDevEnv => setup_dev_env(self.ctx, ui, self.project_id.as_deref()),
            target => run_target(target, self.ctx, ui),
        };
        Ok(CommandResult::from_code(code))
    }
}
