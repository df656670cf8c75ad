//! Routing from parsed arguments to subcommand implementations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bootstrap::BootstrapOptions;
use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, validate};
use crate::context::RunContext;
use crate::error::Result;
use crate::requirements::ScriptFetcher;
use crate::shell::SystemRunner;
use crate::targets::Target;
use crate::ui::UserInterface;

use super::apis::ApisCommand;
use super::auth::AuthCommand;
use super::bootstrap::BootstrapCommand;
use super::completions::CompletionsCommand;
use super::status::StatusCommand;
use super::targets::TargetCommand;
use super::tfvars::TfvarsCommand;

/// Download budget for install scripts when installs are unbounded.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// A subcommand bound to its arguments and context.
///
/// Expected failures (a missing tool, a failed target) are reported through
/// `ui` and come back as a non-zero [`CommandResult`]; `Err` is reserved for
/// problems the command could not report itself.
pub trait Command {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Outcome of a subcommand, turned into the process exit status.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Result for a process-style exit code.
    pub fn from_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::success()
        } else {
            Self::failure(exit_code)
        }
    }
}

/// Builds the run context for a project and runs one subcommand in it.
pub struct CommandDispatcher {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    assume_yes: bool,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            config_override: None,
            assume_yes: false,
        }
    }

    /// Load only this config file.
    pub fn with_config(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    /// Answer yes to every confirmation.
    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Loads and validates configuration, then runs the subcommand against
    /// real processes. `completions` needs neither.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(Commands::Completions(args)) = &cli.command {
            return CompletionsCommand::new(args.clone()).execute(ui);
        }

        let config = load_config(&self.project_root, self.config_override.as_deref())?;
        validate(&config)?;
        let fetcher = ScriptFetcher::new(config.timeouts.install().unwrap_or(DEFAULT_FETCH_TIMEOUT))?;
        let runner = SystemRunner;
        let ctx = RunContext::new(&self.project_root, config, &runner, &fetcher)
            .with_assume_yes(self.assume_yes);
        self.dispatch_in(&ctx, cli.command.as_ref(), ui)
    }

    /// Execute a subcommand against an existing context.
    pub fn dispatch_in(
        &self,
        ctx: &RunContext<'_>,
        command: Option<&Commands>,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let Some(command) = command else {
            return StatusCommand::new(ctx).execute(ui);
        };
        match command {
            Commands::CheckDeps => TargetCommand::new(ctx, Target::CheckDeps).execute(ui),
            Commands::InstallNodeDeps => {
                TargetCommand::new(ctx, Target::InstallNodeDeps).execute(ui)
            }
            Commands::Install => TargetCommand::new(ctx, Target::Install).execute(ui),
            Commands::Test => TargetCommand::new(ctx, Target::Test).execute(ui),
            Commands::Playground => TargetCommand::new(ctx, Target::Playground).execute(ui),
            Commands::Backend => TargetCommand::new(ctx, Target::Backend).execute(ui),
            Commands::Ui => TargetCommand::new(ctx, Target::Ui).execute(ui),
            Commands::SetupDevEnv(args) => TargetCommand::new(ctx, Target::SetupDevEnv)
                .with_project_id(args.project_id.clone())
                .execute(ui),
            Commands::Lint => TargetCommand::new(ctx, Target::Lint).execute(ui),
            Commands::Bootstrap(args) => {
                let options = BootstrapOptions {
                    skip_install: args.skip_install,
                    skip_auth: args.skip_auth,
                    skip_apis: args.skip_apis,
                    strict: args.strict,
                    project_id: args.project_id.clone(),
                };
                BootstrapCommand::new(ctx, options).execute(ui)
            }
            Commands::Status => StatusCommand::new(ctx).execute(ui),
            Commands::Auth(args) => AuthCommand::new(ctx, args.clone()).execute(ui),
            Commands::Apis(args) => ApisCommand::new(ctx, args.clone()).execute(ui),
            Commands::Tfvars(args) => TfvarsCommand::new(ctx, args.clone()).execute(ui),
            Commands::Completions(args) => CompletionsCommand::new(args.clone()).execute(ui),
        }
    }
}
