//! Everything an operation needs to talk to the outside world.
//!
//! Operations never reach for global state: the project root, merged
//! configuration, command runner and script source all arrive through a
//! [`RunContext`], so tests can swap in [`ScriptedRunner`](crate::shell::ScriptedRunner)
//! and [`StaticScript`](crate::requirements::fetch::StaticScript).

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::BootstrapConfig;
use crate::requirements::fetch::ScriptSource;
use crate::requirements::probe::ToolLocator;
use crate::requirements::registry::ToolRegistry;
use crate::shell::{CommandRunner, Invocation, Platform};

/// Shared, read-only inputs for one run of the tool.
pub struct RunContext<'a> {
    /// Directory holding `pyproject.toml`
    pub project_root: PathBuf,
    /// Merged configuration
    pub config: BootstrapConfig,
    /// Runs external commands
    pub runner: &'a dyn CommandRunner,
    /// Downloads vendor install scripts
    pub fetcher: &'a dyn ScriptSource,
    /// Known tools with config overrides applied
    pub registry: ToolRegistry,
    /// Where tools are searched for
    pub locator: ToolLocator,
    /// Platform used for install guidance
    pub platform: Platform,
    /// Answer yes to confirmations (`--yes`)
    pub assume_yes: bool,
}

impl<'a> RunContext<'a> {
    /// Build a context searching the process PATH.
    pub fn new(
        project_root: &Path,
        config: BootstrapConfig,
        runner: &'a dyn CommandRunner,
        fetcher: &'a dyn ScriptSource,
    ) -> Self {
        let registry = ToolRegistry::new().with_overrides(&config.tools);
        Self {
            project_root: project_root.to_path_buf(),
            config,
            runner,
            fetcher,
            registry,
            locator: ToolLocator::from_env(),
            platform: Platform::current(),
            assume_yes: false,
        }
    }

    /// Search these directories instead of PATH.
    pub fn with_locator(mut self, locator: ToolLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Pretend to run on another platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Answer yes to confirmations.
    pub fn with_assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Budget for version and status queries.
    pub fn probe_timeout(&self) -> Option<Duration> {
        self.config.timeouts.probe()
    }

    /// Budget for installers and dependency syncs.
    pub fn install_timeout(&self) -> Option<Duration> {
        self.config.timeouts.install()
    }

    /// Budget for terraform runs; unbounded unless configured.
    pub fn terraform_timeout(&self) -> Option<Duration> {
        self.config.timeouts.terraform()
    }

    /// Budget for interactive logins.
    pub fn auth_timeout(&self) -> Option<Duration> {
        self.config.timeouts.auth()
    }

    /// Resolve a path relative to the project root.
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.join(relative)
    }

    /// Parse a configured command line and point its program at the
    /// binary the locator finds, so freshly installed tools work.
    pub fn command_line(&self, line: &str) -> Option<Invocation> {
        let mut invocation = Invocation::from_line(line)?;
        if let Some(path) = self.locator.find(&invocation.program) {
            invocation.program = path.display().to_string();
        }
        Some(invocation.cwd(&self.project_root))
    }
}
