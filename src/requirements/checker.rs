//! Tool presence and version checks.
//!
//! A check never fails: a tool missing from the search path yields an
//! absent result, and a version call that fails or times out still counts
//! the tool as installed.

use crate::context::RunContext;
use crate::requirements::probe::ToolLocator;
use crate::requirements::status::ToolCheckResult;
use crate::shell::{CommandRunner, Invocation};
use std::path::Path;
use std::time::Duration;

/// Resolve `name` on the search path and ask it for its version.
pub fn check_tool(
    name: &str,
    version_args: &[String],
    locator: &ToolLocator,
    runner: &dyn CommandRunner,
    timeout: Option<Duration>,
) -> ToolCheckResult {
    match locator.find(name) {
        Some(path) => {
            let version = query_version(&path, version_args, runner, timeout);
            ToolCheckResult::found(name, path, version)
        }
        None => {
            tracing::debug!(tool = name, "not found on search path");
            ToolCheckResult::absent(name)
        }
    }
}

fn query_version(
    path: &Path,
    version_args: &[String],
    runner: &dyn CommandRunner,
    timeout: Option<Duration>,
) -> Option<String> {
    let invocation = Invocation::new(path.display().to_string())
        .args(version_args.iter().cloned())
        .timeout(timeout);

    match runner.run(&invocation) {
        Ok(result) if result.success => {
            let combined = result.combined();
            let trimmed = combined.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Ok(result) => {
            tracing::debug!(
                command = %invocation.display(),
                code = ?result.exit_code,
                "version query exited non-zero"
            );
            None
        }
        Err(e) => {
            tracing::warn!(command = %invocation.display(), error = %e, "version query failed");
            None
        }
    }
}

/// Checks registry tools, trying every binary alias.
pub struct ToolChecker<'c, 'a> {
    ctx: &'c RunContext<'a>,
    locator: ToolLocator,
}

impl<'c, 'a> ToolChecker<'c, 'a> {
    /// Check against the context's locator.
    pub fn new(ctx: &'c RunContext<'a>) -> Self {
        Self {
            ctx,
            locator: ctx.locator.clone(),
        }
    }

    /// Also search the directories user-level installers write to.
    pub fn including_user_bins(mut self) -> Self {
        self.locator = self.locator.with_user_bin_dirs();
        self
    }

    /// Check one tool by registry name.
    ///
    /// Names missing from the registry are looked up as plain binaries
    /// with `--version`.
    pub fn check(&self, name: &str) -> ToolCheckResult {
        let Some(spec) = self.ctx.registry.get(name) else {
            return check_tool(
                name,
                &["--version".to_string()],
                &self.locator,
                self.ctx.runner,
                self.ctx.probe_timeout(),
            );
        };

        match self.locator.find_any(&spec.binaries) {
            Some((binary, path)) => {
                tracing::debug!(tool = name, binary = %binary, path = %path.display(), "found");
                let version = query_version(
                    &path,
                    &spec.version_args,
                    self.ctx.runner,
                    self.ctx.probe_timeout(),
                );
                ToolCheckResult::found(name, path, version)
            }
            None => ToolCheckResult::absent(name),
        }
    }

    /// Check several tools in order.
    pub fn check_all(&self, names: &[&str]) -> Vec<ToolCheckResult> {
        names.iter().map(|name| self.check(name)).collect()
    }
}
