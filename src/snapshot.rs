//! Immutable view of the environment, threaded through every step.
//!
//! A snapshot is captured once; a step that changes the environment
//! (installing uv, creating the venv, logging in) produces a new snapshot
//! through the `with_*` methods instead of flipping shared flags.
//!
//! # Example
//!
//! ```
//! use auditor_bootstrap::config::LayoutConfig;
//! use auditor_bootstrap::project::verify_project_layout;
//! use auditor_bootstrap::requirements::ToolCheckResult;
//! use auditor_bootstrap::snapshot::EnvironmentSnapshot;
//! use std::path::{Path, PathBuf};
//!
//! let project = verify_project_layout(Path::new("."), &LayoutConfig::default());
//! let before = EnvironmentSnapshot::new(project);
//! let after = before
//!     .clone()
//!     .with_tool(ToolCheckResult::found("uv", PathBuf::from("/usr/bin/uv"), None));
//!
//! assert!(!before.has_tool("uv"));
//! assert!(after.has_tool("uv"));
//! ```

use std::collections::BTreeMap;

use crate::auth::{check_cloud_auth, check_git_auth, CloudAuthState, GitAuthState};
use crate::context::RunContext;
use crate::project::{inspect_venv, verify_project_layout, ProjectContext, VenvState};
use crate::requirements::{ToolCheckResult, ToolChecker};
use crate::shell::Invocation;

/// Tools the notebook-style bootstrap checks, in order.
pub const BOOTSTRAP_TOOLS: [&str; 5] = ["python", "uv", "gcloud", "terraform", "gh"];

/// Tools Lighthouse needs at audit time, in order.
pub const AUDIT_TOOLS: [&str; 3] = ["node", "npm", "chromium"];

/// Everything known about the environment at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentSnapshot {
    project: ProjectContext,
    tools: BTreeMap<String, ToolCheckResult>,
    venv: Option<VenvState>,
    cloud_auth: Option<CloudAuthState>,
    git_auth: Option<GitAuthState>,
}

impl EnvironmentSnapshot {
    /// A snapshot that knows only the project layout.
    pub fn new(project: ProjectContext) -> Self {
        Self {
            project,
            tools: BTreeMap::new(),
            venv: None,
            cloud_auth: None,
            git_auth: None,
        }
    }

    /// Verify the layout and check the named tools.
    pub fn capture(ctx: &RunContext<'_>, tools: &[&str]) -> Self {
        let project = verify_project_layout(&ctx.project_root, &ctx.config.layout);
        let checker = ToolChecker::new(ctx);
        checker
            .check_all(tools)
            .into_iter()
            .fold(Self::new(project), Self::with_tool)
    }

    /// Capture every tool, the venv and both auth states without changing anything.
    pub fn capture_full(ctx: &RunContext<'_>) -> Self {
        let names: Vec<&str> = BOOTSTRAP_TOOLS.iter().chain(AUDIT_TOOLS.iter()).copied().collect();
        let snapshot = Self::capture(ctx, &names);
        let venv = inspect_venv(ctx, &snapshot);
        let cloud = check_cloud_auth(ctx, &snapshot);
        let git = check_git_auth(ctx, &snapshot);
        snapshot
            .with_venv(venv)
            .with_cloud_auth(cloud)
            .with_git_auth(git)
    }

    /// Project layout.
    pub fn project(&self) -> &ProjectContext {
        &self.project
    }

    /// Check result for a tool, if it was checked.
    pub fn tool(&self, name: &str) -> Option<&ToolCheckResult> {
        self.tools.get(name)
    }

    /// Whether a tool was checked and found.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tool(name).is_some_and(|t| t.installed)
    }

    /// All checked tools, by name.
    pub fn tools(&self) -> impl Iterator<Item = &ToolCheckResult> {
        self.tools.values()
    }

    /// Virtual environment state, if inspected.
    pub fn venv(&self) -> Option<&VenvState> {
        self.venv.as_ref()
    }

    /// Cloud auth state, if checked.
    pub fn cloud_auth(&self) -> Option<&CloudAuthState> {
        self.cloud_auth.as_ref()
    }

    /// Git hosting auth state, if checked.
    pub fn git_auth(&self) -> Option<&GitAuthState> {
        self.git_auth.as_ref()
    }

    /// Replace one tool's check result.
    pub fn with_tool(mut self, result: ToolCheckResult) -> Self {
        self.tools.insert(result.name.clone(), result);
        self
    }

    /// Replace the venv state.
    pub fn with_venv(mut self, venv: VenvState) -> Self {
        self.venv = Some(venv);
        self
    }

    /// Replace the cloud auth state.
    pub fn with_cloud_auth(mut self, state: CloudAuthState) -> Self {
        self.cloud_auth = Some(state);
        self
    }

    /// Replace the git auth state.
    pub fn with_git_auth(mut self, state: GitAuthState) -> Self {
        self.git_auth = Some(state);
        self
    }

    /// Invocation for a checked tool, using its resolved path.
    pub fn invocation(&self, tool: &str) -> Invocation {
        Invocation::new(
            self.tool(tool)
                .map(ToolCheckResult::program)
                .unwrap_or_else(|| tool.to_string()),
        )
    }

    /// Point an invocation's program at the resolved path of a checked tool
    /// with the same name.
    pub fn resolve(&self, mut invocation: Invocation) -> Invocation {
        if let Some(tool) = self.tool(&invocation.program).filter(|t| t.installed) {
            invocation.program = tool.program();
        }
        invocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BootstrapConfig, LayoutConfig};
    use crate::requirements::fetch::StaticScript;
    use crate::requirements::probe::ToolLocator;
    use crate::shell::ScriptedRunner;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn empty() -> EnvironmentSnapshot {
        EnvironmentSnapshot::new(verify_project_layout(
            Path::new("."),
            &LayoutConfig::default(),
        ))
    }

    #[test]
    fn with_tool_returns_new_snapshot() {
        let before = empty().with_tool(ToolCheckResult::absent("uv"));
        let after = before
            .clone()
            .with_tool(ToolCheckResult::found("uv", PathBuf::from("/opt/uv"), None));

        assert!(!before.has_tool("uv"));
        assert!(after.has_tool("uv"));
        assert_eq!(after.tools().count(), 1);
    }

    #[test]
    fn unchecked_tool_is_not_present() {
        assert!(empty().tool("gcloud").is_none());
        assert!(!empty().has_tool("gcloud"));
    }

    #[test]
    fn resolve_uses_tool_path() {
        let snapshot =
            empty().with_tool(ToolCheckResult::found("uv", PathBuf::from("/home/a/.local/bin/uv"), None));
        let inv = snapshot.resolve(Invocation::from_line("uv sync --frozen").unwrap());
        assert_eq!(inv.display(), "/home/a/.local/bin/uv sync --frozen");

        let npm = snapshot.resolve(Invocation::from_line("npm install").unwrap());
        assert_eq!(npm.program, "npm");
    }

    #[test]
    fn invocation_falls_back_to_bare_name() {
        assert_eq!(empty().invocation("gh").program, "gh");
    }

    #[test]
    fn capture_checks_requested_tools_only() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![temp.path().to_path_buf()]));

        let snapshot = EnvironmentSnapshot::capture(&ctx, &["node", "chromium"]);
        assert!(snapshot.tool("node").is_some());
        assert!(snapshot.tool("chromium").is_some());
        assert!(snapshot.tool("uv").is_none());
        assert!(!snapshot.project().manifest_present);
    }

    #[test]
    fn capture_full_records_everything_without_tools() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher)
            .with_locator(ToolLocator::new(vec![temp.path().to_path_buf()]));

        let snapshot = EnvironmentSnapshot::capture_full(&ctx);
        assert_eq!(snapshot.tools().count(), 8);
        assert!(snapshot.venv().is_some());
        assert!(!snapshot.cloud_auth().unwrap().authenticated);
        assert!(!snapshot.git_auth().unwrap().authenticated);
        assert!(runner.calls().is_empty());
    }
}
