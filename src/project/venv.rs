//! The project's isolated Python environment.

use std::path::{Path, PathBuf};

use crate::context::RunContext;
use crate::shell::Invocation;
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::UserInterface;

/// State of the virtual environment after a check or creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenvState {
    /// The environment exists.
    Present {
        /// `python --version` inside the environment, when it answered
        python_version: Option<String>,
    },
    /// The environment was just created.
    Created,
    /// The environment does not exist and was not created.
    Absent {
        /// Why it was not created
        reason: String,
    },
    /// `uv venv` failed.
    CreationFailed {
        /// What went wrong
        message: String,
    },
}

impl VenvState {
    /// Whether an environment exists after this state.
    pub fn exists(&self) -> bool {
        matches!(self, Self::Present { .. } | Self::Created)
    }
}

/// Interpreter inside a virtual environment directory.
pub fn venv_python(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}

fn python_version(ctx: &RunContext<'_>, venv_dir: &Path) -> Option<String> {
    let python = venv_python(venv_dir);
    if !python.exists() {
        return None;
    }
    let invocation = Invocation::new(python.display().to_string())
        .arg("--version")
        .timeout(ctx.probe_timeout());
    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => {
            let version = result.combined().trim().to_string();
            (!version.is_empty()).then_some(version)
        }
        _ => None,
    }
}

/// Report the environment's state without creating anything.
pub fn inspect_venv(ctx: &RunContext<'_>, snapshot: &EnvironmentSnapshot) -> VenvState {
    let venv_dir = ctx.project_path(&ctx.config.layout.venv_dir);
    if venv_dir.is_dir() {
        return VenvState::Present {
            python_version: python_version(ctx, &venv_dir),
        };
    }
    if !snapshot.project().manifest_present {
        return VenvState::Absent {
            reason: format!("{} not found", snapshot.project().manifest),
        };
    }
    VenvState::Absent {
        reason: format!("{} does not exist", ctx.config.layout.venv_dir),
    }
}

/// Make sure the virtual environment exists.
///
/// Creates it with `uv venv` only when the manifest is present, uv is
/// installed and the environment is absent. Calling this again after a
/// creation finds the environment present and creates nothing.
pub fn ensure_virtual_environment(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    ui: &mut dyn UserInterface,
) -> VenvState {
    let venv_name = &ctx.config.layout.venv_dir;
    let state = match inspect_venv(ctx, snapshot) {
        VenvState::Present { python_version } => {
            ui.success(&format!(
                "Virtual environment {} present ({})",
                venv_name,
                python_version.as_deref().unwrap_or("python version unknown")
            ));
            return VenvState::Present { python_version };
        }
        absent if !snapshot.project().manifest_present => absent,
        _ if !snapshot.has_tool("uv") => VenvState::Absent {
            reason: "uv is not installed".to_string(),
        },
        _ => create_venv(ctx, snapshot, ui),
    };

    if let VenvState::Absent { reason } = &state {
        ui.warning(&format!("Skipping virtual environment creation: {}", reason));
    }
    state
}

fn create_venv(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    ui: &mut dyn UserInterface,
) -> VenvState {
    let invocation = snapshot
        .invocation("uv")
        .args([String::from("venv"), ctx.config.layout.venv_dir.clone()])
        .cwd(&ctx.project_root)
        .timeout(ctx.install_timeout());

    let mut spinner = ui.start_spinner(&format!("Creating {}", ctx.config.layout.venv_dir));
    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => {
            spinner.finish_success(&format!("Created {}", ctx.config.layout.venv_dir));
            VenvState::Created
        }
        Ok(result) => {
            spinner.finish_error("uv venv failed");
            ui.show_error_block(&invocation.display(), result.combined().trim(), None);
            VenvState::CreationFailed {
                message: format!("exit code {:?}", result.exit_code),
            }
        }
        Err(e) => {
            spinner.finish_error("uv venv failed");
            VenvState::CreationFailed {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;
    use crate::project::verify_project_layout;
    use crate::requirements::fetch::StaticScript;
    use crate::requirements::ToolCheckResult;
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn snapshot_for(ctx: &RunContext<'_>, uv: bool) -> EnvironmentSnapshot {
        let project = verify_project_layout(&ctx.project_root, &ctx.config.layout);
        let uv = if uv {
            ToolCheckResult::found("uv", PathBuf::from("uv"), Some("uv 0.6.12".to_string()))
        } else {
            ToolCheckResult::absent("uv")
        };
        EnvironmentSnapshot::new(project).with_tool(uv)
    }

    #[test]
    fn creates_when_manifest_and_uv_present() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "").unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_ok("uv venv .venv", "");
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher);
        let mut ui = MockUI::new();

        let state = ensure_virtual_environment(&ctx, &snapshot_for(&ctx, true), &mut ui);
        assert_eq!(state, VenvState::Created);
        assert!(runner.was_called("uv venv"));
    }

    #[test]
    fn existing_environment_is_never_recreated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "").unwrap();
        fs::create_dir(temp.path().join(".venv")).unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher);
        let snapshot = snapshot_for(&ctx, true);
        let mut ui = MockUI::new();

        for _ in 0..2 {
            let state = ensure_virtual_environment(&ctx, &snapshot, &mut ui);
            assert!(matches!(state, VenvState::Present { .. }));
        }
        assert!(!runner.was_called("uv venv"));
    }

    #[test]
    fn missing_manifest_skips_creation() {
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher);
        let mut ui = MockUI::new();

        let state = ensure_virtual_environment(&ctx, &snapshot_for(&ctx, true), &mut ui);
        assert!(matches!(state, VenvState::Absent { ref reason } if reason.contains("pyproject.toml")));
        assert!(runner.calls().is_empty());
        assert!(ui.has_warning("Skipping"));
    }

    #[test]
    fn missing_uv_skips_creation() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "").unwrap();
        let runner = ScriptedRunner::new();
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher);
        let mut ui = MockUI::new();

        let state = ensure_virtual_environment(&ctx, &snapshot_for(&ctx, false), &mut ui);
        assert_eq!(
            state,
            VenvState::Absent {
                reason: "uv is not installed".to_string()
            }
        );
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn failed_creation_is_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "").unwrap();
        let runner = ScriptedRunner::new();
        runner.respond_fail("uv venv .venv", 2, "error: No interpreter found");
        let fetcher = StaticScript::unreachable();
        let ctx = RunContext::new(temp.path(), BootstrapConfig::default(), &runner, &fetcher);
        let mut ui = MockUI::new();

        let state = ensure_virtual_environment(&ctx, &snapshot_for(&ctx, true), &mut ui);
        assert!(matches!(state, VenvState::CreationFailed { .. }));
        assert!(!state.exists());
        assert!(ui.error_blocks()[0].output.contains("No interpreter found"));
    }
}
