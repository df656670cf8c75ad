//! Installing missing tools.
//!
//! Only tools with a vendor install script (uv) are installed
//! automatically. Everything else gets printed instructions. Installing
//! never mutates the snapshot it was given; the caller receives a new one.

use crate::context::RunContext;
use crate::requirements::checker::ToolChecker;
use crate::requirements::registry::{InstallMethod, ToolSpec};
use crate::requirements::status::InstallOutcome;
use crate::shell::{Invocation, LoginShell, Platform};
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::{confirm, Prompt, UserInterface};

/// Install `name` if the snapshot says it is missing.
///
/// Interactive runs ask first unless `--yes` was given; non-interactive
/// runs proceed. On success the tool is looked up again, including the
/// per-user bin directories installers write to, and the returned
/// snapshot carries the new result.
pub fn install_tool_if_missing(
    name: &str,
    snapshot: EnvironmentSnapshot,
    ctx: &RunContext<'_>,
    ui: &mut dyn UserInterface,
) -> (EnvironmentSnapshot, InstallOutcome) {
    if snapshot.has_tool(name) {
        return (snapshot, InstallOutcome::AlreadyInstalled);
    }
    let Some(spec) = ctx.registry.get(name) else {
        return (
            snapshot,
            InstallOutcome::ManualRequired {
                instructions: format!("{} is not installed", name),
            },
        );
    };

    match spec.install {
        InstallMethod::Manual => {
            let instructions = spec.guidance(ctx.platform);
            ui.message(&instructions);
            (snapshot, InstallOutcome::ManualRequired { instructions })
        }
        InstallMethod::Script { url, powershell } => {
            if ui.is_interactive() && !ctx.assume_yes {
                let prompt = Prompt::confirm(
                    &format!("install_{}", name),
                    format!("{} is not installed. Install it now?", name),
                    true,
                );
                if !confirm(ui, &prompt) {
                    ui.show_hint(&spec.guidance(ctx.platform));
                    return (snapshot, InstallOutcome::Declined);
                }
            }
            run_install_script(spec, url, powershell, snapshot, ctx, ui)
        }
    }
}

fn installer_invocation(
    ctx: &RunContext<'_>,
    url: &str,
    powershell: &str,
) -> Result<Invocation, String> {
    let invocation = if ctx.platform == Platform::Windows {
        Invocation::new("powershell").args(["-ExecutionPolicy", "ByPass", "-c", powershell])
    } else {
        let script = ctx
            .fetcher
            .fetch(url)
            .map_err(|e| format!("could not download {}: {}", url, e))?;
        Invocation::new("sh").stdin(script)
    };
    Ok(invocation.timeout(ctx.install_timeout()))
}

fn run_install_script(
    spec: &ToolSpec,
    url: &str,
    powershell: &str,
    snapshot: EnvironmentSnapshot,
    ctx: &RunContext<'_>,
    ui: &mut dyn UserInterface,
) -> (EnvironmentSnapshot, InstallOutcome) {
    let fallback = spec.install.manual_command(ctx.platform).unwrap_or_default();
    let failed = |message: String, ui: &mut dyn UserInterface| {
        ui.error(&format!("Failed to install {}: {}", spec.name, message));
        ui.show_hint(&format!("Install it manually: {}", fallback));
        InstallOutcome::Failed {
            message,
            fallback: fallback.clone(),
        }
    };

    let mut spinner = ui.start_spinner(&format!("Installing {}", spec.name));
    let invocation = match installer_invocation(ctx, url, powershell) {
        Ok(invocation) => invocation,
        Err(message) => {
            spinner.finish_error(&format!("{} install failed", spec.name));
            let outcome = failed(message, ui);
            return (snapshot, outcome);
        }
    };

    tracing::info!(tool = %spec.name, command = %invocation.display(), "running installer");
    let message = match ctx.runner.run(&invocation) {
        Ok(result) if result.success => None,
        Ok(result) => Some(format!(
            "installer exited with {:?}: {}",
            result.exit_code,
            result.combined().trim()
        )),
        Err(e) => Some(e.to_string()),
    };
    if let Some(message) = message {
        spinner.finish_error(&format!("{} install failed", spec.name));
        let outcome = failed(message, ui);
        return (snapshot, outcome);
    }

    let recheck = ToolChecker::new(ctx).including_user_bins().check(&spec.name);
    if !recheck.installed {
        spinner.finish_error(&format!("{} still not found", spec.name));
        let outcome = failed(
            "installer finished but the binary is not on the search path".to_string(),
            ui,
        );
        return (snapshot.with_tool(recheck), outcome);
    }

    spinner.finish_success(&format!(
        "Installed {}{}",
        spec.name,
        recheck
            .version_line()
            .map(|v| format!(" ({})", v))
            .unwrap_or_default()
    ));
    ui.show_hint(LoginShell::detect().reload_hint());
    let version = recheck.version.clone();
    (snapshot.with_tool(recheck), InstallOutcome::Installed { version })
}
