//! Python and Node dependency installation.
//!
//! Neither install is retried. On failure the command is printed so the
//! user can run it by hand.

use std::path::PathBuf;

use crate::context::RunContext;
use crate::shell::Invocation;
use crate::snapshot::EnvironmentSnapshot;
use crate::ui::UserInterface;

/// Where npm puts the local Lighthouse launcher.
pub fn local_lighthouse(ctx: &RunContext<'_>) -> PathBuf {
    let name = if cfg!(windows) {
        "lighthouse.cmd"
    } else {
        "lighthouse"
    };
    ctx.project_root
        .join("node_modules")
        .join(".bin")
        .join(name)
}

fn run_install(
    ctx: &RunContext<'_>,
    invocation: Invocation,
    label: &str,
    ui: &mut dyn UserInterface,
) -> bool {
    let invocation = invocation.timeout(ctx.install_timeout());
    let mut spinner = ui.start_spinner(&format!("Running {}", invocation.display()));

    match ctx.runner.run(&invocation) {
        Ok(result) if result.success => {
            spinner.finish_success(&format!("{} installed", label));
            if ui.output_mode().shows_command_output() {
                ui.message(result.combined().trim_end());
            }
            true
        }
        Ok(result) => {
            spinner.finish_error(&format!("{} install failed", label));
            ui.show_error_block(
                &invocation.display(),
                result.combined().trim_end(),
                Some(&format!("Run it manually: {}", invocation.display())),
            );
            false
        }
        Err(e) => {
            spinner.finish_error(&format!("{} install failed", label));
            ui.error(&e.to_string());
            ui.show_hint(&format!("Run it manually: {}", invocation.display()));
            false
        }
    }
}

/// Sync the project's Python dependencies.
///
/// Runs only when both the manifest and uv are present.
pub fn install_dependencies(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    ui: &mut dyn UserInterface,
) -> bool {
    if !snapshot.project().manifest_present {
        ui.warning(&format!(
            "Skipping dependency install: {} not found",
            snapshot.project().manifest
        ));
        return false;
    }
    if !snapshot.has_tool("uv") {
        ui.warning("Skipping dependency install: uv is not installed");
        return false;
    }
    let Some(invocation) = Invocation::from_line(&ctx.config.targets.install) else {
        return false;
    };

    let invocation = snapshot.resolve(invocation).cwd(&ctx.project_root);
    run_install(ctx, invocation, "Python dependencies", ui)
}

/// Install the Node packages Lighthouse audits need.
///
/// Uses `package.json` when the project has one, otherwise installs
/// `lighthouse` locally.
pub fn install_node_deps(
    ctx: &RunContext<'_>,
    snapshot: &EnvironmentSnapshot,
    ui: &mut dyn UserInterface,
) -> bool {
    if !snapshot.has_tool("npm") {
        if let Some(spec) = ctx.registry.get("npm") {
            ui.message(&spec.guidance(ctx.platform));
        }
        return false;
    }

    let line = if ctx.project_root.join("package.json").is_file() {
        &ctx.config.targets.node_install
    } else {
        &ctx.config.targets.node_install_fallback
    };
    let Some(invocation) = Invocation::from_line(line) else {
        return false;
    };

    let invocation = snapshot.resolve(invocation).cwd(&ctx.project_root);
    if !run_install(ctx, invocation, "Node packages", ui) {
        return false;
    }

    if !local_lighthouse(ctx).exists() {
        ui.warning("npm finished but node_modules/.bin/lighthouse is missing");
    }
    true
}
