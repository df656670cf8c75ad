//! auditor-bootstrap CLI entry point.

use std::process::ExitCode;

use auditor_bootstrap::cli::{Cli, CommandDispatcher};
use auditor_bootstrap::shell::install_interrupt_handler;
use auditor_bootstrap::ui::{create_ui, OutputMode};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("auditor_bootstrap=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("auditor_bootstrap=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    install_interrupt_handler();

    tracing::debug!("auditor-bootstrap starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    // --yes means "never ask", so the prompts go away with it.
    let mut ui = create_ui(!cli.yes, output_mode, cli.no_color);

    let dispatcher = CommandDispatcher::new(project_root)
        .with_config(cli.config.clone())
        .with_assume_yes(cli.yes);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(u8::try_from(result.exit_code).unwrap_or(1)),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
