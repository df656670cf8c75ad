//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, should_use_colors, BootstrapTheme, Mark, NonInteractiveUI, OutputMode,
    ProgressSpinner, Prompt, PromptResult, SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
///
/// Regular output goes to stdout; warnings and errors go to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: BootstrapTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, no_color: bool) -> Self {
        let theme = if !no_color && should_use_colors() {
            BootstrapTheme::new()
        } else {
            BootstrapTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }

    /// Status lines are dropped in silent mode; write failures are ignored.
    fn status(&mut self, to_stderr: bool, line: String) {
        if !self.mode.shows_status() {
            return;
        }
        let term = if to_stderr { &mut self.err } else { &mut self.out };
        writeln!(term, "{}", line).ok();
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.status(false, msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.mark(Mark::Ok, msg);
        self.status(false, line);
    }

    fn warning(&mut self, msg: &str) {
        let line = self.theme.mark(Mark::Warn, msg);
        self.status(true, line);
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.mark(Mark::Fail, msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.err)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        let line = format!("\n{}\n", self.theme.header(title));
        self.status(false, line);
    }

    fn show_hint(&mut self, hint: &str) {
        let line = format!("  {}", self.theme.hint(hint));
        self.status(false, line);
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        for line in self.theme.error_block(command, output, hint) {
            writeln!(self.err, "{}", line).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.out.is_term()
    }
}

/// Create the appropriate UI based on context.
///
/// A terminal UI is only used when interaction is allowed and stdout is a
/// TTY; CI always gets the non-interactive UI.
pub fn create_ui(interactive: bool, mode: OutputMode, no_color: bool) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() && !crate::shell::is_ci() {
        Box::new(TerminalUI::new(mode, no_color))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
