//! Plain line output for CI and pipes.

use std::collections::HashMap;

use crate::error::{BootstrapError, Result};

use super::theme::{BootstrapTheme, Mark};
use super::{OutputMode, Prompt, PromptResult, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts by key.
///
/// `AUDITOR_BOOTSTRAP_PROMPT_ENABLE_APIS=yes` answers the `enable_apis` prompt.
pub const PROMPT_ENV_PREFIX: &str = "AUDITOR_BOOTSTRAP_PROMPT_";

fn env_var_for(key: &str) -> String {
    format!("{}{}", PROMPT_ENV_PREFIX, key.to_uppercase())
}

/// Never asks. Informational lines go to stdout, warnings and errors to
/// stderr, all without color.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: BootstrapTheme,
    /// Keyed by the full variable name.
    answers: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Answers prompts from `AUDITOR_BOOTSTRAP_PROMPT_*` in the process
    /// environment.
    pub fn new(mode: OutputMode) -> Self {
        let answers = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self::with_overrides(mode, answers)
    }

    pub fn with_overrides(mode: OutputMode, answers: HashMap<String, String>) -> Self {
        Self {
            mode,
            theme: BootstrapTheme::plain(),
            answers,
        }
    }

    fn out(&self, line: String) {
        if self.mode.shows_status() {
            println!("{}", line);
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.out(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.out(self.theme.mark(Mark::Ok, msg));
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.mark(Mark::Warn, msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_var = env_var_for(&prompt.key);
        self.answers
            .get(&env_var)
            .or(prompt.default.as_ref())
            .map(|answer| PromptResult::String(answer.clone()))
            .ok_or(BootstrapError::PromptUnanswered {
                key: prompt.key.clone(),
                env_var,
            })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(LineSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        self.out(format!("\n{}\n", self.theme.header(title)));
    }

    fn show_hint(&mut self, hint: &str) {
        self.out(format!("  {}", hint));
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        for line in self.theme.error_block(command, output, hint) {
            eprintln!("{}", line);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prints only the closing line of a step.
struct LineSpinner {
    mode: OutputMode,
}

impl LineSpinner {
    fn close(&self, mark: Mark, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", BootstrapTheme::plain().mark(mark, msg));
        }
    }
}

impl SpinnerHandle for LineSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.close(Mark::Ok, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.close(Mark::Fail, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.close(Mark::Skip, msg);
    }
}
