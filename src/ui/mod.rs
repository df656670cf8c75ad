//! Everything the user sees.
//!
//! Diagnostics in this tool are user-facing text, so every operation
//! reports through [`UserInterface`] rather than through the log.
//! [`TerminalUI`] draws spinners and asks questions, [`NonInteractiveUI`]
//! prints plain lines for CI, and [`MockUI`] records calls for tests.
//!
//! ```
//! use auditor_bootstrap::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet, false);
//! ui.show_header("Environment check");
//! ui.success("uv 0.6.12");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use table::Table;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, BootstrapTheme, Mark};

use crate::error::Result;

/// Output and questions, independent of where they end up.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    /// Plain informational line.
    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// Ask a question. Headless implementations answer from the
    /// environment or the default, and fail if neither exists.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Title of a group of checks.
    fn show_header(&mut self, title: &str);

    /// Something to run or open next.
    fn show_hint(&mut self, hint: &str);

    /// A failed command, what it printed, and what to try instead.
    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>);

    /// Whether a person can answer prompts.
    fn is_interactive(&self) -> bool;
}

/// A running spinner. Exactly one `finish_*` call ends it.
pub trait SpinnerHandle {
    fn finish_success(&mut self, msg: &str);

    fn finish_error(&mut self, msg: &str);

    fn finish_skipped(&mut self, msg: &str);
}

/// A question for the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Stable id; also names the `AUDITOR_BOOTSTRAP_PROMPT_<KEY>` override.
    pub key: String,
    pub question: String,
    pub prompt_type: PromptType,
    pub default: Option<String>,
}

impl Prompt {
    /// A yes/no question.
    pub fn confirm(key: &str, question: impl Into<String>, default_yes: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            prompt_type: PromptType::Confirm,
            default: Some(if default_yes { "yes" } else { "no" }.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PromptType {
    Confirm,
    /// Hidden input, for tokens.
    Password,
    Select { options: Vec<PromptOption> },
}

/// One entry of a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    pub label: String,
    pub value: String,
}

/// An answer. Confirms give `Bool` when asked interactively and the raw
/// default string otherwise.
#[derive(Debug, Clone)]
pub enum PromptResult {
    Bool(bool),
    String(String),
}

impl PromptResult {
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    pub fn is_yes(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => matches!(s.to_lowercase().as_str(), "yes" | "y" | "true" | "1"),
        }
    }
}

/// Ask a yes/no question; any prompt failure counts as "no".
pub fn confirm(ui: &mut dyn UserInterface, prompt: &Prompt) -> bool {
    ui.prompt(prompt).map(|r| r.is_yes()).unwrap_or(false)
}
