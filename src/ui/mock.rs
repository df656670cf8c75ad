//! Recording UI for tests.
//!
//! ```
//! use auditor_bootstrap::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Checking tools");
//! ui.success("uv 0.6.12");
//!
//! assert!(ui.has_message("Checking tools"));
//! assert!(ui.has_success("uv"));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::Result;

use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Kind of line the code under test printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    Message,
    Success,
    Warning,
    Error,
    Header,
    Hint,
}

/// A failed command passed to `show_error_block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBlock {
    pub command: String,
    pub output: String,
    pub hint: Option<String>,
}

/// How a mock spinner was finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpinnerOutcome {
    Success(String),
    Error(String),
    Skipped(String),
}

/// Records everything shown and answers prompts from canned responses.
///
/// A key answered with [`MockUI::queue_prompt_responses`] drains its queue
/// first, then falls back to [`MockUI::set_prompt_response`], then to the
/// prompt's default.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    shown: Vec<(Shown, String)>,
    spinners: Vec<String>,
    outcomes: Rc<RefCell<Vec<SpinnerOutcome>>>,
    error_blocks: Vec<ErrorBlock>,
    answers: HashMap<String, String>,
    queued: HashMap<String, VecDeque<String>>,
    asked: Vec<String>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Answer every prompt with this key the same way.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.answers.insert(key.to_string(), response.to_string());
    }

    /// Answer successive prompts with this key in order.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        self.queued.insert(
            key.to_string(),
            responses.into_iter().map(String::from).collect(),
        );
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Every line of one kind, in order.
    pub fn lines(&self, kind: Shown) -> Vec<String> {
        self.shown
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.lines(Shown::Message)
    }

    pub fn headers(&self) -> Vec<String> {
        self.lines(Shown::Header)
    }

    /// Spinner labels in start order.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Spinner results in finish order.
    pub fn spinner_outcomes(&self) -> Vec<SpinnerOutcome> {
        self.outcomes.borrow().clone()
    }

    pub fn error_blocks(&self) -> &[ErrorBlock] {
        &self.error_blocks
    }

    /// Keys of the prompts asked, in order.
    pub fn prompts_shown(&self) -> &[String] {
        &self.asked
    }

    /// True if some line of this kind contains `needle`.
    pub fn saw(&self, kind: Shown, needle: &str) -> bool {
        self.shown
            .iter()
            .any(|(k, text)| *k == kind && text.contains(needle))
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.saw(Shown::Message, msg)
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.saw(Shown::Success, msg)
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.saw(Shown::Warning, msg)
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.saw(Shown::Error, msg)
    }

    pub fn has_hint(&self, msg: &str) -> bool {
        self.saw(Shown::Hint, msg)
    }

    fn record(&mut self, kind: Shown, text: &str) {
        self.shown.push((kind, text.to_string()));
    }

    fn answer_for(&mut self, key: &str) -> Option<String> {
        self.queued
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .or_else(|| self.answers.get(key).cloned())
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.record(Shown::Message, msg);
    }

    fn success(&mut self, msg: &str) {
        self.record(Shown::Success, msg);
    }

    fn warning(&mut self, msg: &str) {
        self.record(Shown::Warning, msg);
    }

    fn error(&mut self, msg: &str) {
        self.record(Shown::Error, msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.asked.push(prompt.key.clone());
        let answer = self
            .answer_for(&prompt.key)
            .or_else(|| prompt.default.clone());

        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(
                answer.is_some_and(|a| PromptResult::String(a).is_yes()),
            ),
            _ => PromptResult::String(answer.unwrap_or_default()),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner(Rc::clone(&self.outcomes)))
    }

    fn show_header(&mut self, title: &str) {
        self.record(Shown::Header, title);
    }

    fn show_hint(&mut self, hint: &str) {
        self.record(Shown::Hint, hint);
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        self.error_blocks.push(ErrorBlock {
            command: command.to_string(),
            output: output.to_string(),
            hint: hint.map(String::from),
        });
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

struct MockSpinner(Rc<RefCell<Vec<SpinnerOutcome>>>);

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.0.borrow_mut().push(SpinnerOutcome::Success(msg.to_string()));
    }

    fn finish_error(&mut self, msg: &str) {
        self.0.borrow_mut().push(SpinnerOutcome::Error(msg.to_string()));
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.0.borrow_mut().push(SpinnerOutcome::Skipped(msg.to_string()));
    }
}
