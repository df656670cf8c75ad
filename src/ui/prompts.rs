//! Interactive prompts.

use console::Term;
use dialoguer::{Confirm, Password, Select};

use crate::error::{BootstrapError, Result};

use super::{Prompt, PromptOption, PromptResult, PromptType};

fn map_dialoguer_err(e: dialoguer::Error) -> BootstrapError {
    BootstrapError::Io(e.into())
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Password => prompt_password(prompt, term),
        PromptType::Select { options } => prompt_select(prompt, options, term),
    }
}

fn confirm_default(prompt: &Prompt) -> bool {
    prompt
        .default
        .clone()
        .is_some_and(|d| PromptResult::String(d).is_yes())
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let result = Confirm::new()
        .with_prompt(&prompt.question)
        .default(confirm_default(prompt))
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_password(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let result = Password::new()
        .with_prompt(&prompt.question)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::String(result))
}

fn select_default(prompt: &Prompt, options: &[PromptOption]) -> usize {
    prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0)
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<PromptResult> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let selection = Select::new()
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(select_default(prompt, options))
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::String(options[selection].value.clone()))
}
