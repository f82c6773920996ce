//! Interactive console: operator prompts and colored status lines.
use colored::Colorize;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};

use crate::{ReleaseError, Result};

/// Operator checkpoints used by the release flows.
#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Ask a yes/no question. Defaults to "no".
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Ask the operator to pick one of `choices` and return the picked value.
    fn choice(&self, message: &str, choices: &[String]) -> Result<String>;
}

/// [`Prompt`] implementation reading from the terminal.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()?;
        Ok(answer)
    }

    fn choice(&self, message: &str, choices: &[String]) -> Result<String> {
        if choices.is_empty() {
            return Err(ReleaseError::InvalidArgs(format!(
                "no choices available for: {message}"
            )));
        }

        let index = Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact()?;

        Ok(choices[index].clone())
    }
}

pub fn heading(message: &str) {
    println!("\n{}", message.bold().cyan());
}

pub fn success(message: &str) {
    println!("{}", message.green());
}

pub fn notice(message: &str) {
    println!("{}", message.yellow());
}

pub fn warning(message: &str) {
    println!("{}", message.red());
}

pub fn plain(message: &str) {
    println!("{message}");
}
