//! ui::prompts
//!
//! Terminal prompts for the alert styles.
//!
//! # Design
//!
//! Each alert policy maps to one prompt shape: a forced update only offers
//! updating and re-asks until the user accepts, the optional style offers
//! update-or-later, and the skip style adds skip-this-version. The silent
//! policy never prompts; asking for a prompt with it is an error.
//!
//! Prompts are only shown in interactive mode. In non-interactive mode the
//! caller gets a clear error instead of a hang on stdin.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::policy::AlertPolicy;

/// Errors from prompts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("the silent policy does not prompt")]
    NotPromptable,

    #[error("IO error: {0}")]
    IoError(String),
}

/// What the user chose when prompted about an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    /// Open the store page and update.
    UpdateNow,
    /// Dismiss; ask again on the next due check.
    RemindLater,
    /// Never ask about this version again.
    SkipVersion,
}

/// Prompt the user about an available update on the terminal.
///
/// # Errors
///
/// Returns `NotInteractive` when prompts are disabled, `NotPromptable` for
/// the silent policy, and `Cancelled` when stdin closes mid-prompt.
pub fn prompt_update(
    message: &str,
    policy: AlertPolicy,
    interactive: bool,
) -> Result<UserChoice, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let stdin = io::stdin();
    prompt_update_from(&mut stdin.lock(), &mut io::stderr(), message, policy)
}

/// Prompt with injected reader and writer. Backs [`prompt_update`]; tests
/// drive it directly.
pub fn prompt_update_from<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    policy: AlertPolicy,
) -> Result<UserChoice, PromptError> {
    let options = match policy {
        AlertPolicy::Force => "This update is required. [U]pdate now",
        AlertPolicy::Option => "[u]pdate now / [L]ater",
        AlertPolicy::Skip => "[u]pdate now / [L]ater / [s]kip this version",
        AlertPolicy::Silent => return Err(PromptError::NotPromptable),
    };

    loop {
        write!(writer, "{}\n{}: ", message, options)
            .map_err(|e| PromptError::IoError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| PromptError::IoError(e.to_string()))?;

        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .map_err(|e| PromptError::IoError(e.to_string()))?;
        if read == 0 {
            return Err(PromptError::Cancelled);
        }

        if let Some(choice) = parse_choice(line.trim(), policy) {
            return Ok(choice);
        }
        // Unrecognized input re-prompts, including dismiss attempts on a
        // forced update.
    }
}

/// Map one line of input to a choice, or `None` to re-prompt.
fn parse_choice(input: &str, policy: AlertPolicy) -> Option<UserChoice> {
    let input = input.to_ascii_lowercase();
    match policy {
        AlertPolicy::Force => match input.as_str() {
            "" | "u" | "update" => Some(UserChoice::UpdateNow),
            _ => None,
        },
        AlertPolicy::Option => match input.as_str() {
            "u" | "update" => Some(UserChoice::UpdateNow),
            "" | "l" | "later" => Some(UserChoice::RemindLater),
            _ => None,
        },
        AlertPolicy::Skip => match input.as_str() {
            "u" | "update" => Some(UserChoice::UpdateNow),
            "" | "l" | "later" => Some(UserChoice::RemindLater),
            "s" | "skip" => Some(UserChoice::SkipVersion),
            _ => None,
        },
        AlertPolicy::Silent => None,
    }
}
