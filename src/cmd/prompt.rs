use std::io::{self, Write};

use crate::error::AppResult;

pub enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

/// Asks for a value. Enter keeps the current one and `-` clears it.
pub fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    Ok(parse_answer(&read_line()?))
}

/// Asks for a value that always has a fallback, e.g. an editable default.
pub fn prompt_with_default(field: &str, default: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{field} [{default}]: ")?;
    stdout.flush()?;

    let answer = read_line()?;
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn confirm(question: &str) -> AppResult<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{question} [y/N]: ")?;
    stdout.flush()?;

    let answer = read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn read_line() -> AppResult<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn parse_answer(input: &str) -> PromptAction {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        PromptAction::Keep
    } else if trimmed == "-" {
        PromptAction::Clear
    } else {
        PromptAction::Set(trimmed.to_string())
    }
}
