use crate::error::{AppError, AppResult};

/// Commit message carrying the issue key, e.g. `[ABC-0042] Fix login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    pub fn for_issue(issue_key: &str, message: &str) -> AppResult<Self> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::VersionControl(
                "commit message must not be empty".to_string(),
            ));
        }
        Ok(Self(format!("[{issue_key}] {message}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
