use std::fmt;

use crate::domain::issue_key::pad_issue_key;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds `prefix/PROJECT-NNNN` for an issue key.
    pub fn for_issue(prefix: &str, issue_key: &str) -> Self {
        let prefix = prefix.trim().trim_end_matches('/');
        let key = pad_issue_key(issue_key.trim());
        if prefix.is_empty() {
            Self(key)
        } else {
            Self(format!("{prefix}/{key}"))
        }
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
