use std::fmt;

/// A single search result. Everything except the key is optional because
/// JIRA omits or nulls fields freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Option<String>,
    pub url: Option<String>,
}

impl Issue {
    pub fn is_resolved(&self) -> bool {
        self.status.as_deref().is_some_and(|status| {
            let status = status.to_lowercase();
            ["resolved", "closed", "done"]
                .iter()
                .any(|marker| status.contains(marker))
        })
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.key,
            self.summary.as_deref().unwrap_or("no summary"),
            self.status.as_deref().unwrap_or("no status")
        )
    }
}
