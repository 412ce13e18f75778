use async_trait::async_trait;

use crate::domain::issue::Issue;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Runs a JQL query and returns the first page of matching issues.
    async fn search(&self, jql: &str) -> AppResult<Vec<Issue>>;
}
