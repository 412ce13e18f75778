use std::fmt;
use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::issue_key::extract_issue_key;
use crate::error::AppResult;
use crate::runtime::deadline::{QUERY_TIMEOUT, run_with_timeout};

/// What the status line shows: the branch and the issue it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStatus {
    pub branch: Option<String>,
    pub issue_key: Option<String>,
    pub issue_url: Option<String>,
}

impl fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(branch) = &self.branch else {
            return f.write_str("No git branch checked out");
        };
        match (&self.issue_key, &self.issue_url) {
            (Some(key), Some(url)) => write!(f, "{branch} [{key}] {url}"),
            (Some(key), None) => write!(f, "{branch} [{key}]"),
            _ => write!(f, "{branch} (no Jira issue)"),
        }
    }
}

pub async fn current_branch(ctx: &AppContext) -> AppResult<Option<String>> {
    let vcs = Arc::clone(&ctx.version_control);
    run_with_timeout("branch lookup", QUERY_TIMEOUT, async move {
        vcs.current_branch().await
    })
    .await
}

pub async fn current_status(ctx: &AppContext) -> AppResult<BranchStatus> {
    let branch = current_branch(ctx).await?;
    let issue_key = branch
        .as_deref()
        .and_then(extract_issue_key)
        .map(str::to_string);
    let issue_url = issue_key.as_deref().and_then(|key| ctx.config.issue_url(key));
    Ok(BranchStatus {
        branch,
        issue_key,
        issue_url,
    })
}
