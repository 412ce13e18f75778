use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::commit::CommitMessage;
use crate::domain::issue_key::extract_issue_key;
use crate::error::{AppError, AppResult};
use crate::runtime::deadline::{MUTATION_TIMEOUT, STATUS_TIMEOUT, run_with_timeout};
use crate::workflow::status::current_branch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(CommitMessage),
    NoChanges,
}

pub async fn has_changes(ctx: &AppContext) -> AppResult<bool> {
    let vcs = Arc::clone(&ctx.version_control);
    run_with_timeout("status check", STATUS_TIMEOUT, async move {
        vcs.has_changes().await
    })
    .await
}

/// Stages the whole tree and commits it. Returns `false` without running
/// `git add` when there is nothing to commit.
pub async fn commit_all(ctx: &AppContext, message: &str) -> AppResult<bool> {
    let vcs = Arc::clone(&ctx.version_control);
    let message = message.to_string();
    run_with_timeout("commit", MUTATION_TIMEOUT, async move {
        if !vcs.has_changes().await? {
            log::info!("nothing to commit");
            return Ok(false);
        }
        vcs.stage_all().await?;
        vcs.commit(&message).await?;
        Ok(true)
    })
    .await
}

/// Commits all changes with the current branch's issue key as prefix.
pub async fn commit_with_issue_key(ctx: &AppContext, message: &str) -> AppResult<CommitOutcome> {
    if !has_changes(ctx).await? {
        return Ok(CommitOutcome::NoChanges);
    }

    let branch = current_branch(ctx).await?.ok_or_else(|| {
        AppError::VersionControl("no branch is checked out".to_string())
    })?;
    let issue_key = extract_issue_key(&branch).ok_or_else(|| {
        AppError::VersionControl(format!(
            "branch '{branch}' does not contain a Jira issue key"
        ))
    })?;
    let message = CommitMessage::for_issue(issue_key, message)?;

    if commit_all(ctx, message.as_str()).await? {
        log::info!("committed {}", message.as_str());
        Ok(CommitOutcome::Committed(message))
    } else {
        Ok(CommitOutcome::NoChanges)
    }
}
