use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::workflow::search::ensure_jira_configured;
use crate::workflow::status::current_status;

pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let status = current_status(ctx).await?;
    println!("{status}");
    Ok(())
}

/// Opens the given issue, or the current branch's issue, in the browser.
pub async fn run_open(ctx: &AppContext, issue_key: Option<String>) -> AppResult<()> {
    ensure_jira_configured(ctx)?;
    let key = match issue_key {
        Some(key) => key,
        None => current_status(ctx).await?.issue_key.ok_or_else(|| {
            AppError::VersionControl("current branch has no Jira issue key".to_string())
        })?,
    };
    let url = ctx
        .config
        .issue_url(&key)
        .ok_or_else(|| AppError::Configuration("Jira URL not configured".to_string()))?;

    println!("Opening {url}");
    open::that(&url)?;
    Ok(())
}
