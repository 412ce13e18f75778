use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::issue::Issue;
use crate::domain::jql;
use crate::error::{AppError, AppResult};
use crate::runtime::deadline::{MUTATION_TIMEOUT, run_with_timeout};

pub fn ensure_jira_configured(ctx: &AppContext) -> AppResult<()> {
    if ctx.config.is_jira_configured() {
        Ok(())
    } else {
        Err(AppError::Configuration(
            "Jira is not configured; run `jb config init`".to_string(),
        ))
    }
}

pub async fn search_by_jql(ctx: &AppContext, query: String) -> AppResult<Vec<Issue>> {
    ensure_jira_configured(ctx)?;
    let tracker = Arc::clone(&ctx.issue_tracker);
    run_with_timeout("Jira search", MUTATION_TIMEOUT, async move {
        tracker.search(&query).await
    })
    .await
}

/// Unresolved issues assigned to the current user. Issues whose status is
/// in the excluded list are dropped unless `include_excluded` is set.
pub async fn my_issues(ctx: &AppContext, include_excluded: bool) -> AppResult<Vec<Issue>> {
    let issues = search_by_jql(ctx, jql::my_issues()).await?;
    log::info!("found {} assigned issue(s)", issues.len());
    if include_excluded {
        return Ok(issues);
    }
    Ok(issues
        .into_iter()
        .filter(|issue| {
            !issue
                .status
                .as_deref()
                .is_some_and(|status| ctx.config.is_excluded_status(status))
        })
        .collect())
}

/// Keyword search with one retry. If Jira rejects the generated query the
/// search is repeated with every unresolved issue, which broadens what the
/// user asked for; the retry is logged so that stays visible.
pub async fn search_by_keyword(ctx: &AppContext, keyword: &str) -> AppResult<Vec<Issue>> {
    let query = jql::keyword(keyword);
    match search_by_jql(ctx, query).await {
        Ok(issues) => {
            log::info!("found {} issue(s) matching {keyword:?}", issues.len());
            Ok(issues)
        }
        Err(err) if err.is_configuration() => Err(err),
        Err(err) => {
            log::warn!("search for {keyword:?} failed ({err}); retrying with all unresolved issues");
            search_by_jql(ctx, jql::unresolved()).await
        }
    }
}
