use clap::Args;
use tokio::sync::broadcast::Receiver;

use crate::cmd::prompt::prompt_with_default;
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::issue::Issue;
use crate::error::{AppError, AppResult};
use crate::events::{BranchChange, BranchChanged};
use crate::workflow::branch::{branch_for_issue, create_and_checkout_branch};
use crate::workflow::status::current_status;

#[derive(Args, Debug, Clone)]
pub struct BranchArgs {
    /// Jira issue key, e.g. ABC-123.
    pub issue_key: String,
    /// Use this branch name instead of the generated one.
    #[arg(short, long)]
    pub name: Option<String>,
    /// Skip the branch name confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

pub async fn run(ctx: &AppContext, args: BranchArgs) -> AppResult<()> {
    let suggested = branch_for_issue(ctx, &args.issue_key);
    let branch = match args.name {
        Some(name) => BranchName(name.trim().to_string()),
        None if args.yes => suggested,
        None => BranchName(prompt_with_default("Branch name", suggested.as_str())?),
    };
    switch_to(ctx, &branch).await
}

/// Branch creation for an issue picked from search results. A blank or
/// missing `name` keeps the generated branch name.
pub async fn run_for_issue(ctx: &AppContext, issue: &Issue, name: Option<&str>) -> AppResult<()> {
    let branch = match name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => BranchName(name.to_string()),
        None => branch_for_issue(ctx, &issue.key),
    };
    switch_to(ctx, &branch).await
}

async fn switch_to(ctx: &AppContext, branch: &BranchName) -> AppResult<()> {
    if branch.as_str().is_empty() {
        return Err(AppError::VersionControl(
            "branch name cannot be empty".to_string(),
        ));
    }

    let events = ctx.events.subscribe();
    match create_and_checkout_branch(ctx, branch).await? {
        BranchChange::CheckedOut => println!("Checked out existing branch {branch}"),
        BranchChange::Created => println!(
            "Created branch {branch} from {}",
            ctx.config.default_base_branch
        ),
    }
    refresh_status(ctx, events).await
}

/// Reprints the status line once the branch-changed event arrives.
async fn refresh_status(ctx: &AppContext, mut events: Receiver<BranchChanged>) -> AppResult<()> {
    if let Ok(event) = events.recv().await {
        log::debug!("branch {} ({:?})", event.branch, event.change);
        let status = current_status(ctx).await?;
        println!("{status}");
    }
    Ok(())
}
