use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::commit::{CommitOutcome, commit_with_issue_key};

#[derive(Args, Debug, Clone)]
pub struct CommitArgs {
    /// Commit message; the issue key from the current branch is prepended.
    #[arg(short, long)]
    pub message: String,
}

pub async fn run(ctx: &AppContext, args: CommitArgs) -> AppResult<()> {
    match commit_with_issue_key(ctx, &args.message).await? {
        CommitOutcome::Committed(message) => println!("Committed: {}", message.as_str()),
        CommitOutcome::NoChanges => println!("No changes to commit."),
    }
    Ok(())
}
