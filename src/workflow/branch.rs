use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::error::AppResult;
use crate::events::{BranchChange, BranchChanged};
use crate::runtime::deadline::{MUTATION_TIMEOUT, QUERY_TIMEOUT, run_with_timeout};

pub fn branch_for_issue(ctx: &AppContext, issue_key: &str) -> BranchName {
    BranchName::for_issue(&ctx.config.branch_prefix, issue_key)
}

/// Switches to `branch`, creating it from the configured base branch when
/// it does not exist yet, and publishes the change.
///
/// Git steps are not rolled back: if creating the branch fails after the
/// base checkout succeeded, the working tree stays on the base branch.
pub async fn create_and_checkout_branch(
    ctx: &AppContext,
    branch: &BranchName,
) -> AppResult<BranchChange> {
    let name = branch.as_str().to_string();

    let exists = {
        let vcs = Arc::clone(&ctx.version_control);
        let name = name.clone();
        run_with_timeout("branch lookup", QUERY_TIMEOUT, async move {
            vcs.branch_exists(&name).await
        })
        .await?
    };

    let vcs = Arc::clone(&ctx.version_control);
    let change = if exists {
        log::info!("branch {name} exists; checking it out");
        let target = name.clone();
        run_with_timeout("checkout", MUTATION_TIMEOUT, async move {
            vcs.checkout(&target).await
        })
        .await?;
        BranchChange::CheckedOut
    } else {
        let base = ctx.config.default_base_branch.clone();
        log::info!("creating branch {name} from {base}");
        let target = name.clone();
        run_with_timeout("branch creation", MUTATION_TIMEOUT, async move {
            vcs.checkout(&base).await?;
            vcs.create_branch(&target).await
        })
        .await?;
        BranchChange::Created
    };

    ctx.events.publish(BranchChanged {
        branch: name,
        change,
    });
    Ok(change)
}
