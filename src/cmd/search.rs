use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cmd::branch;
use crate::context::AppContext;
use crate::domain::issue::Issue;
use crate::error::AppResult;
use crate::runtime::debounce::{Debouncer, SEARCH_DELAY};
use crate::workflow::branch::branch_for_issue;
use crate::workflow::search::{ensure_jira_configured, my_issues, search_by_keyword};

#[derive(Args, Debug, Clone)]
pub struct MineArgs {
    /// Also show issues whose status is in the excluded list.
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Issue key or words from the summary.
    pub keyword: Option<String>,
    /// Read queries from stdin and pick a result to branch from.
    #[arg(short, long)]
    pub interactive: bool,
}

pub async fn run_mine(ctx: &AppContext, args: MineArgs) -> AppResult<()> {
    let issues = my_issues(ctx, args.all).await?;
    print_issues(&issues);
    Ok(())
}

pub async fn run(ctx: &AppContext, args: SearchArgs) -> AppResult<()> {
    if args.interactive {
        return run_interactive(ctx, args.keyword).await;
    }
    let issues = search_by_keyword(ctx, args.keyword.as_deref().unwrap_or_default()).await?;
    print_issues(&issues);
    Ok(())
}

type LatestResults = Arc<Mutex<Vec<Issue>>>;

async fn run_interactive(ctx: &AppContext, initial: Option<String>) -> AppResult<()> {
    ensure_jira_configured(ctx)?;
    println!("Type to search. Enter a result number to create its branch, ':q' to quit.");

    let latest: LatestResults = Arc::new(Mutex::new(Vec::new()));
    let debouncer = Debouncer::new(SEARCH_DELAY);
    schedule_search(&debouncer, ctx, initial.unwrap_or_default(), &latest);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input == ":q" {
            break;
        }
        if let Some(issue) = pick(&latest, input) {
            debouncer.cancel();
            println!("Selected {issue}");
            if let Some(description) = issue.description.as_deref().and_then(|d| d.lines().next()) {
                println!("  {description}");
            }
            print!("Branch name [{}]: ", branch_for_issue(ctx, &issue.key));
            std::io::stdout().flush()?;
            let name = lines.next_line().await?;
            return branch::run_for_issue(ctx, &issue, name.as_deref()).await;
        }
        schedule_search(&debouncer, ctx, input.to_string(), &latest);
    }
    Ok(())
}

fn schedule_search(debouncer: &Debouncer, ctx: &AppContext, query: String, latest: &LatestResults) {
    let ctx = ctx.clone();
    let latest = Arc::clone(latest);
    debouncer.schedule(async move {
        match search_by_keyword(&ctx, &query).await {
            Ok(issues) => {
                print_issues(&issues);
                *latest.lock().unwrap_or_else(PoisonError::into_inner) = issues;
            }
            Err(err) => eprintln!("Search failed: {err}"),
        }
    });
}

/// Resolves a 1-based result number against the last printed results.
fn pick(latest: &LatestResults, input: &str) -> Option<Issue> {
    let index = input.parse::<usize>().ok()?.checked_sub(1)?;
    latest
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(index)
        .cloned()
}

fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        println!("No issues found.");
        return;
    }
    for (position, issue) in issues.iter().enumerate() {
        let marker = if issue.is_resolved() { " (resolved)" } else { "" };
        println!("{:>3}. {issue}{marker}", position + 1);
        let details: Vec<&str> = [
            issue.issue_type.as_deref(),
            issue.priority.as_deref(),
            issue.assignee.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            println!("     {}", details.join(" | "));
        }
        if let Some(url) = issue.url.as_deref() {
            println!("     {url}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::issue;

    #[test]
    fn picks_by_one_based_number() {
        let latest: LatestResults = Arc::new(Mutex::new(vec![
            issue("ABC-1", "Open"),
            issue("ABC-2", "Open"),
        ]));

        assert_eq!(pick(&latest, "2").map(|i| i.key), Some("ABC-2".to_string()));
        assert!(pick(&latest, "0").is_none());
        assert!(pick(&latest, "3").is_none());
        assert!(pick(&latest, "login").is_none());
    }
}
