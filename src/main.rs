mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod events;
mod infra;
mod runtime;
mod services;
#[cfg(test)]
mod testing;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::cmd::branch::BranchArgs;
use crate::cmd::commit::CommitArgs;
use crate::cmd::config::{self as config_cmd, ConfigArgs, ConfigCommand};
use crate::cmd::prompt::confirm;
use crate::cmd::search::{MineArgs, SearchArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::jira::JiraClient;

#[derive(Parser)]
#[command(
    name = "jb",
    author,
    version,
    about = "Create git branches and commits from Jira issues"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List unresolved issues assigned to you.
    Mine(MineArgs),
    /// Search unresolved issues by key or summary.
    Search(SearchArgs),
    /// Create or check out the branch for an issue.
    Branch(BranchArgs),
    /// Commit all changes, prefixed with the current branch's issue key.
    Commit(CommitArgs),
    /// Show the current branch and its issue.
    Status,
    /// Open an issue in the browser.
    Open {
        /// Issue key; defaults to the key in the current branch name.
        issue_key: Option<String>,
    },
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Config(args) => return config_cmd::run(args.command),
        command => command,
    };

    let context = build_context()?;
    let result = dispatch(&context, command).await;

    match result {
        Err(err) if err.is_configuration() && !context.config.is_jira_configured() => {
            eprintln!("{err}");
            if confirm("Jira is not configured. Open the configuration wizard now?")? {
                config_cmd::run(ConfigCommand::Init)?;
                println!("Run the command again to use the new settings.");
                Ok(())
            } else {
                Err(err)
            }
        }
        other => other,
    }
}

fn build_context() -> AppResult<AppContext> {
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(&cwd)?;

    if !config.is_jira_configured() {
        log::warn!("Jira is not fully configured; searches will fail");
    }
    if config.github_token.is_some() {
        log::debug!("GitHub token present; not used by any command yet");
    }

    let git = Arc::new(GitCli::new(config.workspace_root.clone()));
    let issue_tracker = Arc::new(JiraClient::new(
        config.jira_url.clone(),
        config.jira_username.clone(),
        config.jira_api_token.clone(),
    )?);

    Ok(AppContext::new(config, git, issue_tracker))
}

async fn dispatch(ctx: &AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Mine(args) => cmd::search::run_mine(ctx, args).await,
        Commands::Search(args) => cmd::search::run(ctx, args).await,
        Commands::Branch(args) => cmd::branch::run(ctx, args).await,
        Commands::Commit(args) => cmd::commit::run(ctx, args).await,
        Commands::Status => cmd::status::run(ctx).await,
        Commands::Open { issue_key } => cmd::status::run_open(ctx, issue_key).await,
        Commands::Config(args) => config_cmd::run(args.command),
    }
}
