use clap::{Args, Subcommand};

use crate::cmd::prompt::{PromptAction, prompt};
use crate::config::{
    DEFAULT_BASE_BRANCH, DEFAULT_BRANCH_PREFIX, DEFAULT_EXCLUDED_STATUSES, StoredConfig,
    config_file_path, validate_url,
};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring jb.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "Jira URL (e.g., https://company.atlassian.net)",
        &mut cfg.jira_url,
        false,
    )?;
    if let Some(url) = cfg.jira_url.as_deref() {
        if !validate_url(url) {
            return Err(AppError::Configuration(format!("invalid Jira URL: {url}")));
        }
    }
    apply_prompt("Jira username (email)", &mut cfg.jira_username, false)?;
    apply_prompt("Jira API token", &mut cfg.jira_api_token, true)?;
    apply_prompt("GitHub token", &mut cfg.github_token, true)?;
    apply_prompt(
        &format!("Default base branch (default {DEFAULT_BASE_BRANCH})"),
        &mut cfg.default_base_branch,
        false,
    )?;
    apply_prompt(
        &format!("Branch prefix (default {DEFAULT_BRANCH_PREFIX})"),
        &mut cfg.branch_prefix,
        false,
    )?;

    let mut statuses = cfg.excluded_statuses.as_ref().map(|list| list.join(", "));
    apply_prompt(
        "Excluded statuses, comma separated",
        &mut statuses,
        false,
    )?;
    cfg.excluded_statuses = statuses.map(|value| parse_status_list(&value));

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Jira URL: {}", display_value(&cfg.jira_url));
    println!("Jira username: {}", display_value(&cfg.jira_username));
    println!("Jira API token: {}", mask_secret(&cfg.jira_api_token));
    println!("GitHub token: {}", mask_secret(&cfg.github_token));
    println!(
        "Default base branch: {}",
        cfg.default_base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    );
    println!(
        "Branch prefix: {}",
        cfg.branch_prefix.as_deref().unwrap_or(DEFAULT_BRANCH_PREFIX)
    );
    let statuses = cfg
        .excluded_statuses
        .clone()
        .unwrap_or_else(|| DEFAULT_EXCLUDED_STATUSES.map(String::from).to_vec());
    println!("Excluded statuses: {}", statuses.join(", "));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn parse_status_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .map(str::to_string)
        .collect()
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
