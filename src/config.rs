use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = "jira-branch";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_BRANCH_PREFIX: &str = "feat";
pub const DEFAULT_EXCLUDED_STATUSES: [&str; 3] = ["Done", "Resolved", "Closed"];

/// Effective settings for one invocation: the stored file merged with
/// `JB_*` environment overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_url: Option<String>,
    pub jira_username: Option<String>,
    pub jira_api_token: Option<String>,
    pub github_token: Option<String>,
    pub default_base_branch: String,
    pub branch_prefix: String,
    pub excluded_statuses: Vec<String>,
    pub workspace_root: PathBuf,
}

impl AppConfig {
    pub fn load(workspace_hint: &Path) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, workspace_hint, |name| env::var(name).ok()))
    }

    pub fn resolve<F>(stored: StoredConfig, workspace_hint: &Path, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |var: &str, stored: Option<String>| {
            lookup(var)
                .or(stored)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let excluded_statuses = stored
            .excluded_statuses
            .unwrap_or_else(|| DEFAULT_EXCLUDED_STATUSES.map(String::from).to_vec());

        Self {
            jira_url: pick("JB_JIRA_URL", stored.jira_url).map(|url| sanitize_url(&url)),
            jira_username: pick("JB_JIRA_USERNAME", stored.jira_username),
            jira_api_token: pick("JB_JIRA_API_TOKEN", stored.jira_api_token),
            github_token: pick("JB_GITHUB_TOKEN", stored.github_token),
            default_base_branch: pick("JB_BASE_BRANCH", stored.default_base_branch)
                .unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string()),
            branch_prefix: pick("JB_BRANCH_PREFIX", stored.branch_prefix)
                .unwrap_or_else(|| DEFAULT_BRANCH_PREFIX.to_string()),
            excluded_statuses,
            workspace_root: workspace_hint.to_path_buf(),
        }
    }

    pub fn is_jira_configured(&self) -> bool {
        self.jira_url.is_some() && self.jira_username.is_some() && self.jira_api_token.is_some()
    }

    pub fn issue_url(&self, key: &str) -> Option<String> {
        self.jira_url
            .as_deref()
            .map(|base| format!("{base}/browse/{key}"))
    }

    pub fn is_excluded_status(&self, status: &str) -> bool {
        self.excluded_statuses
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(status.trim()))
    }
}

/// On-disk form of the settings. Every field is optional so a partially
/// filled file still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_base_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_statuses: Option<Vec<String>>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Strips whitespace anywhere in the URL and a single trailing slash.
pub fn sanitize_url(url: &str) -> String {
    let sanitized: String = url.trim().chars().filter(|c| *c != ' ').collect();
    match sanitized.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => sanitized,
    }
}

pub fn validate_url(url: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }
    match Url::parse(&sanitize_url(url)) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(err) => {
            log::warn!("invalid url {url:?}: {err}");
            false
        }
    }
}
