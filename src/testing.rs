//! In-memory services for workflow tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{AppConfig, StoredConfig};
use crate::context::AppContext;
use crate::domain::issue::Issue;
use crate::error::{AppError, AppResult};
use crate::services::{IssueTrackerService, VersionControlService};

pub fn configured() -> AppConfig {
    let stored = StoredConfig {
        jira_url: Some("https://acme.atlassian.net".to_string()),
        jira_username: Some("dev@acme.test".to_string()),
        jira_api_token: Some("token".to_string()),
        default_base_branch: Some("develop".to_string()),
        ..StoredConfig::default()
    };
    AppConfig::resolve(stored, Path::new("."), |_| None)
}

pub fn context(vcs: &Arc<FakeGit>, tracker: &Arc<FakeTracker>) -> AppContext {
    AppContext::new(configured(), vcs.clone(), tracker.clone())
}

pub fn issue(key: &str, status: &str) -> Issue {
    Issue {
        key: key.to_string(),
        summary: Some(format!("Summary of {key}")),
        description: None,
        status: Some(status.to_string()),
        assignee: None,
        issue_type: None,
        priority: None,
        url: Some(format!("https://acme.atlassian.net/browse/{key}")),
    }
}

#[derive(Default)]
struct GitState {
    branches: HashSet<String>,
    current: Option<String>,
    dirty: bool,
    calls: Vec<String>,
    fail_on: Option<String>,
}

/// Records every call as a git-like command line.
#[derive(Default)]
pub struct FakeGit {
    state: Mutex<GitState>,
}

impl FakeGit {
    pub fn on_branch(current: &str, branches: &[&str]) -> Arc<Self> {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state.current = Some(current.to_string());
            state.branches = branches.iter().map(|b| b.to_string()).collect();
            state.branches.insert(current.to_string());
        }
        Arc::new(fake)
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.state.lock().unwrap().dirty = dirty;
    }

    pub fn fail_on(&self, call_prefix: &str) {
        self.state.lock().unwrap().fail_on = Some(call_prefix.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn current(&self) -> Option<String> {
        self.state.lock().unwrap().current.clone()
    }

    fn record(&self, call: String) -> AppResult<std::sync::MutexGuard<'_, GitState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        if state
            .fail_on
            .as_deref()
            .is_some_and(|prefix| call.starts_with(prefix))
        {
            return Err(AppError::VersionControl(format!("{call} failed")));
        }
        Ok(state)
    }
}

#[async_trait]
impl VersionControlService for FakeGit {
    async fn has_changes(&self) -> AppResult<bool> {
        let state = self.record("status --porcelain".to_string())?;
        Ok(state.dirty)
    }

    async fn stage_all(&self) -> AppResult<()> {
        let _state = self.record("add .".to_string())?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        let mut state = self.record(format!("commit -m {message}"))?;
        state.dirty = false;
        Ok(())
    }

    async fn current_branch(&self) -> AppResult<Option<String>> {
        Ok(self.state.lock().unwrap().current.clone())
    }

    async fn branch_exists(&self, name: &str) -> AppResult<bool> {
        let state = self.record(format!("branch-exists {name}"))?;
        Ok(state.branches.contains(name))
    }

    async fn checkout(&self, name: &str) -> AppResult<()> {
        let mut state = self.record(format!("checkout {name}"))?;
        if !state.branches.contains(name) {
            return Err(AppError::VersionControl(format!(
                "pathspec '{name}' did not match"
            )));
        }
        state.current = Some(name.to_string());
        Ok(())
    }

    async fn create_branch(&self, name: &str) -> AppResult<()> {
        let mut state = self.record(format!("checkout -b {name}"))?;
        state.branches.insert(name.to_string());
        state.current = Some(name.to_string());
        Ok(())
    }
}

/// Answers searches from a JQL-keyed table; unknown queries fail.
#[derive(Default)]
pub struct FakeTracker {
    responses: Mutex<HashMap<String, Result<Vec<Issue>, String>>>,
    queries: Mutex<Vec<String>>,
}

impl FakeTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, jql: &str, result: Result<Vec<Issue>, &str>) {
        self.responses
            .lock()
            .unwrap()
            .insert(jql.to_string(), result.map_err(str::to_string));
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn search(&self, jql: &str) -> AppResult<Vec<Issue>> {
        self.queries.lock().unwrap().push(jql.to_string());
        match self.responses.lock().unwrap().get(jql) {
            Some(Ok(issues)) => Ok(issues.clone()),
            Some(Err(message)) => Err(AppError::IssueTracker(message.clone())),
            None => Err(AppError::IssueTracker(format!("unexpected query {jql}"))),
        }
    }
}
