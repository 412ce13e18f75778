use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    workspace_root: PathBuf,
}

struct GitOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn run(&self, args: &[&str]) -> AppResult<GitOutput> {
        self.run_in(&self.workspace_root, args).await
    }

    async fn run_in(&self, dir: &Path, args: &[&str]) -> AppResult<GitOutput> {
        log::debug!("git {} (in {})", args.join(" "), dir.display());
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_checked(&self, args: &[&str]) -> AppResult<String> {
        self.run_checked_in(&self.workspace_root, args).await
    }

    /// Runs git and turns a non-zero exit into an error carrying git's
    /// output. Some failures (`nothing to commit`) only print to stdout.
    async fn run_checked_in(&self, dir: &Path, args: &[&str]) -> AppResult<String> {
        let output = self.run_in(dir, args).await?;
        if output.success {
            return Ok(output.stdout);
        }
        let detail = match output.stderr.trim() {
            "" => output.stdout.trim(),
            stderr => stderr,
        };
        let detail = if detail.is_empty() {
            "no output from git"
        } else {
            detail
        };
        log::error!("git {} failed: {detail}", args.join(" "));
        Err(AppError::VersionControl(format!(
            "git {} failed: {detail}",
            args.join(" ")
        )))
    }

    /// Top level of the working tree, which may be above `workspace_root`.
    async fn repository_root(&self) -> AppResult<PathBuf> {
        let root = self.run_checked(&["rev-parse", "--show-toplevel"]).await?;
        Ok(PathBuf::from(root.trim()))
    }

    async fn is_repository(&self) -> AppResult<bool> {
        let output = self.run(&["rev-parse", "--is-inside-work-tree"]).await?;
        Ok(output.success && output.stdout.trim() == "true")
    }

    async fn require_repository(&self) -> AppResult<()> {
        if self.is_repository().await? {
            Ok(())
        } else {
            Err(AppError::VersionControl(format!(
                "no git repository found at {}",
                self.workspace_root.display()
            )))
        }
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn has_changes(&self) -> AppResult<bool> {
        self.require_repository().await?;
        let status = self.run_checked(&["status", "--porcelain"]).await?;
        Ok(!status.trim().is_empty())
    }

    async fn stage_all(&self) -> AppResult<()> {
        let root = self.repository_root().await?;
        self.run_checked_in(&root, &["add", "."]).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        if message.trim().is_empty() {
            return Err(AppError::VersionControl(
                "commit message cannot be empty".to_string(),
            ));
        }
        self.run_checked(&["commit", "-m", message]).await.map(|_| ())
    }

    async fn current_branch(&self) -> AppResult<Option<String>> {
        if !self.is_repository().await? {
            return Ok(None);
        }
        let output = self.run(&["symbolic-ref", "--short", "-q", "HEAD"]).await?;
        let name = output.stdout.trim();
        if output.success && !name.is_empty() {
            Ok(Some(name.to_string()))
        } else {
            Ok(None)
        }
    }

    async fn branch_exists(&self, name: &str) -> AppResult<bool> {
        let refs = self
            .run_checked(&[
                "for-each-ref",
                "--format=%(refname)",
                "refs/heads",
                "refs/remotes",
            ])
            .await?;
        Ok(refs.lines().any(|refname| ref_matches_branch(refname.trim(), name)))
    }

    async fn checkout(&self, name: &str) -> AppResult<()> {
        if name.is_empty() {
            return Err(AppError::VersionControl(
                "branch name cannot be empty".to_string(),
            ));
        }
        self.run_checked(&["checkout", name]).await.map(|_| ())
    }

    async fn create_branch(&self, name: &str) -> AppResult<()> {
        if name.is_empty() {
            return Err(AppError::VersionControl(
                "branch name cannot be empty".to_string(),
            ));
        }
        self.run_checked(&["checkout", "-b", name]).await.map(|_| ())
    }
}

/// Local branches match by name; remote branches match by the name used
/// for local operations (`refs/remotes/origin/x` matches `x`).
fn ref_matches_branch(refname: &str, name: &str) -> bool {
    if let Some(local) = refname.strip_prefix("refs/heads/") {
        return local == name;
    }
    refname
        .strip_prefix("refs/remotes/")
        .and_then(|remote| remote.split_once('/'))
        .is_some_and(|(_, branch)| branch != "HEAD" && branch == name)
}
