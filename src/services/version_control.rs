use async_trait::async_trait;

use crate::error::AppResult;

/// Primitive git operations against one working tree. Sequencing (base
/// branch switch, staging before commit) lives in `workflow`.
#[async_trait]
pub trait VersionControlService: Send + Sync {
    async fn has_changes(&self) -> AppResult<bool>;
    async fn stage_all(&self) -> AppResult<()>;
    async fn commit(&self, message: &str) -> AppResult<()>;
    /// `None` when there is no repository or HEAD is detached.
    async fn current_branch(&self) -> AppResult<Option<String>>;
    async fn branch_exists(&self, name: &str) -> AppResult<bool>;
    async fn checkout(&self, name: &str) -> AppResult<()>;
    async fn create_branch(&self, name: &str) -> AppResult<()>;
}
