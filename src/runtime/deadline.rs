use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Branch and repository lookups.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
/// Working tree status checks.
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(10);
/// Commits, branch switches and Jira searches.
pub const MUTATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Spawns `task` and waits at most `limit` for its result.
///
/// On expiry the caller gets [`AppError::Timeout`] while the task keeps
/// running to completion in the background; git and HTTP calls are never
/// interrupted halfway.
pub async fn run_with_timeout<F, T>(operation: &'static str, limit: Duration, task: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(task);
    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => Err(AppError::Task(format!("{operation}: {err}"))),
        Err(_) => {
            log::warn!("{operation} did not finish within {}s", limit.as_secs());
            Err(AppError::Timeout { operation, limit })
        }
    }
}
