use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

pub const SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Delays work until input has been quiet for `delay`.
///
/// Scheduling replaces the pending task. Only the timer is aborted: once a
/// task has fired it runs to completion even if newer work is scheduled.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(timer) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn only_the_last_request_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for query in ["l", "lo", "login"] {
            let tx = tx.clone();
            debouncer.schedule(async move {
                let _ = tx.send(query);
            });
        }
        drop(tx);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(rx.recv().await, Some("login"));
        assert_eq!(rx.try_recv().ok(), None);
    }

    #[tokio::test]
    async fn fired_work_is_not_cancelled() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let first = tx.clone();
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = first.send("first");
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        debouncer.schedule(async move {
            let _ = tx.send("second");
        });

        assert_eq!(rx.recv().await, Some("second"));
        assert_eq!(rx.recv().await, Some("first"));
    }

    #[tokio::test]
    async fn cancel_drops_pending_work() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let (tx, mut rx) = mpsc::unbounded_channel::<&str>();

        debouncer.schedule(async move {
            let _ = tx.send("never");
        });
        debouncer.cancel();

        assert_eq!(rx.recv().await, None);
    }
}
