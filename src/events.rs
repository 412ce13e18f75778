use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchChange {
    CheckedOut,
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchChanged {
    pub branch: String,
    pub change: BranchChange,
}

/// Fan-out of "branch changed" notifications to whoever displays the
/// current issue.
#[derive(Clone)]
pub struct BranchEvents {
    sender: broadcast::Sender<BranchChanged>,
}

impl BranchEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BranchChanged> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: BranchChanged) {
        if self.sender.send(event).is_err() {
            log::debug!("branch change published with no listeners");
        }
    }
}

impl Default for BranchEvents {
    fn default() -> Self {
        Self::new()
    }
}
