use std::sync::Arc;

use crate::config::AppConfig;
use crate::events::BranchEvents;
use crate::services::{IssueTrackerService, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub events: BranchEvents,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
    ) -> Self {
        Self {
            config,
            version_control,
            issue_tracker,
            events: BranchEvents::new(),
        }
    }
}
