use crate::VmReaperJob;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Collects the process's background jobs and spawns them together.
pub struct JobRunner {
    reaper: Option<VmReaperJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            reaper: None,
            shutdown: None,
        }
    }

    pub fn with_reaper(mut self, job: VmReaperJob) -> Self {
        self.reaper = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) {
        info!("Starting background job runner");

        if let Some(job) = self.reaper {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
