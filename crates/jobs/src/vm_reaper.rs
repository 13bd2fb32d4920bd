use hypnos_dns_application::ReapExpiredVmsUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodic sweep that stops VMs idle past their reap TTL.
pub struct VmReaperJob {
    reap: Arc<ReapExpiredVmsUseCase>,
    interval_secs: u64,
    shutdown: Option<CancellationToken>,
}

impl VmReaperJob {
    pub fn new(reap: Arc<ReapExpiredVmsUseCase>) -> Self {
        Self {
            reap,
            interval_secs: 10,
            shutdown: None,
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting VM reaper job");

        tokio::spawn(async move {
            let token = self.shutdown.clone().unwrap_or_default();
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            // The first tick fires immediately; skip it so a fresh process
            // does not reap before the first queries can arrive.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("VM reaper job stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        let stopped = self.reap.execute().await;
                        if stopped > 0 {
                            info!(stopped, "Reaper sweep stopped idle VMs");
                        } else {
                            debug!("Reaper sweep found nothing to stop");
                        }
                    }
                }
            }
        });
    }
}
