use crate::ports::{Clock, HypervisorDriver};
use crate::services::VmRegistry;
use hypnos_dns_domain::{DomainError, VmRecord, VmStopMode};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One reaper sweep: stop every VM whose last request is older than its
/// reap TTL. Reads only; counters are the query path's to mutate.
pub struct ReapExpiredVmsUseCase {
    registry: Arc<VmRegistry>,
    driver: Arc<dyn HypervisorDriver>,
    clock: Arc<dyn Clock>,
}

impl ReapExpiredVmsUseCase {
    pub fn new(
        registry: Arc<VmRegistry>,
        driver: Arc<dyn HypervisorDriver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            driver,
            clock,
        }
    }

    /// Returns the number of VMs a stop was issued for. Per-VM failures
    /// are logged and the sweep continues; the record stays registered and
    /// is retried next sweep.
    pub async fn execute(&self) -> u64 {
        let now = self.clock.now_unix();
        let mut stopped = 0u64;

        for vm in self.registry.snapshot() {
            if !vm.is_expired(now) {
                continue;
            }

            debug!(
                vm = %vm.name,
                idle_secs = now.saturating_sub(vm.requested_ts()),
                reap_ttl = vm.reap_ttl,
                "VM expired"
            );

            match self.stop_vm(&vm).await {
                Ok(true) => stopped += 1,
                Ok(false) => {}
                Err(e) => warn!(vm = %vm.name, error = %e, "Failed to stop expired VM"),
            }
        }

        stopped
    }

    /// Stop a single VM according to its stop mode. Only `Running` VMs are
    /// acted on: paused or blocked guests already burn no CPU and stay
    /// cheap to resume.
    async fn stop_vm(&self, vm: &Arc<VmRecord>) -> Result<bool, DomainError> {
        let state = self.driver.power_state(&vm.handle).await?;
        if !state.is_running() {
            debug!(vm = %vm.name, state = %state, "Expired VM not running; nothing to stop");
            return Ok(false);
        }

        info!(vm = %vm.name, mode = %vm.stop_mode, "Stopping idle VM");
        match vm.stop_mode {
            VmStopMode::Shutdown => self.driver.shutdown(&vm.handle).await?,
            VmStopMode::Suspend => self.driver.suspend(&vm.handle).await?,
            VmStopMode::Destroy => self.driver.destroy(&vm.handle).await?,
        }
        Ok(true)
    }
}
