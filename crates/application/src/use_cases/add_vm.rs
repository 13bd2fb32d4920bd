use crate::ports::{Clock, DnsZone, HypervisorDriver};
use crate::services::VmRegistry;
use hypnos_dns_domain::{DomainError, RecordType, VmRecord, VmStopMode};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AddVmRequest {
    pub domain: String,
    pub name: String,
    pub ip: Ipv4Addr,
    pub stop_mode: VmStopMode,
    pub response_delay: Duration,
    pub dns_ttl: u32,
}

/// Binds a DNS name to a hypervisor VM: resolves the backend handle,
/// installs zone records, and registers (or re-binds) the metadata.
/// Backend failure is fatal to the call; the caller may retry, and any
/// partially installed zone state is simply overwritten then.
pub struct AddVmUseCase {
    registry: Arc<VmRegistry>,
    zone: Arc<dyn DnsZone>,
    driver: Arc<dyn HypervisorDriver>,
    clock: Arc<dyn Clock>,
}

/// The domain that owns the SOA for a registered name. Deliberately the
/// identity; swap this out for label-trimming schemes if delegation ever
/// needs them.
fn base_domain(domain: &str) -> &str {
    domain
}

impl AddVmUseCase {
    pub fn new(
        registry: Arc<VmRegistry>,
        zone: Arc<dyn DnsZone>,
        driver: Arc<dyn HypervisorDriver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            zone,
            driver,
            clock,
        }
    }

    pub async fn execute(&self, request: AddVmRequest) -> Result<Arc<VmRecord>, DomainError> {
        let handle = self.driver.lookup_by_name(&request.name).await?;

        let mac = self.driver.mac_address(&handle).await?;
        match mac {
            Some(mac) => info!(vm = %request.name, mac = %mac, "Found VM MAC address"),
            None => info!(vm = %request.name, "VM has no usable MAC address; gARP disabled for it"),
        }

        let base = base_domain(&request.domain);
        if !self.zone.has(base, RecordType::SOA) {
            self.zone
                .add_soa(base, request.dns_ttl, self.clock.now_unix() as u32);
        }
        self.zone.add_a(&request.domain, request.dns_ttl, request.ip);

        // Re-adding an existing VM keeps its counters and handle; only the
        // DNS binding is refreshed.
        let record = match self.registry.by_name(&request.name) {
            Some(existing) => existing,
            None => Arc::new(VmRecord::new(
                request.name.clone(),
                request.domain.clone(),
                handle,
                mac,
                request.ip,
                request.response_delay,
                request.dns_ttl,
                request.stop_mode,
            )),
        };
        self.registry.insert(Arc::clone(&record));

        info!(
            vm = %record.name,
            domain = %request.domain,
            ip = %request.ip,
            dns_ttl = request.dns_ttl,
            reap_ttl = record.reap_ttl,
            "VM registered"
        );

        Ok(record)
    }
}
