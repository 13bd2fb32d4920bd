use async_trait::async_trait;
use hypnos_dns_domain::{DomainError, MacAddr};
use std::net::Ipv4Addr;

/// Link-layer "VM is live" announcement, used to prime upstream ARP
/// caches so the first SYN after an activation does not stall on ARP
/// resolution. Failures are always non-fatal to the caller.
#[async_trait]
pub trait GarpNotifier: Send + Sync {
    async fn send_garp(&self, mac: MacAddr, ip: Ipv4Addr) -> Result<(), DomainError>;
}
