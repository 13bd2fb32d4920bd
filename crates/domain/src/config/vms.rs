use crate::vm::VmStopMode;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// One `[[vms]]` table: a VM to register at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VmEntryConfig {
    /// Fully-qualified domain the A record answers for.
    pub domain: String,

    /// VM name at the hypervisor.
    pub name: String,

    /// IPv4 address served for `domain`.
    pub ip: Ipv4Addr,

    #[serde(default = "default_stop_mode")]
    pub stop_mode: VmStopMode,

    /// Wait after starting the VM before the DNS answer goes out, giving
    /// the guest time to begin accepting connections.
    #[serde(default)]
    pub response_delay_secs: f64,

    /// DNS TTL of the A record. The reap TTL is derived as twice this.
    #[serde(default = "default_dns_ttl")]
    pub dns_ttl: u32,
}

fn default_stop_mode() -> VmStopMode {
    VmStopMode::Shutdown
}

fn default_dns_ttl() -> u32 {
    60
}
