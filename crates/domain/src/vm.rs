use crate::mac_addr::MacAddr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Policy applied when the reaper stops an idle VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VmStopMode {
    Destroy,
    Suspend,
    Shutdown,
}

impl VmStopMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VmStopMode::Destroy => "destroy",
            VmStopMode::Suspend => "suspend",
            VmStopMode::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for VmStopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VmStopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "destroy" => Ok(VmStopMode::Destroy),
            "suspend" => Ok(VmStopMode::Suspend),
            "shutdown" => Ok(VmStopMode::Shutdown),
            _ => Err(format!("Unknown stop mode: {}", s)),
        }
    }
}

/// Union of both backends' power states. Drivers map their native state
/// onto this enum; no caller ever sees a backend-specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmPowerState {
    Running,
    Paused,
    Shutdown,
    Shutoff,
    NoState,
    Blocked,
    Crashed,
    Suspended,
    Halted,
}

impl VmPowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VmPowerState::Running => "running",
            VmPowerState::Paused => "paused",
            VmPowerState::Shutdown => "shutdown",
            VmPowerState::Shutoff => "shutoff",
            VmPowerState::NoState => "nostate",
            VmPowerState::Blocked => "blocked",
            VmPowerState::Crashed => "crashed",
            VmPowerState::Suspended => "suspended",
            VmPowerState::Halted => "halted",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, VmPowerState::Running)
    }

    /// States the activation engine may start a VM from (cold start).
    pub fn is_cold(&self) -> bool {
        matches!(
            self,
            VmPowerState::Shutdown | VmPowerState::Shutoff | VmPowerState::Halted
        )
    }
}

impl fmt::Display for VmPowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backend-specific VM identifier, fixed at registration. The enum keeps
/// the "exactly one variant populated" rule structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmHandle {
    /// Libvirt domain UUID.
    Uuid(Uuid),
    /// XAPI opaque object reference.
    ObjectRef(Arc<str>),
}

impl fmt::Display for VmHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmHandle::Uuid(uuid) => write!(f, "{}", uuid),
            VmHandle::ObjectRef(r) => write!(f, "{}", r),
        }
    }
}

/// One managed VM: immutable identity plus the counters the query path
/// mutates. Records are shared between both registry indexes, so the
/// counters are atomics; stats are advisory and Relaxed ordering is enough.
#[derive(Debug)]
pub struct VmRecord {
    pub name: Arc<str>,
    pub domain: Arc<str>,
    pub handle: VmHandle,
    pub mac: Option<MacAddr>,
    pub ip: Ipv4Addr,
    pub response_delay: Duration,
    /// DNS TTL of the served A record, in seconds.
    pub dns_ttl: u32,
    /// Idle threshold for the reaper: twice the DNS TTL, so a client that
    /// cached the record gets one full TTL of grace after its last
    /// observed resolution.
    pub reap_ttl: u64,
    pub stop_mode: VmStopMode,

    started_ts: AtomicU64,
    requested_ts: AtomicU64,
    total_requests: AtomicU64,
    total_starts: AtomicU64,
}

impl VmRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<Arc<str>>,
        domain: impl Into<Arc<str>>,
        handle: VmHandle,
        mac: Option<MacAddr>,
        ip: Ipv4Addr,
        response_delay: Duration,
        dns_ttl: u32,
        stop_mode: VmStopMode,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            handle,
            mac,
            ip,
            response_delay,
            dns_ttl,
            reap_ttl: u64::from(dns_ttl) * 2,
            stop_mode,
            started_ts: AtomicU64::new(0),
            requested_ts: AtomicU64::new(0),
            total_requests: AtomicU64::new(0),
            total_starts: AtomicU64::new(0),
        }
    }

    pub fn started_ts(&self) -> u64 {
        self.started_ts.load(Ordering::Relaxed)
    }

    pub fn requested_ts(&self) -> u64 {
        self.requested_ts.load(Ordering::Relaxed)
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn total_starts(&self) -> u64 {
        self.total_starts.load(Ordering::Relaxed)
    }

    pub fn note_requested(&self, now: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.requested_ts.store(now, Ordering::Relaxed);
    }

    pub fn note_started(&self, now: u64) {
        self.total_starts.fetch_add(1, Ordering::Relaxed);
        self.started_ts.store(now, Ordering::Relaxed);
    }

    /// A never-queried record has `requested_ts == 0` (the epoch), so a
    /// freshly registered VM counts as idle from the first sweep.
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.requested_ts()) > self.reap_ttl
    }
}
