#![allow(dead_code)]

use async_trait::async_trait;
use hypnos_dns_application::ports::{
    Clock, DnsZone, FallbackResolver, GarpNotifier, HypervisorDriver,
};
use hypnos_dns_domain::{
    normalize_name, DnsQuestion, DomainError, MacAddr, QueryAnswer, Rcode, RecordData, RecordType,
    SoaData, VmHandle, VmPowerState, ZoneRecord,
};
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

// ============================================================================
// Mock hypervisor driver
// ============================================================================

/// One recorded driver invocation: operation name plus the handle (or VM
/// name for lookups) it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCall {
    pub op: &'static str,
    pub target: String,
}

pub struct MockHypervisor {
    states: Mutex<HashMap<String, VmPowerState>>,
    macs: Mutex<HashMap<String, MacAddr>>,
    failing_ops: Mutex<HashSet<&'static str>>,
    unknown_names: Mutex<HashSet<String>>,
    calls: Mutex<Vec<DriverCall>>,
}

impl MockHypervisor {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            macs: Mutex::new(HashMap::new()),
            failing_ops: Mutex::new(HashSet::new()),
            unknown_names: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Handles from this mock stringify back to the VM name.
    pub fn handle_for(name: &str) -> VmHandle {
        VmHandle::ObjectRef(Arc::from(name))
    }

    pub fn set_state(&self, name: &str, state: VmPowerState) {
        self.states.lock().unwrap().insert(name.to_string(), state);
    }

    pub fn set_mac(&self, name: &str, mac: MacAddr) {
        self.macs.lock().unwrap().insert(name.to_string(), mac);
    }

    /// Make one operation ("start", "shutdown", ...) fail with a backend
    /// error.
    pub fn fail_op(&self, op: &'static str) {
        self.failing_ops.lock().unwrap().insert(op);
    }

    pub fn forget_name(&self, name: &str) {
        self.unknown_names.lock().unwrap().insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_op(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.op == op).count()
    }

    /// Mutating operations only (everything but lookups and state reads).
    pub fn mutation_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| !matches!(c.op, "lookup_by_name" | "mac_address" | "power_state"))
            .count()
    }

    fn record(&self, op: &'static str, target: &str) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push(DriverCall {
            op,
            target: target.to_string(),
        });
        if self.failing_ops.lock().unwrap().contains(op) {
            return Err(DomainError::backend(op, "mock backend failure"));
        }
        Ok(())
    }

    fn transition(&self, handle: &VmHandle, op: &'static str, state: VmPowerState) -> Result<(), DomainError> {
        let name = handle.to_string();
        self.record(op, &name)?;
        self.states.lock().unwrap().insert(name, state);
        Ok(())
    }
}

impl Default for MockHypervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HypervisorDriver for MockHypervisor {
    async fn lookup_by_name(&self, name: &str) -> Result<VmHandle, DomainError> {
        self.record("lookup_by_name", name)?;
        if self.unknown_names.lock().unwrap().contains(name) {
            return Err(DomainError::backend(
                "lookup_by_name",
                format!("no VM named {}", name),
            ));
        }
        Ok(Self::handle_for(name))
    }

    async fn mac_address(&self, handle: &VmHandle) -> Result<Option<MacAddr>, DomainError> {
        let name = handle.to_string();
        self.record("mac_address", &name)?;
        Ok(self.macs.lock().unwrap().get(&name).copied())
    }

    async fn power_state(&self, handle: &VmHandle) -> Result<VmPowerState, DomainError> {
        let name = handle.to_string();
        self.record("power_state", &name)?;
        Ok(self
            .states
            .lock()
            .unwrap()
            .get(&name)
            .copied()
            .unwrap_or(VmPowerState::Shutoff))
    }

    async fn start(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.transition(handle, "start", VmPowerState::Running)
    }

    async fn resume(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.transition(handle, "resume", VmPowerState::Running)
    }

    async fn shutdown(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.transition(handle, "shutdown", VmPowerState::Shutoff)
    }

    async fn destroy(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.transition(handle, "destroy", VmPowerState::Shutoff)
    }

    async fn suspend(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.transition(handle, "suspend", VmPowerState::Paused)
    }
}

// ============================================================================
// Mock DNS zone
// ============================================================================

pub struct MockZone {
    records: RwLock<HashMap<String, HashMap<RecordType, Vec<ZoneRecord>>>>,
}

impl MockZone {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn soa_for(&self, domain: &str) -> Option<ZoneRecord> {
        self.records
            .read()
            .unwrap()
            .get(&normalize_name(domain))
            .and_then(|types| types.get(&RecordType::SOA))
            .and_then(|records| records.first().cloned())
    }

    pub fn a_count(&self, name: &str) -> usize {
        self.records
            .read()
            .unwrap()
            .get(&normalize_name(name))
            .and_then(|types| types.get(&RecordType::A))
            .map(|records| records.len())
            .unwrap_or(0)
    }
}

impl Default for MockZone {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsZone for MockZone {
    fn add_soa(&self, domain: &str, ttl: u32, serial: u32) {
        let key = normalize_name(domain);
        let soa = ZoneRecord::new(
            key.clone(),
            ttl,
            RecordData::Soa(SoaData {
                mname: Arc::from(key.as_str()),
                rname: Arc::from(format!("hostmaster.{}", key)),
                serial,
                refresh: ttl,
                retry: 3,
                expire: ttl * 2,
                minimum: ttl * 2,
            }),
        );
        self.records
            .write()
            .unwrap()
            .entry(key)
            .or_default()
            .insert(RecordType::SOA, vec![soa]);
    }

    fn add_a(&self, name: &str, ttl: u32, ip: Ipv4Addr) {
        let key = normalize_name(name);
        let record = ZoneRecord::new(key.clone(), ttl, RecordData::A(ip));
        self.records
            .write()
            .unwrap()
            .entry(key)
            .or_default()
            .insert(RecordType::A, vec![record]);
    }

    fn answer(&self, name: &str, qtype: RecordType) -> QueryAnswer {
        let records = self.records.read().unwrap();
        match records.get(&normalize_name(name)) {
            Some(types) => QueryAnswer::new(
                Rcode::NoError,
                types.get(&qtype).cloned().unwrap_or_default(),
            ),
            None => QueryAnswer::nxdomain(),
        }
    }
}

// ============================================================================
// Mock gARP notifier
// ============================================================================

pub struct MockGarpNotifier {
    sent: Mutex<Vec<(MacAddr, Ipv4Addr)>>,
    should_fail: Mutex<bool>,
}

impl MockGarpNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            should_fail: Mutex::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<(MacAddr, Ipv4Addr)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockGarpNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GarpNotifier for MockGarpNotifier {
    async fn send_garp(&self, mac: MacAddr, ip: Ipv4Addr) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push((mac, ip));
        if *self.should_fail.lock().unwrap() {
            return Err(DomainError::backend("send_garp", "mock notifier failure"));
        }
        Ok(())
    }
}

// ============================================================================
// Mock fallback resolver
// ============================================================================

pub struct MockFallbackResolver {
    responses: Mutex<HashMap<String, QueryAnswer>>,
}

impl MockFallbackResolver {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_response(&self, name: &str, answer: QueryAnswer) {
        self.responses
            .lock()
            .unwrap()
            .insert(normalize_name(name), answer);
    }

    pub fn with_a_record(name: &str, ip: &str) -> Self {
        let resolver = Self::new();
        let record = ZoneRecord::new(
            normalize_name(name),
            60,
            RecordData::A(ip.parse().unwrap()),
        );
        resolver.set_response(name, QueryAnswer::new(Rcode::NoError, vec![record]));
        resolver
    }
}

impl Default for MockFallbackResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FallbackResolver for MockFallbackResolver {
    async fn resolve(&self, question: &DnsQuestion) -> Option<QueryAnswer> {
        self.responses
            .lock()
            .unwrap()
            .get(&normalize_name(&question.name))
            .cloned()
    }
}

// ============================================================================
// Mock clock
// ============================================================================

pub struct MockClock {
    now: AtomicU64,
}

impl MockClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::Relaxed);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::Relaxed);
    }
}

impl Clock for MockClock {
    fn now_unix(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}
