#![allow(dead_code)]

use async_trait::async_trait;
use hypnos_dns_application::ports::{Clock, HypervisorDriver};
use hypnos_dns_domain::{DomainError, MacAddr, VmHandle, VmPowerState};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockHypervisor {
    states: Mutex<HashMap<String, VmPowerState>>,
    failing_ops: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl MockHypervisor {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            failing_ops: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn handle_for(name: &str) -> VmHandle {
        VmHandle::ObjectRef(Arc::from(name))
    }

    pub fn set_state(&self, name: &str, state: VmPowerState) {
        self.states.lock().unwrap().insert(name.to_string(), state);
    }

    pub fn fail_op(&self, op: &'static str) {
        self.failing_ops.lock().unwrap().insert(op);
    }

    pub fn count_op(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(o, _)| *o == op).count()
    }

    pub fn stop_call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| matches!(*op, "shutdown" | "suspend" | "destroy"))
            .count()
    }

    fn record(&self, op: &'static str, target: &str) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push((op, target.to_string()));
        if self.failing_ops.lock().unwrap().contains(op) {
            return Err(DomainError::backend(op, "mock backend failure"));
        }
        Ok(())
    }

    fn transition(
        &self,
        handle: &VmHandle,
        op: &'static str,
        state: VmPowerState,
    ) -> Result<(), DomainError> {
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
        Ok(Self::handle_for(name))
    }

    async fn mac_address(&self, handle: &VmHandle) -> Result<Option<MacAddr>, DomainError> {
        self.record("mac_address", &handle.to_string())?;
        Ok(None)
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
