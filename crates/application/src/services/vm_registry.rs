use dashmap::DashMap;
use hypnos_dns_domain::{normalize_name, VmRecord};
use std::sync::Arc;

/// Dual-indexed, process-local store of managed VMs: one index by
/// registered domain (case-insensitive, per DNS rules) and one by VM name
/// (exact). The two indexes always hold the same record set; `insert` is
/// the only mutation and maintains both. The registry performs no I/O and
/// never talks to the driver; keeping registry and backend consistent is
/// the activation engine's concern.
pub struct VmRegistry {
    by_domain: DashMap<String, Arc<VmRecord>>,
    by_name: DashMap<String, Arc<VmRecord>>,
}

impl VmRegistry {
    pub fn new() -> Self {
        Self::with_capacity(7)
    }

    pub fn with_capacity(vm_count: usize) -> Self {
        Self {
            by_domain: DashMap::with_capacity(vm_count),
            by_name: DashMap::with_capacity(vm_count),
        }
    }

    /// Register a record under both indexes, replacing any previous entry
    /// with the same name (and unbinding its old domain key if the domain
    /// changed).
    pub fn insert(&self, record: Arc<VmRecord>) {
        let domain_key = normalize_name(&record.domain);
        let name_key = record.name.to_string();

        if let Some(previous) = self.by_name.insert(name_key, Arc::clone(&record)) {
            let old_domain = normalize_name(&previous.domain);
            if old_domain != domain_key {
                self.by_domain.remove(&old_domain);
            }
        }
        self.by_domain.insert(domain_key, record);
    }

    pub fn by_domain(&self, domain: &str) -> Option<Arc<VmRecord>> {
        self.by_domain
            .get(&normalize_name(domain))
            .map(|r| Arc::clone(r.value()))
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<VmRecord>> {
        self.by_name.get(name).map(|r| Arc::clone(r.value()))
    }

    /// Point-in-time copy of every record, in unspecified order. The
    /// reaper sweeps over this snapshot rather than holding map guards
    /// across driver calls.
    pub fn snapshot(&self) -> Vec<Arc<VmRecord>> {
        self.by_name
            .iter()
            .map(|r| Arc::clone(r.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for VmRegistry {
    fn default() -> Self {
        Self::new()
    }
}
