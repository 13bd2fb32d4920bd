use compact_str::CompactString;
use hypnos_dns_application::ports::DnsZone;
use hypnos_dns_domain::{
    normalize_name, QueryAnswer, Rcode, RecordData, RecordType, SoaData, ZoneRecord,
};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct TrieNode {
    children: HashMap<CompactString, TrieNode, FxBuildHasher>,
    records: HashMap<RecordType, Vec<ZoneRecord>, FxBuildHasher>,
    /// A name can exist without records of the queried type; that is
    /// NODATA, not NXDOMAIN.
    exists: bool,
}

impl TrieNode {
    fn new() -> Self {
        Self {
            children: HashMap::with_hasher(FxBuildHasher),
            records: HashMap::with_hasher(FxBuildHasher),
            exists: false,
        }
    }
}

/// Authoritative in-memory zone, keyed by reversed labels. Writes happen
/// only while VMs are registered, reads on every query, so a plain RwLock
/// around the trie is enough.
pub struct TrieZone {
    root: RwLock<TrieNode>,
}

impl TrieZone {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(TrieNode::new()),
        }
    }

    fn insert(&self, name: &str, record: ZoneRecord) {
        let qtype = record.data.record_type();
        let key = normalize_name(name);
        let mut root = self.root.write().unwrap();
        let mut node = &mut *root;
        for label in key.split('.').rev() {
            node = node.children.entry(CompactString::new(label)).or_default();
        }
        node.exists = true;
        let slot = node.records.entry(qtype).or_default();
        // Registration replaces; a re-added VM must not accumulate stale
        // records under the same owner name.
        slot.retain(|r| r.name.as_ref() != record.name.as_ref());
        slot.push(record);
    }
}

impl Default for TrieZone {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsZone for TrieZone {
    fn add_soa(&self, domain: &str, ttl: u32, serial: u32) {
        let owner: Arc<str> = Arc::from(normalize_name(domain));
        self.insert(
            domain,
            ZoneRecord::new(
                Arc::clone(&owner),
                ttl,
                RecordData::Soa(SoaData {
                    mname: Arc::clone(&owner),
                    rname: Arc::from(format!("hostmaster.{}", owner)),
                    serial,
                    refresh: ttl,
                    retry: 3,
                    expire: ttl * 2,
                    minimum: ttl * 2,
                }),
            ),
        );
        self.insert(
            domain,
            ZoneRecord::new(Arc::clone(&owner), ttl, RecordData::Ns(owner)),
        );
    }

    fn add_a(&self, name: &str, ttl: u32, ip: Ipv4Addr) {
        let owner: Arc<str> = Arc::from(normalize_name(name));
        self.insert(name, ZoneRecord::new(owner, ttl, RecordData::A(ip)));
    }

    fn answer(&self, name: &str, qtype: RecordType) -> QueryAnswer {
        let key = normalize_name(name);
        let labels: SmallVec<[&str; 8]> = key.split('.').rev().collect();

        let root = self.root.read().unwrap();
        let mut node = &*root;
        for label in labels.iter() {
            match node.children.get(*label) {
                Some(child) => node = child,
                None => return QueryAnswer::nxdomain(),
            }
        }

        if !node.exists {
            return QueryAnswer::nxdomain();
        }

        QueryAnswer::new(
            Rcode::NoError,
            node.records.get(&qtype).cloned().unwrap_or_default(),
        )
    }
}
