use hypnos_dns_domain::{QueryAnswer, RecordType};
use std::net::Ipv4Addr;

/// In-memory authoritative zone. Mutation happens during VM registration
/// only, so implementations take `&self` and handle their own interior
/// locking.
pub trait DnsZone: Send + Sync {
    /// Install the SOA (and NS) for `domain`. Secondary timers derive from
    /// the TTL: refresh = ttl, retry = 3, expire = ttl * 2, minimum =
    /// ttl * 2.
    fn add_soa(&self, domain: &str, ttl: u32, serial: u32);

    fn add_a(&self, name: &str, ttl: u32, ip: Ipv4Addr);

    /// Point lookup by (name, qtype). A missing name is NXDOMAIN; a known
    /// name without records of `qtype` is NOERROR with no records.
    fn answer(&self, name: &str, qtype: RecordType) -> QueryAnswer;

    fn has(&self, name: &str, qtype: RecordType) -> bool {
        self.answer(name, qtype).is_noerror()
    }
}
