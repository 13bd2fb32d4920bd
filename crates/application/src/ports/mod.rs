mod clock;
mod dns_zone;
mod fallback_resolver;
mod garp_notifier;
mod hypervisor;

pub use clock::Clock;
pub use dns_zone::DnsZone;
pub use fallback_resolver::FallbackResolver;
pub use garp_notifier::GarpNotifier;
pub use hypervisor::HypervisorDriver;

// Re-export for convenience
pub use hypnos_dns_domain::DnsQuestion;
