pub mod forwarding;
pub mod server;
pub mod zone;

pub use forwarding::UdpFallbackResolver;
pub use server::DnsServerHandler;
pub use zone::TrieZone;
