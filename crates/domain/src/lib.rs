pub mod config;
pub mod dns_question;
pub mod dns_record;
pub mod errors;
pub mod mac_addr;
pub mod vm;

pub use config::{
    CliOverrides, Config, ConfigError, GarpConfig, HypervisorBackend, HypervisorConfig,
    LoggingConfig, ReaperConfig, RegistryConfig, ServerConfig, UpstreamConfig, VmEntryConfig,
};
pub use dns_question::{normalize_name, DnsQuestion};
pub use dns_record::{DnsClass, QueryAnswer, Rcode, RecordData, RecordType, SoaData, ZoneRecord};
pub use errors::DomainError;
pub use mac_addr::MacAddr;
pub use vm::{VmHandle, VmPowerState, VmRecord, VmStopMode};
