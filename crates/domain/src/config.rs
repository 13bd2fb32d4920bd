mod errors;
mod garp;
mod hypervisor;
mod logging;
mod reaper;
mod registry;
mod root;
mod server;
mod upstream;
mod vms;

pub use errors::ConfigError;
pub use garp::GarpConfig;
pub use hypervisor::{HypervisorBackend, HypervisorConfig};
pub use logging::LoggingConfig;
pub use reaper::ReaperConfig;
pub use registry::RegistryConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
pub use vms::VmEntryConfig;
