use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::garp::GarpConfig;
use super::hypervisor::{HypervisorBackend, HypervisorConfig};
use super::logging::LoggingConfig;
use super::reaper::ReaperConfig;
use super::registry::RegistryConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use super::vms::VmEntryConfig;

/// Main configuration for hypnos-dns.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub hypervisor: HypervisorConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub garp: GarpConfig,

    #[serde(default)]
    pub reaper: ReaperConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub vms: Vec<VmEntryConfig>,
}

impl Config {
    /// Load configuration from file or use defaults.
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. hypnos-dns.toml in current directory
    /// 3. /etc/hypnos-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("hypnos-dns.toml").exists() {
            Self::from_file("hypnos-dns.toml")?
        } else if std::path::Path::new("/etc/hypnos-dns/config.toml").exists() {
            Self::from_file("/etc/hypnos-dns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(backend) = overrides.backend {
            self.hypervisor.backend = backend;
        }
        if let Some(connstr) = overrides.connstr {
            self.hypervisor.connstr = connstr;
        }
        if let Some(resolver) = overrides.forward_resolver {
            self.upstream.forward_resolver = Some(resolver);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.hypervisor.connstr.is_empty() {
            return Err(ConfigError::Validation(
                "Hypervisor connection string cannot be empty".to_string(),
            ));
        }

        for vm in &self.vms {
            if vm.name.is_empty() || vm.domain.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "VM entry must have a name and a domain (got name='{}', domain='{}')",
                    vm.name, vm.domain
                )));
            }
            if vm.response_delay_secs < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "VM '{}' has a negative response delay",
                    vm.name
                )));
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub backend: Option<HypervisorBackend>,
    pub connstr: Option<String>,
    pub forward_resolver: Option<String>,
    pub log_level: Option<String>,
}
