use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HypervisorBackend {
    Libvirt,
    Xapi,
}

impl HypervisorBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            HypervisorBackend::Libvirt => "libvirt",
            HypervisorBackend::Xapi => "xapi",
        }
    }
}

impl fmt::Display for HypervisorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HypervisorBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "libvirt" => Ok(HypervisorBackend::Libvirt),
            "xapi" => Ok(HypervisorBackend::Xapi),
            _ => Err(format!("Unknown hypervisor backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HypervisorConfig {
    #[serde(default = "default_backend")]
    pub backend: HypervisorBackend,

    /// Backend-specific connection string. A libvirt URI for `libvirt`,
    /// `URI:PASSWORD` for `xapi` (the username is always `root`).
    #[serde(default = "default_connstr")]
    pub connstr: String,

    /// Process-wide transport selector for the xapi backend: JSON-RPC when
    /// true, XML-RPC otherwise.
    #[serde(default)]
    pub json_rpc: bool,
}

impl Default for HypervisorConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            connstr: default_connstr(),
            json_rpc: false,
        }
    }
}

fn default_backend() -> HypervisorBackend {
    HypervisorBackend::Libvirt
}

fn default_connstr() -> String {
    "qemu:///system".to_string()
}
