use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GarpConfig {
    /// Registered domain of the VM hosting the gratuitous-ARP notifier.
    /// Unset disables gARP priming entirely.
    #[serde(default)]
    pub notifier_domain: Option<String>,

    #[serde(default = "default_notifier_port")]
    pub port: u16,
}

fn default_notifier_port() -> u16 {
    4001
}
