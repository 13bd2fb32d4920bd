use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Initial capacity hint for the VM registry indexes.
    #[serde(default = "default_vm_count")]
    pub vm_count: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            vm_count: default_vm_count(),
        }
    }
}

fn default_vm_count() -> usize {
    7
}
