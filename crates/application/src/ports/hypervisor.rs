use async_trait::async_trait;
use hypnos_dns_domain::{DomainError, MacAddr, VmHandle, VmPowerState};

/// Uniform control surface over one hypervisor backend. The activation
/// engine and the reaper only ever see this trait; backend variance stays
/// inside the driver implementations.
#[async_trait]
pub trait HypervisorDriver: Send + Sync {
    /// Resolve a VM name to the backend's handle for it.
    async fn lookup_by_name(&self, name: &str) -> Result<VmHandle, DomainError>;

    /// First NIC's MAC, if the backend can report one. `Ok(None)` is not
    /// an error; gARP priming is simply skipped for such VMs.
    async fn mac_address(&self, handle: &VmHandle) -> Result<Option<MacAddr>, DomainError>;

    async fn power_state(&self, handle: &VmHandle) -> Result<VmPowerState, DomainError>;

    /// Cold-start a defined VM.
    async fn start(&self, handle: &VmHandle) -> Result<(), DomainError>;

    /// Resume a paused VM, preserving guest state.
    async fn resume(&self, handle: &VmHandle) -> Result<(), DomainError>;

    /// Ask the guest to shut down cleanly.
    async fn shutdown(&self, handle: &VmHandle) -> Result<(), DomainError>;

    /// Hard-stop the VM.
    async fn destroy(&self, handle: &VmHandle) -> Result<(), DomainError>;

    /// Pause the VM in memory.
    async fn suspend(&self, handle: &VmHandle) -> Result<(), DomainError>;
}
