pub mod domain_xml;
pub mod libvirt;
pub mod xapi;
pub mod xapi_rpc;

pub use libvirt::LibvirtDriver;
pub use xapi::XapiDriver;

use hypnos_dns_application::ports::HypervisorDriver;
use hypnos_dns_domain::{DomainError, HypervisorBackend, HypervisorConfig};
use std::sync::Arc;

/// Build the configured backend driver. This is the only place the
/// backend tag is examined; everything downstream sees the trait.
pub async fn build_driver(
    config: &HypervisorConfig,
) -> Result<Arc<dyn HypervisorDriver>, DomainError> {
    match config.backend {
        HypervisorBackend::Libvirt => {
            let driver = LibvirtDriver::connect(&config.connstr)?;
            Ok(Arc::new(driver))
        }
        HypervisorBackend::Xapi => {
            let driver = XapiDriver::connect(&config.connstr, config.json_rpc).await?;
            Ok(Arc::new(driver))
        }
    }
}
