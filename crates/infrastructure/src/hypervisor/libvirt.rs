use super::domain_xml;
use async_trait::async_trait;
use hypnos_dns_application::ports::HypervisorDriver;
use hypnos_dns_domain::{DomainError, MacAddr, VmHandle, VmPowerState};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use virt::connect::Connect;
use virt::domain::Domain;
use virt::sys;

/// Backend L: the local libvirt API. The connection is opened once and
/// shared; libvirt itself is thread-safe, and every call runs on the
/// blocking pool so the FFI never stalls the reactor.
pub struct LibvirtDriver {
    conn: Arc<Connect>,
}

impl LibvirtDriver {
    pub fn connect(uri: &str) -> Result<Self, DomainError> {
        let conn = Connect::open(Some(uri))
            .map_err(|e| DomainError::backend("connecting to libvirt", e))?;
        info!(uri, "Connected to libvirt");
        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    fn uuid_of(handle: &VmHandle) -> Result<Uuid, DomainError> {
        match handle {
            VmHandle::Uuid(uuid) => Ok(*uuid),
            VmHandle::ObjectRef(_) => Err(DomainError::backend(
                "resolving VM handle",
                "handle is not a libvirt UUID",
            )),
        }
    }

    /// Run one blocking libvirt operation against the shared connection.
    async fn blocking<T, F>(&self, context: &'static str, op: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(&Connect) -> Result<T, virt::error::Error> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || op(&conn))
            .await
            .map_err(|e| DomainError::backend(context, e))?
            .map_err(|e| DomainError::backend(context, e))
    }

    async fn with_domain<T, F>(
        &self,
        context: &'static str,
        handle: &VmHandle,
        op: F,
    ) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(&Domain) -> Result<T, virt::error::Error> + Send + 'static,
    {
        let uuid = Self::uuid_of(handle)?;
        self.blocking(context, move |conn| {
            let domain = Domain::lookup_by_uuid_string(conn, &uuid.to_string())?;
            op(&domain)
        })
        .await
    }

    fn map_state(state: sys::virDomainState) -> VmPowerState {
        match state {
            sys::VIR_DOMAIN_RUNNING => VmPowerState::Running,
            sys::VIR_DOMAIN_BLOCKED => VmPowerState::Blocked,
            sys::VIR_DOMAIN_PAUSED => VmPowerState::Paused,
            sys::VIR_DOMAIN_SHUTDOWN => VmPowerState::Shutdown,
            sys::VIR_DOMAIN_SHUTOFF => VmPowerState::Shutoff,
            sys::VIR_DOMAIN_CRASHED => VmPowerState::Crashed,
            sys::VIR_DOMAIN_PMSUSPENDED => VmPowerState::Suspended,
            _ => VmPowerState::NoState,
        }
    }
}

#[async_trait]
impl HypervisorDriver for LibvirtDriver {
    async fn lookup_by_name(&self, name: &str) -> Result<VmHandle, DomainError> {
        let name = name.to_string();
        let uuid_string = self
            .blocking("looking up VM by name", move |conn| {
                Domain::lookup_by_name(conn, &name)?.get_uuid_string()
            })
            .await?;

        let uuid = Uuid::from_str(&uuid_string)
            .map_err(|e| DomainError::backend("parsing libvirt UUID", e))?;
        Ok(VmHandle::Uuid(uuid))
    }

    async fn mac_address(&self, handle: &VmHandle) -> Result<Option<MacAddr>, DomainError> {
        let xml = self
            .with_domain("reading domain XML", handle, |domain| {
                domain.get_xml_desc(0)
            })
            .await?;

        let mac = domain_xml::first_interface_mac(&xml);
        debug!(handle = %handle, mac = ?mac, "Extracted MAC from domain XML");
        Ok(mac)
    }

    async fn power_state(&self, handle: &VmHandle) -> Result<VmPowerState, DomainError> {
        let (state, _reason) = self
            .with_domain("reading VM state", handle, |domain| domain.get_state())
            .await?;
        Ok(Self::map_state(state))
    }

    async fn start(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.with_domain("starting VM", handle, |domain| domain.create().map(|_| ()))
            .await
    }

    async fn resume(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.with_domain("resuming VM", handle, |domain| domain.resume().map(|_| ()))
            .await
    }

    async fn shutdown(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.with_domain("shutting down VM", handle, |domain| {
            domain.shutdown().map(|_| ())
        })
        .await
    }

    async fn destroy(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.with_domain("destroying VM", handle, |domain| {
            domain.destroy().map(|_| ())
        })
        .await
    }

    async fn suspend(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.with_domain("suspending VM", handle, |domain| {
            domain.suspend().map(|_| ())
        })
        .await
    }
}
