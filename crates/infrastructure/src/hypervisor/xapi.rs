use super::xapi_rpc;
use async_trait::async_trait;
use hypnos_dns_application::ports::HypervisorDriver;
use hypnos_dns_domain::{DomainError, MacAddr, VmHandle, VmPowerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

const XAPI_USERNAME: &str = "root";
const LOGIN_VERSION: &str = "1.0";
const ORIGINATOR: &str = "hypnos-dns";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcProtocol {
    JsonRpc,
    XmlRpc,
}

/// HTTP transport to one XAPI host, speaking whichever RPC flavor the
/// process-wide flag selected.
struct XapiTransport {
    client: reqwest::Client,
    uri: String,
    protocol: RpcProtocol,
}

impl XapiTransport {
    fn new(uri: String, protocol: RpcProtocol) -> Self {
        Self {
            client: reqwest::Client::new(),
            uri,
            protocol,
        }
    }

    async fn call(&self, method: &str, params: &[Value]) -> Result<Value, DomainError> {
        match self.protocol {
            RpcProtocol::JsonRpc => self.call_json(method, params).await,
            RpcProtocol::XmlRpc => self.call_xml(method, params).await,
        }
    }

    async fn call_json(&self, method: &str, params: &[Value]) -> Result<Value, DomainError> {
        let endpoint = format!("{}/jsonrpc", self.uri.trim_end_matches('/'));
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("calling {}", method), e))?;
        let reply: Value = response
            .json()
            .await
            .map_err(|e| DomainError::backend(format!("decoding {} reply", method), e))?;

        if let Some(error) = reply.get("error") {
            return Err(DomainError::backend(
                format!("XAPI call {} failed", method),
                error,
            ));
        }
        Ok(reply.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn call_xml(&self, method: &str, params: &[Value]) -> Result<Value, DomainError> {
        let envelope = xapi_rpc::build_envelope(method, params)?;

        let response = self
            .client
            .post(&self.uri)
            .header("content-type", "text/xml")
            .body(envelope)
            .send()
            .await
            .map_err(|e| DomainError::backend(format!("calling {}", method), e))?;
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::backend(format!("reading {} reply", method), e))?;

        xapi_rpc::parse_response(&text)
    }
}

/// Backend X: a remote XAPI host. One session, opened at construction,
/// shared by every call. Cold `start` and `suspend` are not exposed by
/// this control surface and fail outright.
pub struct XapiDriver {
    transport: XapiTransport,
    session: String,
}

impl XapiDriver {
    /// `connstr` is `URI:PASSWORD`; the split happens on the last colon so
    /// ports inside the URI survive.
    pub async fn connect(connstr: &str, json_rpc: bool) -> Result<Self, DomainError> {
        let (uri, password) = connstr.rsplit_once(':').ok_or_else(|| {
            DomainError::ConfigError(format!(
                "xapi connection string must be URI:PASSWORD (got '{}')",
                connstr
            ))
        })?;

        let protocol = if json_rpc {
            RpcProtocol::JsonRpc
        } else {
            RpcProtocol::XmlRpc
        };
        let transport = XapiTransport::new(uri.to_string(), protocol);

        let session = transport
            .call(
                "session.login_with_password",
                &[
                    json!(XAPI_USERNAME),
                    json!(password),
                    json!(LOGIN_VERSION),
                    json!(ORIGINATOR),
                ],
            )
            .await?;
        let session = as_string(session, "session.login_with_password")?;

        info!(uri, protocol = ?protocol, "Logged in to XAPI host");
        Ok(Self { transport, session })
    }

    fn object_ref(handle: &VmHandle) -> Result<&str, DomainError> {
        match handle {
            VmHandle::ObjectRef(reference) => Ok(reference),
            VmHandle::Uuid(_) => Err(DomainError::backend(
                "resolving VM handle",
                "handle is not a XAPI object reference",
            )),
        }
    }

    async fn vm_call(
        &self,
        method: &str,
        handle: &VmHandle,
        extra: &[Value],
    ) -> Result<Value, DomainError> {
        let reference = Self::object_ref(handle)?;
        let mut params = vec![json!(self.session), json!(reference)];
        params.extend_from_slice(extra);
        self.transport.call(method, &params).await
    }

    fn map_state(state: &str) -> VmPowerState {
        match state {
            "Running" => VmPowerState::Running,
            "Halted" => VmPowerState::Halted,
            "Paused" => VmPowerState::Paused,
            "Suspended" => VmPowerState::Suspended,
            _ => VmPowerState::NoState,
        }
    }
}

fn as_string(value: Value, context: &str) -> Result<String, DomainError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DomainError::backend(
            context,
            format!("expected a string, got {}", other),
        )),
    }
}

#[async_trait]
impl HypervisorDriver for XapiDriver {
    async fn lookup_by_name(&self, name: &str) -> Result<VmHandle, DomainError> {
        let refs = self
            .transport
            .call(
                "VM.get_by_name_label",
                &[json!(self.session), json!(name)],
            )
            .await?;

        let first = refs
            .as_array()
            .and_then(|refs| refs.first())
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DomainError::backend("looking up VM by name", format!("no VM named {}", name))
            })?;

        Ok(VmHandle::ObjectRef(Arc::from(first)))
    }

    async fn mac_address(&self, _handle: &VmHandle) -> Result<Option<MacAddr>, DomainError> {
        // XAPI VIF enumeration is not wired up; activation proceeds
        // without gARP for these VMs.
        Ok(None)
    }

    async fn power_state(&self, handle: &VmHandle) -> Result<VmPowerState, DomainError> {
        let state = self.vm_call("VM.get_power_state", handle, &[]).await?;
        let state = as_string(state, "VM.get_power_state")?;
        debug!(handle = %handle, state, "XAPI power state");
        Ok(Self::map_state(&state))
    }

    async fn start(&self, _handle: &VmHandle) -> Result<(), DomainError> {
        Err(DomainError::backend(
            "starting VM",
            "not supported for backend xapi",
        ))
    }

    async fn resume(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.vm_call("VM.resume", handle, &[json!(false), json!(true)])
            .await
            .map(|_| ())
    }

    async fn shutdown(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.vm_call("VM.clean_shutdown", handle, &[]).await.map(|_| ())
    }

    async fn destroy(&self, handle: &VmHandle) -> Result<(), DomainError> {
        self.vm_call("VM.hard_shutdown", handle, &[]).await.map(|_| ())
    }

    async fn suspend(&self, _handle: &VmHandle) -> Result<(), DomainError> {
        Err(DomainError::backend(
            "suspending VM",
            "not supported for backend xapi",
        ))
    }
}
