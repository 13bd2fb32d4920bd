use async_trait::async_trait;
use hypnos_dns_application::ports::GarpNotifier;
use hypnos_dns_domain::{DomainError, MacAddr};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Encode one notification frame: a u16 length prefix over the six MAC
/// octets followed by the four IPv4 octets.
pub fn encode_frame(mac: MacAddr, ip: Ipv4Addr) -> [u8; 12] {
    let mut frame = [0u8; 12];
    frame[..2].copy_from_slice(&10u16.to_be_bytes());
    frame[2..8].copy_from_slice(&mac.octets());
    frame[8..].copy_from_slice(&ip.octets());
    frame
}

/// TCP client for the gratuitous-ARP notifier VM. The connection is
/// established lazily and dropped on any write error; the next send
/// reconnects. Callers treat every failure as non-fatal.
pub struct GarpClient {
    notifier_addr: SocketAddr,
    stream: Mutex<Option<TcpStream>>,
}

impl GarpClient {
    pub fn new(notifier_addr: SocketAddr) -> Self {
        Self {
            notifier_addr,
            stream: Mutex::new(None),
        }
    }

    /// Best-effort connection priming, fired once at startup so the first
    /// activation does not pay the connect latency.
    pub async fn connect(&self) {
        let mut guard = self.stream.lock().await;
        if guard.is_some() {
            return;
        }
        match TcpStream::connect(self.notifier_addr).await {
            Ok(stream) => {
                info!(notifier = %self.notifier_addr, "Connected to gARP notifier");
                *guard = Some(stream);
            }
            Err(e) => {
                warn!(notifier = %self.notifier_addr, error = %e, "gARP notifier unreachable");
            }
        }
    }

    async fn write_frame(&self, frame: &[u8]) -> Result<(), DomainError> {
        let mut guard = self.stream.lock().await;

        let mut stream = match guard.take() {
            Some(stream) => stream,
            None => {
                let stream = TcpStream::connect(self.notifier_addr)
                    .await
                    .map_err(|e| DomainError::backend("connecting to gARP notifier", e))?;
                debug!(notifier = %self.notifier_addr, "gARP notifier reconnected");
                stream
            }
        };

        let result = async {
            stream.write_all(frame).await?;
            stream.flush().await
        }
        .await;

        match result {
            Ok(()) => {
                *guard = Some(stream);
                Ok(())
            }
            // A broken connection is dropped; the next send reconnects.
            Err(e) => Err(DomainError::backend("sending gARP frame", e)),
        }
    }
}

#[async_trait]
impl GarpNotifier for GarpClient {
    async fn send_garp(&self, mac: MacAddr, ip: Ipv4Addr) -> Result<(), DomainError> {
        let frame = encode_frame(mac, ip);
        self.write_frame(&frame).await?;
        debug!(mac = %mac, ip = %ip, "gARP notification sent");
        Ok(())
    }
}
