use super::message_builder::MessageBuilder;
use super::response_parser::ResponseParser;
use async_trait::async_trait;
use hypnos_dns_application::ports::FallbackResolver;
use hypnos_dns_domain::{DnsQuestion, DomainError, QueryAnswer};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Forwards unmatched queries to one upstream resolver over UDP. Every
/// failure mode (bind, send, timeout, parse) collapses to `None`, which
/// the server loop turns into SERVFAIL.
pub struct UdpFallbackResolver {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl UdpFallbackResolver {
    pub fn new(server: &str, timeout_ms: u64) -> Result<Self, DomainError> {
        let server_addr: SocketAddr = server.parse().map_err(|e| {
            DomainError::ConfigError(format!("Invalid forward resolver address '{}': {}", server, e))
        })?;
        Ok(Self {
            server_addr,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    async fn query(&self, question: &DnsQuestion) -> Result<QueryAnswer, DomainError> {
        let (id, request_bytes) = MessageBuilder::build_query(question)?;

        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind socket: {}", e)))?;
        socket
            .connect(self.server_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to connect upstream: {}", e)))?;
        socket
            .send(&request_bytes)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to send query: {}", e)))?;

        let mut response_buf = vec![0u8; 4096];
        let len = tokio::time::timeout(self.timeout, socket.recv(&mut response_buf))
            .await
            .map_err(|_| DomainError::QueryTimeout)?
            .map_err(|e| DomainError::IoError(format!("Failed to receive response: {}", e)))?;

        let response = &response_buf[..len];
        if response.len() < 2 || u16::from_be_bytes([response[0], response[1]]) != id {
            return Err(DomainError::InvalidDnsResponse(
                "Transaction id mismatch".to_string(),
            ));
        }

        ResponseParser::parse(response)
    }
}

#[async_trait]
impl FallbackResolver for UdpFallbackResolver {
    async fn resolve(&self, question: &DnsQuestion) -> Option<QueryAnswer> {
        match self.query(question).await {
            Ok(answer) => {
                debug!(
                    name = %question.name,
                    upstream = %self.server_addr,
                    rcode = answer.rcode.as_str(),
                    "Forwarded query answered"
                );
                Some(answer)
            }
            Err(e) => {
                warn!(
                    name = %question.name,
                    upstream = %self.server_addr,
                    error = %e,
                    "Forwarded query failed"
                );
                None
            }
        }
    }
}
