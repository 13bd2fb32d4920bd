use async_trait::async_trait;
use hypnos_dns_domain::{DnsQuestion, QueryAnswer};

/// Upstream resolver for queries the local zone cannot answer. Any
/// upstream failure collapses to `None`; the server loop decides whether
/// that becomes SERVFAIL or a drop.
#[async_trait]
pub trait FallbackResolver: Send + Sync {
    async fn resolve(&self, question: &DnsQuestion) -> Option<QueryAnswer>;
}
