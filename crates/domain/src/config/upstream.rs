use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UpstreamConfig {
    /// `host:port` of the resolver that receives queries the local zone
    /// cannot answer. Unset means unmatched queries get SERVFAIL.
    #[serde(default)]
    pub forward_resolver: Option<String>,

    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

fn default_query_timeout() -> u64 {
    2000
}
