use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Hypervisor or notifier fault: a caller-supplied context plus the
    /// backend's own diagnostic. Every driver and notifier failure is
    /// reported through this one kind.
    #[error("{context}: {detail}")]
    Backend { context: String, detail: String },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("VM not found: {0}")]
    VmNotFound(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn backend(context: impl Into<String>, detail: impl ToString) -> Self {
        Self::Backend {
            context: context.into(),
            detail: detail.to_string(),
        }
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}
