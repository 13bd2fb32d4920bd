use crate::dns_record::{DnsClass, RecordType};
use std::sync::Arc;

/// One parsed question section entry.
#[derive(Debug, Clone)]
pub struct DnsQuestion {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: DnsClass,
}

impl DnsQuestion {
    pub fn new(name: impl Into<Arc<str>>, record_type: RecordType, class: DnsClass) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
        }
    }
}

/// Canonical form used for zone and registry keys: lowercased, trailing
/// dot stripped. DNS name comparison is case-insensitive.
pub fn normalize_name(name: &str) -> String {
    name.trim_end_matches('.').to_lowercase()
}
