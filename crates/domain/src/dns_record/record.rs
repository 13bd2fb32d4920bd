use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use super::RecordType;

/// DNS response code subset the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rcode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
}

impl Rcode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rcode::NoError => "NOERROR",
            Rcode::FormErr => "FORMERR",
            Rcode::ServFail => "SERVFAIL",
            Rcode::NxDomain => "NXDOMAIN",
            Rcode::NotImp => "NOTIMP",
            Rcode::Refused => "REFUSED",
        }
    }
}

/// SOA RDATA fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    pub mname: Arc<str>,
    pub rname: Arc<str>,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(Arc<str>),
    Ns(Arc<str>),
    Soa(SoaData),
    Txt(String),
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::Aaaa(_) => RecordType::AAAA,
            RecordData::Cname(_) => RecordType::CNAME,
            RecordData::Ns(_) => RecordType::NS,
            RecordData::Soa(_) => RecordType::SOA,
            RecordData::Txt(_) => RecordType::TXT,
        }
    }
}

/// One resource record as served to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    pub name: Arc<str>,
    pub ttl: u32,
    pub data: RecordData,
}

impl ZoneRecord {
    pub fn new(name: impl Into<Arc<str>>, ttl: u32, data: RecordData) -> Self {
        Self {
            name: name.into(),
            ttl,
            data,
        }
    }
}

/// Answer handed back to the server loop: response code plus the records
/// for the answer section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub rcode: Rcode,
    pub records: Vec<ZoneRecord>,
}

impl QueryAnswer {
    pub fn new(rcode: Rcode, records: Vec<ZoneRecord>) -> Self {
        Self { rcode, records }
    }

    pub fn nxdomain() -> Self {
        Self::new(Rcode::NxDomain, Vec::new())
    }

    pub fn is_noerror(&self) -> bool {
        self.rcode == Rcode::NoError
    }
}
