use hickory_proto::rr::{DNSClass as HickoryClass, RecordType as HickoryRecordType};
use hypnos_dns_domain::{DnsClass, RecordType};

/// Centralized conversion between the house record types and Hickory's.
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        match record_type {
            RecordType::A => HickoryRecordType::A,
            RecordType::AAAA => HickoryRecordType::AAAA,
            RecordType::CNAME => HickoryRecordType::CNAME,
            RecordType::SOA => HickoryRecordType::SOA,
            RecordType::NS => HickoryRecordType::NS,
            RecordType::MX => HickoryRecordType::MX,
            RecordType::TXT => HickoryRecordType::TXT,
            RecordType::PTR => HickoryRecordType::PTR,
            RecordType::SRV => HickoryRecordType::SRV,
        }
    }

    pub fn from_hickory(record_type: HickoryRecordType) -> Option<RecordType> {
        RecordType::from_u16(u16::from(record_type))
    }

    pub fn class_from_hickory(class: HickoryClass) -> Option<DnsClass> {
        DnsClass::from_u16(u16::from(class))
    }

    pub fn class_to_hickory(class: DnsClass) -> HickoryClass {
        match class {
            DnsClass::In => HickoryClass::IN,
            DnsClass::Ch => HickoryClass::CH,
            DnsClass::Hs => HickoryClass::HS,
            DnsClass::Any => HickoryClass::ANY,
        }
    }
}
