use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use hypnos_dns_domain::{DomainError, QueryAnswer, Rcode, RecordData, SoaData, ZoneRecord};
use std::sync::Arc;
use tracing::debug;

/// Translates upstream wire responses into the local answer
/// representation. Record types the local representation cannot carry are
/// dropped rather than failing the whole answer.
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<QueryAnswer, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = Self::translate_rcode(message.response_code());
        let mut records = Vec::with_capacity(message.answers().len());

        for record in message.answers() {
            let name: Arc<str> = Arc::from(record.name().to_utf8().trim_end_matches('.'));
            let ttl = record.ttl();

            let data = match record.data() {
                RData::A(a) => RecordData::A(a.0),
                RData::AAAA(aaaa) => RecordData::Aaaa(aaaa.0),
                RData::CNAME(cname) => {
                    RecordData::Cname(Arc::from(cname.to_utf8().trim_end_matches('.')))
                }
                RData::NS(ns) => RecordData::Ns(Arc::from(ns.to_utf8().trim_end_matches('.'))),
                RData::SOA(soa) => RecordData::Soa(SoaData {
                    mname: Arc::from(soa.mname().to_utf8().trim_end_matches('.')),
                    rname: Arc::from(soa.rname().to_utf8().trim_end_matches('.')),
                    serial: soa.serial(),
                    refresh: soa.refresh() as u32,
                    retry: soa.retry() as u32,
                    expire: soa.expire() as u32,
                    minimum: soa.minimum(),
                }),
                RData::TXT(txt) => RecordData::Txt(txt.to_string()),
                other => {
                    debug!(rdata = ?other, "Dropping untranslatable upstream record");
                    continue;
                }
            };

            records.push(ZoneRecord::new(name, ttl, data));
        }

        debug!(
            rcode = rcode.as_str(),
            records = records.len(),
            "Upstream response translated"
        );

        Ok(QueryAnswer::new(rcode, records))
    }

    fn translate_rcode(rcode: ResponseCode) -> Rcode {
        match rcode {
            ResponseCode::NoError => Rcode::NoError,
            ResponseCode::FormErr => Rcode::FormErr,
            ResponseCode::NXDomain => Rcode::NxDomain,
            ResponseCode::NotImp => Rcode::NotImp,
            ResponseCode::Refused => Rcode::Refused,
            _ => Rcode::ServFail,
        }
    }
}
