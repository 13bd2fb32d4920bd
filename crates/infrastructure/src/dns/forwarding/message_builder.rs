use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use hypnos_dns_domain::{DnsQuestion, DomainError};
use std::str::FromStr;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Serialize a recursive query for the given question, returning the
    /// transaction id so the caller can match the response.
    pub fn build_query(question: &DnsQuestion) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Name::from_str(&question.name).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", question.name, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(question.record_type));
        query.set_query_class(RecordTypeMapper::class_to_hickory(question.class));

        let id = fastrand::u16(..);
        let mut message = Message::new();
        message.set_id(id);
        message.set_message_type(MessageType::Query);
        message.set_op_code(OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
