use crate::dns::forwarding::RecordTypeMapper;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{rdata, Name, RData, Record};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use hypnos_dns_application::{HandleDnsQueryUseCase, QueryDisposition};
use hypnos_dns_domain::{DnsQuestion, QueryAnswer, Rcode, RecordData, ZoneRecord};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, warn};

#[derive(Clone)]
pub struct DnsServerHandler {
    engine: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(engine: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { engine }
    }

    fn questions_of(request: &Request) -> Option<Vec<DnsQuestion>> {
        let mut questions = Vec::with_capacity(request.queries().len());
        for query in request.queries() {
            let record_type = RecordTypeMapper::from_hickory(query.query_type())?;
            let class = RecordTypeMapper::class_from_hickory(query.query_class())?;
            questions.push(DnsQuestion::new(
                query.name().to_string(),
                record_type,
                class,
            ));
        }
        Some(questions)
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let client_ip = request.src().ip();

        let Some(questions) = Self::questions_of(request) else {
            warn!(client = %client_ip, "Unsupported record type or class in query");
            return send_error_response(request, &mut response_handle, ResponseCode::NotImp).await;
        };

        match self.engine.process(&questions, client_ip).await {
            QueryDisposition::Ignore => {
                // Malformed question section; drop without answering.
                debug!(client = %client_ip, "Dropping packet");
                ResponseInfo::from(*request.header())
            }
            QueryDisposition::ServFail => {
                send_error_response(request, &mut response_handle, ResponseCode::ServFail).await
            }
            QueryDisposition::Respond(answer) => {
                send_answer(request, &mut response_handle, &answer).await
            }
        }
    }
}

async fn send_answer<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    answer: &QueryAnswer,
) -> ResponseInfo {
    let answers: Vec<Record> = answer.records.iter().map(to_hickory_record).collect();

    let mut header = *request.header();
    header.set_response_code(to_hickory_rcode(answer.rcode));
    header.set_authoritative(true);
    header.set_recursion_available(true);

    let builder = MessageResponseBuilder::from_message_request(request);
    let response = builder.build(header, answers.iter(), &[], &[], &[]);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send response");
            ResponseInfo::from(*request.header())
        }
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = ?code, "Sending error response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = *request.header();
    header.set_response_code(code);
    header.set_recursion_available(true);
    let response = builder.build(header, &[], &[], &[], &[]);

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(*request.header())
        }
    }
}

fn name_of(text: &str) -> Name {
    Name::from_str(text).unwrap_or_else(|_| Name::root())
}

fn to_hickory_record(record: &ZoneRecord) -> Record {
    let rdata = match &record.data {
        RecordData::A(ip) => RData::A(rdata::A(*ip)),
        RecordData::Aaaa(ip) => RData::AAAA(rdata::AAAA(*ip)),
        RecordData::Cname(target) => RData::CNAME(rdata::CNAME(name_of(target))),
        RecordData::Ns(target) => RData::NS(rdata::NS(name_of(target))),
        RecordData::Soa(soa) => RData::SOA(rdata::SOA::new(
            name_of(&soa.mname),
            name_of(&soa.rname),
            soa.serial,
            soa.refresh as i32,
            soa.retry as i32,
            soa.expire as i32,
            soa.minimum,
        )),
        RecordData::Txt(text) => RData::TXT(rdata::TXT::new(vec![text.clone()])),
    };

    Record::from_rdata(name_of(&record.name), record.ttl, rdata)
}

fn to_hickory_rcode(rcode: Rcode) -> ResponseCode {
    match rcode {
        Rcode::NoError => ResponseCode::NoError,
        Rcode::FormErr => ResponseCode::FormErr,
        Rcode::ServFail => ResponseCode::ServFail,
        Rcode::NxDomain => ResponseCode::NXDomain,
        Rcode::NotImp => ResponseCode::NotImp,
        Rcode::Refused => ResponseCode::Refused,
    }
}
