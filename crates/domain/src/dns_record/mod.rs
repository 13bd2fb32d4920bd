mod record;
mod record_type;

pub use record::{QueryAnswer, Rcode, RecordData, SoaData, ZoneRecord};
pub use record_type::{DnsClass, RecordType};
