mod add_vm;
mod handle_dns_query;
mod reap_expired_vms;

pub use add_vm::{AddVmRequest, AddVmUseCase};
pub use handle_dns_query::{HandleDnsQueryUseCase, QueryDisposition};
pub use reap_expired_vms::ReapExpiredVmsUseCase;
