pub mod ports;
pub mod services;
pub mod use_cases;

pub use services::VmRegistry;
pub use use_cases::{
    AddVmRequest, AddVmUseCase, HandleDnsQueryUseCase, QueryDisposition, ReapExpiredVmsUseCase,
};
