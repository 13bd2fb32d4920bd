mod vm_registry;

pub use vm_registry::VmRegistry;
