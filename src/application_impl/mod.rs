mod identity_service_impl;
mod identity_store_mem;

pub use identity_service_impl::*;
pub use identity_store_mem::*;
