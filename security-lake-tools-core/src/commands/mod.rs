//! Commands module - service layer for Security Lake tools operations

mod provision;
pub(crate) mod service;
mod status;

pub use provision::{provider_role_name, registration_guidance, source_name, SOURCE_NAME_PREFIX};
pub use service::SecurityLakeToolsService;
