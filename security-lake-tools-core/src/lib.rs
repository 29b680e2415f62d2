//! This crate provides the core business logic for Security Lake tools:
//! - Status reporting for data lakes, exceptions, log sources and subscribers
//! - OCSF class UID lookup
//! - Glue crawler role provisioning and custom log source registration
//!

pub mod arn;
pub mod aws;
pub mod classification;
pub mod commands;
mod error;
pub mod report;
mod types;

#[cfg(test)]
mod test_utils;

// Re-exports for a small, focused public API
pub use aws::session::{Session, SessionOptions, NO_REGION_HELP};
pub use aws::{ApiError, ApiResult};
pub use classification::{lookup, render_listing, validate_code, ClassificationEntry, OcsfCategory};
pub use commands::SecurityLakeToolsService;
pub use error::{ToolError, ToolResult};
pub use types::{
    AwsLogSource, CustomLogSource, CustomSourceRequest, DataLake, DataLakeException,
    LifecycleConfiguration, LifecycleTransition, LogSource, ProvisionOptions, ProvisionRequest,
    ServiceRole, SourceRef, StatusSnapshot, Subscriber, SubscriberIdentity, UpdateStatus,
};
