//! Records read from and written to Security Lake, IAM and STS.
//!
//! Every optional attribute the service may omit is an explicit `Option`, so rendering is a
//! plain match over presence.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// A data lake configured in one region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataLake {
    pub region: String,
    pub arn: String,
    pub storage_location_arn: Option<String>,
    pub encryption_key_id: Option<String>,
    pub lifecycle: Option<LifecycleConfiguration>,
    pub replication_regions: Vec<String>,
    pub replication_role_arn: Option<String>,
    pub create_status: Option<String>,
    pub update_status: Option<UpdateStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleConfiguration {
    pub expiration_days: Option<i32>,
    pub transitions: Vec<LifecycleTransition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleTransition {
    pub storage_class: Option<String>,
    pub days: Option<i32>,
}

/// Status of the last update applied to a data lake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateStatus {
    pub status: Option<String>,
    pub exception_reason: Option<String>,
}

/// An ingestion or configuration exception reported by the data lake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataLakeException {
    pub region: Option<String>,
    pub message: Option<String>,
    pub remediation: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Log sources enabled for one account/region pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSource {
    pub account: Option<String>,
    pub region: Option<String>,
    pub sources: Vec<SourceRef>,
}

/// A source is either natively supported by AWS or a custom (third-party) source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Aws(AwsLogSource),
    Custom(CustomLogSource),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsLogSource {
    pub name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomLogSource {
    pub name: Option<String>,
    pub version: Option<String>,
    pub provider_location: Option<String>,
    pub provider_role_arn: Option<String>,
    pub crawler_arn: Option<String>,
    pub catalog_database_arn: Option<String>,
    pub catalog_table_arn: Option<String>,
}

/// A subscriber consuming data from the lake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriber {
    pub name: String,
    pub id: String,
    pub arn: String,
    pub status: Option<String>,
    pub description: Option<String>,
    pub identity: Option<SubscriberIdentity>,
    pub access_types: Vec<String>,
    pub sources: Vec<SourceRef>,
    pub resource_share_arn: Option<String>,
    pub bucket_arn: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberIdentity {
    pub principal: String,
    pub external_id: String,
}

/// Everything the status command shows, fetched before any of it is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub data_lakes: Vec<DataLake>,
    pub exceptions: Vec<DataLakeException>,
    pub log_sources: Vec<LogSource>,
    pub subscribers: Vec<Subscriber>,
}

/// Parameters for CreateCustomLogSource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSourceRequest {
    pub source_name: String,
    pub event_class: String,
    pub crawler_role_arn: String,
    pub provider_account_id: String,
    pub external_id: String,
}

/// A Glue service role that exists (or was just created) with its S3 access policy attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRole {
    pub name: String,
    pub arn: String,
    pub attached_policy_arn: String,
}

/// Inputs for provisioning one custom log source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub class_uid: String,
    pub region: String,
    /// Detected through STS when absent.
    pub account_id: Option<String>,
    pub external_id: String,
    /// Defaults to the `AWSGlueServiceRole-SecurityLake` role in the target account.
    pub role_arn: Option<String>,
}

/// Switches controlling the role stage of provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    pub skip_role_check: bool,
    pub create_role_if_missing: bool,
    /// Time given to IAM to propagate a freshly created role before it is used.
    pub role_propagation_delay: Duration,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            skip_role_check: false,
            create_role_if_missing: true,
            role_propagation_delay: Duration::from_secs(5),
        }
    }
}
