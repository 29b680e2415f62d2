//! Custom log source provisioning for the Security Lake tools service
//!
//! Stages run in order and each failure stops the ones after it:
//! validate class UID, resolve account, ensure Glue role (verify, create if absent), register source.

use crate::arn::{default_glue_role_arn, extract_account_from_arn, is_account_id, last_path_segment};
use crate::aws::policy::{
    crawler_trust_policy, customer_policy_arn, s3_policy_name, security_lake_s3_policy,
};
use crate::aws::ApiError;
use crate::classification::{validate_code, ClassificationEntry};
use crate::error::{ToolError, ToolResult};
use crate::report::NOT_AVAILABLE;
use crate::types::{
    CustomLogSource, CustomSourceRequest, ProvisionOptions, ProvisionRequest, ServiceRole,
};
use log::{error, info, warn};
use std::io::{self, Write};

pub const SOURCE_NAME_PREFIX: &str = "tnz-ocsf";
const ROLE_DESCRIPTION: &str = "Glue service role for Amazon Security Lake custom sources";
const POLICY_DESCRIPTION: &str = "S3 read access for Security Lake Glue crawlers";

/// Name under which a class UID is registered, e.g. `tnz-ocsf-1001`.
pub fn source_name(class_uid: &str) -> String {
    format!("{SOURCE_NAME_PREFIX}-{class_uid}")
}

/// Role Security Lake creates on its side for the provider.
pub fn provider_role_name(source_name: &str, region: &str) -> String {
    format!("AmazonSecurityLake-Provider-{source_name}-{region}")
}

impl super::service::SecurityLakeToolsService {
    /// Run the whole provisioning flow for one class UID.
    pub async fn provision(
        &self,
        request: &ProvisionRequest,
        options: &ProvisionOptions,
        out: &mut dyn Write,
    ) -> ToolResult<()> {
        validate_code(&request.class_uid)?;
        if request.external_id.trim().is_empty() {
            return Err(ToolError::validation("--external-id must not be empty"));
        }
        if let Some(account_id) = request.account_id.as_deref() {
            if !is_account_id(account_id) {
                return Err(ToolError::validation(format!(
                    "Invalid AWS account ID '{account_id}': expected 12 digits"
                )));
            }
        }

        let account_id = match request.account_id.clone() {
            Some(account_id) => account_id,
            None => {
                let detected = self
                    .identity
                    .caller_account_id()
                    .await
                    .map_err(ToolError::AccountDetection)?;
                writeln!(out, "\u{2139} Auto-detected account ID: {detected}")?;
                detected
            }
        };

        let mut role_arn = request
            .role_arn
            .clone()
            .unwrap_or_else(|| default_glue_role_arn(&account_id));
        if let Some(role_account) = extract_account_from_arn(&role_arn) {
            if role_account != account_id {
                warn!(
                    "Glue role {} belongs to account {}, not the target account {}",
                    role_arn, role_account, account_id
                );
            }
        }

        if !options.skip_role_check {
            role_arn = self
                .ensure_role(&role_arn, &account_id, &request.external_id, options, out)
                .await?;
        }

        if self
            .register_source(
                &request.class_uid,
                &request.region,
                &account_id,
                &request.external_id,
                &role_arn,
                out,
            )
            .await
        {
            Ok(())
        } else {
            Err(ToolError::Registration(source_name(&request.class_uid)))
        }
    }

    /// Verify the Glue role exists, creating it when allowed. Returns the ARN to use.
    async fn ensure_role(
        &self,
        role_arn: &str,
        account_id: &str,
        external_id: &str,
        options: &ProvisionOptions,
        out: &mut dyn Write,
    ) -> ToolResult<String> {
        writeln!(out, "\u{2139} Checking Glue role: {role_arn}")?;
        if self.verify_role(role_arn).await {
            writeln!(out, "\u{2714}\u{fe0e} Glue role verified\n")?;
            return Ok(role_arn.to_string());
        }

        if !options.create_role_if_missing {
            return Err(ToolError::RoleNotFound(role_arn.to_string()));
        }

        writeln!(
            out,
            "\u{2139} Glue role does not exist, creating it automatically..."
        )?;
        let role = self
            .create_role(last_path_segment(role_arn), account_id, external_id, out)
            .await?;

        if !options.role_propagation_delay.is_zero() {
            writeln!(out, "\u{2139} Waiting for role propagation...")?;
            tokio::time::sleep(options.role_propagation_delay).await;
        }
        writeln!(out)?;
        Ok(role.arn)
    }

    /// Check whether the role named by `role_arn` exists.
    ///
    /// `NoSuchEntity` is the ordinary negative answer. Any other failure is logged and also
    /// reported as absent so the caller goes on to create the role.
    pub async fn verify_role(&self, role_arn: &str) -> bool {
        let role_name = last_path_segment(role_arn);
        match self.iam.get_role(role_name).await {
            Ok(_) => true,
            Err(err) if err.is_not_found() => false,
            Err(err) => {
                warn!("Could not verify role {role_name}, treating it as absent: {err}");
                false
            }
        }
    }

    /// Create the Glue crawler role with its trust policy, create the S3 read policy (or reuse
    /// one left from an earlier run) and attach it once.
    ///
    /// Fails if the role already exists; callers verify first.
    pub async fn create_role(
        &self,
        role_name: &str,
        account_id: &str,
        external_id: &str,
        out: &mut dyn Write,
    ) -> ToolResult<ServiceRole> {
        writeln!(out, "\u{2192} Creating IAM role: {role_name}")?;
        let trust_policy = crawler_trust_policy(account_id, external_id);
        let role_arn = self
            .iam
            .create_role(role_name, &trust_policy, ROLE_DESCRIPTION)
            .await
            .map_err(ToolError::RoleCreation)?;
        info!("Created IAM role {role_arn}");
        writeln!(out, "\u{2714}\u{fe0e} Created role: {role_arn}")?;

        let policy_name = s3_policy_name(role_name);
        writeln!(out, "\u{2192} Creating S3 access policy for Security Lake...")?;
        let policy_arn = match self
            .iam
            .create_policy(&policy_name, &security_lake_s3_policy(), POLICY_DESCRIPTION)
            .await
        {
            Ok(policy_arn) => {
                info!("Created IAM policy {policy_arn}");
                writeln!(out, "\u{2714}\u{fe0e} Created S3 access policy: {policy_name}")?;
                policy_arn
            }
            Err(err) if err.is_already_exists() => {
                writeln!(
                    out,
                    "\u{2139} S3 policy already exists, attaching: {policy_name}"
                )?;
                customer_policy_arn(account_id, &policy_name)
            }
            Err(err) => return Err(ToolError::RoleCreation(err)),
        };

        self.iam
            .attach_role_policy(role_name, &policy_arn)
            .await
            .map_err(ToolError::RoleCreation)?;
        writeln!(out, "\u{2714}\u{fe0e} Attached S3 access policy")?;
        writeln!(out, "\n\u{2714}\u{fe0e} Glue role ready: {role_arn}")?;

        Ok(ServiceRole {
            name: role_name.to_string(),
            arn: role_arn,
            attached_policy_arn: policy_arn,
        })
    }

    /// Register the custom source for `class_uid`.
    ///
    /// Returns `false` after printing a diagnostic when the class UID is unknown (no remote call
    /// is made) or when Security Lake rejects the request.
    pub async fn register_source(
        &self,
        class_uid: &str,
        region: &str,
        account_id: &str,
        external_id: &str,
        role_arn: &str,
        out: &mut dyn Write,
    ) -> bool {
        let entry = match validate_code(class_uid) {
            Ok(entry) => entry,
            Err(err) => {
                if let Err(io_err) = writeln!(out, "\u{2717} Error: {err}") {
                    error!("Failed to write output: {io_err}");
                }
                return false;
            }
        };

        match self
            .try_register_source(entry, region, account_id, external_id, role_arn, out)
            .await
        {
            Ok(created) => created,
            Err(err) => {
                error!("Failed to write output: {err}");
                false
            }
        }
    }

    async fn try_register_source(
        &self,
        entry: &ClassificationEntry,
        region: &str,
        account_id: &str,
        external_id: &str,
        role_arn: &str,
        out: &mut dyn Write,
    ) -> io::Result<bool> {
        let name = source_name(entry.code);
        writeln!(
            out,
            "\u{2192} Creating custom source: {name} for event class: {}",
            entry.event_class
        )?;
        writeln!(out, "  Region: {region}")?;
        writeln!(out, "  Account ID: {account_id}")?;
        writeln!(out, "  Glue Role: {role_arn}")?;
        writeln!(out, "  External ID: {external_id}")?;
        writeln!(out)?;
        writeln!(
            out,
            "\u{2139} Note: Security Lake will create the provider role: {}",
            provider_role_name(&name, region)
        )?;
        writeln!(out)?;

        let request = CustomSourceRequest {
            source_name: name.clone(),
            event_class: entry.event_class.to_string(),
            crawler_role_arn: role_arn.to_string(),
            provider_account_id: account_id.to_string(),
            external_id: external_id.to_string(),
        };

        match self.lake.create_custom_log_source(&request).await {
            Ok(source) => {
                writeln!(out, "\u{2714}\u{fe0e} Successfully created custom source: {name}")?;
                write_created_source(out, &source)?;
                Ok(true)
            }
            Err(err) => {
                writeln!(out, "\u{2717} Failed to create custom source: {name}")?;
                writeln!(
                    out,
                    "  Error ({}): {}",
                    err.code().unwrap_or("Unknown"),
                    err.message()
                )?;
                if let Some(hint) = err.remediation() {
                    writeln!(out, "  {hint}")?;
                }
                writeln!(out, "\n\u{2139} Possible solutions:")?;
                for line in registration_guidance(&err, role_arn, region) {
                    writeln!(out, "  \u{2022} {line}")?;
                }
                Ok(false)
            }
        }
    }
}

fn write_created_source(out: &mut dyn Write, source: &CustomLogSource) -> io::Result<()> {
    let na = |value: &Option<String>| value.as_deref().unwrap_or(NOT_AVAILABLE).to_string();
    writeln!(out, "\nCreated source details:")?;
    writeln!(out, "  Source name: {}", na(&source.name))?;
    writeln!(out, "  Source version: {}", na(&source.version))?;
    if source.provider_role_arn.is_some() || source.provider_location.is_some() {
        writeln!(out, "  Provider role: {}", na(&source.provider_role_arn))?;
        writeln!(out, "  S3 location: {}", na(&source.provider_location))?;
    }
    if let Some(crawler) = &source.crawler_arn {
        writeln!(out, "  Crawler ARN: {crawler}")?;
    }
    if let Some(database) = &source.catalog_database_arn {
        writeln!(out, "  Database ARN: {database}")?;
    }
    if let Some(table) = &source.catalog_table_arn {
        writeln!(out, "  Table ARN: {table}")?;
    }
    Ok(())
}

/// Suggestions printed under a rejected CreateCustomLogSource call, keyed on the error code.
pub fn registration_guidance(err: &ApiError, role_arn: &str, region: &str) -> Vec<String> {
    let message = err.message().to_ascii_lowercase();
    match err.code() {
        Some("ResourceAlreadyExistsException") => vec![
            "Source already exists with this name".into(),
            "Delete the existing source or use a different name".into(),
        ],
        Some("AccessDeniedException") => vec![
            "Check IAM permissions for securitylake:CreateCustomLogSource".into(),
            "Ensure you have permissions to pass the Glue role".into(),
        ],
        Some("ResourceNotFoundException") => vec![
            "Security Lake may not be enabled in this region".into(),
            "The specified Glue role may not exist".into(),
        ],
        Some("ValidationException") => vec![
            "Check that the Glue role ARN is valid".into(),
            "Ensure the external ID meets requirements".into(),
        ],
        Some("BadRequestException") if message.contains("role") => vec![
            format!("The Glue role does not exist: {role_arn}"),
            "Create the role first with a trust relationship for glue.amazonaws.com and read access to the Security Lake buckets".into(),
            "Or specify an existing role with --role-arn".into(),
        ],
        _ => vec![
            "Check AWS credentials and permissions".into(),
            format!("Ensure Security Lake is enabled in region: {region}"),
        ],
    }
}
