//! Crate-level error type shared by the reporter, the provisioner and the CLI.

use crate::aws::session::NO_REGION_HELP;
use crate::aws::ApiError;
use thiserror::Error;

const ROLE_NOT_FOUND_HELP: &str = "To create the role, you need:
  1. An IAM role with trust relationship for glue.amazonaws.com
  2. A policy for read access to the Security Lake buckets

Alternatively:
  \u{2022} Remove --no-create-role to create it automatically
  \u{2022} Specify an existing role with --role-arn
  \u{2022} Skip this check with --skip-role-check";

#[derive(Error, Debug)]
pub enum ToolError {
    /// Input rejected before any remote call was made.
    #[error("{0}")]
    Validation(String),

    /// Session or region could not be resolved.
    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not auto-detect AWS account ID: {0}")]
    AccountDetection(#[source] ApiError),

    #[error("The Glue role does not exist: {0}")]
    RoleNotFound(String),

    #[error("Failed to create Glue role: {0}")]
    RoleCreation(#[source] ApiError),

    /// CreateCustomLogSource was rejected; the diagnostic has already been printed.
    #[error("Failed to create custom source: {0}")]
    Registration(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Follow-up instructions worth printing under the error line, if any.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Api(err) => err.remediation(),
            Self::Configuration(_) => Some(NO_REGION_HELP),
            Self::AccountDetection(err) => err.remediation().or(Some(
                "Please provide --account-id or configure AWS credentials",
            )),
            Self::RoleNotFound(_) => Some(ROLE_NOT_FOUND_HELP),
            Self::RoleCreation(err) => err.remediation().or(Some(
                "You may need additional IAM permissions to create roles\n  Try specifying an existing role with --role-arn",
            )),
            Self::Validation(_) | Self::Registration(_) | Self::Io(_) => None,
        }
    }
}

pub type ToolResult<T> = Result<T, ToolError>;
