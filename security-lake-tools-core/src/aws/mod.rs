//! AWS SDK integration: client seams for Security Lake, IAM and STS, session resolution,
//! and policy documents.

pub(crate) mod iam_client;
pub mod policy;
pub(crate) mod security_lake_client;
pub mod session;
pub(crate) mod sts;

use crate::types::{
    CustomLogSource, CustomSourceRequest, DataLake, DataLakeException, LogSource, Subscriber,
};
use async_trait::async_trait;
use aws_sdk_securitylake::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use policy::PolicyDocument;
use thiserror::Error;

pub use iam_client::AwsIamClient;
pub use security_lake_client::AwsSecurityLakeClient;
pub use sts::AwsIdentityClient;

const EXPIRED_TOKEN_CODES: &[&str] = &["ExpiredToken", "ExpiredTokenException"];
const NOT_FOUND_CODE: &str = "NoSuchEntity";
const ALREADY_EXISTS_CODE: &str = "EntityAlreadyExists";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("AWS SSO token has expired ({operation})")]
    AuthenticationExpired { operation: &'static str },
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },
}

impl ApiError {
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => code.as_deref(),
            Self::AuthenticationExpired { .. } => None,
        }
    }

    /// The message carried by the service, without the operation prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Service { message, .. } => message.clone(),
            Self::AuthenticationExpired { .. } => "AWS SSO token has expired".to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(NOT_FOUND_CODE)
    }

    pub fn is_already_exists(&self) -> bool {
        self.code() == Some(ALREADY_EXISTS_CODE)
    }

    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::AuthenticationExpired { .. } => Some(
                "Please refresh your SSO session:\n  aws sso login --profile <your-profile>",
            ),
            Self::Service { .. } => None,
        }
    }

    /// Classify a raw SDK failure. Expired interactive logins are told apart from every other
    /// rejection so the caller can print a re-authentication hint.
    pub(crate) fn from_sdk<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug,
    {
        let code = err.code().map(str::to_string);
        let detail = DisplayErrorContext(&err).to_string();

        if is_expired_login(code.as_deref(), &detail) {
            return Self::AuthenticationExpired { operation };
        }

        let message = err.message().map_or(detail, str::to_string);
        Self::Service {
            operation,
            code,
            message,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A coded error is a service response and is judged by its code alone. Only uncoded failures
/// (credential provider, dispatch) fall back to the error text.
fn is_expired_login(code: Option<&str>, detail: &str) -> bool {
    match code {
        Some(code) => EXPIRED_TOKEN_CODES.contains(&code),
        None => {
            let lower = detail.to_ascii_lowercase();
            lower.contains("expired") && (lower.contains("token") || lower.contains("sso session"))
        }
    }
}

/// Control-plane operations of Amazon Security Lake used by the tools.
///
/// List operations page through every result page and return the concatenated collection in
/// service order; a failure on any page discards what was collected so far.
#[async_trait]
pub trait SecurityLakeApi: Send + Sync {
    async fn list_data_lakes(&self) -> ApiResult<Vec<DataLake>>;

    async fn list_data_lake_exceptions(&self) -> ApiResult<Vec<DataLakeException>>;

    async fn list_log_sources(&self) -> ApiResult<Vec<LogSource>>;

    async fn list_subscribers(&self) -> ApiResult<Vec<Subscriber>>;

    async fn create_custom_log_source(
        &self,
        request: &CustomSourceRequest,
    ) -> ApiResult<CustomLogSource>;
}

/// IAM operations needed to look up and create the Glue crawler role.
#[async_trait]
pub trait IamApi: Send + Sync {
    /// Returns the role ARN.
    async fn get_role(&self, role_name: &str) -> ApiResult<String>;

    /// Returns the new role's ARN.
    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &PolicyDocument,
        description: &str,
    ) -> ApiResult<String>;

    /// Returns the new policy's ARN.
    async fn create_policy(
        &self,
        policy_name: &str,
        document: &PolicyDocument,
        description: &str,
    ) -> ApiResult<String>;

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> ApiResult<()>;
}

#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn caller_account_id(&self) -> ApiResult<String>;
}
