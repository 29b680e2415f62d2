//! Security Lake Tools Service Layer
//!
//! The service holds the Security Lake, IAM and STS clients for one resolved session and exposes
//! the high-level operations (status report, source provisioning) used by the CLI.

use crate::aws::session::Session;
use crate::aws::{
    AwsIamClient, AwsIdentityClient, AwsSecurityLakeClient, IamApi, IdentityApi, SecurityLakeApi,
};

/// Main service struct that holds the API clients and provides business logic operations
pub struct SecurityLakeToolsService {
    pub(crate) lake: Box<dyn SecurityLakeApi>,
    pub(crate) iam: Box<dyn IamApi>,
    pub(crate) identity: Box<dyn IdentityApi>,
    pub(crate) region: String,
}

impl SecurityLakeToolsService {
    /// Create a service whose clients target the session's region.
    pub fn new(session: &Session) -> Self {
        let config = &session.config;
        Self {
            lake: Box::new(AwsSecurityLakeClient::new(aws_sdk_securitylake::Client::new(
                config,
            ))),
            iam: Box::new(AwsIamClient::new(aws_sdk_iam::Client::new(config))),
            identity: Box::new(AwsIdentityClient::new(aws_sdk_sts::Client::new(config))),
            region: session.region.clone(),
        }
    }

    /// Create a service over caller-supplied clients.
    pub fn with_clients(
        region: impl Into<String>,
        lake: Box<dyn SecurityLakeApi>,
        iam: Box<dyn IamApi>,
        identity: Box<dyn IdentityApi>,
    ) -> Self {
        Self {
            lake,
            iam,
            identity,
            region: region.into(),
        }
    }

    // report() is implemented in status.rs
    // provision() and its stages are implemented in provision.rs
}
