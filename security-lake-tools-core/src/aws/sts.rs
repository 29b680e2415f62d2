//! Caller identity lookup used to auto-detect the target account.

use crate::aws::{ApiError, ApiResult, IdentityApi};
use async_trait::async_trait;
use aws_sdk_sts::Client as StsClient;

pub struct AwsIdentityClient {
    client: StsClient,
}

impl AwsIdentityClient {
    pub fn new(client: StsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityApi for AwsIdentityClient {
    async fn caller_account_id(&self) -> ApiResult<String> {
        let response = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("GetCallerIdentity", e))?;

        response
            .account()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Service {
                operation: "GetCallerIdentity",
                code: None,
                message: "response did not include an account ID".to_string(),
            })
    }
}
