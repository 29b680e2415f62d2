//! AWS IAM client wrapper for role and policy operations

use crate::aws::policy::PolicyDocument;
use crate::aws::{ApiError, ApiResult, IamApi};
use async_trait::async_trait;
use aws_sdk_iam::Client as IamClient;

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

fn serialize_policy(operation: &'static str, document: &PolicyDocument) -> ApiResult<String> {
    document.to_json().map_err(|e| ApiError::Service {
        operation,
        code: None,
        message: format!("Failed to serialize policy: {e}"),
    })
}

fn missing_field(operation: &'static str, field: &str) -> ApiError {
    ApiError::Service {
        operation,
        code: None,
        message: format!("response did not include {field}"),
    }
}

#[async_trait]
impl IamApi for AwsIamClient {
    async fn get_role(&self, role_name: &str) -> ApiResult<String> {
        let response = self
            .client
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("GetRole", e))?;

        response
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| missing_field("GetRole", "a role"))
    }

    async fn create_role(
        &self,
        role_name: &str,
        trust_policy: &PolicyDocument,
        description: &str,
    ) -> ApiResult<String> {
        let trust_json = serialize_policy("CreateRole", trust_policy)?;
        let response = self
            .client
            .create_role()
            .role_name(role_name)
            .assume_role_policy_document(trust_json)
            .description(description)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("CreateRole", e))?;

        response
            .role()
            .map(|role| role.arn().to_string())
            .ok_or_else(|| missing_field("CreateRole", "a role"))
    }

    async fn create_policy(
        &self,
        policy_name: &str,
        document: &PolicyDocument,
        description: &str,
    ) -> ApiResult<String> {
        let policy_json = serialize_policy("CreatePolicy", document)?;
        let response = self
            .client
            .create_policy()
            .policy_name(policy_name)
            .policy_document(policy_json)
            .description(description)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("CreatePolicy", e))?;

        response
            .policy()
            .and_then(|policy| policy.arn())
            .map(str::to_string)
            .ok_or_else(|| missing_field("CreatePolicy", "a policy ARN"))
    }

    async fn attach_role_policy(&self, role_name: &str, policy_arn: &str) -> ApiResult<()> {
        self.client
            .attach_role_policy()
            .role_name(role_name)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("AttachRolePolicy", e))?;
        Ok(())
    }
}
