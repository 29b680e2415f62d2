//! IAM policy documents for the Glue crawler role.
//!
//! The trust policy lets the Glue service assume the role and lets the log source provider
//! account assume it only when it presents the agreed external ID. The permission policy grants
//! read/list access to the Security Lake buckets and nothing else.

use serde::Serialize;
use serde_json::{json, Value};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const GLUE_SERVICE_PRINCIPAL: &str = "glue.amazonaws.com";
pub const SECURITY_LAKE_BUCKET_PATTERN: &str = "arn:aws:s3:::aws-security-data-lake-*";
const S3_POLICY_PREFIX: &str = "SecurityLakeGlueS3Access";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Value>,
    pub action: ActionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionType {
    Single(String),
    Multiple(Vec<String>),
}

impl PolicyDocument {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Trust policy for the crawler role.
pub fn crawler_trust_policy(account_id: &str, external_id: &str) -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![
            Statement {
                sid: Some("GlueCrawlerAssumeRole".to_string()),
                effect: "Allow".to_string(),
                principal: Some(json!({ "Service": GLUE_SERVICE_PRINCIPAL })),
                action: ActionType::Single("sts:AssumeRole".to_string()),
                resource: None,
                condition: None,
            },
            Statement {
                sid: Some("LogSourceProviderAssumeRole".to_string()),
                effect: "Allow".to_string(),
                principal: Some(json!({ "AWS": format!("arn:aws:iam::{account_id}:root") })),
                action: ActionType::Single("sts:AssumeRole".to_string()),
                resource: None,
                condition: Some(json!({
                    "StringEquals": { "sts:ExternalId": external_id }
                })),
            },
        ],
    }
}

/// Least-privilege storage policy: list the lake buckets and read their objects.
pub fn security_lake_s3_policy() -> PolicyDocument {
    PolicyDocument {
        version: POLICY_VERSION.to_string(),
        statement: vec![Statement {
            sid: Some("SecurityLakeBucketRead".to_string()),
            effect: "Allow".to_string(),
            principal: None,
            action: ActionType::Multiple(vec![
                "s3:GetObject".to_string(),
                "s3:ListBucket".to_string(),
            ]),
            resource: Some(vec![
                SECURITY_LAKE_BUCKET_PATTERN.to_string(),
                format!("{SECURITY_LAKE_BUCKET_PATTERN}/*"),
            ]),
            condition: None,
        }],
    }
}

pub fn s3_policy_name(role_name: &str) -> String {
    format!("{S3_POLICY_PREFIX}-{role_name}")
}

/// ARN of a customer managed policy, used when the policy already exists.
pub fn customer_policy_arn(account_id: &str, policy_name: &str) -> String {
    format!("arn:aws:iam::{account_id}:policy/{policy_name}")
}
