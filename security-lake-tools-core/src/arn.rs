//! Small ARN helpers

/// Role created or reused when no role ARN is supplied.
pub const DEFAULT_GLUE_ROLE_NAME: &str = "AWSGlueServiceRole-SecurityLake";

/// The path segment after the last `/`, e.g. the table name of
/// `arn:aws:glue:us-east-1:123456789012:table/db/name`. ARNs without a path yield the whole input.
pub fn last_path_segment(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

/// Extract 12-digit account ID from ARN (field 5 in colon-delimited format)
pub fn extract_account_from_arn(arn: &str) -> Option<String> {
    let parts: Vec<&str> = arn.split(':').collect();
    if parts.len() >= 6 {
        let account_id = parts[4];
        if is_account_id(account_id) {
            return Some(account_id.to_string());
        }
    }
    None
}

pub fn is_account_id(value: &str) -> bool {
    value.len() == 12 && value.chars().all(|c| c.is_ascii_digit())
}

pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{role_name}")
}

pub fn default_glue_role_arn(account_id: &str) -> String {
    role_arn(account_id, DEFAULT_GLUE_ROLE_NAME)
}
