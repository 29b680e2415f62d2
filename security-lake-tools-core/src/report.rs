//! Fixed-format text rendering of a [`StatusSnapshot`].
//!
//! Optional attributes print a sentinel instead of disappearing so every record of a kind has
//! the same shape. Blocks that only make sense when configured (lifecycle, replication, update
//! status) are left out entirely when absent.

use crate::arn::last_path_segment;
use crate::types::{
    DataLake, DataLakeException, LogSource, SourceRef, StatusSnapshot, Subscriber,
};
use chrono::{DateTime, Duration, Utc};
use std::io::{self, Write};

pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_KMS_KEY: &str = "default";
pub const EXCEPTION_WINDOW_DAYS: i64 = 7;
const RULE_WIDTH: usize = 60;

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

fn days_or_na(days: Option<i32>) -> String {
    days.map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.to_string())
}

fn write_section_header(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

/// Render the whole report: header line, then the four sections in fixed order.
pub fn write_report(
    out: &mut dyn Write,
    region: &str,
    snapshot: &StatusSnapshot,
    now: DateTime<Utc>,
) -> io::Result<()> {
    writeln!(out, "\nSecurity Lake Status (Region: {region})\n")?;
    write_data_lakes(out, &snapshot.data_lakes)?;
    write_exceptions(out, &snapshot.exceptions, now)?;
    write_log_sources(out, &snapshot.log_sources)?;
    write_subscribers(out, &snapshot.subscribers)
}

pub fn write_data_lakes(out: &mut dyn Write, data_lakes: &[DataLake]) -> io::Result<()> {
    write_section_header(out, "Data Lakes")?;
    if data_lakes.is_empty() {
        writeln!(out, "  No data lakes configured")?;
    }
    for lake in data_lakes {
        writeln!(out, "  Region: {}", lake.region)?;
        writeln!(out, "  ARN: {}", lake.arn)?;
        writeln!(out, "  S3 Bucket: {}", or_na(lake.storage_location_arn.as_deref()))?;
        writeln!(
            out,
            "  Encryption KMS Key: {}",
            lake.encryption_key_id.as_deref().unwrap_or(DEFAULT_KMS_KEY)
        )?;
        if let Some(lifecycle) = &lake.lifecycle {
            if let Some(days) = lifecycle.expiration_days {
                writeln!(out, "  Expiration: {days} days")?;
            }
            for transition in &lifecycle.transitions {
                writeln!(
                    out,
                    "  Transition to {}: {} days",
                    or_na(transition.storage_class.as_deref()),
                    days_or_na(transition.days)
                )?;
            }
        }
        if !lake.replication_regions.is_empty() {
            writeln!(
                out,
                "  Replication Regions: {}",
                lake.replication_regions.join(", ")
            )?;
        }
        if let Some(role) = lake.replication_role_arn.as_deref() {
            writeln!(out, "  Replication Role: {role}")?;
        }
        writeln!(out, "  Status: {}", or_na(lake.create_status.as_deref()))?;
        if let Some(update) = &lake.update_status {
            writeln!(out, "  Update Status: {}", or_na(update.status.as_deref()))?;
            if let Some(reason) = update.exception_reason.as_deref() {
                writeln!(out, "  Update Exception: {reason}")?;
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

/// Exceptions at or after `now - 7 days`. A missing timestamp counts as the cutoff itself and is
/// therefore kept.
pub fn recent_exceptions(
    exceptions: &[DataLakeException],
    now: DateTime<Utc>,
) -> Vec<&DataLakeException> {
    let cutoff = now - Duration::days(EXCEPTION_WINDOW_DAYS);
    exceptions
        .iter()
        .filter(|exc| exc.timestamp.unwrap_or(cutoff) >= cutoff)
        .collect()
}

pub fn write_exceptions(
    out: &mut dyn Write,
    exceptions: &[DataLakeException],
    now: DateTime<Utc>,
) -> io::Result<()> {
    write_section_header(out, "Data Lake Exceptions (last 7 days)")?;
    let recent = recent_exceptions(exceptions, now);
    if recent.is_empty() {
        writeln!(out, "  No recent exceptions")?;
    }
    for exc in recent {
        writeln!(out, "  Region: {}", or_na(exc.region.as_deref()))?;
        writeln!(out, "  Exception: {}", or_na(exc.message.as_deref()))?;
        if let Some(remediation) = exc.remediation.as_deref() {
            writeln!(out, "  Remediation: {remediation}")?;
        }
        match exc.timestamp {
            Some(ts) => writeln!(out, "  Timestamp: {}", ts.format("%Y-%m-%d %H:%M:%S%:z"))?,
            None => writeln!(out, "  Timestamp: {NOT_AVAILABLE}")?,
        }
        writeln!(out)?;
    }
    writeln!(out)
}

pub fn write_log_sources(out: &mut dyn Write, sources: &[LogSource]) -> io::Result<()> {
    write_section_header(out, "Log Sources")?;
    if sources.is_empty() {
        writeln!(out, "  No log sources configured")?;
    }
    for source in sources {
        writeln!(
            out,
            "  Account: {}, Region: {}",
            or_na(source.account.as_deref()),
            or_na(source.region.as_deref())
        )?;
        for src in &source.sources {
            match src {
                SourceRef::Aws(aws) => {
                    writeln!(out, "    AWS Source: {}", or_na(aws.name.as_deref()))?;
                    writeln!(out, "      Version: {}", or_na(aws.version.as_deref()))?;
                }
                SourceRef::Custom(custom) => {
                    writeln!(out, "    Custom Source: {}", or_na(custom.name.as_deref()))?;
                    writeln!(out, "      Version: {}", or_na(custom.version.as_deref()))?;
                    writeln!(
                        out,
                        "      Location: {}",
                        or_na(custom.provider_location.as_deref())
                    )?;
                    writeln!(
                        out,
                        "      Role ARN: {}",
                        or_na(custom.provider_role_arn.as_deref())
                    )?;
                    if let Some(db) = custom.catalog_database_arn.as_deref() {
                        writeln!(out, "      Glue Database: {}", last_path_segment(db))?;
                    }
                    if let Some(table) = custom.catalog_table_arn.as_deref() {
                        writeln!(out, "      Glue Table: {}", last_path_segment(table))?;
                    }
                }
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

pub fn write_subscribers(out: &mut dyn Write, subscribers: &[Subscriber]) -> io::Result<()> {
    write_section_header(out, "Subscribers")?;
    if subscribers.is_empty() {
        writeln!(out, "  No subscribers configured")?;
    }
    for sub in subscribers {
        writeln!(out, "  Name: {}", sub.name)?;
        writeln!(out, "  ID: {}", sub.id)?;
        writeln!(out, "  ARN: {}", sub.arn)?;
        writeln!(out, "  Status: {}", or_na(sub.status.as_deref()))?;
        if let Some(description) = sub.description.as_deref() {
            writeln!(out, "  Description: {description}")?;
        }
        if let Some(identity) = &sub.identity {
            writeln!(out, "  Principal: {}", identity.principal)?;
            writeln!(out, "  External ID: {}", identity.external_id)?;
        }
        if !sub.access_types.is_empty() {
            writeln!(out, "  Access Types: {}", sub.access_types.join(", "))?;
        }
        if !sub.sources.is_empty() {
            writeln!(out, "  Sources:")?;
            for src in &sub.sources {
                match src {
                    SourceRef::Aws(aws) => {
                        writeln!(out, "    - AWS: {}", or_na(aws.name.as_deref()))?;
                    }
                    SourceRef::Custom(custom) => {
                        writeln!(out, "    - Custom: {}", or_na(custom.name.as_deref()))?;
                    }
                }
            }
        }
        if let Some(share) = sub.resource_share_arn.as_deref() {
            writeln!(out, "  Resource Share: {share}")?;
        }
        if let Some(bucket) = sub.bucket_arn.as_deref() {
            writeln!(out, "  S3 Bucket: {bucket}")?;
        }
        if let Some(endpoint) = sub.endpoint.as_deref() {
            writeln!(out, "  Endpoint: {endpoint}")?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AwsLogSource, CustomLogSource, LifecycleConfiguration, LifecycleTransition,
        SubscriberIdentity, UpdateStatus,
    };
    use chrono::TimeZone;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        write(&mut buf).expect("writing to a Vec cannot fail");
        String::from_utf8(buf).expect("utf-8 output")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn bare_lake() -> DataLake {
        DataLake {
            region: "us-east-1".to_string(),
            arn: "arn:aws:securitylake:us-east-1:123456789012:data-lake/default".to_string(),
            ..DataLake::default()
        }
    }

    #[test]
    fn test_data_lake_without_optional_fields() {
        let text = render(|out| write_data_lakes(out, &[bare_lake()]));
        assert!(text.contains("  Region: us-east-1\n"));
        assert!(text.contains("  S3 Bucket: N/A\n"));
        assert!(text.contains("  Encryption KMS Key: default\n"));
        assert!(text.contains("  Status: N/A\n"));
        assert!(!text.contains("Expiration"));
        assert!(!text.contains("Transition"));
        assert!(!text.contains("Replication"));
        assert!(!text.contains("Update Status"));
    }

    #[test]
    fn test_data_lake_with_lifecycle_and_replication() {
        let lake = DataLake {
            storage_location_arn: Some("arn:aws:s3:::aws-security-data-lake-us-east-1-abc".into()),
            encryption_key_id: Some("alias/lake".into()),
            lifecycle: Some(LifecycleConfiguration {
                expiration_days: Some(365),
                transitions: vec![LifecycleTransition {
                    storage_class: Some("STANDARD_IA".into()),
                    days: Some(30),
                }],
            }),
            replication_regions: vec!["us-west-2".into(), "eu-west-1".into()],
            replication_role_arn: Some("arn:aws:iam::123456789012:role/Replication".into()),
            create_status: Some("COMPLETED".into()),
            update_status: Some(UpdateStatus {
                status: Some("FAILED".into()),
                exception_reason: Some("KMS key not accessible".into()),
            }),
            ..bare_lake()
        };
        let text = render(|out| write_data_lakes(out, &[lake]));
        assert!(text.contains("  Encryption KMS Key: alias/lake\n"));
        assert!(text.contains("  Expiration: 365 days\n"));
        assert!(text.contains("  Transition to STANDARD_IA: 30 days\n"));
        assert!(text.contains("  Replication Regions: us-west-2, eu-west-1\n"));
        assert!(text.contains("  Replication Role: arn:aws:iam::123456789012:role/Replication\n"));
        assert!(text.contains("  Status: COMPLETED\n"));
        assert!(text.contains("  Update Status: FAILED\n"));
        assert!(text.contains("  Update Exception: KMS key not accessible\n"));
    }

    #[test]
    fn test_empty_sections() {
        let text = render(|out| write_report(out, "us-east-1", &StatusSnapshot::default(), now()));
        assert!(text.contains("Security Lake Status (Region: us-east-1)"));
        assert!(text.contains("No data lakes configured"));
        assert!(text.contains("No recent exceptions"));
        assert!(text.contains("No log sources configured"));
        assert!(text.contains("No subscribers configured"));
        assert_eq!(text.matches(&"=".repeat(60)).count(), 4);
    }

    #[test]
    fn test_sections_render_in_fixed_order() {
        let text = render(|out| write_report(out, "us-east-1", &StatusSnapshot::default(), now()));
        let lakes = text.find("Data Lakes").expect("data lakes");
        let exceptions = text.find("Data Lake Exceptions").expect("exceptions");
        let sources = text.find("Log Sources").expect("sources");
        let subscribers = text.find("Subscribers").expect("subscribers");
        assert!(lakes < exceptions && exceptions < sources && sources < subscribers);
    }

    #[test]
    fn test_exception_window_is_seven_days_inclusive() {
        let at = |days: i64, message: &str| DataLakeException {
            region: Some("us-east-1".into()),
            message: Some(message.into()),
            remediation: None,
            timestamp: Some(now() - Duration::days(days)),
        };
        let exceptions = vec![at(10, "ten days"), at(6, "six days"), at(1, "one day")];
        let text = render(|out| write_exceptions(out, &exceptions, now()));
        assert!(!text.contains("ten days"));
        assert!(text.contains("  Exception: six days\n"));
        assert!(text.contains("  Exception: one day\n"));

        let boundary = vec![at(EXCEPTION_WINDOW_DAYS, "exactly seven")];
        assert_eq!(recent_exceptions(&boundary, now()).len(), 1);
    }

    #[test]
    fn test_exception_without_timestamp_is_recent() {
        let exceptions = vec![DataLakeException {
            region: None,
            message: Some("no time".into()),
            remediation: Some("check permissions".into()),
            timestamp: None,
        }];
        let text = render(|out| write_exceptions(out, &exceptions, now()));
        assert!(text.contains("  Region: N/A\n"));
        assert!(text.contains("  Exception: no time\n"));
        assert!(text.contains("  Remediation: check permissions\n"));
        assert!(text.contains("  Timestamp: N/A\n"));
    }

    #[test]
    fn test_custom_source_catalog_names() {
        let sources = vec![LogSource {
            account: Some("123456789012".into()),
            region: Some("us-east-1".into()),
            sources: vec![
                SourceRef::Aws(AwsLogSource {
                    name: Some("CLOUD_TRAIL_MGMT".into()),
                    version: Some("2.0".into()),
                }),
                SourceRef::Custom(CustomLogSource {
                    name: Some("tnz-ocsf-1001".into()),
                    version: Some("2.0".into()),
                    provider_location: Some("s3://bucket/ext/tnz-ocsf-1001/".into()),
                    provider_role_arn: Some("arn:aws:iam::123456789012:role/Provider".into()),
                    crawler_arn: None,
                    catalog_database_arn: Some(
                        "arn:aws:glue:us-east-1:123456789012:database/security_lake_db".into(),
                    ),
                    catalog_table_arn: Some(
                        "arn:aws:glue:us-east-1:123456789012:table/security_lake_db/tnz_ocsf_1001"
                            .into(),
                    ),
                }),
            ],
        }];
        let text = render(|out| write_log_sources(out, &sources));
        assert!(text.contains("  Account: 123456789012, Region: us-east-1\n"));
        assert!(text.contains("    AWS Source: CLOUD_TRAIL_MGMT\n      Version: 2.0\n"));
        assert!(text.contains("    Custom Source: tnz-ocsf-1001\n"));
        assert!(text.contains("      Location: s3://bucket/ext/tnz-ocsf-1001/\n"));
        assert!(text.contains("      Glue Database: security_lake_db\n"));
        assert!(text.contains("      Glue Table: tnz_ocsf_1001\n"));
    }

    #[test]
    fn test_subscriber_optional_blocks() {
        let minimal = Subscriber {
            name: "analytics".into(),
            id: "sub-1".into(),
            arn: "arn:aws:securitylake:us-east-1:123456789012:subscriber/sub-1".into(),
            ..Subscriber::default()
        };
        let text = render(|out| write_subscribers(out, &[minimal.clone()]));
        assert!(text.contains("  Status: N/A\n"));
        assert!(!text.contains("Principal"));
        assert!(!text.contains("Access Types"));
        assert!(!text.contains("Sources:"));
        assert!(!text.contains("Endpoint"));

        let full = Subscriber {
            status: Some("ACTIVE".into()),
            description: Some("SIEM feed".into()),
            identity: Some(SubscriberIdentity {
                principal: "210987654321".into(),
                external_id: "siem-ext".into(),
            }),
            access_types: vec!["LAKEFORMATION".into(), "S3".into()],
            sources: vec![
                SourceRef::Aws(AwsLogSource {
                    name: Some("VPC_FLOW".into()),
                    version: None,
                }),
                SourceRef::Custom(CustomLogSource {
                    name: Some("tnz-ocsf-4001".into()),
                    ..CustomLogSource::default()
                }),
            ],
            resource_share_arn: Some("arn:aws:ram:us-east-1:123456789012:resource-share/x".into()),
            bucket_arn: Some("arn:aws:s3:::subscriber-bucket".into()),
            endpoint: Some("https://siem.example.com/hook".into()),
            ..minimal
        };
        let text = render(|out| write_subscribers(out, &[full]));
        assert!(text.contains("  Description: SIEM feed\n"));
        assert!(text.contains("  Principal: 210987654321\n  External ID: siem-ext\n"));
        assert!(text.contains("  Access Types: LAKEFORMATION, S3\n"));
        assert!(text.contains("    - AWS: VPC_FLOW\n    - Custom: tnz-ocsf-4001\n"));
        assert!(text.contains("  Resource Share: arn:aws:ram:us-east-1:123456789012:resource-share/x\n"));
        assert!(text.contains("  S3 Bucket: arn:aws:s3:::subscriber-bucket\n"));
        assert!(text.contains("  Endpoint: https://siem.example.com/hook\n"));
    }
}
