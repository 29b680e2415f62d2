//! Amazon Security Lake client wrapper.
//!
//! SDK records are converted into the crate's own types at this boundary so the reporter never
//! touches SDK shapes.

use crate::aws::{ApiError, ApiResult, SecurityLakeApi};
use crate::types::{
    AwsLogSource, CustomLogSource, CustomSourceRequest, DataLake, DataLakeException,
    LifecycleConfiguration, LifecycleTransition, LogSource, SourceRef, Subscriber,
    SubscriberIdentity, UpdateStatus,
};
use async_trait::async_trait;
use aws_sdk_securitylake::primitives::DateTime as SdkDateTime;
use aws_sdk_securitylake::types as sl;
use aws_sdk_securitylake::Client as SecurityLakeClient;
use chrono::{DateTime, Utc};
use log::debug;

pub struct AwsSecurityLakeClient {
    client: SecurityLakeClient,
}

impl AwsSecurityLakeClient {
    pub fn new(client: SecurityLakeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecurityLakeApi for AwsSecurityLakeClient {
    async fn list_data_lakes(&self) -> ApiResult<Vec<DataLake>> {
        let response = self
            .client
            .list_data_lakes()
            .send()
            .await
            .map_err(|e| ApiError::from_sdk("ListDataLakes", e))?;

        Ok(response.data_lakes().iter().map(convert_data_lake).collect())
    }

    async fn list_data_lake_exceptions(&self) -> ApiResult<Vec<DataLakeException>> {
        let mut pages = self
            .client
            .list_data_lake_exceptions()
            .into_paginator()
            .send();

        let mut exceptions = Vec::new();
        let mut page_count = 0usize;
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ApiError::from_sdk("ListDataLakeExceptions", e))?;
            page_count += 1;
            exceptions.extend(page.exceptions().iter().map(convert_exception));
        }
        debug!(
            "ListDataLakeExceptions returned {} exceptions over {} pages",
            exceptions.len(),
            page_count
        );
        Ok(exceptions)
    }

    async fn list_log_sources(&self) -> ApiResult<Vec<LogSource>> {
        let mut pages = self.client.list_log_sources().into_paginator().send();

        let mut sources = Vec::new();
        let mut page_count = 0usize;
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ApiError::from_sdk("ListLogSources", e))?;
            page_count += 1;
            sources.extend(page.sources().iter().map(convert_log_source));
        }
        debug!(
            "ListLogSources returned {} entries over {} pages",
            sources.len(),
            page_count
        );
        Ok(sources)
    }

    async fn list_subscribers(&self) -> ApiResult<Vec<Subscriber>> {
        let mut pages = self.client.list_subscribers().into_paginator().send();

        let mut subscribers = Vec::new();
        let mut page_count = 0usize;
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| ApiError::from_sdk("ListSubscribers", e))?;
            page_count += 1;
            subscribers.extend(page.subscribers().iter().map(convert_subscriber));
        }
        debug!(
            "ListSubscribers returned {} subscribers over {} pages",
            subscribers.len(),
            page_count
        );
        Ok(subscribers)
    }

    async fn create_custom_log_source(
        &self,
        request: &CustomSourceRequest,
    ) -> ApiResult<CustomLogSource> {
        const OPERATION: &str = "CreateCustomLogSource";
        let invalid = |e: aws_sdk_securitylake::error::BuildError| ApiError::Service {
            operation: OPERATION,
            code: None,
            message: format!("invalid request: {e}"),
        };

        let crawler = sl::CustomLogSourceCrawlerConfiguration::builder()
            .role_arn(&request.crawler_role_arn)
            .build()
            .map_err(invalid)?;
        let provider_identity = sl::AwsIdentity::builder()
            .principal(&request.provider_account_id)
            .external_id(&request.external_id)
            .build()
            .map_err(invalid)?;
        let configuration = sl::CustomLogSourceConfiguration::builder()
            .crawler_configuration(crawler)
            .provider_identity(provider_identity)
            .build();

        let response = self
            .client
            .create_custom_log_source()
            .source_name(&request.source_name)
            .event_classes(&request.event_class)
            .configuration(configuration)
            .send()
            .await
            .map_err(|e| ApiError::from_sdk(OPERATION, e))?;

        Ok(response
            .source()
            .map(convert_custom_source)
            .unwrap_or_else(|| CustomLogSource {
                name: Some(request.source_name.clone()),
                ..CustomLogSource::default()
            }))
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn to_utc(timestamp: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn convert_data_lake(lake: &sl::DataLakeResource) -> DataLake {
    let replication = lake.replication_configuration();
    DataLake {
        region: lake.region().to_string(),
        arn: lake.data_lake_arn().to_string(),
        storage_location_arn: owned(lake.s3_bucket_arn()),
        encryption_key_id: owned(
            lake.encryption_configuration()
                .and_then(|config| config.kms_key_id()),
        ),
        lifecycle: lake
            .lifecycle_configuration()
            .map(|lifecycle| LifecycleConfiguration {
                expiration_days: lifecycle.expiration().and_then(|exp| exp.days()),
                transitions: lifecycle
                    .transitions()
                    .iter()
                    .map(|transition| LifecycleTransition {
                        storage_class: owned(transition.storage_class()),
                        days: transition.days(),
                    })
                    .collect(),
            }),
        replication_regions: replication
            .map(|config| config.regions().to_vec())
            .unwrap_or_default(),
        replication_role_arn: owned(replication.and_then(|config| config.role_arn())),
        create_status: lake.create_status().map(|status| status.as_str().to_string()),
        update_status: lake.update_status().map(|update| UpdateStatus {
            status: update.status().map(|status| status.as_str().to_string()),
            exception_reason: owned(update.exception().and_then(|exc| exc.reason())),
        }),
    }
}

fn convert_exception(exception: &sl::DataLakeException) -> DataLakeException {
    DataLakeException {
        region: owned(exception.region()),
        message: owned(exception.exception()),
        remediation: owned(exception.remediation()),
        timestamp: exception.timestamp().and_then(to_utc),
    }
}

fn convert_log_source(source: &sl::LogSource) -> LogSource {
    LogSource {
        account: owned(source.account()),
        region: owned(source.region()),
        sources: source.sources().iter().filter_map(convert_source).collect(),
    }
}

fn convert_source(resource: &sl::LogSourceResource) -> Option<SourceRef> {
    match resource {
        sl::LogSourceResource::AwsLogSource(aws) => Some(SourceRef::Aws(AwsLogSource {
            name: aws.source_name().map(|name| name.as_str().to_string()),
            version: owned(aws.source_version()),
        })),
        sl::LogSourceResource::CustomLogSource(custom) => {
            Some(SourceRef::Custom(convert_custom_source(custom)))
        }
        _ => None,
    }
}

fn convert_custom_source(custom: &sl::CustomLogSourceResource) -> CustomLogSource {
    let provider = custom.provider();
    let attributes = custom.attributes();
    CustomLogSource {
        name: owned(custom.source_name()),
        version: owned(custom.source_version()),
        provider_location: owned(provider.and_then(|p| p.location())),
        provider_role_arn: owned(provider.and_then(|p| p.role_arn())),
        crawler_arn: owned(attributes.and_then(|a| a.crawler_arn())),
        catalog_database_arn: owned(attributes.and_then(|a| a.database_arn())),
        catalog_table_arn: owned(attributes.and_then(|a| a.table_arn())),
    }
}

fn convert_subscriber(subscriber: &sl::SubscriberResource) -> Subscriber {
    Subscriber {
        name: subscriber.subscriber_name().to_string(),
        id: subscriber.subscriber_id().to_string(),
        arn: subscriber.subscriber_arn().to_string(),
        status: subscriber
            .subscriber_status()
            .map(|status| status.as_str().to_string()),
        description: owned(subscriber.subscriber_description()),
        identity: subscriber
            .subscriber_identity()
            .map(|identity| SubscriberIdentity {
                principal: identity.principal().to_string(),
                external_id: identity.external_id().to_string(),
            }),
        access_types: subscriber
            .access_types()
            .iter()
            .map(|access| access.as_str().to_string())
            .collect(),
        sources: subscriber
            .sources()
            .iter()
            .filter_map(convert_source)
            .collect(),
        resource_share_arn: owned(subscriber.resource_share_arn()),
        bucket_arn: owned(subscriber.s3_bucket_arn()),
        endpoint: owned(subscriber.subscriber_endpoint()),
    }
}
