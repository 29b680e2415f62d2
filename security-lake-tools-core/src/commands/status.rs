//! Status report for the Security Lake tools service

use crate::aws::ApiResult;
use crate::error::ToolResult;
use crate::report::write_report;
use crate::types::StatusSnapshot;
use chrono::Utc;
use log::debug;
use std::io::Write;

impl super::service::SecurityLakeToolsService {
    /// Fetch data lakes, exceptions, log sources and subscribers, in that order.
    ///
    /// The first failing query aborts the fetch; no partial snapshot is returned.
    pub async fn fetch_status(&self) -> ApiResult<StatusSnapshot> {
        let data_lakes = self.lake.list_data_lakes().await?;
        debug!("Fetched {} data lakes", data_lakes.len());
        let exceptions = self.lake.list_data_lake_exceptions().await?;
        let log_sources = self.lake.list_log_sources().await?;
        let subscribers = self.lake.list_subscribers().await?;

        Ok(StatusSnapshot {
            data_lakes,
            exceptions,
            log_sources,
            subscribers,
        })
    }

    /// Write the status report for the service's region.
    ///
    /// Nothing is written unless all four queries succeed.
    pub async fn report(&self, out: &mut dyn Write) -> ToolResult<()> {
        let snapshot = self.fetch_status().await?;
        write_report(out, &self.region, &snapshot, Utc::now())?;
        Ok(())
    }
}
