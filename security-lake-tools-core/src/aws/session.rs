//! Session and region resolution.
//!
//! Credentials come from the standard provider chain (explicit profile, environment variables,
//! role credentials). The region comes from the explicit flag first, then the profile and
//! environment defaults discovered by the SDK, then an optional caller-supplied fallback.

use crate::error::{ToolError, ToolResult};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use log::debug;

/// What the user asked for on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub region: Option<String>,
    pub profile: Option<String>,
    /// Used only when neither the flag nor the profile/environment yields a region.
    pub fallback_region: Option<String>,
}

/// Loaded SDK configuration together with the region every client will target.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SdkConfig,
    pub region: String,
}

pub const NO_REGION_HELP: &str = "Provide a region using one of:\n  \u{2022} --region flag\n  \u{2022} AWS_DEFAULT_REGION environment variable\n  \u{2022} region setting in your AWS profile";

/// Pick the region in precedence order: explicit flag, discovered default, fallback.
pub fn resolve_region(
    explicit: Option<&str>,
    discovered: Option<&str>,
    fallback: Option<&str>,
) -> Option<String> {
    [explicit, discovered, fallback]
        .into_iter()
        .flatten()
        .find(|region| !region.trim().is_empty())
        .map(str::to_string)
}

impl Session {
    /// Load the SDK configuration and resolve the target region.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no region can be determined.
    pub async fn load(options: &SessionOptions) -> ToolResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = options.profile.as_deref() {
            loader = loader.profile_name(profile);
        }
        let discovered = loader.load().await;
        let discovered_region = discovered.region().map(ToString::to_string);

        let region = resolve_region(
            options.region.as_deref(),
            discovered_region.as_deref(),
            options.fallback_region.as_deref(),
        )
        .ok_or_else(|| ToolError::configuration("No AWS region specified"))?;

        debug!(
            "Resolved region {} (profile: {})",
            region,
            options.profile.as_deref().unwrap_or("default")
        );

        let config = discovered
            .into_builder()
            .region(Region::new(region.clone()))
            .build();

        Ok(Self {
            config,
            region,
        })
    }
}
