//! Provider configuration
//!
//! Read from the attributes of the provider block, e.g.
//!
//! ```text
//! provider azuredevops {
//!   project_create_max_polls          = 10
//!   project_create_poll_interval_secs = 2
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use azdo_core::provider::{ProviderError, ProviderResult};
use azdo_core::resource::Value;

use crate::operation::PollPolicy;

/// Configuration for an `AzureDevOpsProvider`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfig {
    /// Polling used while waiting for a project to be created
    pub create_poll: PollPolicy,
}

impl ProviderConfig {
    pub const MAX_POLLS: &'static str = "project_create_max_polls";
    pub const POLL_INTERVAL_SECS: &'static str = "project_create_poll_interval_secs";
    pub const POLL_MAX_INTERVAL_SECS: &'static str = "project_create_poll_max_interval_secs";

    /// Build from provider block attributes, falling back to defaults
    pub fn from_attributes(attributes: &HashMap<String, Value>) -> ProviderResult<Self> {
        let defaults = PollPolicy::default();

        let max_polls = match get_int(attributes, Self::MAX_POLLS)? {
            Some(n) if n > 0 => u32::try_from(n).map_err(|_| {
                ProviderError::validation(format!("{} is too large: {}", Self::MAX_POLLS, n))
            })?,
            Some(n) => {
                return Err(ProviderError::validation(format!(
                    "{} must be positive, got {}",
                    Self::MAX_POLLS,
                    n
                )));
            }
            None => defaults.max_polls,
        };

        let interval = match get_int(attributes, Self::POLL_INTERVAL_SECS)? {
            Some(secs) => seconds(Self::POLL_INTERVAL_SECS, secs)?,
            None => defaults.interval,
        };

        let mut create_poll = PollPolicy::fixed(max_polls, interval);
        if let Some(secs) = get_int(attributes, Self::POLL_MAX_INTERVAL_SECS)? {
            let max_interval = seconds(Self::POLL_MAX_INTERVAL_SECS, secs)?;
            if max_interval < interval {
                return Err(ProviderError::validation(format!(
                    "{} must not be smaller than {}",
                    Self::POLL_MAX_INTERVAL_SECS,
                    Self::POLL_INTERVAL_SECS
                )));
            }
            create_poll = create_poll.with_backoff(2.0, max_interval);
        }

        Ok(Self { create_poll })
    }
}

fn get_int(attributes: &HashMap<String, Value>, key: &str) -> ProviderResult<Option<i64>> {
    match attributes.get(key) {
        None => Ok(None),
        Some(Value::Int(n)) => Ok(Some(*n)),
        Some(other) => Err(ProviderError::validation(format!(
            "{} must be an Int, got {}",
            key,
            other.type_name()
        ))),
    }
}

fn seconds(key: &str, secs: i64) -> ProviderResult<Duration> {
    u64::try_from(secs)
        .map(Duration::from_secs)
        .map_err(|_| ProviderError::validation(format!("{} must not be negative", key)))
}
