//! Asynchronous create operations
//!
//! Creating a project does not return the project. The service queues the
//! work and hands back an operation handle, which is polled until it reaches
//! a terminal status or the poll budget runs out.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};

use crate::client::{AggregatedClient, Operation, OperationsClient, TeamProject};
use crate::error::{ProjectError, ProjectResult};

/// How often, and for how long, an operation is polled
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Maximum number of status queries
    pub max_polls: u32,
    /// Delay after the first non-terminal status
    pub interval: Duration,
    /// Growth factor applied to the delay after each poll (1.0 = fixed)
    pub backoff_multiplier: f64,
    /// Upper bound for any single delay
    pub max_interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(5, Duration::from_secs(1))
    }
}

impl PollPolicy {
    /// Same delay between every poll
    pub fn fixed(max_polls: u32, interval: Duration) -> Self {
        Self {
            max_polls,
            interval,
            backoff_multiplier: 1.0,
            max_interval: interval,
        }
    }

    /// Delay grows by `multiplier` after each poll, capped at `max_interval`
    ///
    /// A multiplier below 1.0 (or NaN) keeps the delay fixed.
    pub fn with_backoff(mut self, multiplier: f64, max_interval: Duration) -> Self {
        self.backoff_multiplier = if multiplier >= 1.0 { multiplier } else { 1.0 };
        self.max_interval = max_interval;
        self
    }

    /// Delay to wait after poll number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.interval.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        if !(secs >= 0.0) {
            return self.interval.min(self.max_interval);
        }
        // Out-of-range values only arise past the cap.
        Duration::try_from_secs_f64(secs)
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }
}

/// Waits between polls
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Poll `operation_id` until it succeeds, fails, or the budget runs out
///
/// Status queries are issued one at a time. A failing status query aborts
/// immediately with that error; it is never folded into a timeout.
pub async fn wait_for_operation(
    operations: &dyn OperationsClient,
    operation_id: &str,
    policy: &PollPolicy,
    sleeper: &dyn Sleeper,
) -> ProjectResult<Operation> {
    for attempt in 1..=policy.max_polls {
        let operation = operations
            .get_operation(operation_id)
            .await
            .map_err(ProjectError::StatusQuery)?;

        debug!(
            "operation {} status {} (poll {}/{})",
            operation_id, operation.status, attempt, policy.max_polls
        );

        if operation.status.is_success() {
            info!("operation {} succeeded", operation_id);
            return Ok(operation);
        }

        if operation.status.is_terminal() {
            warn!(
                "operation {} finished with status {}",
                operation_id, operation.status
            );
            return Err(ProjectError::OperationFailed {
                status: operation.status,
                message: operation.result_message,
            });
        }

        if attempt < policy.max_polls {
            sleeper.sleep(policy.delay_for(attempt)).await;
        }
    }

    warn!(
        "operation {} still running after {} polls",
        operation_id, policy.max_polls
    );
    Err(ProjectError::Timeout {
        operation_id: operation_id.to_string(),
        polls: policy.max_polls,
    })
}

/// Submit `project` for creation and wait for the operation to succeed
///
/// A rejected submission is returned as-is and never retried.
pub async fn create_with_polling(
    clients: &AggregatedClient,
    project: &TeamProject,
    policy: &PollPolicy,
    sleeper: &dyn Sleeper,
) -> ProjectResult<Operation> {
    let reference = clients
        .core
        .queue_create_project(project)
        .await
        .map_err(ProjectError::Submit)?;

    info!(
        "queued creation of project {} (operation {})",
        project.name, reference.id
    );

    wait_for_operation(clients.operations.as_ref(), &reference.id, policy, sleeper).await
}
