//! Daily publish trigger.
//!
//! The publish time is a cron expression evaluated in a fixed UTC offset.
//! The background task sleeps until the next fire time, publishes, and
//! repeats; it never runs two publishes at once because it awaits each one.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};

use crate::config::ScheduleConfig;
use crate::error::ConfigError;
use crate::report::{PublishOutcome, ReportService};

/// Compiled daily schedule.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    schedule: cron::Schedule,
    offset: FixedOffset,
}

impl DailySchedule {
    pub fn new(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        let expression = config.cron_expression();
        let schedule =
            cron::Schedule::from_str(&expression).map_err(|e| ConfigError::InvalidValue {
                key: "REPORT_PUBLISH_TIME".into(),
                message: format!("invalid cron '{expression}': {e}"),
            })?;

        Ok(Self {
            schedule,
            offset: config.utc_offset,
        })
    }

    /// First fire time strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
        self.schedule
            .after(&now.with_timezone(&self.offset))
            .next()
    }
}

/// Spawn the daily publish loop.
pub fn spawn_daily_publisher(
    schedule: DailySchedule,
    service: Arc<ReportService>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let Some(next) = schedule.next_after(now) else {
                tracing::error!("Daily schedule has no upcoming fire time, stopping");
                return;
            };

            let wait = (next.with_timezone(&Utc) - now)
                .to_std()
                .unwrap_or_default();
            tracing::info!(next = %next, "Next scheduled publish");
            tokio::time::sleep(wait).await;

            match service.publish().await {
                Ok(PublishOutcome::Published { employees }) => {
                    tracing::info!(employees, "Scheduled publish delivered");
                }
                Ok(PublishOutcome::NoReport) => {
                    tracing::info!("Scheduled publish: no reports today");
                }
                Err(e) => {
                    tracing::error!("Scheduled publish failed: {}", e);
                }
            }
        }
    })
}
