//! Report service — the single owner of the cycle's report store.
//!
//! Every read or write of the store goes through one async mutex, and
//! publishes are serialised by a second one, so a scheduled and a manual
//! publish can never overlap. The store lock is not held while the summary
//! is on the wire.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::channels::Channel;
use crate::error::{self, ReportError};
use crate::messages;

use super::parser;
use super::record::EmployeeRecord;
use super::store::ReportStore;
use super::summary;

/// What a publish delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A summary covering `employees` records was delivered and the cycle
    /// was reset.
    Published { employees: usize },
    /// Nobody reported; the fixed notice was delivered instead.
    NoReport,
}

/// Accepts submissions and publishes the branch summary.
pub struct ReportService {
    store: Mutex<ReportStore>,
    publish_gate: Mutex<()>,
    channel: Arc<dyn Channel>,
    destination: String,
}

impl ReportService {
    /// `destination` is the chat id that receives summaries.
    pub fn new(channel: Arc<dyn Channel>, destination: impl Into<String>) -> Self {
        Self::with_store(ReportStore::new(), channel, destination)
    }

    pub fn with_store(
        store: ReportStore,
        channel: Arc<dyn Channel>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            publish_gate: Mutex::new(()),
            channel,
            destination: destination.into(),
        }
    }

    /// Parse a submission and merge it into the store.
    ///
    /// Returns the number of records accepted. A rejected submission leaves
    /// the store untouched.
    pub async fn submit(&self, text: &str) -> Result<usize, ReportError> {
        let records = match parser::parse_submission(text) {
            Ok(records) => records,
            Err(e) => {
                debug!(lines = text.lines().count(), "Submission rejected");
                return Err(e);
            }
        };

        let accepted = records.len();
        let mut store = self.store.lock().await;
        store.merge(records);
        info!(accepted, employees = store.len(), "Submission saved");

        Ok(accepted)
    }

    /// Copy of the current cycle's records.
    pub async fn snapshot(&self) -> Vec<EmployeeRecord> {
        self.store.lock().await.snapshot()
    }

    /// Render the cycle summary and post it to the destination chat.
    ///
    /// The store is reset only after the channel accepted the message. If
    /// delivery fails the records stay for the next attempt.
    pub async fn publish(&self) -> error::Result<PublishOutcome> {
        let _gate = self.publish_gate.lock().await;

        let (published, revision) = {
            let store = self.store.lock().await;
            (store.snapshot(), store.revision())
        };

        let text = match summary::render(&published) {
            Ok(text) => text,
            Err(ReportError::EmptyReport) => {
                self.channel
                    .send_to(&self.destination, messages::NO_REPORT)
                    .await?;
                info!(destination = %self.destination, "No reports this cycle");
                return Ok(PublishOutcome::NoReport);
            }
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = self.channel.send_to(&self.destination, &text).await {
            warn!(
                destination = %self.destination,
                employees = published.len(),
                "Summary delivery failed, keeping reports: {}",
                e
            );
            return Err(e.into());
        }

        let mut store = self.store.lock().await;
        if store.revision() == revision {
            store.clear();
        } else {
            // Submissions arrived while the summary was in flight.
            store.discard_published(&published);
            debug!(kept = store.len(), "Kept reports submitted during publish");
        }

        info!(
            destination = %self.destination,
            employees = published.len(),
            "Summary published"
        );

        Ok(PublishOutcome::Published {
            employees: published.len(),
        })
    }
}
