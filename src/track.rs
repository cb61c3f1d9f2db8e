//! Tracking pipeline: validate, dedupe, deliver.

use tracing::info;

use crate::command::CommandRecord;
use crate::dedup::DedupGuard;
use crate::error::Result;
use crate::sync::DeliveryClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The server accepted the command.
    Sent,
    /// Same command, host and directory as the previous one; nothing sent.
    Duplicate,
}

pub struct Tracker {
    client: DeliveryClient,
    guard: Option<DedupGuard>,
}

impl Tracker {
    pub fn new(client: DeliveryClient, guard: DedupGuard) -> Self {
        Self {
            client,
            guard: Some(guard),
        }
    }

    /// Tracker that sends every command, repeats included.
    pub fn without_dedup(client: DeliveryClient) -> Self {
        Self {
            client,
            guard: None,
        }
    }

    /// Normalize and validate `record`, skip it if it repeats the previous
    /// command, otherwise deliver it.
    ///
    /// The fingerprint is recorded before delivery, so a failed send leaves
    /// the command marked as seen.
    pub async fn track(&self, mut record: CommandRecord) -> Result<TrackOutcome> {
        record.validate()?;

        if let Some(guard) = &self.guard {
            if guard.check_and_update(&record.fingerprint())? {
                info!("duplicate of previous command, not sending");
                return Ok(TrackOutcome::Duplicate);
            }
        }

        self.client.send(&record).await?;
        Ok(TrackOutcome::Sent)
    }
}
