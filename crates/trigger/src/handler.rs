//! Storage-event handler that keeps the knowledge base re-indexed.
//!
//! For every created/removed object the handler checks whether an ingestion
//! job is already active for the configured target and starts one if not.
//! The check and the start are two separate remote calls, so overlapping
//! invocations can both start a job; the service is the only source of truth.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use autoingest_core::ChangeNotification;

use crate::error::TriggerError;
use crate::parser::{event_records, parse_record};
use crate::service::{IngestionJob, IngestionService, IngestionTarget, RECENT_JOBS_LIMIT};

const COMPLETED_MESSAGE: &str = "Ingestion processing completed";

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ── Result types ──────────────────────────────────────────────

/// What happened for a single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// Event type outside the created/removed families.
    Ignored,
    /// A job was already running.
    Skipped,
    Started { job_id: String },
    StartFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HandlerBody {
    Completed { message: String, timestamp: String },
    Failed { error: String, timestamp: String },
}

/// Invocation result in the `{statusCode, body}` shape callers expect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResult {
    pub status_code: u16,
    pub body: HandlerBody,
    /// Per-notification outcomes, in input order, for everything processed
    /// before the invocation finished or failed.
    #[serde(skip)]
    pub outcomes: Vec<TriggerOutcome>,
}

impl HandlerResult {
    fn completed(outcomes: Vec<TriggerOutcome>) -> Self {
        Self {
            status_code: 200,
            body: HandlerBody::Completed {
                message: COMPLETED_MESSAGE.to_string(),
                timestamp: now_iso(),
            },
            outcomes,
        }
    }

    fn failed(err: &TriggerError, outcomes: Vec<TriggerOutcome>) -> Self {
        Self {
            status_code: 500,
            body: HandlerBody::Failed {
                error: err.to_string(),
                timestamp: now_iso(),
            },
            outcomes,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// Number of jobs this invocation started.
    pub fn started_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TriggerOutcome::Started { .. }))
            .count()
    }
}

// ── Handler ───────────────────────────────────────────────────

/// Stateless ingestion trigger bound to one knowledge-base / data-source pair.
pub struct IngestionTrigger {
    service: Arc<dyn IngestionService>,
    target: IngestionTarget,
}

impl IngestionTrigger {
    pub fn new(service: Arc<dyn IngestionService>, target: IngestionTarget) -> Self {
        Self { service, target }
    }

    pub fn target(&self) -> &IngestionTarget {
        &self.target
    }

    /// Handle a raw S3 event document.
    ///
    /// Returns 500 on the first malformed record; records before it have
    /// already been processed and are reported in `outcomes`.
    pub async fn handle_event(&self, event: &Value) -> HandlerResult {
        let mut outcomes = Vec::new();
        match self.process_event(event, &mut outcomes).await {
            Ok(()) => HandlerResult::completed(outcomes),
            Err(e) => {
                error!(error = %e, processed = outcomes.len(), "Error processing S3 event");
                HandlerResult::failed(&e, outcomes)
            }
        }
    }

    /// Handle an already-parsed batch, in order.
    pub async fn handle(&self, batch: &[ChangeNotification]) -> HandlerResult {
        let mut outcomes = Vec::with_capacity(batch.len());
        for notification in batch {
            outcomes.push(self.process(notification).await);
        }
        HandlerResult::completed(outcomes)
    }

    async fn process_event(
        &self,
        event: &Value,
        outcomes: &mut Vec<TriggerOutcome>,
    ) -> Result<(), TriggerError> {
        let records = event_records(event)?;
        debug!(count = records.len(), "Received S3 event records");

        for (index, record) in records.iter().enumerate() {
            let notification = parse_record(index, record)?;
            outcomes.push(self.process(&notification).await);
        }
        Ok(())
    }

    /// Run the check-then-start guard for one notification.
    pub async fn process(&self, notification: &ChangeNotification) -> TriggerOutcome {
        info!(
            event_name = %notification.event_name,
            bucket = %notification.bucket,
            object_key = %notification.object_key,
            "Processing S3 event"
        );

        if !notification.kind.triggers_ingestion() {
            debug!(event_name = %notification.event_name, "Ignoring event outside created/removed families");
            return TriggerOutcome::Ignored;
        }

        if self.is_job_running().await {
            info!("Ingestion job already running, skipping trigger");
            return TriggerOutcome::Skipped;
        }

        match self.start_job().await {
            Some(job) => {
                info!(job_id = %job.job_id, status = %job.status, "Successfully started ingestion job");
                TriggerOutcome::Started { job_id: job.job_id }
            }
            None => {
                error!("Failed to start ingestion job");
                TriggerOutcome::StartFailed
            }
        }
    }

    /// Whether any of the most recent jobs for the target is still active.
    ///
    /// A failed lookup counts as "not running" so that new documents are
    /// never left unindexed because of a listing error.
    pub async fn is_job_running(&self) -> bool {
        let jobs = match self
            .service
            .list_ingestion_jobs(&self.target, RECENT_JOBS_LIMIT)
            .await
        {
            Ok(jobs) => jobs,
            Err(e) => {
                error!(error = %e, target = %self.target, "Error checking ingestion status, assuming none running");
                return false;
            }
        };

        match jobs.iter().find(|job| job.status.is_active()) {
            Some(job) => {
                info!(job_id = %job.job_id, status = %job.status, "Found running ingestion job");
                true
            }
            None => false,
        }
    }

    /// Start a new ingestion job; `None` when the service rejects it.
    pub async fn start_job(&self) -> Option<IngestionJob> {
        let description = format!("Auto-triggered ingestion at {}", now_iso());
        match self
            .service
            .start_ingestion_job(&self.target, &description)
            .await
        {
            Ok(job) => Some(job),
            Err(e) => {
                error!(error = %e, target = %self.target, "Error starting ingestion job");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_result_serializes_with_message() {
        let result = HandlerResult::completed(vec![TriggerOutcome::Ignored]);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"]["message"], COMPLETED_MESSAGE);
        assert!(json["body"]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(json.get("outcomes").is_none());
    }

    #[test]
    fn failed_result_serializes_with_error() {
        let err = TriggerError::MalformedEvent("missing 'Records'".into());
        let result = HandlerResult::failed(&err, Vec::new());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["body"]["error"], "malformed event: missing 'Records'");
        assert!(json["body"].get("message").is_none());
        assert!(!result.is_success());
    }

    #[test]
    fn started_count_only_counts_started() {
        let result = HandlerResult::completed(vec![
            TriggerOutcome::Started { job_id: "j1".into() },
            TriggerOutcome::Skipped,
            TriggerOutcome::StartFailed,
            TriggerOutcome::Started { job_id: "j2".into() },
        ]);
        assert_eq!(result.started_count(), 2);
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = now_iso();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
