//! Ingestion service trait and types.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IngestionError;

/// Maximum number of recent jobs inspected when checking for a running job.
pub const RECENT_JOBS_LIMIT: i32 = 5;

/// The knowledge-base / data-source pair every job is started against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionTarget {
    pub knowledge_base_id: String,
    pub data_source_id: String,
}

impl IngestionTarget {
    pub fn new(knowledge_base_id: impl Into<String>, data_source_id: impl Into<String>) -> Self {
        Self {
            knowledge_base_id: knowledge_base_id.into(),
            data_source_id: data_source_id.into(),
        }
    }
}

impl fmt::Display for IngestionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.knowledge_base_id, self.data_source_id)
    }
}

/// Lifecycle state of an ingestion job as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestionJobStatus {
    Starting,
    InProgress,
    Complete,
    Failed,
    Stopping,
    Stopped,
    Other(String),
}

impl IngestionJobStatus {
    /// Parse the service's wire value (`STARTING`, `IN_PROGRESS`, ...).
    pub fn from_wire(s: &str) -> Self {
        match s {
            "STARTING" => Self::Starting,
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETE" => Self::Complete,
            "FAILED" => Self::Failed,
            "STOPPING" => Self::Stopping,
            "STOPPED" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }

    /// A job in this state blocks starting another one.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::InProgress)
    }
}

impl fmt::Display for IngestionJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "STARTING"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::Failed => write!(f, "FAILED"),
            Self::Stopping => write!(f, "STOPPING"),
            Self::Stopped => write!(f, "STOPPED"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One entry of a list-jobs response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionJobSummary {
    pub job_id: String,
    pub status: IngestionJobStatus,
}

/// A job returned by a successful start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionJob {
    pub job_id: String,
    pub status: IngestionJobStatus,
}

/// Remote knowledge-base ingestion API.
///
/// The production implementation is [`crate::BedrockIngestionService`];
/// tests substitute an in-memory double.
#[async_trait]
pub trait IngestionService: Send + Sync {
    /// List the most recent jobs for `target`, newest first, at most `max_results`.
    async fn list_ingestion_jobs(
        &self,
        target: &IngestionTarget,
        max_results: i32,
    ) -> Result<Vec<IngestionJobSummary>, IngestionError>;

    /// Request a new ingestion job for `target`.
    async fn start_ingestion_job(
        &self,
        target: &IngestionTarget,
        description: &str,
    ) -> Result<IngestionJob, IngestionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_status_round_trip() {
        for wire in ["STARTING", "IN_PROGRESS", "COMPLETE", "FAILED", "STOPPING", "STOPPED"] {
            assert_eq!(IngestionJobStatus::from_wire(wire).to_string(), wire);
        }
        assert_eq!(
            IngestionJobStatus::from_wire("QUEUED"),
            IngestionJobStatus::Other("QUEUED".into())
        );
    }

    #[test]
    fn only_starting_and_in_progress_are_active() {
        assert!(IngestionJobStatus::Starting.is_active());
        assert!(IngestionJobStatus::InProgress.is_active());
        assert!(!IngestionJobStatus::Complete.is_active());
        assert!(!IngestionJobStatus::Failed.is_active());
        assert!(!IngestionJobStatus::Stopping.is_active());
        assert!(!IngestionJobStatus::Stopped.is_active());
        assert!(!IngestionJobStatus::Other("QUEUED".into()).is_active());
    }

    #[test]
    fn target_display() {
        let target = IngestionTarget::new("KB1", "DS1");
        assert_eq!(target.to_string(), "KB1/DS1");
    }
}
