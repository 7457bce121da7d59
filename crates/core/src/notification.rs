use std::fmt;

use serde::{Deserialize, Serialize};

/// Event-name prefix for every S3 object creation variant (Put, Post, Copy, ...).
pub const CREATED_PREFIX: &str = "ObjectCreated";
/// Event-name prefix for every S3 object removal variant (Delete, DeleteMarkerCreated).
pub const REMOVED_PREFIX: &str = "ObjectRemoved";

/// Family a storage event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Removed,
    Other,
}

impl EventKind {
    /// Classify a raw event name such as `ObjectCreated:Put`.
    pub fn classify(event_name: &str) -> Self {
        if event_name.starts_with(CREATED_PREFIX) {
            EventKind::Created
        } else if event_name.starts_with(REMOVED_PREFIX) {
            EventKind::Removed
        } else {
            EventKind::Other
        }
    }

    /// Whether this event changes the knowledge base contents.
    pub fn triggers_ingestion(&self) -> bool {
        matches!(self, EventKind::Created | EventKind::Removed)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Created => write!(f, "created"),
            EventKind::Removed => write!(f, "removed"),
            EventKind::Other => write!(f, "other"),
        }
    }
}

/// A single storage-change record, with its object key already decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub kind: EventKind,
    /// Raw event name as delivered, e.g. `ObjectRemoved:Delete`.
    pub event_name: String,
    pub bucket: String,
    pub object_key: String,
}

impl ChangeNotification {
    /// Build a notification from raw record fields. `raw_key` is the
    /// form-encoded key exactly as S3 delivers it.
    pub fn new(event_name: &str, bucket: &str, raw_key: &str) -> Self {
        Self {
            kind: EventKind::classify(event_name),
            event_name: event_name.to_string(),
            bucket: bucket.to_string(),
            object_key: decode_object_key(raw_key),
        }
    }
}

/// Decode an S3 event object key.
///
/// S3 form-encodes keys in notifications: `+` stands for a space and
/// reserved characters are percent-escaped (a literal `+` arrives as `%2B`).
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}
