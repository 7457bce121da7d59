//! Parse S3 event notification JSON into [`ChangeNotification`]s.
//!
//! Records are parsed one at a time so that a malformed record only stops
//! processing from that point on; earlier records have already been handled.

use serde_json::Value;

use autoingest_core::ChangeNotification;

use crate::error::TriggerError;

/// Borrow the `Records` array of an S3 event document.
pub fn event_records(event: &Value) -> Result<&[Value], TriggerError> {
    event
        .get("Records")
        .ok_or_else(|| TriggerError::MalformedEvent("missing 'Records'".into()))?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| TriggerError::MalformedEvent("'Records' is not an array".into()))
}

/// Parse record `index` of an event into a [`ChangeNotification`].
///
/// Requires `eventName`, `s3.bucket.name` and `s3.object.key` as strings.
pub fn parse_record(index: usize, record: &Value) -> Result<ChangeNotification, TriggerError> {
    let event_name = str_field(record, index, &["eventName"])?;
    let bucket = str_field(record, index, &["s3", "bucket", "name"])?;
    let key = str_field(record, index, &["s3", "object", "key"])?;

    Ok(ChangeNotification::new(event_name, bucket, key))
}

fn str_field<'a>(record: &'a Value, index: usize, path: &[&str]) -> Result<&'a str, TriggerError> {
    path.iter()
        .try_fold(record, |v, key| v.get(*key))
        .and_then(Value::as_str)
        .ok_or_else(|| TriggerError::MalformedRecord {
            index,
            reason: format!("missing string field '{}'", path.join(".")),
        })
}
