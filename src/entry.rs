use crate::severity::Severity;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::Location;

/// Input-only routing key; always stripped before dispatch.
pub const TAG_FIELD: &str = "tag";
/// Defaulted from [`Entry::message`] when absent.
pub const MESSAGE_FIELD: &str = "message";
/// Always overwritten with the canonical severity name.
pub const LEVEL_FIELD: &str = "level";
/// Always overwritten with the shortened call site.
pub const CALLER_FIELD: &str = "caller";

/// Structured fields attached to an entry; this is also the record payload
/// handed to the transport.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Source location at which an entry was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        CallSite { file: file.into(), line }
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        CallSite::new(location.file(), location.line())
    }
}

/// One log event as seen by a [`Hook`](crate::hook::Hook).
///
/// The hook receives `&mut Entry` and enriches `fields` in place.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub level: Severity,
    pub message: String,
    pub time: DateTime<Utc>,
    pub fields: Fields,
    pub caller: Option<CallSite>,
}

impl Entry {
    /// Create an entry stamped with the current time and the location of
    /// the code calling `new`.
    #[track_caller]
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Entry {
            level,
            message: message.into(),
            time: Utc::now(),
            fields: Fields::new(),
            caller: Some(CallSite::from(Location::caller())),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    /// Render the whole entry as JSON, for reporting an entry that could
    /// not be delivered.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the recorded call site; `None` means the location is unknown.
    pub fn with_caller(mut self, caller: Option<CallSite>) -> Self {
        self.caller = caller;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_captures_calling_location() {
        let (entry, line) = (Entry::new(Severity::Info, "hello"), line!());
        let caller = entry.caller.expect("call site");
        assert_eq!(caller.file, file!());
        assert_eq!(caller.line, line);
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn builder_sets_fields_and_caller() {
        let entry = Entry::new(Severity::Warn, "disk")
            .with_field("free_mb", 12)
            .with_field(TAG_FIELD, "ops.disk")
            .with_caller(None);
        assert_eq!(entry.fields["free_mb"], serde_json::json!(12));
        assert_eq!(entry.fields[TAG_FIELD], serde_json::json!("ops.disk"));
        assert!(entry.caller.is_none());
    }

    #[test]
    fn json_rendering_includes_time_and_call_site() {
        let time = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = Entry::new(Severity::Warn, "disk")
            .with_time(time)
            .with_field("free_mb", 12)
            .with_caller(Some(CallSite::new("src/disk.rs", 7)));

        let value: serde_json::Value = serde_json::from_str(&entry.to_json()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "level": "warning",
                "message": "disk",
                "time": "2024-05-01T12:00:00Z",
                "fields": {"free_mb": 12},
                "caller": {"file": "src/disk.rs", "line": 7},
            })
        );
    }
}
