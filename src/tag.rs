use crate::entry::{Entry, TAG_FIELD};
use serde_json::Value;

/// Derive the routing tag for `entry`.
///
/// The `tag` field is removed whatever its type. A string value becomes the
/// tag; anything else falls back to `"<application>.<level>"`.
pub fn resolve_tag(entry: &mut Entry, application: &str) -> String {
    match entry.fields.remove(TAG_FIELD) {
        Some(Value::String(tag)) => tag,
        _ => default_tag(application, entry),
    }
}

fn default_tag(application: &str, entry: &Entry) -> String {
    format!("{}.{}", application, entry.level)
}
