//! Field normalization applied to every dispatched entry.

use crate::entry::{Entry, LEVEL_FIELD, MESSAGE_FIELD};
use serde_json::Value;

/// Set `level` to the canonical name of the entry's severity, replacing any
/// previous value.
pub fn set_level_string(entry: &mut Entry) {
    entry
        .fields
        .insert(LEVEL_FIELD.to_string(), Value::from(entry.level.as_str()));
}

/// Copy [`Entry::message`] into the `message` field unless one is present.
pub fn set_message(entry: &mut Entry) {
    if !entry.fields.contains_key(MESSAGE_FIELD) {
        entry
            .fields
            .insert(MESSAGE_FIELD.to_string(), Value::from(entry.message.as_str()));
    }
}
