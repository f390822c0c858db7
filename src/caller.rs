//! Caller location formatting.
//!
//! The call site is captured where the entry is recorded (tracing callsite
//! metadata, [`Entry::new`] via `#[track_caller]`, or the panic location)
//! and carried on the entry, so the result does not depend on how many
//! frames sit between the logging macro and the hook.

use crate::entry::{CallSite, Entry, CALLER_FIELD};
use serde_json::Value;

/// Written when no call site was recorded.
pub const UNKNOWN_CALLER: &str = "???:0";

/// Trim `path` to its file name plus at most one parent directory.
pub fn shorten_path(path: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    match path.rfind(is_sep) {
        Some(last) => match path[..last].rfind(is_sep) {
            Some(parent) => &path[parent + 1..],
            None => &path[last + 1..],
        },
        None => path,
    }
}

/// Format a call site as `"dir/file:line"`, or [`UNKNOWN_CALLER`].
pub fn locate_caller(callsite: Option<&CallSite>) -> String {
    match callsite {
        Some(site) => format!("{}:{}", shorten_path(&site.file), site.line),
        None => UNKNOWN_CALLER.to_string(),
    }
}

pub fn set_caller(entry: &mut Entry) {
    let caller = locate_caller(entry.caller.as_ref());
    entry.fields.insert(CALLER_FIELD.to_string(), Value::from(caller));
}
