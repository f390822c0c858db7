use crate::entry::{CallSite, Entry, Fields, MESSAGE_FIELD};
use crate::hook::Hook;
use crate::severity::Severity;
use chrono::Utc;
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns events into [`Entry`]s and hands
/// them to a [`Hook`].
///
/// Dispatch happens inline on the thread that emitted the event. Events
/// whose severity the hook does not list are skipped before any field is
/// recorded. A failed `fire` drops the entry and is reported on stderr,
/// never through `tracing` itself.
pub struct HookLayer<H> {
    hook: Arc<H>,
    /// Total events seen by the layer (before filtering by level).
    pub total_events: Arc<AtomicU64>,
    /// Entries the hook delivered.
    pub fired_events: Arc<AtomicU64>,
    /// Entries dropped because the hook returned an error.
    pub failed_events: Arc<AtomicU64>,
}

impl<H: Hook> HookLayer<H> {
    pub fn new(hook: Arc<H>) -> Self {
        Self {
            hook,
            total_events: Arc::new(AtomicU64::new(0)),
            fired_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn hook(&self) -> &Arc<H> {
        &self.hook
    }
}

impl<S, H> Layer<S> for HookLayer<H>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    H: Hook + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let meta = event.metadata();
        let level = Severity::from(*meta.level());
        if !self.hook.levels().contains(&level) {
            return;
        }

        let mut fields = Fields::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let caller = match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => Some(CallSite::new(file, line)),
            _ => None,
        };

        let mut entry = Entry {
            level,
            message: message.unwrap_or_default(),
            time: Utc::now(),
            fields,
            caller,
        };

        match self.hook.fire(&mut entry) {
            Ok(()) => {
                self.fired_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("failed to dispatch log entry: {}: {}", e, entry.to_json());
            }
        }
    }
}

/// Collects event fields into [`Fields`], routing the `message` field to
/// the entry message instead.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Fields,
    pub message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            *self.message = Some(value.to_string());
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, serde_json::Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, serde_json::Value::String(value.to_string()));
    }

    // Formatted messages (`error!("x {}", y)`) arrive here as `fmt::Arguments`.
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.insert(field, serde_json::Value::String(format!("{:?}", value)));
        }
    }
}
