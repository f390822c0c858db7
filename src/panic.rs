use crate::entry::{CallSite, Entry};
use crate::hook::Hook;
use crate::severity::Severity;
use chrono::Utc;
use std::any::Any;
use std::panic::Location;
use std::sync::Arc;

/// Install a process-wide panic hook that dispatches a [`Severity::Panic`]
/// entry through `hook` before running the previously installed panic hook.
///
/// Nothing is sent if `hook` does not list `Panic` in its levels.
pub fn install_panic_hook<H: Hook + 'static>(hook: Arc<H>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if hook.levels().contains(&Severity::Panic) {
            let mut entry = panic_entry(info.payload(), info.location());
            if let Err(e) = hook.fire(&mut entry) {
                eprintln!("failed to dispatch panic entry: {}: {}", e, entry.to_json());
            }
        }
        previous(info);
    }));
}

/// Build the entry describing a panic with `payload` raised at `location`.
pub fn panic_entry(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> Entry {
    Entry {
        level: Severity::Panic,
        message: payload_message(payload),
        time: Utc::now(),
        fields: Default::default(),
        caller: location.map(CallSite::from),
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
