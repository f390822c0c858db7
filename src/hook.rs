use crate::caller::set_caller;
use crate::entry::Entry;
use crate::normalize::{set_level_string, set_message};
use crate::severity::{Severity, DEFAULT_LEVELS};
use crate::tag::resolve_tag;
use crate::transport::{Connection, Transport, TransportClient, TransportError};

/// Contract between the logging facility and a dispatcher.
///
/// The facility consults [`levels`](Hook::levels) and calls
/// [`fire`](Hook::fire) inline, on the logging thread, for every entry whose
/// severity is listed.
pub trait Hook: Send + Sync {
    /// Severities this hook wants to receive.
    fn levels(&self) -> &[Severity];

    /// Enrich `entry` and deliver it. Errors are returned to the facility;
    /// the entry is dropped.
    fn fire(&self, entry: &mut Entry) -> Result<(), HookError>;
}

/// Error returned from [`Hook::fire`].
#[derive(thiserror::Error, Debug)]
pub enum HookError {
    #[error("failed to connect to log collector at {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: TransportError,
    },

    #[error("failed to post record with tag {tag:?}: {source}")]
    Post {
        tag: String,
        #[source]
        source: TransportError,
    },
}

/// Hook that routes entries to a fluentd collector.
///
/// Every `fire` opens its own connection through the transport and closes
/// it before returning; nothing is buffered or retried.
#[derive(Debug, Clone)]
pub struct FluentHook<T> {
    host: String,
    port: u16,
    application: String,
    levels: Vec<Severity>,
    transport: T,
}

#[cfg(feature = "forward")]
impl FluentHook<crate::forward::ForwardTransport> {
    /// Hook posting to `host:port` over the Forward protocol, subscribed to
    /// [`DEFAULT_LEVELS`].
    pub fn new(host: impl Into<String>, port: u16, application: impl Into<String>) -> Self {
        Self::with_transport(crate::forward::ForwardTransport::default(), host, port, application)
    }
}

impl<T: Transport> FluentHook<T> {
    pub fn with_transport(
        transport: T,
        host: impl Into<String>,
        port: u16,
        application: impl Into<String>,
    ) -> Self {
        FluentHook {
            host: host.into(),
            port,
            application: application.into(),
            levels: DEFAULT_LEVELS.to_vec(),
            transport,
        }
    }

    /// Replace the subscribed levels. No validation or deduplication.
    pub fn set_levels(&mut self, levels: impl Into<Vec<Severity>>) {
        self.levels = levels.into();
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Hook for FluentHook<T> {
    fn levels(&self) -> &[Severity] {
        &self.levels
    }

    fn fire(&self, entry: &mut Entry) -> Result<(), HookError> {
        let mut conn = Connection::open(&self.transport, &self.host, self.port).map_err(|source| {
            HookError::Connect {
                host: self.host.clone(),
                port: self.port,
                source,
            }
        })?;

        set_level_string(entry);
        let tag = resolve_tag(entry, &self.application);
        // An explicit tag equal to the message text means the caller used
        // the message as the route; no separate message field then.
        if tag != entry.message {
            set_message(entry);
        }
        set_caller(entry);

        conn.post_with_time(&tag, entry.time, &entry.fields)
            .map_err(|source| HookError::Post { tag, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noop::NoopTransport;

    #[test]
    fn new_hook_uses_default_levels() {
        let hook = FluentHook::with_transport(NoopTransport, "127.0.0.1", 24224, "svc");
        assert_eq!(hook.levels(), &DEFAULT_LEVELS[..]);
        assert_eq!(hook.host(), "127.0.0.1");
        assert_eq!(hook.port(), 24224);
        assert_eq!(hook.application(), "svc");
    }

    #[test]
    fn set_levels_does_not_leak_between_instances() {
        let mut first = FluentHook::with_transport(NoopTransport, "h", 1, "a");
        let second = FluentHook::with_transport(NoopTransport, "h", 1, "b");

        first.set_levels(vec![Severity::Debug, Severity::Debug]);

        assert_eq!(first.levels(), &[Severity::Debug, Severity::Debug]);
        assert_eq!(second.levels(), &DEFAULT_LEVELS[..]);
        assert_eq!(DEFAULT_LEVELS.len(), 5);
    }

    #[test]
    fn fire_enriches_entry_in_place() {
        let hook = FluentHook::with_transport(NoopTransport, "h", 1, "svc");
        let mut entry = Entry::new(Severity::Info, "ready").with_field("tag", 3);

        hook.fire(&mut entry).expect("fire");

        assert_eq!(entry.fields["level"], "info");
        assert_eq!(entry.fields["message"], "ready");
        assert!(entry.fields["caller"].as_str().is_some_and(|c| c.starts_with("src/hook.rs:")));
        assert!(!entry.fields.contains_key("tag"));
    }
}
