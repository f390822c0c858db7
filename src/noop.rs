use crate::entry::Fields;
use crate::transport::{Transport, TransportClient, TransportError};
use chrono::{DateTime, Utc};

/// A transport whose clients simply drop all records.
///
/// Useful for measuring the overhead of the enrichment pipeline without
/// any network I/O, and for tests that don't care about delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransport;

#[derive(Debug, Default)]
pub struct NoopClient;

impl Transport for NoopTransport {
    type Client = NoopClient;

    fn connect(&self, _host: &str, _port: u16) -> Result<NoopClient, TransportError> {
        Ok(NoopClient)
    }
}

impl TransportClient for NoopClient {
    fn post_with_time(
        &mut self,
        _tag: &str,
        _time: DateTime<Utc>,
        _payload: &Fields,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}
