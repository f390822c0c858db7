use crate::entry::Fields;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::ops::{Deref, DerefMut};

/// Error produced by a [`Transport`] or one of its clients.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "forward")]
    #[error("failed to encode record: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("{0}")]
    Other(Box<dyn Error + Send + Sync>),
}

impl TransportError {
    pub fn other(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        TransportError::Other(err.into())
    }
}

/// Factory for connections to a log collector.
///
/// The hook calls `connect` once per dispatched entry and closes the client
/// before returning, so implementations that want pooling do it here.
pub trait Transport: Send + Sync {
    type Client: TransportClient;

    /// Open a connection to the collector at `host:port`.
    ///
    /// **Returns**
    /// - `Ok(client)` ready to accept records.
    /// - `Err(..)` if the collector could not be reached. The hook gives up
    ///   on the entry without retrying.
    fn connect(&self, host: &str, port: u16) -> Result<Self::Client, TransportError>;
}

/// An open connection to a log collector.
pub trait TransportClient {
    /// Deliver one record.
    ///
    /// **Parameters**
    /// - `tag`: routing key resolved for the entry.
    /// - `time`: the entry's timestamp.
    /// - `payload`: enriched entry fields.
    ///
    /// Blocks until the record is written or the write fails.
    fn post_with_time(
        &mut self,
        tag: &str,
        time: DateTime<Utc>,
        payload: &Fields,
    ) -> Result<(), TransportError>;

    /// Release the connection. Default implementation is a no-op.
    fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Open client that is closed when dropped, on success and error paths
/// alike.
pub struct Connection<C: TransportClient> {
    client: C,
}

impl<C: TransportClient> Connection<C> {
    pub fn open<T>(transport: &T, host: &str, port: u16) -> Result<Self, TransportError>
    where
        T: Transport<Client = C> + ?Sized,
    {
        let client = transport.connect(host, port)?;
        Ok(Connection { client })
    }
}

impl<C: TransportClient> Deref for Connection<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.client
    }
}

impl<C: TransportClient> DerefMut for Connection<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.client
    }
}

impl<C: TransportClient> Drop for Connection<C> {
    fn drop(&mut self) {
        // Nobody is left to report a close failure to.
        let _ = self.client.close();
    }
}
