use crate::entry::Fields;
use crate::transport::{Transport, TransportClient, TransportError};
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Port fluentd's `in_forward` input listens on by default.
pub const DEFAULT_FORWARD_PORT: u16 = 24224;

/// Configuration for [`ForwardTransport`].
#[derive(Clone, Debug)]
pub struct ForwardConfig {
    /// Applied to connecting and to each write. `None` blocks indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(3)),
        }
    }
}

/// Fluent Forward protocol transport over TCP.
///
/// Records are sent in Message mode, `[tag, time, record]`, encoded as
/// MessagePack with the time in whole unix seconds.
#[derive(Clone, Debug, Default)]
pub struct ForwardTransport {
    config: ForwardConfig,
}

impl ForwardTransport {
    /// Construct a transport from `config`. A zero timeout is treated as no
    /// timeout, since sockets reject it.
    pub fn new(config: ForwardConfig) -> Self {
        let timeout = config.timeout.filter(|t| !t.is_zero());
        Self {
            config: ForwardConfig { timeout },
        }
    }

    pub fn config(&self) -> &ForwardConfig {
        &self.config
    }
}

/// One open TCP connection to a Forward input.
#[derive(Debug)]
pub struct ForwardClient {
    stream: TcpStream,
}

impl Transport for ForwardTransport {
    type Client = ForwardClient;

    fn connect(&self, host: &str, port: u16) -> Result<ForwardClient, TransportError> {
        let stream = match self.config.timeout {
            Some(timeout) => connect_with_timeout(host, port, timeout)?,
            None => TcpStream::connect((host, port))?,
        };
        stream.set_write_timeout(self.config.timeout)?;
        stream.set_nodelay(true)?;
        Ok(ForwardClient { stream })
    }
}

fn connect_with_timeout(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}:{} did not resolve to any address", host, port),
        )
    }))
}

/// Encode one Message-mode event.
pub fn encode_message(tag: &str, time: DateTime<Utc>, payload: &Fields) -> Result<Vec<u8>, TransportError> {
    Ok(rmp_serde::to_vec(&(tag, time.timestamp(), payload))?)
}

impl TransportClient for ForwardClient {
    fn post_with_time(
        &mut self,
        tag: &str,
        time: DateTime<Utc>,
        payload: &Fields,
    ) -> Result<(), TransportError> {
        let bytes = encode_message(tag, time, payload)?;
        self.stream.write_all(&bytes)?;
        self.stream.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        match self.stream.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    #[test]
    fn encodes_message_mode_array() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut payload = Fields::new();
        payload.insert("level".to_string(), json!("error"));
        payload.insert("attempt".to_string(), json!(3));
        payload.insert("ctx".to_string(), json!({"user": "ana", "ok": false}));

        let bytes = encode_message("svc.error", time, &payload).unwrap();
        // fixarray of three elements
        assert_eq!(bytes[0], 0x93);

        let (tag, secs, record): (String, i64, BTreeMap<String, Value>) =
            rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(tag, "svc.error");
        assert_eq!(secs, time.timestamp());
        assert_eq!(record, payload);
    }

    #[test]
    fn zero_timeout_means_blocking() {
        let transport = ForwardTransport::new(ForwardConfig {
            timeout: Some(Duration::ZERO),
        });
        assert!(transport.config().timeout.is_none());
        assert_eq!(
            ForwardTransport::default().config().timeout,
            Some(Duration::from_secs(3))
        );
    }
}
