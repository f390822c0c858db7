#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing_fluent_hook::transport::{Transport, TransportClient, TransportError};
use tracing_fluent_hook::Fields;

/// A record as it reached the transport.
#[derive(Debug, Clone)]
pub struct Posted {
    pub tag: String,
    pub time: DateTime<Utc>,
    pub payload: Fields,
}

#[derive(Debug, Default)]
pub struct Journal {
    pub connects: Vec<(String, u16)>,
    pub posted: Vec<Posted>,
    pub closed: usize,
}

/// Transport that records every call instead of talking to a collector.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub journal: Arc<Mutex<Journal>>,
    pub refuse_connect: bool,
    pub fail_post: bool,
}

impl RecordingTransport {
    pub fn refusing() -> Self {
        Self { refuse_connect: true, ..Self::default() }
    }

    pub fn failing_post() -> Self {
        Self { fail_post: true, ..Self::default() }
    }

    pub fn posted(&self) -> Vec<Posted> {
        self.journal.lock().unwrap().posted.clone()
    }

    pub fn closed(&self) -> usize {
        self.journal.lock().unwrap().closed
    }

    pub fn connects(&self) -> usize {
        self.journal.lock().unwrap().connects.len()
    }
}

pub struct RecordingClient {
    journal: Arc<Mutex<Journal>>,
    fail_post: bool,
}

impl Transport for RecordingTransport {
    type Client = RecordingClient;

    fn connect(&self, host: &str, port: u16) -> Result<RecordingClient, TransportError> {
        let mut journal = self.journal.lock().unwrap();
        journal.connects.push((host.to_string(), port));
        if self.refuse_connect {
            return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused").into());
        }
        Ok(RecordingClient {
            journal: Arc::clone(&self.journal),
            fail_post: self.fail_post,
        })
    }
}

impl TransportClient for RecordingClient {
    fn post_with_time(
        &mut self,
        tag: &str,
        time: DateTime<Utc>,
        payload: &Fields,
    ) -> Result<(), TransportError> {
        if self.fail_post {
            return Err(TransportError::other("collector hung up"));
        }
        self.journal.lock().unwrap().posted.push(Posted {
            tag: tag.to_string(),
            time,
            payload: payload.clone(),
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.journal.lock().unwrap().closed += 1;
        Ok(())
    }
}
