//! Downlink transport consumed by the telemetry commands.
//!
//! Reliability, retries and addressing belong to the transport; the
//! commands hand over fully packed envelope bytes and surface the result.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("link unavailable: {0}")]
    LinkDown(String),
    #[error("frame of {0} bytes rejected by transport")]
    Rejected(usize),
}

pub trait Transport {
    /// Transmit one packed `DestinationEnvelope` on `channel`.
    fn send(&mut self, channel: &str, frame: &[u8], flags: u32) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFrame {
    pub channel: String,
    pub bytes: Vec<u8>,
    pub flags: u32,
}

/// Transport that keeps every frame it is handed.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Vec<SentFrame>,
    failure: Option<TransportError>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `send` fail with `error`.
    pub fn fail_with(&mut self, error: TransportError) {
        self.failure = Some(error);
    }

    pub fn sent(&self) -> &[SentFrame] {
        &self.sent
    }

    pub fn last(&self) -> Option<&SentFrame> {
        self.sent.last()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, channel: &str, frame: &[u8], flags: u32) -> Result<(), TransportError> {
        if let Some(ref error) = self.failure {
            return Err(error.clone());
        }

        self.sent.push(SentFrame {
            channel: channel.to_string(),
            bytes: frame.to_vec(),
            flags,
        });
        Ok(())
    }
}
