//! Telemetry frame model.
//!
//! Wire layout of one frame, all integers little-endian:
//!
//! ```text
//! ┌──────────┬───────────┬──────────────────────────────┐
//! │ sequence │ type code │ payload                      │
//! │ u16      │ u16       │ FRAME_PAYLOAD_CAPACITY bytes │
//! └──────────┴───────────┴──────────────────────────────┘
//! ```
//!
//! A `DestinationEnvelope` prefixes the frame with the destination node byte.

use crate::codec::{CodecError, FrameEncode, WireReader, WireWriter};
use thiserror::Error;

pub const FRAME_MAX_LEN: usize = 200;
pub const FRAME_HEADER_LEN: usize = 4;
pub const FRAME_PAYLOAD_CAPACITY: usize = FRAME_MAX_LEN - FRAME_HEADER_LEN;
pub const ENVELOPE_LEN: usize = 1 + FRAME_MAX_LEN;

pub const TM_TYPE_STATUS: u16 = 1;
/// Base type code for payload frames; the payload kind is added to it.
pub const TM_TYPE_PAYLOAD: u16 = 10;
pub const MAX_PAYLOAD_KIND: u16 = u16::MAX - TM_TYPE_PAYLOAD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("unknown frame type code {0}")]
    UnknownType(u16),
    #[error("payload kind {0} cannot be expressed as a frame type")]
    PayloadKindOutOfRange(i64),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Status,
    /// Payload frame for the given payload kind discriminator.
    Payload(u16),
}

impl FrameKind {
    /// Build a payload frame kind from a raw discriminator, rejecting values
    /// whose type code would not fit in 16 bits.
    pub fn payload(kind: i64) -> Result<Self, FrameError> {
        u16::try_from(kind)
            .ok()
            .filter(|k| *k <= MAX_PAYLOAD_KIND)
            .map(FrameKind::Payload)
            .ok_or(FrameError::PayloadKindOutOfRange(kind))
    }

    pub fn type_code(self) -> u16 {
        match self {
            FrameKind::Status => TM_TYPE_STATUS,
            FrameKind::Payload(kind) => TM_TYPE_PAYLOAD.saturating_add(kind),
        }
    }

    pub fn from_type_code(code: u16) -> Result<Self, FrameError> {
        match code {
            TM_TYPE_STATUS => Ok(FrameKind::Status),
            c if c >= TM_TYPE_PAYLOAD => Ok(FrameKind::Payload(c - TM_TYPE_PAYLOAD)),
            c => Err(FrameError::UnknownType(c)),
        }
    }
}

impl core::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameKind::Status => write!(f, "STATUS({})", self.type_code()),
            FrameKind::Payload(kind) => write!(f, "PAYLOAD[{}]({})", kind, self.type_code()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub sequence: u16,
    pub kind: FrameKind,
    pub payload: [u8; FRAME_PAYLOAD_CAPACITY],
}

impl TelemetryFrame {
    /// A zeroed frame of the given kind.
    pub fn empty(kind: FrameKind) -> Self {
        Self {
            sequence: 0,
            kind,
            payload: [0; FRAME_PAYLOAD_CAPACITY],
        }
    }

    /// Copy `data` into a zeroed frame.
    ///
    /// # Panics
    ///
    /// If `data` does not fit strictly inside the payload region. A struct
    /// that outgrows the frame is a layout bug, never something to truncate.
    pub fn pack(kind: FrameKind, data: &[u8]) -> Self {
        tracing::debug!(
            data_len = data.len(),
            capacity = FRAME_PAYLOAD_CAPACITY,
            frame_len = FRAME_MAX_LEN,
            "packing {}", kind
        );
        assert!(
            data.len() < FRAME_PAYLOAD_CAPACITY,
            "payload of {} bytes does not fit frame capacity of {} bytes",
            data.len(),
            FRAME_PAYLOAD_CAPACITY
        );

        let mut frame = Self::empty(kind);
        frame.payload[..data.len()].copy_from_slice(data);
        frame
    }

    /// Encode `value` and pack it.
    ///
    /// # Panics
    ///
    /// If `T::ENCODED_LEN` does not fit strictly inside the payload region.
    pub fn pack_encoded<T: FrameEncode>(kind: FrameKind, value: &T) -> Self {
        assert!(
            T::ENCODED_LEN < FRAME_PAYLOAD_CAPACITY,
            "{} encodes to {} bytes, frame capacity is {} bytes",
            core::any::type_name::<T>(),
            T::ENCODED_LEN,
            FRAME_PAYLOAD_CAPACITY
        );

        let mut scratch = [0u8; FRAME_PAYLOAD_CAPACITY];
        {
            let mut writer = WireWriter::new(&mut scratch[..T::ENCODED_LEN]);
            value.encode_into(&mut writer);
            debug_assert_eq!(writer.position(), T::ENCODED_LEN);
        }

        Self::pack(kind, &scratch[..T::ENCODED_LEN])
    }

    pub fn to_bytes(&self) -> [u8; FRAME_MAX_LEN] {
        let mut out = [0u8; FRAME_MAX_LEN];
        let mut writer = WireWriter::new(&mut out);
        writer.put_u16(self.sequence);
        writer.put_u16(self.kind.type_code());
        writer.put_bytes(&self.payload);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != FRAME_MAX_LEN {
            return Err(FrameError::WrongLength {
                expected: FRAME_MAX_LEN,
                actual: bytes.len(),
            });
        }

        let mut reader = WireReader::new(bytes);
        let sequence = reader.get_u16()?;
        let code = reader.get_u16()?;
        let data = reader.get_slice(FRAME_PAYLOAD_CAPACITY)?;

        let mut payload = [0u8; FRAME_PAYLOAD_CAPACITY];
        payload.copy_from_slice(data);

        Ok(Self {
            sequence,
            kind: FrameKind::from_type_code(code)?,
            payload,
        })
    }
}

/// A frame addressed to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationEnvelope {
    pub node: u8,
    pub frame: TelemetryFrame,
}

impl DestinationEnvelope {
    pub fn new(node: u8, frame: TelemetryFrame) -> Self {
        Self { node, frame }
    }

    pub fn to_bytes(&self) -> [u8; ENVELOPE_LEN] {
        let mut out = [0u8; ENVELOPE_LEN];
        out[0] = self.node;
        out[1..].copy_from_slice(&self.frame.to_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != ENVELOPE_LEN {
            return Err(FrameError::WrongLength {
                expected: ENVELOPE_LEN,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            node: bytes[0],
            frame: TelemetryFrame::from_bytes(&bytes[1..])?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        assert_eq!(FrameKind::Status.type_code(), TM_TYPE_STATUS);
        assert_eq!(FrameKind::Payload(0).type_code(), TM_TYPE_PAYLOAD);
        assert_eq!(FrameKind::Payload(3).type_code(), TM_TYPE_PAYLOAD + 3);

        assert_eq!(FrameKind::from_type_code(1).unwrap(), FrameKind::Status);
        assert_eq!(FrameKind::from_type_code(12).unwrap(), FrameKind::Payload(2));
        assert_eq!(FrameKind::from_type_code(5), Err(FrameError::UnknownType(5)));
    }

    #[test]
    fn test_payload_kind_range() {
        assert_eq!(FrameKind::payload(0).unwrap(), FrameKind::Payload(0));
        assert_eq!(
            FrameKind::payload(i64::from(MAX_PAYLOAD_KIND)).unwrap().type_code(),
            u16::MAX
        );
        assert!(FrameKind::payload(-1).is_err());
        assert!(FrameKind::payload(i64::from(MAX_PAYLOAD_KIND) + 1).is_err());
    }

    #[test]
    fn test_header_layout() {
        let frame = TelemetryFrame::pack(FrameKind::Payload(1), &[0xAA, 0xBB]);
        let bytes = frame.to_bytes();

        assert_eq!(&bytes[..4], &[0x00, 0x00, 11, 0x00]);
        assert_eq!(&bytes[4..6], &[0xAA, 0xBB]);
        assert!(bytes[6..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_envelope_rejects_wrong_length() {
        let err = DestinationEnvelope::decode(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            FrameError::WrongLength { expected: ENVELOPE_LEN, actual: 10 }
        );
    }
}
