use crate::codec::{CodecError, FrameDecode, FrameEncode, WireReader, WireWriter};
use crate::frame::{FrameKind, TelemetryFrame, FRAME_PAYLOAD_CAPACITY};
use crate::store::{DataStore, StoreError};
use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

/// Payload kind discriminator for temperature sensor samples.
pub const TEMP_SENSORS: i64 = 0;
/// Payload kind discriminator for attitude sensor samples.
pub const ADS_SENSORS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadKind {
    Temperature,
    Attitude,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 2] = [PayloadKind::Temperature, PayloadKind::Attitude];

    pub fn code(self) -> i64 {
        match self {
            PayloadKind::Temperature => TEMP_SENSORS,
            PayloadKind::Attitude => ADS_SENSORS,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            TEMP_SENSORS => Some(PayloadKind::Temperature),
            ADS_SENSORS => Some(PayloadKind::Attitude),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PayloadKind::Temperature => "temp_sensors",
            PayloadKind::Attitude => "ads_sensors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureSample {
    pub timestamp: u32,
    pub obc_temp_1: f32,
    pub obc_temp_2: f32,
    pub obc_temp_3: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttitudeSample {
    pub timestamp: u32,
    pub acc_x: f32,
    pub acc_y: f32,
    pub acc_z: f32,
    pub mag_x: f32,
    pub mag_y: f32,
    pub mag_z: f32,
    pub gyro_x: f32,
    pub gyro_y: f32,
    pub gyro_z: f32,
}

const_assert!(TemperatureSample::ENCODED_LEN < FRAME_PAYLOAD_CAPACITY);
const_assert!(AttitudeSample::ENCODED_LEN < FRAME_PAYLOAD_CAPACITY);

impl FrameEncode for TemperatureSample {
    const ENCODED_LEN: usize = 16;

    fn encode_into(&self, w: &mut WireWriter<'_>) {
        w.put_u32(self.timestamp);
        w.put_f32(self.obc_temp_1);
        w.put_f32(self.obc_temp_2);
        w.put_f32(self.obc_temp_3);
    }
}

impl FrameDecode for TemperatureSample {
    fn decode_from(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            timestamp: r.get_u32()?,
            obc_temp_1: r.get_f32()?,
            obc_temp_2: r.get_f32()?,
            obc_temp_3: r.get_f32()?,
        })
    }
}

impl FrameEncode for AttitudeSample {
    const ENCODED_LEN: usize = 40;

    fn encode_into(&self, w: &mut WireWriter<'_>) {
        w.put_u32(self.timestamp);
        w.put_f32_array(&[self.acc_x, self.acc_y, self.acc_z]);
        w.put_f32_array(&[self.mag_x, self.mag_y, self.mag_z]);
        w.put_f32_array(&[self.gyro_x, self.gyro_y, self.gyro_z]);
    }
}

impl FrameDecode for AttitudeSample {
    fn decode_from(r: &mut WireReader<'_>) -> Result<Self, CodecError> {
        let timestamp = r.get_u32()?;
        let [acc_x, acc_y, acc_z] = r.get_f32_array()?;
        let [mag_x, mag_y, mag_z] = r.get_f32_array()?;
        let [gyro_x, gyro_y, gyro_z] = r.get_f32_array()?;
        Ok(Self {
            timestamp,
            acc_x,
            acc_y,
            acc_z,
            mag_x,
            mag_y,
            mag_z,
            gyro_x,
            gyro_y,
            gyro_z,
        })
    }
}

/// One sensor sample of any payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PayloadSample {
    Temperature(TemperatureSample),
    Attitude(AttitudeSample),
}

impl PayloadSample {
    pub fn kind(&self) -> PayloadKind {
        match self {
            PayloadSample::Temperature(_) => PayloadKind::Temperature,
            PayloadSample::Attitude(_) => PayloadKind::Attitude,
        }
    }

    pub fn timestamp(&self) -> u32 {
        match self {
            PayloadSample::Temperature(s) => s.timestamp,
            PayloadSample::Attitude(s) => s.timestamp,
        }
    }

    /// Pack this sample into a frame of the given kind.
    ///
    /// Each variant is checked against the payload capacity on its own;
    /// the variants are not the same size.
    pub fn pack(&self, kind: FrameKind) -> TelemetryFrame {
        match self {
            PayloadSample::Temperature(sample) => {
                tracing::info!("data_temp.obc_temp_1: {}", sample.obc_temp_1);
                TelemetryFrame::pack_encoded(kind, sample)
            }
            PayloadSample::Attitude(sample) => {
                tracing::info!("data_ads.acc_x: {}", sample.acc_x);
                TelemetryFrame::pack_encoded(kind, sample)
            }
        }
    }

    /// Decode a sample of `kind` from the front of a frame payload.
    pub fn decode(kind: PayloadKind, bytes: &[u8]) -> Result<Self, CodecError> {
        match kind {
            PayloadKind::Temperature => {
                crate::codec::decode_prefix(bytes).map(PayloadSample::Temperature)
            }
            PayloadKind::Attitude => crate::codec::decode_prefix(bytes).map(PayloadSample::Attitude),
        }
    }
}

/// Outcome of the payload selector for one discriminator value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Sample(PayloadSample),
    /// The discriminator names no known payload kind.
    Unknown(i64),
}

/// Latest sample (history depth 0) for the payload kind named by `code`.
pub fn select_payload(store: &dyn DataStore, code: i64) -> Result<Selection, StoreError> {
    match PayloadKind::from_code(code) {
        Some(kind) => {
            let sample = store.recent_sample(kind, 0)?;
            debug_assert_eq!(sample.kind(), kind);
            Ok(Selection::Sample(sample))
        }
        None => Ok(Selection::Unknown(code)),
    }
}

impl Selection {
    /// Build the frame for this selection. Unknown kinds yield a zeroed payload.
    pub fn into_frame(self, kind: FrameKind) -> TelemetryFrame {
        match self {
            Selection::Sample(sample) => sample.pack(kind),
            Selection::Unknown(code) => {
                tracing::debug!(payload = code, "no sample for payload kind, sending empty frame");
                TelemetryFrame::empty(kind)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        for kind in PayloadKind::ALL {
            assert_eq!(PayloadKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PayloadKind::from_code(2), None);
        assert_eq!(PayloadKind::from_code(-1), None);
    }

    #[test]
    fn test_attitude_layout() {
        let sample = AttitudeSample {
            timestamp: 9,
            acc_x: 1.0,
            gyro_z: -3.0,
            ..AttitudeSample::default()
        };
        let frame = PayloadSample::Attitude(sample).pack(FrameKind::Payload(1));

        assert_eq!(&frame.payload[..4], &9u32.to_le_bytes());
        assert_eq!(&frame.payload[4..8], &1.0f32.to_le_bytes());
        assert_eq!(&frame.payload[36..40], &(-3.0f32).to_le_bytes());
        assert!(frame.payload[40..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_decode_matches_pack() {
        let sample = PayloadSample::Temperature(TemperatureSample {
            timestamp: 100,
            obc_temp_1: 21.5,
            obc_temp_2: 22.0,
            obc_temp_3: -4.25,
        });
        let frame = sample.pack(FrameKind::Payload(0));
        assert_eq!(
            PayloadSample::decode(PayloadKind::Temperature, &frame.payload).unwrap(),
            sample
        );
    }

    #[test]
    fn test_unknown_selection_is_zeroed() {
        let frame = Selection::Unknown(7).into_frame(FrameKind::Payload(7));
        assert_eq!(frame.kind.type_code(), 17);
        assert!(frame.payload.iter().all(|b| *b == 0));
    }
}
