use sattm::codec::{FrameEncode, WireWriter};
use sattm::frame::*;
use sattm::telemetry::*;
use proptest::prelude::*;

/// Struct exactly as wide as the payload region.
struct FullWidth;

impl FrameEncode for FullWidth {
    const ENCODED_LEN: usize = FRAME_PAYLOAD_CAPACITY;

    fn encode_into(&self, w: &mut WireWriter<'_>) {
        w.put_bytes(&[0xAA; FRAME_PAYLOAD_CAPACITY]);
    }
}

#[test]
fn test_frame_sizes() {
    assert_eq!(FRAME_MAX_LEN, 200);
    assert_eq!(FRAME_HEADER_LEN + FRAME_PAYLOAD_CAPACITY, FRAME_MAX_LEN);
    assert_eq!(ENVELOPE_LEN, FRAME_MAX_LEN + 1);

    assert_eq!(StatusSnapshot::ENCODED_LEN, 114);
    assert_eq!(TemperatureSample::ENCODED_LEN, 16);
    assert_eq!(AttitudeSample::ENCODED_LEN, 40);
}

#[test]
fn test_frame_header_layout() {
    let mut frame = TelemetryFrame::pack(FrameKind::Payload(1), &[1, 2, 3]);
    frame.sequence = 0x0102;

    let bytes = frame.to_bytes();
    assert_eq!(&bytes[..4], &[0x02, 0x01, 11, 0]);
    assert_eq!(&bytes[4..7], &[1, 2, 3]);
    assert!(bytes[7..].iter().all(|b| *b == 0));

    let envelope = DestinationEnvelope::new(9, frame.clone()).to_bytes();
    assert_eq!(envelope[0], 9);
    assert_eq!(&envelope[1..], &bytes[..]);
}

#[test]
fn test_pack_largest_fitting_payload() {
    let data = [0x5Au8; FRAME_PAYLOAD_CAPACITY - 1];
    let frame = TelemetryFrame::pack(FrameKind::Status, &data);

    assert_eq!(&frame.payload[..data.len()], &data[..]);
    assert_eq!(frame.payload[FRAME_PAYLOAD_CAPACITY - 1], 0);
}

#[test]
#[should_panic(expected = "does not fit frame capacity")]
fn test_pack_full_capacity_panics() {
    let data = [0u8; FRAME_PAYLOAD_CAPACITY];
    let _ = TelemetryFrame::pack(FrameKind::Status, &data);
}

#[test]
#[should_panic(expected = "frame capacity is")]
fn test_pack_encoded_oversized_struct_panics() {
    let _ = TelemetryFrame::pack_encoded(FrameKind::Payload(0), &FullWidth);
}

#[test]
fn test_empty_frame_for_each_kind() {
    for kind in [FrameKind::Status, FrameKind::Payload(0), FrameKind::Payload(42)] {
        let frame = TelemetryFrame::empty(kind);
        assert_eq!(frame.sequence, 0);
        assert!(frame.payload.iter().all(|b| *b == 0));
        assert_eq!(TelemetryFrame::from_bytes(&frame.to_bytes()).unwrap(), frame);
    }
}

#[test]
fn test_decode_rejects_bad_input() {
    assert_eq!(
        TelemetryFrame::from_bytes(&[0u8; FRAME_MAX_LEN - 1]),
        Err(FrameError::WrongLength {
            expected: FRAME_MAX_LEN,
            actual: FRAME_MAX_LEN - 1
        })
    );

    let mut bytes = TelemetryFrame::empty(FrameKind::Status).to_bytes();
    bytes[2] = 5;
    assert_eq!(TelemetryFrame::from_bytes(&bytes), Err(FrameError::UnknownType(5)));

    assert!(matches!(
        DestinationEnvelope::decode(&[0u8; FRAME_MAX_LEN]),
        Err(FrameError::WrongLength { .. })
    ));
}

#[test]
fn test_sample_packing_leaves_tail_zeroed() {
    let sample = PayloadSample::Attitude(AttitudeSample {
        timestamp: 77,
        acc_x: 1.0,
        ..AttitudeSample::default()
    });
    let frame = sample.pack(FrameKind::Payload(1));

    assert!(frame.payload[AttitudeSample::ENCODED_LEN..].iter().all(|b| *b == 0));
    assert_eq!(PayloadSample::decode(PayloadKind::Attitude, &frame.payload).unwrap(), sample);
}

proptest! {
    #[test]
    fn prop_pack_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..FRAME_PAYLOAD_CAPACITY)) {
        let a = TelemetryFrame::pack(FrameKind::Status, &data);
        let b = TelemetryFrame::pack(FrameKind::Status, &data);
        prop_assert_eq!(a.to_bytes(), b.to_bytes());
        prop_assert_eq!(&a.payload[..data.len()], &data[..]);
        prop_assert!(a.payload[data.len()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn prop_payload_type_codes(kind in 0..=MAX_PAYLOAD_KIND) {
        let frame_kind = FrameKind::payload(i64::from(kind)).unwrap();
        prop_assert_eq!(frame_kind.type_code(), TM_TYPE_PAYLOAD + kind);
        prop_assert_eq!(FrameKind::from_type_code(frame_kind.type_code()), Ok(frame_kind));
    }

    #[test]
    fn prop_out_of_range_payload_kinds_rejected(kind in prop_oneof![
        i64::MIN..0,
        (i64::from(MAX_PAYLOAD_KIND) + 1)..i64::MAX,
    ]) {
        prop_assert_eq!(FrameKind::payload(kind), Err(FrameError::PayloadKindOutOfRange(kind)));
    }
}
