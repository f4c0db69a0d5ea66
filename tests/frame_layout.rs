//! Integration tests for the multicast frame layout
//!
//! Pins the exact bytes produced for known events and checks the edge cases
//! around the date/time block and payload limits.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};
use vscp_multicast::core::crc::crc16;
use vscp_multicast::core::frame::{frame_len, pos};
use vscp_multicast::{
    build_frame, Event, FrameBuilder, Guid, ProtocolError, VscpEvent, VscpEventEx, HEADER_LENGTH,
    MAX_DATA,
};

fn reference_event() -> VscpEventEx {
    VscpEventEx {
        year: 2020,
        month: 1,
        day: 1,
        vscp_class: 10,
        vscp_type: 6,
        guid: Guid::new([0xAA; 16]),
        ..VscpEventEx::default()
    }
}

#[test]
fn test_reference_frame_bytes() {
    let frame = build_frame(0x00, &Event::from(reference_event())).expect("frame");

    let expected = hex::decode(
        "0000000000000007e40101000000000a0006aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa000054d8",
    )
    .unwrap();

    assert_eq!(frame.len(), 38);
    assert_eq!(frame.as_bytes(), &expected[..]);
    assert_eq!(frame.checksum(), 0x54D8);
    assert!(frame.verify_checksum());
}

#[test]
fn test_frame_with_payload_bytes() {
    let mut guid = [0u8; 16];
    for (i, b) in guid.iter_mut().enumerate() {
        *b = i as u8;
    }
    let event = VscpEventEx {
        head: 0x0020,
        timestamp: 0x1234_5678,
        year: 2020,
        month: 12,
        day: 31,
        hour: 23,
        minute: 59,
        second: 58,
        vscp_class: 1024,
        vscp_type: 26,
        guid: Guid::new(guid),
        data: vec![1, 2, 3],
    };

    let frame = build_frame(0x00, &Event::from(event)).unwrap();
    let expected = hex::decode(
        "0000201234567807e40c1f173b3a0400001a000102030405060708090a0b0c0d0e0f0003010203a5da",
    )
    .unwrap();

    assert_eq!(frame.as_bytes(), &expected[..]);
    assert_eq!(frame.payload(), &[1, 2, 3]);
    assert_eq!(frame.size_data(), 3);
}

#[test]
fn test_length_tracks_payload() {
    for size in [0usize, 1, 15, 16, 100, MAX_DATA] {
        let event = VscpEventEx {
            data: vec![0x5A; size],
            ..reference_event()
        };
        let frame = build_frame(0x00, &Event::from(event)).unwrap();
        assert_eq!(frame.len(), 1 + HEADER_LENGTH + size + 2);
        assert_eq!(frame.len(), frame_len(size));
        assert_eq!(
            u16::from_be_bytes([frame.as_bytes()[pos::SIZE], frame.as_bytes()[pos::SIZE + 1]]),
            size as u16
        );
    }
}

#[test]
fn test_checksum_covers_body_only() {
    let frame = build_frame(0x00, &Event::from(reference_event())).unwrap();
    let bytes = frame.as_bytes();
    let end = bytes.len() - 2;

    assert_eq!(crc16(&bytes[1..end]), frame.checksum());

    let other = build_frame(0x7F, &Event::from(reference_event())).unwrap();
    assert_eq!(other.checksum(), frame.checksum());
    assert_eq!(other.as_bytes()[pos::PKTTYPE], 0x7F);
}

#[test]
fn test_packet_type_copied_verbatim() {
    for packet_type in [0x00u8, 0x01, 0x42, 0xFF] {
        let frame = build_frame(packet_type, &Event::from(reference_event())).unwrap();
        assert_eq!(frame.packet_type(), packet_type);
    }
}

#[test]
fn test_unset_date_uses_current_utc() {
    let event = VscpEventEx {
        year: 0,
        month: 0,
        day: 0,
        ..reference_event()
    };

    let before = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
    let frame = build_frame(0x00, &Event::from(event)).unwrap();
    let after = OffsetDateTime::now_utc();

    let b = frame.as_bytes();
    let year = i32::from(u16::from_be_bytes([b[pos::YEAR], b[pos::YEAR + 1]]));
    let date = Date::from_calendar_date(year, Month::try_from(b[pos::MONTH]).unwrap(), b[pos::DAY])
        .expect("valid calendar date");
    let time = Time::from_hms(b[pos::HOUR], b[pos::MINUTE], b[pos::SECOND]).expect("valid time");
    let stamped = PrimitiveDateTime::new(date, time).assume_utc();

    assert!(stamped >= before, "{stamped} earlier than {before}");
    assert!(stamped <= after, "{stamped} later than {after}");
    assert!(frame.verify_checksum());
}

#[test]
fn test_partial_date_is_kept() {
    let event = VscpEventEx {
        year: 0,
        month: 7,
        day: 0,
        ..reference_event()
    };
    let frame = build_frame(0x00, &Event::from(event)).unwrap();
    let b = frame.as_bytes();

    assert_eq!(&b[pos::YEAR..pos::YEAR + 2], &[0, 0]);
    assert_eq!(b[pos::MONTH], 7);
    assert_eq!(b[pos::DAY], 0);
}

#[test]
fn test_oversized_payload_rejected() {
    let event = VscpEventEx {
        data: vec![0; MAX_DATA + 1],
        ..reference_event()
    };
    let result = FrameBuilder::new().build(0x00, &Event::from(event));
    assert!(matches!(
        result,
        Err(ProtocolError::DataTooLarge {
            size,
            max: MAX_DATA
        }) if size == MAX_DATA + 1
    ));
}

#[test]
fn test_standard_event_rejected() {
    let event = VscpEvent {
        vscp_class: 10,
        vscp_type: 6,
        data: vec![1],
        ..VscpEvent::default()
    };
    let result = build_frame(0x00, &Event::from(event));
    assert!(matches!(result, Err(ProtocolError::TypeMismatch(_))));
}

#[test]
fn test_converted_standard_event_builds() {
    let event = VscpEvent {
        vscp_class: 10,
        vscp_type: 6,
        ..VscpEvent::default()
    }
    .into_extended(Guid::new([0xAA; 16]))
    .with_date_time(reference_event().date_time());

    let frame = build_frame(0x00, &Event::from(event)).unwrap();
    let reference = build_frame(0x00, &Event::from(reference_event())).unwrap();
    assert_eq!(frame, reference);
}

#[test]
fn test_build_is_deterministic() {
    let a = build_frame(0x00, &Event::from(reference_event())).unwrap();
    let b = build_frame(0x00, &Event::from(reference_event())).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}
