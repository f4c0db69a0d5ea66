//! Integration tests for AES-CBC frame encryption

#![allow(clippy::expect_used, clippy::unwrap_used)]

use rand::Rng;
use vscp_multicast::utils::crypto::{encrypted_len, BLOCK_SIZE, IV_LENGTH};
use vscp_multicast::{
    build_frame, decrypt_packet, encrypt_frame, EncryptionKey, EncryptionKind, Event, Frame, Guid,
    MulticastEncoder, ProtocolError, VscpEventEx,
};

fn frame_with(data: Vec<u8>) -> Frame {
    let event = VscpEventEx {
        year: 2020,
        month: 1,
        day: 1,
        vscp_class: 10,
        vscp_type: 6,
        guid: Guid::new([0xAA; 16]),
        data,
        ..VscpEventEx::default()
    };
    build_frame(0x00, &Event::from(event)).expect("frame")
}

fn random_key(kind: EncryptionKind) -> EncryptionKey {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..kind.key_len()).map(|_| rng.random()).collect();
    EncryptionKey::new(kind, &bytes).unwrap()
}

fn zero_padded_body(frame: &Frame) -> Vec<u8> {
    let mut body = frame.as_bytes()[1..].to_vec();
    while body.len() % BLOCK_SIZE != 0 {
        body.push(0);
    }
    body
}

#[test]
fn test_none_returns_frame_unchanged() {
    let frame = frame_with(vec![1, 2, 3]);
    let packet = encrypt_frame(&frame, EncryptionKind::None, &[]).unwrap();
    assert_eq!(packet.as_bytes(), frame.as_bytes());
    assert_eq!(packet.kind(), EncryptionKind::None);
}

#[test]
fn test_each_scheme_roundtrips() {
    for kind in [
        EncryptionKind::Aes128,
        EncryptionKind::Aes192,
        EncryptionKind::Aes256,
    ] {
        for size in [0usize, 1, 12, 13, 200] {
            let frame = frame_with(vec![0xE7; size]);
            let key = random_key(kind);

            let packet = encrypt_frame(&frame, kind, key.as_bytes()).unwrap();
            assert_eq!(packet.as_bytes()[0], kind.id());
            assert_eq!(packet.len(), encrypted_len(frame.len()));
            assert_eq!((packet.len() - 1 - IV_LENGTH) % BLOCK_SIZE, 0);

            let plain = decrypt_packet(packet.as_bytes(), &key).unwrap();
            assert_eq!(plain, zero_padded_body(&frame), "{kind} with {size} bytes");
        }
    }
}

#[test]
fn test_reference_frame_aes128_packet_shape() {
    // 37 body bytes pad to 48
    let frame = frame_with(vec![]);
    let key = EncryptionKey::from_hex(EncryptionKind::Aes128, "000102030405060708090a0b0c0d0e0f")
        .unwrap();
    let packet = encrypt_frame(&frame, EncryptionKind::Aes128, key.as_bytes()).unwrap();

    assert_eq!(packet.len(), 1 + 48 + 16);
    assert_eq!(packet.as_bytes()[0], 1);
}

#[test]
fn test_repeat_encryption_uses_fresh_iv() {
    let frame = frame_with(vec![4, 5, 6]);
    let key = random_key(EncryptionKind::Aes256);

    let a = encrypt_frame(&frame, EncryptionKind::Aes256, key.as_bytes()).unwrap();
    let b = encrypt_frame(&frame, EncryptionKind::Aes256, key.as_bytes()).unwrap();

    assert_ne!(a.as_bytes(), b.as_bytes());
    assert_ne!(&a.as_bytes()[a.len() - IV_LENGTH..], &b.as_bytes()[b.len() - IV_LENGTH..]);
    assert_eq!(
        decrypt_packet(a.as_bytes(), &key).unwrap(),
        decrypt_packet(b.as_bytes(), &key).unwrap()
    );
}

#[test]
fn test_wrong_key_length_rejected() {
    let frame = frame_with(vec![]);
    for (kind, len) in [
        (EncryptionKind::Aes128, 24usize),
        (EncryptionKind::Aes192, 16),
        (EncryptionKind::Aes256, 31),
    ] {
        let result = encrypt_frame(&frame, kind, &vec![0u8; len]);
        assert!(matches!(
            result,
            Err(ProtocolError::InvalidKey { expected, actual }) if expected == kind.key_len() && actual == len
        ));
    }
}

#[test]
fn test_unknown_scheme_fails_closed() {
    for id in [4u8, 5, 0x80, 0xFF] {
        assert!(matches!(
            EncryptionKind::from_id(id),
            Err(ProtocolError::UnsupportedScheme(_))
        ));
    }
    assert!(matches!(
        "aes512".parse::<EncryptionKind>(),
        Err(ProtocolError::UnsupportedScheme(_))
    ));
}

#[test]
fn test_frame_not_modified_by_encryption() {
    let frame = frame_with(vec![9; 40]);
    let before = frame.as_bytes().to_vec();
    let key = random_key(EncryptionKind::Aes128);

    let _ = encrypt_frame(&frame, EncryptionKind::Aes128, key.as_bytes()).unwrap();
    assert_eq!(frame.as_bytes(), &before[..]);
    assert!(frame.verify_checksum());
}

#[test]
fn test_tampered_scheme_byte_rejected() {
    let frame = frame_with(vec![1]);
    let key = random_key(EncryptionKind::Aes128);
    let packet = encrypt_frame(&frame, EncryptionKind::Aes128, key.as_bytes()).unwrap();

    let mut tampered = packet.as_bytes().to_vec();
    tampered[0] = EncryptionKind::Aes256.id();
    assert!(matches!(
        decrypt_packet(&tampered, &key),
        Err(ProtocolError::UnsupportedScheme(_))
    ));
}

#[test]
fn test_encoder_matches_free_function_shape() {
    let key = random_key(EncryptionKind::Aes192);
    let encoder = MulticastEncoder::new(0x00, key.clone());
    let event = Event::from(VscpEventEx {
        year: 2023,
        month: 11,
        day: 2,
        data: vec![0xAB; 20],
        ..VscpEventEx::default()
    });

    let frame = encoder.build_frame(&event).unwrap();
    let packet = encoder.encode(&event).unwrap();
    assert_eq!(packet.len(), encrypted_len(frame.len()));
    assert_eq!(
        decrypt_packet(packet.as_bytes(), &key).unwrap(),
        zero_padded_body(&frame)
    );
}
