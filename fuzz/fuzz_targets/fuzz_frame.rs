#![no_main]

use libfuzzer_sys::fuzz_target;
use vscp_multicast::utils::crypto::decrypt_packet;
use vscp_multicast::{build_frame, EncryptionKey, EncryptionKind, Event, Guid, VscpEventEx};

fuzz_target!(|data: &[u8]| {
    // Arbitrary header bytes and payload must either build a valid frame or fail cleanly
    if data.len() < 24 {
        return;
    }
    let (head, payload) = data.split_at(24);
    let mut guid = [0u8; 16];
    guid.copy_from_slice(&head[8..24]);

    let event = VscpEventEx {
        head: u16::from_be_bytes([head[0], head[1]]),
        timestamp: u32::from_be_bytes([head[2], head[3], head[4], head[5]]),
        vscp_class: u16::from_be_bytes([head[6], head[7]]),
        guid: Guid::new(guid),
        data: payload.to_vec(),
        ..VscpEventEx::default()
    };

    if let Ok(frame) = build_frame(head[0], &Event::from(event)) {
        assert!(frame.verify_checksum());
    }

    // Malformed packets must be rejected without panicking
    if let Ok(key) = EncryptionKey::new(EncryptionKind::Aes128, &[0u8; 16]) {
        let _ = decrypt_packet(data, &key);
    }
});
