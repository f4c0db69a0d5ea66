//! CRC-16 integrity check for multicast frames.
//!
//! Polynomial 0x1021, initial register 0xFFFF, no reflection, no final XOR
//! (CRC-16/CCITT-FALSE, catalogued as CRC-16/IBM-3740). This detects transport
//! corruption only; it offers no protection against deliberate tampering.

use crc::{Crc, CRC_16_IBM_3740};

/// Size of the checksum field in bytes
pub const CRC_LENGTH: usize = 2;

const CCITT_FFFF: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Compute the checksum of `bytes`
#[inline]
pub fn crc16(bytes: &[u8]) -> u16 {
    CCITT_FFFF.checksum(bytes)
}

/// Checksum `buf[start..end]` and write the result MSB first at `buf[end..end + 2]`.
///
/// # Panics
/// Panics if `start > end` or the buffer is shorter than `end + 2`. Callers size
/// the buffer from the frame layout, so this only fires on a layout bug.
pub fn append_checksum(buf: &mut [u8], start: usize, end: usize) -> u16 {
    let crc = crc16(&buf[start..end]);
    buf[end..end + CRC_LENGTH].copy_from_slice(&crc.to_be_bytes());
    crc
}
