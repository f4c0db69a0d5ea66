//! # Multicast Frame Builder
//!
//! Serializes a [`VscpEventEx`] into the VSCP multicast "packet type 0" layout
//! and appends the CRC.
//!
//! ## Wire Format
//! ```text
//! [PktType(1)] [Head(2)] [Timestamp(4)] [Year(2)] [Month(1)] [Day(1)]
//! [Hour(1)] [Minute(1)] [Second(1)] [Class(2)] [Type(2)] [GUID(16)]
//! [Size(2)] [Data(0..=MAX_DATA)] [CRC(2)]
//! ```
//! All multi-byte integers are big-endian. The CRC covers everything between
//! the packet-type byte and the CRC itself.

use crate::core::crc::{append_checksum, crc16, CRC_LENGTH};
use crate::core::event::{DateTime, Event, VscpEventEx};
use crate::error::{ProtocolError, Result};
use crate::utils::observer::{FrameBuilt, NoopObserver, PipelineObserver};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;

/// Header bytes between the packet-type byte and the payload
pub const HEADER_LENGTH: usize = 35;

/// Largest payload the multicast frame carries
pub const MAX_DATA: usize = 479;

/// Largest possible frame: packet type + header + payload + CRC
pub const MAX_FRAME_SIZE: usize = 1 + HEADER_LENGTH + MAX_DATA + CRC_LENGTH;

/// Byte offsets within a packet type 0 frame
pub mod pos {
    pub const PKTTYPE: usize = 0;
    pub const HEAD: usize = 1;
    pub const TIMESTAMP: usize = 3;
    pub const YEAR: usize = 7;
    pub const MONTH: usize = 9;
    pub const DAY: usize = 10;
    pub const HOUR: usize = 11;
    pub const MINUTE: usize = 12;
    pub const SECOND: usize = 13;
    pub const VSCP_CLASS: usize = 14;
    pub const VSCP_TYPE: usize = 16;
    pub const GUID: usize = 18;
    pub const SIZE: usize = 34;
    pub const DATA: usize = 36;
}

/// Exact frame length for a payload of `size_data` bytes
#[inline]
pub const fn frame_len(size_data: usize) -> usize {
    1 + HEADER_LENGTH + size_data + CRC_LENGTH
}

/// A checksummed, unencrypted multicast frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    pub fn packet_type(&self) -> u8 {
        self.bytes[pos::PKTTYPE]
    }

    pub fn size_data(&self) -> usize {
        u16::from_be_bytes([self.bytes[pos::SIZE], self.bytes[pos::SIZE + 1]]) as usize
    }

    /// Bytes covered by the checksum: header and payload
    pub fn covered(&self) -> &[u8] {
        &self.bytes[1..self.bytes.len() - CRC_LENGTH]
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[pos::DATA..self.bytes.len() - CRC_LENGTH]
    }

    /// Checksum stored in the trailing two bytes
    pub fn checksum(&self) -> u16 {
        let n = self.bytes.len();
        u16::from_be_bytes([self.bytes[n - 2], self.bytes[n - 1]])
    }

    /// Recompute the checksum and compare with the stored one
    pub fn verify_checksum(&self) -> bool {
        crc16(self.covered()) == self.checksum()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Builds frames and reports each one to an observer
#[derive(Clone)]
pub struct FrameBuilder {
    observer: Arc<dyn PipelineObserver>,
}

impl fmt::Debug for FrameBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameBuilder").finish_non_exhaustive()
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self {
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(observer: Arc<dyn PipelineObserver>) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> &Arc<dyn PipelineObserver> {
        &self.observer
    }

    /// Build a frame, stamping an unset date/time block with the current UTC time
    pub fn build(&self, packet_type: u8, event: &Event) -> Result<Frame> {
        self.build_at(packet_type, event, OffsetDateTime::now_utc())
    }

    /// Build a frame using `now` as the clock reading for an unset date/time block
    pub fn build_at(&self, packet_type: u8, event: &Event, now: OffsetDateTime) -> Result<Frame> {
        let ex = event.as_extended()?;
        self.build_ex_at(packet_type, ex, now)
    }

    pub fn build_ex(&self, packet_type: u8, ex: &VscpEventEx) -> Result<Frame> {
        self.build_ex_at(packet_type, ex, OffsetDateTime::now_utc())
    }

    pub fn build_ex_at(
        &self,
        packet_type: u8,
        ex: &VscpEventEx,
        now: OffsetDateTime,
    ) -> Result<Frame> {
        let size_data = ex.size_data();
        if size_data > MAX_DATA {
            return Err(ProtocolError::DataTooLarge {
                size: size_data,
                max: MAX_DATA,
            });
        }

        let mut buf = BytesMut::with_capacity(MAX_FRAME_SIZE);

        buf.put_u8(packet_type);
        buf.put_u16(ex.head);
        buf.put_u32(ex.timestamp);

        let clock_substituted = ex.date_time().is_unset();
        let dt = if clock_substituted {
            DateTime::from_utc(now)
        } else {
            ex.date_time()
        };
        buf.put_u16(dt.year);
        buf.put_u8(dt.month);
        buf.put_u8(dt.day);
        buf.put_u8(dt.hour);
        buf.put_u8(dt.minute);
        buf.put_u8(dt.second);

        buf.put_u16(ex.vscp_class);
        buf.put_u16(ex.vscp_type);
        buf.put_slice(ex.guid.as_bytes());
        // size_data <= MAX_DATA, which fits in u16
        buf.put_u16(size_data as u16);
        buf.put_slice(&ex.data);

        let covered_end = buf.len();
        buf.put_bytes(0, CRC_LENGTH);
        let crc = append_checksum(&mut buf, 1, covered_end);
        self.observer.on_checksum(crc, covered_end - 1);

        buf.truncate(frame_len(size_data));
        debug_assert_eq!(buf.len(), frame_len(size_data));

        let frame = Frame {
            bytes: buf.freeze(),
        };

        self.observer.on_frame_built(&FrameBuilt {
            packet_type,
            vscp_class: ex.vscp_class,
            vscp_type: ex.vscp_type,
            size_data,
            frame_len: frame.len(),
            clock_substituted,
        });

        Ok(frame)
    }
}

/// Build a frame with no observer attached
pub fn build_frame(packet_type: u8, event: &Event) -> Result<Frame> {
    FrameBuilder::new().build(packet_type, event)
}
