//! # Core Frame Components
//!
//! Event model, frame layout, and checksum for VSCP multicast.
//!
//! ## Components
//! - **Event**: standard and extended VSCP event shapes, GUID, date/time block
//! - **Frame**: builder for the packet type 0 wire layout
//! - **CRC**: CRC-16/CCITT (poly 0x1021, init 0xFFFF) over the frame body
//!
//! ## Wire Format
//! ```text
//! [PktType(1)] [Head(2)] [Timestamp(4)] [Year(2)] [Mon][Day][Hour][Min][Sec]
//! [Class(2)] [Type(2)] [GUID(16)] [Size(2)] [Data(N)] [CRC(2)]
//! ```
//!
//! All multi-byte fields are big-endian. The CRC covers everything after the
//! packet type byte up to the end of the data.
//!
//! ## Limits
//! - Maximum data size: 479 bytes
//! - Oversized events are rejected before any bytes are written

pub mod crc;
pub mod event;
pub mod frame;
