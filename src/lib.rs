//! # VSCP Multicast
//!
//! Send-side encoding of VSCP events for the multicast channel
//! (224.0.23.158:9598).
//!
//! An extended event is serialized into the packet type 0 frame layout, a
//! CRC-16/CCITT is appended, and the frame is optionally wrapped with
//! AES-128/192/256-CBC. The result is a byte buffer ready to hand to a UDP
//! socket; this crate does not open sockets itself.
//!
//! ## Layout
//! - [`core`]: event model, frame builder, checksum
//! - [`utils`]: encryption, logging, observer hook, metrics
//! - [`service`]: the full pipeline and its `tokio_util` codec
//! - [`config`]: TOML/environment configuration
//! - [`error`]: the crate-wide [`ProtocolError`]
//!
//! ## Example
//! ```rust
//! use vscp_multicast::{Event, Guid, MulticastEncoder, VscpEventEx};
//!
//! let event = VscpEventEx {
//!     vscp_class: 10,
//!     vscp_type: 6,
//!     guid: Guid::new([0xAA; 16]),
//!     ..VscpEventEx::default()
//! };
//!
//! let encoder = MulticastEncoder::plain(0x00);
//! let packet = encoder.encode(&Event::from(event)).unwrap();
//! assert_eq!(packet.len(), 38);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod utils;

pub use crate::core::event::{DateTime, Event, Guid, VscpEvent, VscpEventEx};
pub use crate::core::frame::{build_frame, Frame, FrameBuilder, HEADER_LENGTH, MAX_DATA};
pub use crate::error::{ProtocolError, Result};
pub use crate::service::{MulticastCodec, MulticastEncoder};
pub use crate::utils::crypto::{decrypt_packet, encrypt_frame, EncryptionKey, EncryptionKind, Packet};
