//! # Service Layer
//!
//! The send-side pipeline built on top of [`core`](crate::core) and
//! [`utils`](crate::utils).
//!
//! ## Components
//! - **Encoder**: event → frame → checksum → optional encryption
//! - **Codec**: `tokio_util` encoder for pushing events into a UDP sink

pub mod codec;
pub mod encoder;

pub use codec::MulticastCodec;
pub use encoder::MulticastEncoder;
