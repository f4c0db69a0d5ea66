//! # Error Types
//!
//! Error handling for the VSCP multicast encoder.
//!
//! Every failure in the frame/checksum/encryption pipeline is returned to the
//! immediate caller as a [`ProtocolError`]. Nothing is retried internally and no
//! partial packet is ever produced.
//!
//! ## Error Categories
//! - **Event Errors**: wrong event shape, payload larger than the wire format allows
//! - **Cryptographic Errors**: key length mismatch, unknown scheme, entropy failure
//! - **Configuration Errors**: unreadable or invalid configuration
//!
//! ## Example Usage
//! ```rust
//! use vscp_multicast::core::event::{Event, VscpEventEx};
//! use vscp_multicast::core::frame::{build_frame, MAX_DATA};
//! use vscp_multicast::error::ProtocolError;
//!
//! let event = VscpEventEx {
//!     data: vec![0u8; MAX_DATA + 1],
//!     ..VscpEventEx::default()
//! };
//!
//! match build_frame(0, &Event::from(event)) {
//!     Err(ProtocolError::DataTooLarge { size, max }) => assert!(size > max),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Event shape errors
    pub const ERR_STANDARD_EVENT: &str = "VSCP event must be the extended variant (VscpEventEx)";

    /// Cryptographic errors
    pub const ERR_ENCRYPTION_FAILED: &str = "Encryption failed";
    pub const ERR_DECRYPTION_FAILED: &str = "Decryption failed";
    pub const ERR_PACKET_TOO_SHORT: &str = "Encrypted packet shorter than identifier and IV";
    pub const ERR_MISALIGNED_CIPHERTEXT: &str = "Ciphertext is not a multiple of the block size";

    /// Configuration errors
    pub const ERR_KEY_NOT_CONFIGURED: &str = "Encryption enabled but no key configured";
    pub const ERR_KEY_NOT_HEX: &str = "Key material is not valid hexadecimal";
}

// ProtocolError is the primary error type for all encoder operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Event data too large: {size} bytes (max {max})")]
    DataTooLarge { size: usize, max: usize },

    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    InvalidKey { expected: usize, actual: usize },

    #[error("Unsupported encryption scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Entropy source unavailable: {0}")]
    EntropySource(String),

    #[error("Invalid GUID: {0}")]
    InvalidGuid(String),

    #[error("Encryption failed")]
    EncryptionFailure,

    #[error("Decryption failed: {0}")]
    DecryptionFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
