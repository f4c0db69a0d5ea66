//! # Utility Modules
//!
//! Supporting utilities for encryption, logging, and observability.
//!
//! ## Components
//! - **Crypto**: AES-128/192/256-CBC frame encryption
//! - **Logging**: Structured logging configuration
//! - **Observer**: Pipeline hook replacing ad-hoc diagnostics
//! - **Metrics**: Thread-safe observability counters
//!
//! ## Security
//! - Cryptographically secure IVs (getrandom)
//! - Memory zeroing for key material (zeroize crate)
//! - Unknown encryption schemes are rejected, never sent in the clear

pub mod crypto;
pub mod logging;
pub mod metrics;
pub mod observer;

pub use observer::{NoopObserver, PipelineObserver, TracingObserver};
