//! Observability hook for the encode pipeline.
//!
//! The frame builder and encoder never write to the console. Instead they report
//! to a [`PipelineObserver`] supplied by the caller. The default observer does
//! nothing; [`TracingObserver`] forwards to `tracing`, and
//! [`Metrics`](crate::utils::metrics::Metrics) keeps counters.

use crate::error::ProtocolError;
use crate::utils::crypto::EncryptionKind;
use tracing::{debug, warn};

/// Summary of a freshly built frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuilt {
    pub packet_type: u8,
    pub vscp_class: u16,
    pub vscp_type: u16,
    pub size_data: usize,
    pub frame_len: usize,
    /// The date/time block was stamped from the wall clock
    pub clock_substituted: bool,
}

/// Receives structured pipeline events. All methods default to no-ops.
pub trait PipelineObserver: Send + Sync {
    fn on_frame_built(&self, _frame: &FrameBuilt) {}

    /// `covered_len` is the number of bytes the checksum was computed over
    fn on_checksum(&self, _crc: u16, _covered_len: usize) {}

    fn on_encrypted(&self, _kind: EncryptionKind, _plain_len: usize, _packet_len: usize) {}

    fn on_error(&self, _error: &ProtocolError) {}
}

// Lets a `&'static` observer such as `global_metrics()` be wrapped in an `Arc`
impl<T: PipelineObserver + ?Sized> PipelineObserver for &'static T {
    fn on_frame_built(&self, frame: &FrameBuilt) {
        (**self).on_frame_built(frame)
    }

    fn on_checksum(&self, crc: u16, covered_len: usize) {
        (**self).on_checksum(crc, covered_len)
    }

    fn on_encrypted(&self, kind: EncryptionKind, plain_len: usize, packet_len: usize) {
        (**self).on_encrypted(kind, plain_len, packet_len)
    }

    fn on_error(&self, error: &ProtocolError) {
        (**self).on_error(error)
    }
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_frame_built(&self, frame: &FrameBuilt) {
        debug!(
            packet_type = frame.packet_type,
            vscp_class = frame.vscp_class,
            vscp_type = frame.vscp_type,
            size_data = frame.size_data,
            frame_len = frame.frame_len,
            clock_substituted = frame.clock_substituted,
            "Frame built"
        );
    }

    fn on_checksum(&self, crc: u16, covered_len: usize) {
        debug!(crc = format_args!("{crc:#06x}"), covered_len, "Checksum computed");
    }

    fn on_encrypted(&self, kind: EncryptionKind, plain_len: usize, packet_len: usize) {
        debug!(scheme = kind.name(), plain_len, packet_len, "Encryption applied");
    }

    fn on_error(&self, error: &ProtocolError) {
        warn!(error = %error, "Encode failed");
    }
}
