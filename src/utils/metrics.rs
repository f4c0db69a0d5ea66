//! Observability and Metrics
//!
//! Counters for frames built, checksums computed, and packets encrypted.
//! [`Metrics`] implements [`PipelineObserver`], so an `Arc<Metrics>` can be
//! handed straight to the encoder.
//!
//! Uses atomic counters for thread-safe metrics collection.

use crate::error::ProtocolError;
use crate::utils::crypto::EncryptionKind;
use crate::utils::observer::{FrameBuilt, PipelineObserver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for encoder operations
#[derive(Debug)]
pub struct Metrics {
    /// Total frames built
    pub frames_built: AtomicU64,
    /// Frames whose date/time block was stamped from the clock
    pub frames_clock_stamped: AtomicU64,
    /// Total frame bytes produced
    pub frame_bytes: AtomicU64,
    /// Total checksums computed
    pub checksums_total: AtomicU64,
    /// Total encryption operations
    pub encryption_total: AtomicU64,
    /// Total packet bytes produced by encryption
    pub encrypted_bytes: AtomicU64,
    /// Failed encode operations
    pub encode_errors: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            frames_built: AtomicU64::new(0),
            frames_clock_stamped: AtomicU64::new(0),
            frame_bytes: AtomicU64::new(0),
            checksums_total: AtomicU64::new(0),
            encryption_total: AtomicU64::new(0),
            encrypted_bytes: AtomicU64::new(0),
            encode_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_built: self.frames_built.load(Ordering::Relaxed),
            frames_clock_stamped: self.frames_clock_stamped.load(Ordering::Relaxed),
            frame_bytes: self.frame_bytes.load(Ordering::Relaxed),
            checksums_total: self.checksums_total.load(Ordering::Relaxed),
            encryption_total: self.encryption_total.load(Ordering::Relaxed),
            encrypted_bytes: self.encrypted_bytes.load(Ordering::Relaxed),
            encode_errors: self.encode_errors.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            frames_built = snapshot.frames_built,
            frames_clock_stamped = snapshot.frames_clock_stamped,
            frame_bytes = snapshot.frame_bytes,
            checksums_total = snapshot.checksums_total,
            encryption_total = snapshot.encryption_total,
            encrypted_bytes = snapshot.encrypted_bytes,
            encode_errors = snapshot.encode_errors,
            uptime_seconds = snapshot.uptime_seconds,
            "Encoder metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineObserver for Metrics {
    fn on_frame_built(&self, frame: &FrameBuilt) {
        self.frames_built.fetch_add(1, Ordering::Relaxed);
        self.frame_bytes
            .fetch_add(frame.frame_len as u64, Ordering::Relaxed);
        if frame.clock_substituted {
            self.frames_clock_stamped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_checksum(&self, _crc: u16, _covered_len: usize) {
        self.checksums_total.fetch_add(1, Ordering::Relaxed);
    }

    fn on_encrypted(&self, _kind: EncryptionKind, _plain_len: usize, packet_len: usize) {
        self.encryption_total.fetch_add(1, Ordering::Relaxed);
        self.encrypted_bytes
            .fetch_add(packet_len as u64, Ordering::Relaxed);
    }

    fn on_error(&self, _error: &ProtocolError) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_built: u64,
    pub frames_clock_stamped: u64,
    pub frame_bytes: u64,
    pub checksums_total: u64,
    pub encryption_total: u64,
    pub encrypted_bytes: u64,
    pub encode_errors: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance (lazy static for simplicity)
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}
