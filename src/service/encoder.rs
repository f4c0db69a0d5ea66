//! # Multicast Encoder
//!
//! Runs the full send-side pipeline for one event:
//! build frame → append CRC → optionally encrypt.
//!
//! The encoder holds only read-only state (packet type, key, observer), so one
//! instance can be cloned or shared behind an `Arc` across threads. Every call
//! works on freshly allocated buffers.

use crate::config::EncoderConfig;
use crate::core::event::{Event, VscpEventEx};
use crate::core::frame::{Frame, FrameBuilder};
use crate::error::Result;
use crate::utils::crypto::{encrypt_with_key, EncryptionKey, EncryptionKind, Packet};
use crate::utils::observer::PipelineObserver;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct MulticastEncoder {
    builder: FrameBuilder,
    key: EncryptionKey,
    packet_type: u8,
}

impl MulticastEncoder {
    pub fn new(packet_type: u8, key: EncryptionKey) -> Self {
        Self {
            builder: FrameBuilder::new(),
            key,
            packet_type,
        }
    }

    /// Encoder that sends frames unencrypted
    pub fn plain(packet_type: u8) -> Self {
        Self::new(packet_type, EncryptionKey::none())
    }

    /// Build an encoder from configuration, resolving the key from the file or
    /// the environment
    pub fn from_config(config: &EncoderConfig) -> Result<Self> {
        let key = config.resolve_key()?;
        Ok(Self::new(config.packet_type, key))
    }

    /// Report pipeline events to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.builder = FrameBuilder::with_observer(observer);
        self
    }

    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    pub fn encryption(&self) -> EncryptionKind {
        self.key.kind()
    }

    /// Build the unencrypted frame for `event` without encrypting it
    pub fn build_frame(&self, event: &Event) -> Result<Frame> {
        self.builder.build(self.packet_type, event)
    }

    /// Encode an event into the packet handed to the transport
    pub fn encode(&self, event: &Event) -> Result<Packet> {
        let result = self
            .builder
            .build(self.packet_type, event)
            .and_then(|frame| self.seal(&frame));
        self.report(result)
    }

    pub fn encode_ex(&self, event: &VscpEventEx) -> Result<Packet> {
        let result = self
            .builder
            .build_ex(self.packet_type, event)
            .and_then(|frame| self.seal(&frame));
        self.report(result)
    }

    /// Encrypt an already built frame with this encoder's key
    pub fn encode_frame(&self, frame: &Frame) -> Result<Packet> {
        let result = self.seal(frame);
        self.report(result)
    }

    fn seal(&self, frame: &Frame) -> Result<Packet> {
        let packet = encrypt_with_key(frame, &self.key)?;
        if packet.kind().is_encrypted() {
            self.builder
                .observer()
                .on_encrypted(packet.kind(), frame.len(), packet.len());
        }
        Ok(packet)
    }

    fn report(&self, result: Result<Packet>) -> Result<Packet> {
        if let Err(e) = &result {
            self.builder.observer().on_error(e);
        }
        result
    }
}
