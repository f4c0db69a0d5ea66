//! Tokio codec adapter for the multicast encoder.
//!
//! Pairs with `tokio_util::udp::UdpFramed` so events can be pushed into a
//! `Sink` and go out as one datagram each. Sending only; VSCP receive-side
//! parsing lives elsewhere.

use crate::core::event::{Event, VscpEventEx};
use crate::error::ProtocolError;
use crate::service::encoder::MulticastEncoder;
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

#[derive(Debug, Clone)]
pub struct MulticastCodec {
    encoder: MulticastEncoder,
}

impl MulticastCodec {
    pub fn new(encoder: MulticastEncoder) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &MulticastEncoder {
        &self.encoder
    }
}

impl From<MulticastEncoder> for MulticastCodec {
    fn from(encoder: MulticastEncoder) -> Self {
        Self::new(encoder)
    }
}

impl Encoder<Event> for MulticastCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Event, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let packet = self.encoder.encode(&item)?;
        dst.reserve(packet.len());
        dst.put_slice(packet.as_bytes());
        Ok(())
    }
}

impl Encoder<VscpEventEx> for MulticastCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: VscpEventEx, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let packet = self.encoder.encode_ex(&item)?;
        dst.reserve(packet.len());
        dst.put_slice(packet.as_bytes());
        Ok(())
    }
}
