//! Example: Sending VSCP events to the multicast group
//!
//! Encodes a few events and pushes them to 224.0.23.158:9598 through
//! `UdpFramed` and [`MulticastCodec`].
//!
//! Run with: `cargo run --example multicast_send`
//!
//! Set `VSCP_MULTICAST_ENCRYPTION=aes128` and `VSCP_MULTICAST_KEY=<32 hex chars>`
//! to send encrypted packets.

#![allow(clippy::uninlined_format_args)]

use futures::SinkExt;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::udp::UdpFramed;
use vscp_multicast::config::{MulticastConfig, VSCP_MULTICAST_ADDRESS, VSCP_MULTICAST_PORT};
use vscp_multicast::utils::logging::init_logging;
use vscp_multicast::utils::metrics::global_metrics;
use vscp_multicast::{Event, Guid, MulticastCodec, MulticastEncoder, VscpEvent, VscpEventEx};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = MulticastConfig::from_env()?;
    init_logging(&config.logging)?;
    config.validate_strict()?;

    let encoder =
        MulticastEncoder::from_config(&config.encoder)?.with_observer(Arc::new(global_metrics()));
    println!("Encryption: {}", encoder.encryption());

    let group: Ipv4Addr = VSCP_MULTICAST_ADDRESS.parse()?;
    let target = SocketAddr::from((group, VSCP_MULTICAST_PORT));

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.set_multicast_ttl_v4(1)?;
    let mut framed = UdpFramed::new(socket, MulticastCodec::new(encoder));

    let guid: Guid = "FF:FF:FF:FF:FF:FF:FF:FE:00:00:00:00:00:00:00:01".parse()?;

    // Temperature measurement, date stamped at send time
    let temperature = VscpEventEx {
        vscp_class: 10,
        vscp_type: 6,
        guid,
        data: vec![0x88, 0x02, 0x08, 0xC0],
        ..VscpEventEx::default()
    };

    // Heartbeat promoted from the reduced event shape
    let heartbeat = VscpEvent {
        vscp_class: 20,
        vscp_type: 9,
        data: vec![0x00, 0xFF, 0xFF],
        ..VscpEvent::default()
    }
    .into_extended(guid);

    for event in [temperature, heartbeat] {
        println!(
            "Sending class={} type={} ({} data bytes) to {}",
            event.vscp_class,
            event.vscp_type,
            event.data.len(),
            target
        );
        framed.send((Event::from(event), target)).await?;
    }

    global_metrics().log_metrics();
    let snapshot = global_metrics().snapshot();
    println!(
        "Sent {} frames ({} bytes), {} encrypted",
        snapshot.frames_built, snapshot.frame_bytes, snapshot.encryption_total
    );

    Ok(())
}
