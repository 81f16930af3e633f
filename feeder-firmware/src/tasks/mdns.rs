// mDNS Responder Task - macht den Futterautomaten als feeder.local erreichbar
//
// - Protokoll: mDNS (RFC 6762), nur A-Records
// - Transport: UDP Multicast auf 224.0.0.251:5353
// - Library: edge-mdns (no_std) über edge-nal-embassy

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use core::net::{Ipv4Addr, SocketAddr};
use core::sync::atomic::{AtomicU32, Ordering};

use edge_mdns::{HostAnswersMdnsHandler, buf::VecBufAccess, domain::base::Ttl, host::Host, io};
use edge_nal::{MulticastV4, UdpBind, UdpSplit};
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use crate::config::{
    MDNS_HOSTNAME, MDNS_MULTICAST_ADDR, MDNS_PACKET_BUFFER_SIZE, MDNS_PORT,
    MDNS_RECONNECT_DELAY_SECS, MDNS_TTL_SECS, MDNS_UDP_BUFFER_SIZE,
};
use crate::tasks::wifi::wait_for_network;

static TXN_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Füllt `buf` für edge-mdns Transaction IDs
///
/// Ein fortlaufender Zähler reicht, mDNS braucht nur Eindeutigkeit.
fn mdns_rng(buf: &mut [u8]) {
    let mut counter = TXN_COUNTER.fetch_add(1, Ordering::Relaxed);
    for chunk in buf.chunks_mut(4) {
        let bytes = counter.to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
        counter = counter.wrapping_add(1);
    }
}

/// mDNS Responder Task
///
/// Wartet auf eine IP und beantwortet dann Anfragen nach
/// `<MDNS_HOSTNAME>.local`. Bei Fehlern Neustart nach
/// `MDNS_RECONNECT_DELAY_SECS`.
#[embassy_executor::task]
pub async fn mdns_responder_task(stack: &'static Stack<'static>) {
    info!("mDNS: Task started, waiting for network...");

    loop {
        wait_for_network(stack).await;

        match run_mdns_responder(stack).await {
            Ok(()) => warn!("mDNS: Responder stopped"),
            Err(e) => error!("mDNS: Error: {}", e),
        }
        info!("mDNS: Restarting in {}s...", MDNS_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MDNS_RECONNECT_DELAY_SECS)).await;
    }
}

/// Bindet den Multicast-Socket und läuft bis zum ersten Fehler
async fn run_mdns_responder(stack: &'static Stack<'static>) -> Result<(), MdnsError> {
    let our_ip = stack
        .config_v4()
        .ok_or(MdnsError::NoAddress)?
        .address
        .address();

    // StaticCell nur einmal initialisieren, nach Restart bestehende Buffer nutzen
    static UDP_BUFFERS: static_cell::StaticCell<
        UdpBuffers<1, MDNS_UDP_BUFFER_SIZE, MDNS_UDP_BUFFER_SIZE>,
    > = static_cell::StaticCell::new();
    let udp_buffers = UDP_BUFFERS.init_with(UdpBuffers::new);
    let udp_stack = Udp::new(*stack, udp_buffers);

    let mut socket = udp_stack
        .bind(SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), MDNS_PORT))
        .await
        .map_err(|_| MdnsError::SocketBindFailed)?;

    socket
        .join_v4(Ipv4Addr::from(MDNS_MULTICAST_ADDR), Ipv4Addr::UNSPECIFIED)
        .await
        .map_err(|_| MdnsError::MulticastJoinFailed)?;

    let (recv, send) = socket.split();

    let host = Host {
        hostname: MDNS_HOSTNAME,
        ipv4: our_ip.into(),
        ipv6: [0u8; 16].into(), // kein proto-ipv6 in smoltcp
        ttl: Ttl::from_secs(MDNS_TTL_SECS),
    };

    let recv_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let send_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let signal = Signal::<NoopRawMutex, ()>::new();

    let mdns = io::Mdns::new(
        Some(our_ip),
        None,
        recv,
        send,
        recv_buf,
        send_buf,
        mdns_rng,
        &signal,
    );

    info!(
        "mDNS: Advertising '{}.local' -> {}",
        MDNS_HOSTNAME,
        Debug2Format(&our_ip)
    );

    mdns.run(HostAnswersMdnsHandler::new(&host))
        .await
        .map_err(|_| MdnsError::ResponderFailed)
}

#[derive(Debug, defmt::Format)]
enum MdnsError {
    /// DHCP-Lease weg zwischen Warten und Binden
    NoAddress,
    SocketBindFailed,
    MulticastJoinFailed,
    ResponderFailed,
}
