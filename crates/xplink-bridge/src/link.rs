//! Bounded-wait UDP link to the simulator
//!
//! One socket receives telemetry; outbound traffic goes to the simulator's
//! command port. The peer is bound lazily: unless configured out of band it
//! is learned from the source address of the first valid telemetry datagram
//! and never changes afterwards.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::info;

use xplink_core::{XplinkError, XplinkResult};

/// UDP link with learn-by-first-packet peering
pub struct UdpLink {
    socket: UdpSocket,
    local_addr: SocketAddr,
    peer: Option<SocketAddr>,
    command_port: u16,
}

impl UdpLink {
    /// Bind the telemetry socket
    pub fn bind(
        addr: SocketAddr,
        command_port: u16,
        peer: Option<SocketAddr>,
    ) -> XplinkResult<Self> {
        let socket = UdpSocket::bind(addr).map_err(|e| XplinkError::Transport(e.to_string()))?;
        let local_addr = socket
            .local_addr()
            .map_err(|e| XplinkError::Transport(e.to_string()))?;

        Ok(UdpLink {
            socket,
            local_addr,
            peer,
            command_port,
        })
    }

    /// Local address of the telemetry socket
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether an outbound peer is known
    pub fn established(&self) -> bool {
        self.peer.is_some()
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Receive one datagram, waiting at most `wait`.
    ///
    /// Returns `Ok(None)` when the wait elapses without a datagram.
    pub fn recv(
        &self,
        buf: &mut [u8],
        wait: Duration,
    ) -> XplinkResult<Option<(usize, SocketAddr)>> {
        self.socket
            .set_read_timeout(Some(wait))
            .map_err(|e| XplinkError::Transport(e.to_string()))?;

        match self.socket.recv_from(buf) {
            Ok((len, src)) => Ok(Some((len, src))),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(XplinkError::Transport(e.to_string())),
        }
    }

    /// Learn the peer from a valid datagram's source address.
    ///
    /// The source IP is kept; the port is replaced with the configured
    /// command port. Once established the peer never changes.
    pub fn establish(&mut self, src: SocketAddr) {
        if self.peer.is_none() {
            let peer = SocketAddr::new(src.ip(), self.command_port);
            info!(%peer, "simulator connected");
            self.peer = Some(peer);
        }
    }

    /// Send one datagram to the peer
    pub fn send(&self, datagram: &[u8]) -> XplinkResult<()> {
        let peer = self.peer.ok_or(XplinkError::PeerUnknown)?;
        self.socket
            .send_to(datagram, peer)
            .map_err(|e| XplinkError::Transport(e.to_string()))?;
        Ok(())
    }
}
