//! # Network Module
//!
//! This module provides the datagram transport used to exchange commands with the arm firmware.
//!
//! The firmware speaks a connectionless request/response protocol: one command per datagram, one
//! reply per datagram. No ordering or delivery guarantee exists between two requests, so callers
//! must serialise their own requests and retire each before issuing the next.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use serde::{Deserialize, Serialize};
use std::{
    io::ErrorKind,
    net::{SocketAddr, ToSocketAddrs, UdpSocket},
    time::Duration,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Size of the receive buffer, replies from the firmware are much smaller than this.
pub const RECV_BUFFER_SIZE: usize = 1024;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A request/response transport to a single peer.
///
/// A transport starts closed. [`Transport::open`] acquires the underlying resources but does not
/// imply the peer is reachable, that is only learnt by exchanging a request.
pub trait Transport {
    /// Acquire the send/receive capability for the peer.
    fn open(&mut self) -> Result<(), TransportError>;

    /// Return if the transport is currently open.
    fn is_open(&self) -> bool;

    /// Send a single command and block until either one reply arrives or the timeout elapses.
    ///
    /// No retry is performed, an unanswered request is returned as [`TransportError::Timeout`].
    fn send_and_await(&mut self, command: &str) -> Result<String, TransportError>;

    /// Send a single command without waiting for a reply.
    fn send(&mut self, command: &str) -> Result<(), TransportError>;

    /// Release the underlying resources. Never fails.
    fn close(&mut self);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Network parameters for reaching the arm firmware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetParams {
    /// Address (IP or host name) of the firmware
    pub peer_address: String,

    /// UDP port the firmware listens on
    pub peer_port: u16,

    /// Maximum time to wait for a reply to a single request.
    ///
    /// Units: seconds
    pub timeout_s: f64,
}

/// UDP implementation of [`Transport`].
pub struct UdpTransport {
    params: NetParams,

    socket: Option<UdpSocket>,

    buffer: Vec<u8>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("The transport has not been opened")]
    NotOpen,

    #[error("Could not resolve the peer address {0}")]
    InvalidAddress(String),

    #[error("The timeout must be a positive number of seconds, found {0}")]
    InvalidTimeout(f64),

    #[error("No reply was recieved within the timeout")]
    Timeout,

    #[error("The peer sent a reply which was not valid UTF-8")]
    NonUtf8Reply,

    #[error("Socket error: {0}")]
    Io(std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NetParams {
    /// Get the configured timeout as a duration.
    pub fn timeout(&self) -> Result<Duration, TransportError> {
        if self.timeout_s.is_finite() && self.timeout_s > 0.0 {
            Ok(Duration::from_secs_f64(self.timeout_s))
        } else {
            Err(TransportError::InvalidTimeout(self.timeout_s))
        }
    }

    /// Resolve the peer's socket address.
    pub fn peer_addr(&self) -> Result<SocketAddr, TransportError> {
        let endpoint = format!("{}:{}", self.peer_address, self.peer_port);
        endpoint
            .to_socket_addrs()
            .map_err(|_| TransportError::InvalidAddress(endpoint.clone()))?
            .next()
            .ok_or(TransportError::InvalidAddress(endpoint))
    }
}

impl Default for NetParams {
    fn default() -> Self {
        Self {
            peer_address: String::from("192.168.11.10"),
            peer_port: 4210,
            timeout_s: 1.0,
        }
    }
}

impl UdpTransport {
    /// Create a new, closed, UDP transport for the given peer.
    pub fn new(params: NetParams) -> Self {
        Self {
            params,
            socket: None,
            buffer: vec![0u8; RECV_BUFFER_SIZE],
        }
    }

    /// Discard any datagrams already waiting in the socket.
    ///
    /// These can only be late replies to earlier requests which timed out, so they must not be
    /// read as the reply to the next request.
    fn drain_stale(socket: &UdpSocket, buffer: &mut [u8]) -> Result<(), TransportError> {
        socket.set_nonblocking(true).map_err(TransportError::Io)?;

        let result = loop {
            match socket.recv(buffer) {
                Ok(n) => trace!("Discarding stale datagram ({} bytes)", n),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break Ok(()),
                // Errors queued by earlier sends (e.g. ICMP port unreachable) are stale too
                Err(e) if e.kind() == ErrorKind::ConnectionRefused => continue,
                Err(e) => break Err(TransportError::Io(e)),
            }
        };

        socket.set_nonblocking(false).map_err(TransportError::Io)?;

        result
    }
}

impl Transport for UdpTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        let timeout = self.params.timeout()?;
        let peer = self.params.peer_addr()?;

        // Bind to any local port of the same family as the peer
        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => ([0, 0, 0, 0], 0).into(),
            SocketAddr::V6(_) => ([0u16; 8], 0).into(),
        };

        let socket = UdpSocket::bind(local).map_err(TransportError::Io)?;
        socket.connect(peer).map_err(TransportError::Io)?;
        socket
            .set_read_timeout(Some(timeout))
            .map_err(TransportError::Io)?;

        trace!("UDP transport open to {} (timeout {:?})", peer, timeout);

        self.socket = Some(socket);

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    fn send_and_await(&mut self, command: &str) -> Result<String, TransportError> {
        let socket = self.socket.as_ref().ok_or(TransportError::NotOpen)?;

        Self::drain_stale(socket, &mut self.buffer)?;

        trace!("-> {:?}", command);
        socket
            .send(command.as_bytes())
            .map_err(TransportError::Io)?;

        // Blocking reads report an elapsed timeout as WouldBlock on unix and TimedOut on windows
        let n = socket.recv(&mut self.buffer).map_err(|e| match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => TransportError::Timeout,
            _ => TransportError::Io(e),
        })?;

        let reply = std::str::from_utf8(&self.buffer[..n])
            .map_err(|_| TransportError::NonUtf8Reply)?
            .trim()
            .to_string();
        trace!("<- {:?}", reply);

        Ok(reply)
    }

    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        let socket = self.socket.as_ref().ok_or(TransportError::NotOpen)?;

        trace!("-> {:?}", command);
        socket
            .send(command.as_bytes())
            .map(|_| ())
            .map_err(TransportError::Io)
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            trace!("UDP transport closed");
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
