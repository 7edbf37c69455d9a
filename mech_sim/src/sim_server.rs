//! # Simulator Server Module
//!
//! This module abstracts over the networking side of the simulator. Each received datagram is one
//! command, each reply is sent back to the address the command came from.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, trace, warn};
use std::{
    io::ErrorKind,
    net::{SocketAddr, UdpSocket},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use comms_if::net::RECV_BUFFER_SIZE;

use crate::{params::SimParams, sim_arm::SimArm};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// How often the server checks whether it has been asked to stop.
const POLL_PERIOD: Duration = Duration::from_millis(50);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// UDP server exposing a [`SimArm`].
pub struct SimServer {
    socket: UdpSocket,

    arm: SimArm,

    /// Drop every Nth request, zero never drops
    drop_every: u32,

    num_requests: u64,

    buffer: Vec<u8>,
}

/// A server running on its own thread. The server is stopped when the handle is dropped.
pub struct SimHandle {
    addr: SocketAddr,

    stop: Arc<AtomicBool>,

    thread: Option<JoinHandle<()>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur in the [`SimServer`]
#[derive(thiserror::Error, Debug)]
pub enum SimServerError {
    #[error("Could not bind to {0}: {1}")]
    BindError(String, std::io::Error),

    #[error("Socket error: {0}")]
    SocketError(std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimServer {
    /// Create a new simulator server bound to the configured address.
    pub fn new(params: &SimParams) -> Result<Self, SimServerError> {
        let socket = UdpSocket::bind(&params.bind_address)
            .map_err(|e| SimServerError::BindError(params.bind_address.clone(), e))?;
        socket
            .set_read_timeout(Some(POLL_PERIOD))
            .map_err(SimServerError::SocketError)?;

        Ok(Self {
            socket,
            arm: SimArm::new(params.num_joints, params.max_angle_deg),
            drop_every: params.drop_every,
            num_requests: 0,
            buffer: vec![0u8; RECV_BUFFER_SIZE],
        })
    }

    /// Address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, SimServerError> {
        self.socket.local_addr().map_err(SimServerError::SocketError)
    }

    /// Wait up to the poll period for one command and answer it.
    ///
    /// Returns `false` if no command arrived.
    pub fn serve_once(&mut self) -> Result<bool, SimServerError> {
        let (n, from) = match self.socket.recv_from(&mut self.buffer) {
            Ok(r) => r,
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                return Ok(false)
            }
            // A previous reply could not be delivered, nothing to do with the next command
            Err(e) if e.kind() == ErrorKind::ConnectionReset => return Ok(false),
            Err(e) => return Err(SimServerError::SocketError(e)),
        };

        self.num_requests += 1;

        let command = String::from_utf8_lossy(&self.buffer[..n]).into_owned();
        trace!("<- {:?} from {}", command, from);

        if self.drop_every > 0 && self.num_requests % self.drop_every as u64 == 0 {
            trace!("Dropping request {}", self.num_requests);
            return Ok(true);
        }

        if let Some(reply) = self.arm.handle(&command) {
            let reply = reply.to_string();
            trace!("-> {:?}", reply);
            self.socket
                .send_to(reply.as_bytes(), from)
                .map_err(SimServerError::SocketError)?;
        }

        Ok(true)
    }

    /// Serve commands until `stop` is set.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), SimServerError> {
        info!("Simulator serving on {}", self.local_addr()?);

        while !stop.load(Ordering::Relaxed) {
            self.serve_once()?;
        }

        info!("Simulator stopped after {} request(s)", self.num_requests);

        Ok(())
    }

    /// Run the server on a new thread.
    pub fn spawn(mut self) -> Result<SimHandle, SimServerError> {
        let addr = self.local_addr()?;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        let thread = thread::spawn(move || {
            if let Err(e) = self.run(&thread_stop) {
                warn!("Simulator server failed: {}", e);
            }
        });

        Ok(SimHandle {
            addr,
            stop,
            thread: Some(thread),
        })
    }
}

impl SimHandle {
    /// Address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop the server and wait for its thread to finish.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(t) = self.thread.take() {
            t.join().ok();
        }
    }
}

impl Drop for SimHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
