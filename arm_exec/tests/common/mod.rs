//! Scripted in-memory transport shared by the arm client tests.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use arm_lib::{arm_client::ArmClient, params::MotionParams};
use comms_if::net::{Transport, TransportError};

/// Reply the mock gives to a request.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Timeout,
}

/// State of the mock, shared with the test so it can be inspected after the transport has moved
/// into a client.
#[derive(Debug, Default)]
pub struct MockState {
    pub open: bool,

    /// Every command sent, in order, including fire-and-forget ones
    pub sent: Vec<String>,

    /// Replies given in order to each `send_and_await`
    pub replies: VecDeque<MockReply>,

    /// Reply given once `replies` is empty, a timeout if `None`
    pub fallback: Option<String>,
}

pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

pub type Handle = Rc<RefCell<MockState>>;

impl MockTransport {
    pub fn new() -> (Self, Handle) {
        let state = Rc::new(RefCell::new(MockState::default()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        self.state.borrow_mut().open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    fn send_and_await(&mut self, command: &str) -> Result<String, TransportError> {
        let mut state = self.state.borrow_mut();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.sent.push(command.to_string());

        match state.replies.pop_front() {
            Some(MockReply::Text(t)) => Ok(t),
            Some(MockReply::Timeout) => Err(TransportError::Timeout),
            None => state.fallback.clone().ok_or(TransportError::Timeout),
        }
    }

    fn send(&mut self, command: &str) -> Result<(), TransportError> {
        let mut state = self.state.borrow_mut();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.sent.push(command.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.state.borrow_mut().open = false;
    }
}

impl MockState {
    pub fn push(&mut self, reply: &str) {
        self.replies.push_back(MockReply::Text(reply.to_string()));
    }

    pub fn push_timeout(&mut self) {
        self.replies.push_back(MockReply::Timeout);
    }

    /// Take the commands sent so far.
    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }
}

/// A disconnected client with `num_joints` joints on a mock transport.
pub fn client(num_joints: usize) -> (ArmClient<MockTransport>, Handle) {
    let (transport, handle) = MockTransport::new();
    (
        ArmClient::new(transport, num_joints, MotionParams::default()),
        handle,
    )
}

/// A connected client whose joints all start at zero. The handshake traffic is cleared and every
/// further request is acknowledged.
pub fn connected_client(num_joints: usize) -> (ArmClient<MockTransport>, Handle) {
    let (mut client, handle) = client(num_joints);

    {
        let mut state = handle.borrow_mut();
        state.push("OK");
        state.push(&vec!["0.00"; num_joints].join(","));
    }

    client.connect().unwrap();

    {
        let mut state = handle.borrow_mut();
        state.sent.clear();
        state.fallback = Some("OK".to_string());
    }

    (client, handle)
}
