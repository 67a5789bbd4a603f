//! Message transport boundary.
//!
//! The transport delivers typed messages on named channels, in send order per
//! channel, asynchronously and without acknowledgement. Sending never blocks
//! and never fails from the caller's point of view: a dropped sync is
//! superseded by the next one because every sync is a full overwrite.
//!
//! [`ServerOutbox`] and [`ClientOutbox`] are in-memory implementations that
//! keep everything sent, in order.

use colony_types::{ClientboundMessage, PlayerId, ServerboundMessage};

/// Server side of the transport: authority to one client.
pub trait ServerTransport {
    /// Send `message` to `recipient` on `channel`.
    fn send(&mut self, channel: &'static str, recipient: PlayerId, message: ClientboundMessage);

    /// Send `message` on its own channel.
    fn deliver(&mut self, recipient: PlayerId, message: ClientboundMessage) {
        self.send(message.channel(), recipient, message);
    }
}

/// Client side of the transport: requests to the authority.
pub trait ClientTransport {
    /// Send `message` to the server on `channel`.
    fn send(&mut self, channel: &'static str, message: ServerboundMessage);

    /// Send `message` on its own channel.
    fn deliver(&mut self, message: ServerboundMessage) {
        self.send(message.channel(), message);
    }
}

/// A clientbound message captured by [`ServerOutbox`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentClientbound {
    /// Channel it was sent on.
    pub channel: &'static str,
    /// Player it was addressed to.
    pub recipient: PlayerId,
    /// The payload.
    pub message: ClientboundMessage,
}

/// In-memory [`ServerTransport`] that records every message.
#[derive(Debug, Clone, Default)]
pub struct ServerOutbox {
    sent: Vec<SentClientbound>,
}

impl ServerOutbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> &[SentClientbound] {
        &self.sent
    }

    /// Number of messages sent on `channel`.
    pub fn count_on(&self, channel: &str) -> usize {
        self.sent.iter().filter(|m| m.channel == channel).count()
    }

    /// Remove and return everything sent so far.
    pub fn drain(&mut self) -> Vec<SentClientbound> {
        std::mem::take(&mut self.sent)
    }
}

impl ServerTransport for ServerOutbox {
    fn send(&mut self, channel: &'static str, recipient: PlayerId, message: ClientboundMessage) {
        self.sent.push(SentClientbound {
            channel,
            recipient,
            message,
        });
    }
}

/// In-memory [`ClientTransport`] that records every request.
#[derive(Debug, Clone, Default)]
pub struct ClientOutbox {
    sent: Vec<(&'static str, ServerboundMessage)>,
}

impl ClientOutbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order, with its channel.
    pub fn sent(&self) -> &[(&'static str, ServerboundMessage)] {
        &self.sent
    }

    /// Remove and return everything sent so far.
    pub fn drain(&mut self) -> Vec<ServerboundMessage> {
        std::mem::take(&mut self.sent)
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }
}

impl ClientTransport for ClientOutbox {
    fn send(&mut self, channel: &'static str, message: ServerboundMessage) {
        self.sent.push((channel, message));
    }
}
