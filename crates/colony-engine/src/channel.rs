//! In-process transport over tokio unbounded channels.
//!
//! Messages are JSON-encoded on send and decoded on receive, so both ends
//! only share the wire format. A send to a closed channel is logged and
//! dropped: syncs are full overwrites and the next one supersedes it.

use colony_core::{ClientTransport, ServerTransport};
use colony_types::{ClientboundMessage, PlayerId, ServerboundMessage};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

/// One encoded message in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireFrame {
    /// Channel the message was sent on.
    pub channel: &'static str,
    /// Addressee, for clientbound frames.
    pub recipient: Option<PlayerId>,
    /// JSON body.
    pub payload: String,
}

/// Server end: sends clientbound frames.
#[derive(Debug, Clone)]
pub struct ChannelServerTransport {
    tx: UnboundedSender<WireFrame>,
}

/// Client end: sends serverbound frames.
#[derive(Debug, Clone)]
pub struct ChannelClientTransport {
    tx: UnboundedSender<WireFrame>,
}

/// Receiving end of one direction.
#[derive(Debug)]
pub struct FrameReceiver {
    rx: UnboundedReceiver<WireFrame>,
}

/// Create the clientbound direction.
pub fn clientbound() -> (ChannelServerTransport, FrameReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelServerTransport { tx }, FrameReceiver { rx })
}

/// Create the serverbound direction.
pub fn serverbound() -> (ChannelClientTransport, FrameReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelClientTransport { tx }, FrameReceiver { rx })
}

fn push(tx: &UnboundedSender<WireFrame>, frame: WireFrame) {
    let channel = frame.channel;
    if tx.send(frame).is_err() {
        warn!(channel, "transport closed, message dropped");
    }
}

impl ServerTransport for ChannelServerTransport {
    fn send(&mut self, channel: &'static str, recipient: PlayerId, message: ClientboundMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => push(
                &self.tx,
                WireFrame {
                    channel,
                    recipient: Some(recipient),
                    payload,
                },
            ),
            Err(e) => warn!(channel, error = %e, "clientbound message not encodable, dropped"),
        }
    }
}

impl ClientTransport for ChannelClientTransport {
    fn send(&mut self, channel: &'static str, message: ServerboundMessage) {
        match serde_json::to_string(&message) {
            Ok(payload) => push(
                &self.tx,
                WireFrame {
                    channel,
                    recipient: None,
                    payload,
                },
            ),
            Err(e) => warn!(channel, error = %e, "serverbound message not encodable, dropped"),
        }
    }
}

impl FrameReceiver {
    /// Decode every frame currently queued, in send order. Undecodable
    /// frames are logged and skipped.
    pub fn drain<T>(&mut self) -> Vec<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut out = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            match serde_json::from_str(&frame.payload) {
                Ok(message) => out.push(message),
                Err(e) => warn!(channel = frame.channel, error = %e, "undecodable frame skipped"),
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{CHANNEL_SET_GAME_MODE, ColonySync, GameMode, Position};

    use super::*;

    #[test]
    fn clientbound_frames_arrive_in_order() {
        let (mut server, mut rx) = clientbound();
        let player = PlayerId::new();
        for population in 1..=3 {
            server.deliver(
                player,
                ClientboundMessage::SyncColony(ColonySync {
                    population,
                    center: Some(Position::new(1, 2, 3)),
                    mode: GameMode::Creative,
                    connected: true,
                    max_population: 10,
                    reserved_population: 0,
                }),
            );
        }
        let received: Vec<ClientboundMessage> = rx.drain();
        let populations: Vec<i32> = received
            .iter()
            .map(|m| match m {
                ClientboundMessage::SyncColony(sync) => sync.population,
                ClientboundMessage::SyncAreas { .. } => -1,
            })
            .collect();
        assert_eq!(populations, vec![1, 2, 3]);
    }

    #[test]
    fn serverbound_frames_keep_their_channel() {
        let (mut client, mut rx) = serverbound();
        client.deliver(ServerboundMessage::SetGameMode {
            mode: GameMode::Survival,
        });
        let frame = rx.rx.try_recv().unwrap();
        assert_eq!(frame.channel, CHANNEL_SET_GAME_MODE);
        assert!(frame.recipient.is_none());
    }

    #[test]
    fn send_after_receiver_dropped_is_harmless() {
        let (mut client, rx) = serverbound();
        drop(rx);
        client.deliver(ServerboundMessage::HirePawn {
            profession: String::from("miner1"),
        });
    }
}
