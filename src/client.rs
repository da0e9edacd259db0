//! Client record definition
//!
//! Represents a registered client: nickname, outbound message channel,
//! and current room assignment.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::types::RoomId;

/// Outbound half of a client's message channel.
///
/// Unbounded so that queuing a message never awaits: a stalled reader
/// backs up only its own write task, never the registry.
pub type Tx = mpsc::UnboundedSender<ServerMessage>;

/// Registered client information
///
/// One entry per admitted nickname. The connection's write task owns the
/// receiving end of `sender`; the registry only queues messages on it.
#[derive(Debug)]
pub struct Client {
    /// Unique nickname, immutable after the handshake
    pub nickname: String,
    /// Server → Client message channel
    pub sender: Tx,
    /// Current room, `RoomId::LOBBY` when not in any room
    pub room: RoomId,
}

impl Client {
    /// Create a new client record starting in the lobby
    pub fn new(nickname: String, sender: Tx) -> Self {
        Self {
            nickname,
            sender,
            room: RoomId::LOBBY,
        }
    }

    /// Queue a message for this client's write task.
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.send(msg).map_err(|_| SendError::ChannelClosed)
    }

    /// Check whether this client is currently in a room
    pub fn is_in_room(&self) -> bool {
        !self.room.is_lobby()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = Client::new("alice".to_string(), tx);

        assert_eq!(client.nickname, "alice");
        assert_eq!(client.room, RoomId::LOBBY);
        assert!(!client.is_in_room());
    }

    #[tokio::test]
    async fn test_client_send() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = Client::new("alice".to_string(), tx);

        client.send(ServerMessage::Goodbye).unwrap();
        assert_eq!(rx.recv().await, Some(ServerMessage::Goodbye));
    }

    #[tokio::test]
    async fn test_client_send_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Client::new("alice".to_string(), tx);
        drop(rx);

        assert!(client.send(ServerMessage::Goodbye).is_err());
    }
}
