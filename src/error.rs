//! Error types for the chat server
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::types::RoomId;

/// Application-level errors
///
/// Covers both fatal errors (connection termination) and
/// business errors (send error message to client).
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the client's own stream (fatal to that handler)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line framing error (fatal to that handler)
    #[error("Line codec error: {0}")]
    LineCodec(#[from] tokio_util::codec::LinesCodecError),

    /// Channel to the server actor closed (fatal - server gone)
    #[error("Channel send error")]
    ChannelSend,

    /// Nickname already registered by another client
    #[error("Nickname '{0}' is already taken. Enter another one.")]
    NicknameTaken(String),

    /// Nickname empty or whitespace-only
    #[error("Nickname cannot be empty or blank. Enter another one.")]
    NicknameBlank,

    /// `/join` to a room id that is not currently occupied
    #[error("Room {0} does not exist. Use /list to see active rooms.")]
    RoomNotFound(RoomId),

    /// Room-scoped command issued from the lobby
    #[error("You are not in a room. Use /create or /join <room> first.")]
    NotInRoom,
}

/// Message send errors
///
/// Occurs when attempting to send messages through closed channels.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}
