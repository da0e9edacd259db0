//! Multi-Room Chat Server Library
//!
//! A line-based TCP chat server: clients pick a unique nickname, then
//! create or join numbered rooms and exchange messages with the other
//! occupants of the same room.
//!
//! # Features
//! - Nickname handshake with uniqueness enforcement
//! - Numbered rooms with strictly increasing, never-reused ids
//! - Rooms exist only while occupied (no explicit deletion step)
//! - Room-scoped broadcast with join/leave/chat notices
//! - Plain newline-terminated text protocol, telnet-friendly
//! - Disconnection handling that always frees the nickname
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor managing all state
//! - Each connection has a handler task communicating with the server
//! - No locks needed - all state access goes through message passing
//! - Each client's outbound messages flow through its own queue, so a
//!   stalled reader never delays delivery to anyone else
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use roomchat::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:12345").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, peer)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, peer, cmd_tx));
//!     }
//! }
//! ```

pub mod client;
pub mod command;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::{Client, Tx};
pub use command::{parse, Command};
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::ServerMessage;
pub use registry::Registry;
pub use room::RoomAllocator;
pub use server::{ChatServer, ServerCommand};
pub use types::RoomId;
