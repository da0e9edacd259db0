//! ChatServer actor implementation
//!
//! The central actor owning the registry and the room allocator.
//! Uses the Actor pattern with mpsc channels: connection handlers send
//! commands, the actor serializes all state access, so no locks are
//! needed and a registration race can only have one winner.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::client::Tx;
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::registry::Registry;
use crate::room::RoomAllocator;
use crate::types::RoomId;

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// Nickname handshake attempt; the result goes back over `respond_to`
    Register {
        nickname: String,
        sender: Tx,
        respond_to: oneshot::Sender<Result<(), AppError>>,
    },
    /// Client disconnected (voluntarily or by transport failure)
    Unregister { nickname: String },
    /// `/list`
    ListRooms { nickname: String },
    /// `/create`
    CreateRoom { nickname: String },
    /// `/join <room>`
    JoinRoom { nickname: String, room: RoomId },
    /// `/exit`
    ExitRoom { nickname: String },
    /// Chat message to the sender's current room
    Chat { nickname: String, text: String },
}

/// The main ChatServer actor
///
/// Processes commands one at a time; every registry invariant holds
/// because nothing else ever touches the registry.
pub struct ChatServer {
    registry: Registry,
    rooms: RoomAllocator,
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            rooms: RoomAllocator::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are
    /// dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Register {
                nickname,
                sender,
                respond_to,
            } => {
                self.handle_register(nickname, sender, respond_to);
            }
            ServerCommand::Unregister { nickname } => {
                self.handle_unregister(&nickname);
            }
            ServerCommand::ListRooms { nickname } => {
                self.handle_list_rooms(&nickname);
            }
            ServerCommand::CreateRoom { nickname } => {
                self.handle_create_room(nickname);
            }
            ServerCommand::JoinRoom { nickname, room } => {
                self.handle_join_room(nickname, room);
            }
            ServerCommand::ExitRoom { nickname } => {
                self.handle_exit_room(nickname);
            }
            ServerCommand::Chat { nickname, text } => {
                self.handle_chat(nickname, text);
            }
        }
    }

    /// Handle a nickname handshake attempt
    fn handle_register(
        &mut self,
        nickname: String,
        sender: Tx,
        respond_to: oneshot::Sender<Result<(), AppError>>,
    ) {
        let result = self.registry.try_register(&nickname, sender);
        match &result {
            Ok(()) => {
                info!("Client '{}' registered", nickname);
                debug!("Total clients: {}", self.registry.len());
            }
            Err(e) => debug!("Registration rejected for '{}': {}", nickname, e),
        }
        // The handler may have hung up mid-handshake
        let _ = respond_to.send(result);
    }

    /// Handle client disconnection
    ///
    /// Releases the nickname and the room membership in one step; the
    /// room simply stops existing if this was its last occupant.
    fn handle_unregister(&mut self, nickname: &str) {
        let room = self.registry.room_of(nickname);

        if self.registry.unregister(nickname) {
            info!("Client '{}' unregistered", nickname);
            debug!("Total clients: {}", self.registry.len());
        }

        if let Some(room) = room.filter(|r| !r.is_lobby()) {
            if !self.registry.rooms_in_use().contains(&room) {
                debug!("Room {} deleted (empty)", room);
            }
        }
    }

    /// Handle `/list`
    fn handle_list_rooms(&mut self, nickname: &str) {
        let rooms: Vec<RoomId> = self.registry.rooms_in_use().into_iter().collect();
        self.registry.send_to(nickname, ServerMessage::RoomList(rooms));
    }

    /// Handle `/create`: allocate a fresh room id and move the client in.
    ///
    /// A client already in a room just moves; its old room disappears on
    /// its own once unoccupied.
    fn handle_create_room(&mut self, nickname: String) {
        if !self.registry.contains(&nickname) {
            return;
        }

        let room = self.rooms.next_id();
        self.registry.set_room(&nickname, room);
        info!("Client '{}' created room {}", nickname, room);

        self.registry
            .send_to(&nickname, ServerMessage::RoomCreated(room));
        self.registry.broadcast(room, ServerMessage::Joined { nickname });
    }

    /// Handle `/join <room>`
    ///
    /// Joining the lobby or a room nobody occupies is rejected and the
    /// client's membership is left unchanged.
    fn handle_join_room(&mut self, nickname: String, room: RoomId) {
        if !self.registry.contains(&nickname) {
            return;
        }

        if room.is_lobby() || !self.registry.rooms_in_use().contains(&room) {
            self.registry
                .send_to(&nickname, AppError::RoomNotFound(room).into());
            return;
        }

        self.registry.set_room(&nickname, room);
        info!("Client '{}' joined room {}", nickname, room);

        self.registry.broadcast(room, ServerMessage::Joined { nickname });
    }

    /// Handle `/exit`
    fn handle_exit_room(&mut self, nickname: String) {
        let Some(room) = self.registry.room_of(&nickname) else {
            return;
        };
        if room.is_lobby() {
            self.registry.send_to(&nickname, AppError::NotInRoom.into());
            return;
        }

        self.registry.set_room(&nickname, RoomId::LOBBY);
        self.registry.send_to(&nickname, ServerMessage::LeftRoom);
        info!("Client '{}' left room {}", nickname, room);

        if self.registry.rooms_in_use().contains(&room) {
            self.registry.broadcast(room, ServerMessage::Left { nickname });
        } else {
            debug!("Room {} deleted (empty)", room);
        }
    }

    /// Handle a chat message
    ///
    /// Delivered to every occupant of the sender's room, including the
    /// sender. Chat from the lobby is rejected, never broadcast.
    fn handle_chat(&mut self, nickname: String, text: String) {
        let Some(room) = self.registry.room_of(&nickname) else {
            return;
        };
        if room.is_lobby() {
            self.registry.send_to(&nickname, AppError::NotInRoom.into());
            return;
        }

        self.registry.broadcast(
            room,
            ServerMessage::Chat {
                from: nickname,
                text,
            },
        );
    }
}
