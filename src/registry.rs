//! Client registry
//!
//! The server's single shared-state table: nickname → connected client.
//! All access goes through the `ChatServer` actor, which serializes reads
//! and writes, so the table itself needs no locking. Room occupancy is
//! derived from the room assignments on demand; an empty room simply
//! stops showing up in queries.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::client::{Client, Tx};
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::types::RoomId;

#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<String, Client>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    /// Attempt to register a nickname.
    ///
    /// Rejects empty or whitespace-only nicknames and duplicates. On
    /// success the client is inserted with `room = LOBBY`. The actor
    /// processes one registration at a time, so of any set of racing
    /// attempts with the same nickname exactly one wins.
    pub fn try_register(&mut self, nickname: &str, sender: Tx) -> Result<(), AppError> {
        if nickname.trim().is_empty() {
            return Err(AppError::NicknameBlank);
        }
        if self.clients.contains_key(nickname) {
            return Err(AppError::NicknameTaken(nickname.to_string()));
        }
        self.clients
            .insert(nickname.to_string(), Client::new(nickname.to_string(), sender));
        Ok(())
    }

    /// Remove a client entirely, releasing the nickname and its room
    /// membership in one step. Returns false if the nickname was already
    /// gone (a second call is a no-op).
    pub fn unregister(&mut self, nickname: &str) -> bool {
        self.clients.remove(nickname).is_some()
    }

    /// Update a client's room assignment.
    ///
    /// Does nothing if the nickname is already gone - the handler may be
    /// racing its own disconnect.
    pub fn set_room(&mut self, nickname: &str, room: RoomId) {
        if let Some(client) = self.clients.get_mut(nickname) {
            client.room = room;
        }
    }

    /// Current room of a client, if it is still registered
    pub fn room_of(&self, nickname: &str) -> Option<RoomId> {
        self.clients.get(nickname).map(|c| c.room)
    }

    pub fn contains(&self, nickname: &str) -> bool {
        self.clients.contains_key(nickname)
    }

    /// Snapshot of all currently occupied room ids
    pub fn rooms_in_use(&self) -> BTreeSet<RoomId> {
        self.clients
            .values()
            .filter(|c| c.is_in_room())
            .map(|c| c.room)
            .collect()
    }

    /// Snapshot of the nicknames currently assigned to a room
    pub fn occupants_of(&self, room: RoomId) -> Vec<String> {
        self.clients
            .values()
            .filter(|c| c.room == room)
            .map(|c| c.nickname.clone())
            .collect()
    }

    /// Queue a message for one client.
    ///
    /// A failed send means the client's write task is gone; the record is
    /// dropped so the nickname frees up and no further sends are tried.
    pub fn send_to(&mut self, nickname: &str, msg: ServerMessage) {
        let Some(client) = self.clients.get(nickname) else {
            return;
        };
        if client.send(msg).is_err() {
            warn!("Dropping unreachable client '{}'", nickname);
            self.clients.remove(nickname);
        }
    }

    /// Deliver a message to every occupant of a room.
    ///
    /// Works from a snapshot of the occupant set; clients whose sink is
    /// dead are evicted and delivery to the rest continues.
    pub fn broadcast(&mut self, room: RoomId, msg: ServerMessage) {
        for nickname in self.occupants_of(room) {
            self.send_to(&nickname, msg.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
