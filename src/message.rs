//! Server-to-client message definitions
//!
//! The wire format is plain text: every message renders to a
//! newline-terminated line (the help text spans several). `Display`
//! does the rendering; the connection's write task pushes the result
//! through the line codec.

use crate::error::AppError;
use crate::types::RoomId;

/// Server → Client message
///
/// All lines the server can send. Broadcast notices come in three kinds:
/// join, leave, and chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Command overview, sent once after a successful handshake
    Help,
    /// Disconnect confirmation in response to `/bye`
    Goodbye,
    /// Room created successfully; the creator is now its first occupant
    RoomCreated(RoomId),
    /// Snapshot of active room ids (may be empty)
    RoomList(Vec<RoomId>),
    /// Confirmation that the client left its room
    LeftRoom,
    /// Someone entered the room
    Joined { nickname: String },
    /// Someone left the room
    Left { nickname: String },
    /// Chat message relayed to the room
    Chat { from: String, text: String },
    /// Error notice
    Error(String),
}

impl std::fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerMessage::Help => write!(
                f,
                "Available commands:\n\
                   /list          list active rooms\n\
                   /create        create a room and join it\n\
                   /join <room>   join an existing room\n\
                   /exit          leave the current room\n\
                   /bye           disconnect"
            ),
            ServerMessage::Goodbye => write!(f, "Goodbye."),
            ServerMessage::RoomCreated(room) => write!(f, "Created room {}.", room),
            ServerMessage::RoomList(rooms) => {
                if rooms.is_empty() {
                    write!(f, "No rooms yet. Type /create to make one.")
                } else {
                    write!(f, "Rooms:")?;
                    for room in rooms {
                        write!(f, " {}", room)?;
                    }
                    Ok(())
                }
            }
            ServerMessage::LeftRoom => write!(f, "You left the room."),
            ServerMessage::Joined { nickname } => write!(f, "{} joined the room.", nickname),
            ServerMessage::Left { nickname } => write!(f, "{} left the room.", nickname),
            ServerMessage::Chat { from, text } => write!(f, "{}: {}", from, text),
            ServerMessage::Error(reason) => write!(f, "{}", reason),
        }
    }
}

/// Convert AppError to ServerMessage for client notification
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        match &err {
            AppError::NicknameTaken(_)
            | AppError::NicknameBlank
            | AppError::RoomNotFound(_)
            | AppError::NotInRoom => ServerMessage::Error(err.to_string()),
            // Fatal errors are not sent to clients (connection closes)
            _ => ServerMessage::Error("Internal error".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_line_format() {
        let msg = ServerMessage::Chat {
            from: "alice".to_string(),
            text: "hello".to_string(),
        };
        assert_eq!(msg.to_string(), "alice: hello");
    }

    #[test]
    fn test_notice_kinds_are_distinct() {
        let joined = ServerMessage::Joined {
            nickname: "bob".to_string(),
        };
        let left = ServerMessage::Left {
            nickname: "bob".to_string(),
        };
        assert_eq!(joined.to_string(), "bob joined the room.");
        assert_eq!(left.to_string(), "bob left the room.");
        assert_ne!(joined.to_string(), left.to_string());
    }

    #[test]
    fn test_room_list_rendering() {
        let empty = ServerMessage::RoomList(Vec::new());
        assert_eq!(empty.to_string(), "No rooms yet. Type /create to make one.");

        let some = ServerMessage::RoomList(vec![RoomId(1), RoomId(3)]);
        assert_eq!(some.to_string(), "Rooms: 1 3");
    }

    #[test]
    fn test_error_from_app_error() {
        let msg: ServerMessage = AppError::RoomNotFound(RoomId(7)).into();
        assert_eq!(
            msg,
            ServerMessage::Error("Room 7 does not exist. Use /list to see active rooms.".to_string())
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = ServerMessage::Help.to_string();
        for cmd in ["/list", "/create", "/join", "/exit", "/bye"] {
            assert!(help.contains(cmd), "help text missing {}", cmd);
        }
    }
}
