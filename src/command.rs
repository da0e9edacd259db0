//! Client command parsing
//!
//! Classifies a single line from a client into a command. Parsing is
//! stateless: whether a room exists or the client is in one is checked
//! later by the server actor.

use crate::types::RoomId;

/// A classified client line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/list` - list active room ids
    ListRooms,
    /// `/create` - create a new room and join it
    CreateRoom,
    /// `/join <n>` - join room n
    JoinRoom(RoomId),
    /// `/exit` - leave the current room
    ExitRoom,
    /// `/bye` - disconnect
    Disconnect,
    /// Any non-command line: a chat message to the current room
    Chat(String),
    /// A recognized command whose argument did not parse
    Malformed { usage: &'static str },
    /// An unrecognized `/`-prefixed line
    Unknown,
}

/// Classify one line of client input.
///
/// Fixed commands match case-insensitively. A trailing carriage return
/// (telnet-style clients) is stripped first.
pub fn parse(line: &str) -> Command {
    let line = line.trim_end_matches('\r');

    if !line.starts_with('/') {
        return Command::Chat(line.to_string());
    }

    if line.eq_ignore_ascii_case("/bye") {
        Command::Disconnect
    } else if line.eq_ignore_ascii_case("/list") {
        Command::ListRooms
    } else if line.eq_ignore_ascii_case("/create") {
        Command::CreateRoom
    } else if line.eq_ignore_ascii_case("/exit") {
        Command::ExitRoom
    } else if let Some(arg) = join_argument(line) {
        match arg.parse::<u64>() {
            Ok(n) => Command::JoinRoom(RoomId(n)),
            Err(_) => Command::Malformed {
                usage: "Usage: /join <room>",
            },
        }
    } else {
        Command::Unknown
    }
}

/// Extract the argument of a `/join` line.
///
/// Returns `None` unless `/join` is the whole first token, so lines like
/// `/joined` fall through to `Unknown`.
fn join_argument(line: &str) -> Option<&str> {
    let prefix = line.get(.."/join".len())?;
    if !prefix.eq_ignore_ascii_case("/join") {
        return None;
    }
    let rest = &line["/join".len()..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_commands() {
        assert_eq!(parse("/list"), Command::ListRooms);
        assert_eq!(parse("/create"), Command::CreateRoom);
        assert_eq!(parse("/exit"), Command::ExitRoom);
        assert_eq!(parse("/bye"), Command::Disconnect);
    }

    #[test]
    fn test_fixed_commands_case_insensitive() {
        assert_eq!(parse("/BYE"), Command::Disconnect);
        assert_eq!(parse("/List"), Command::ListRooms);
        assert_eq!(parse("/CREATE"), Command::CreateRoom);
        assert_eq!(parse("/Exit"), Command::ExitRoom);
    }

    #[test]
    fn test_join_with_room_number() {
        assert_eq!(parse("/join 3"), Command::JoinRoom(RoomId(3)));
        assert_eq!(parse("/JOIN 12"), Command::JoinRoom(RoomId(12)));
        assert_eq!(parse("/join   7"), Command::JoinRoom(RoomId(7)));
    }

    #[test]
    fn test_join_zero_parses_but_is_not_special() {
        // Validity of the target room is the server's concern
        assert_eq!(parse("/join 0"), Command::JoinRoom(RoomId(0)));
    }

    #[test]
    fn test_join_malformed_argument() {
        assert!(matches!(parse("/join"), Command::Malformed { .. }));
        assert!(matches!(parse("/join abc"), Command::Malformed { .. }));
        assert!(matches!(parse("/join -1"), Command::Malformed { .. }));
        assert!(matches!(parse("/join 1 2"), Command::Malformed { .. }));
    }

    #[test]
    fn test_join_prefix_must_be_whole_token() {
        assert_eq!(parse("/joined"), Command::Unknown);
    }

    #[test]
    fn test_unknown_slash_command() {
        assert_eq!(parse("/help"), Command::Unknown);
        assert_eq!(parse("/"), Command::Unknown);
    }

    #[test]
    fn test_chat_lines() {
        assert_eq!(parse("hello there"), Command::Chat("hello there".to_string()));
        assert_eq!(parse(""), Command::Chat(String::new()));
        // Only a leading slash makes a command
        assert_eq!(parse("see /list"), Command::Chat("see /list".to_string()));
    }

    #[test]
    fn test_trailing_carriage_return_stripped() {
        assert_eq!(parse("/bye\r"), Command::Disconnect);
        assert_eq!(parse("hi\r"), Command::Chat("hi".to_string()));
    }
}
