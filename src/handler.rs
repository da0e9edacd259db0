//! Connection handler
//!
//! Drives one client connection: the nickname handshake, then the
//! line/command loop. Lines from the client are classified and forwarded
//! to the ChatServer actor; messages from the actor are drained by a
//! write task, so a slow reader never blocks anyone else.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info};

use crate::client::Tx;
use crate::command::{self, Command};
use crate::error::AppError;
use crate::message::ServerMessage;
use crate::server::ServerCommand;

/// Handle a new client connection
///
/// Generic over the stream so tests can drive it with an in-memory
/// duplex pipe. Whatever ends the connection - `/bye`, end-of-stream, or
/// a transport error - the registry entry is released before returning.
pub async fn handle_connection<S>(
    stream: S,
    peer: SocketAddr,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    debug!("New connection from {}", peer);

    let (read_half, write_half) = tokio::io::split(stream);
    let mut lines_in = FramedRead::new(read_half, LinesCodec::new());
    let mut lines_out = FramedWrite::new(write_half, LinesCodec::new());

    // Channel for server -> client messages. The registry gets a clone of
    // the sender on successful registration; the write task below owns
    // the receiving end and is the only place that touches the socket.
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let write_task = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            if lines_out.send(msg.to_string()).await.is_err() {
                debug!("Line send failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for client");
    });

    // Nickname handshake: loop until the registry admits one
    let nickname = match handshake(&mut lines_in, &msg_tx, &cmd_tx).await {
        Ok(Some(nickname)) => nickname,
        Ok(None) => {
            debug!("Connection {} closed during handshake", peer);
            drop(msg_tx);
            let _ = write_task.await;
            return Ok(());
        }
        Err(e) => {
            drop(msg_tx);
            let _ = write_task.await;
            return Err(e);
        }
    };

    info!("Client '{}' connected from {}", nickname, peer);
    let _ = msg_tx.send(ServerMessage::Help);

    let result = command_loop(&mut lines_in, &nickname, &msg_tx, &cmd_tx).await;

    // Unconditional cleanup: release the nickname and room membership.
    // The registry drops its sender clone here, which lets the write
    // task drain the queue and finish.
    let _ = cmd_tx
        .send(ServerCommand::Unregister {
            nickname: nickname.clone(),
        })
        .await;
    drop(msg_tx);
    let _ = write_task.await;

    info!("Client '{}' disconnected", nickname);
    result
}

/// Read nickname proposals until the registry accepts one.
///
/// Returns `Ok(None)` if the stream ends before a nickname is admitted.
async fn handshake<R>(
    lines_in: &mut FramedRead<R, LinesCodec>,
    msg_tx: &Tx,
    cmd_tx: &mpsc::Sender<ServerCommand>,
) -> Result<Option<String>, AppError>
where
    R: AsyncRead + Unpin,
{
    while let Some(line) = lines_in.next().await {
        let nickname = line?.trim_end_matches('\r').to_string();

        let (done_tx, done_rx) = oneshot::channel();
        cmd_tx
            .send(ServerCommand::Register {
                nickname: nickname.clone(),
                sender: msg_tx.clone(),
                respond_to: done_tx,
            })
            .await
            .map_err(|_| AppError::ChannelSend)?;

        match done_rx.await.map_err(|_| AppError::ChannelSend)? {
            Ok(()) => return Ok(Some(nickname)),
            Err(err) => {
                let _ = msg_tx.send(err.into());
            }
        }
    }
    Ok(None)
}

/// Classify and dispatch client lines until disconnect or end-of-stream
async fn command_loop<R>(
    lines_in: &mut FramedRead<R, LinesCodec>,
    nickname: &str,
    msg_tx: &Tx,
    cmd_tx: &mpsc::Sender<ServerCommand>,
) -> Result<(), AppError>
where
    R: AsyncRead + Unpin,
{
    while let Some(line) = lines_in.next().await {
        let line = line?;
        match command::parse(&line) {
            Command::Disconnect => {
                let _ = msg_tx.send(ServerMessage::Goodbye);
                break;
            }
            Command::ListRooms => {
                dispatch(cmd_tx, ServerCommand::ListRooms {
                    nickname: nickname.to_string(),
                })
                .await?;
            }
            Command::CreateRoom => {
                dispatch(cmd_tx, ServerCommand::CreateRoom {
                    nickname: nickname.to_string(),
                })
                .await?;
            }
            Command::JoinRoom(room) => {
                dispatch(cmd_tx, ServerCommand::JoinRoom {
                    nickname: nickname.to_string(),
                    room,
                })
                .await?;
            }
            Command::ExitRoom => {
                dispatch(cmd_tx, ServerCommand::ExitRoom {
                    nickname: nickname.to_string(),
                })
                .await?;
            }
            Command::Chat(text) => {
                dispatch(cmd_tx, ServerCommand::Chat {
                    nickname: nickname.to_string(),
                    text,
                })
                .await?;
            }
            Command::Malformed { usage } => {
                let _ = msg_tx.send(ServerMessage::Error(usage.to_string()));
            }
            Command::Unknown => {
                debug!("Ignoring unknown command from '{}': {}", nickname, line);
            }
        }
    }
    Ok(())
}

/// Forward a command to the server actor
async fn dispatch(
    cmd_tx: &mpsc::Sender<ServerCommand>,
    cmd: ServerCommand,
) -> Result<(), AppError> {
    cmd_tx.send(cmd).await.map_err(|_| AppError::ChannelSend)
}
