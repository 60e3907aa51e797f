//! Wire envelopes and frame codec
//!
//! Every envelope travels as one frame: a big-endian `u32` payload length
//! followed by the JSON encoding of the envelope.

use crate::core::{Card, PlayerId};
use crate::game::controller::{Decision, GameEvent, TurnView};
use crate::game::GameLogger;
use crate::{ParadeError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest accepted frame payload
pub const MAX_FRAME_LEN: usize = 1 << 20;

/// How long either side waits for the other half of the handshake
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Envelopes sent by a remote player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// First envelope on every connection
    ConnectRequest { name: String },
    /// Reply to `YourTurn`: index into the prompt's hand
    PlayCard { index: usize },
    /// The player is leaving; the server treats it as a network failure
    Leave,
}

/// Envelopes sent by the game host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Reply to `ConnectRequest`; `player` is the assigned seat when accepted
    ConnectAck {
        accepted: bool,
        message: String,
        #[serde(default)]
        player: Option<PlayerId>,
    },
    /// A decision is needed; answer with `PlayCard`
    YourTurn(TurnPrompt),
    /// The last `PlayCard` was not acceptable; a fresh `YourTurn` follows
    InvalidChoice { reason: String },
    /// Informational, no reply
    Event(GameEvent),
}

impl ClientMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::ConnectRequest { .. } => "ConnectRequest",
            ClientMessage::PlayCard { .. } => "PlayCard",
            ClientMessage::Leave => "Leave",
        }
    }
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::ConnectAck { .. } => "ConnectAck",
            ServerMessage::YourTurn(_) => "YourTurn",
            ServerMessage::InvalidChoice { .. } => "InvalidChoice",
            ServerMessage::Event(_) => "Event",
        }
    }
}

/// Owned copy of a `TurnView`, as carried by `YourTurn`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPrompt {
    pub player: PlayerId,
    pub decision: Decision,
    pub hand: Vec<Card>,
    pub board: Vec<Card>,
    pub parade: Vec<Card>,
    pub drawn: Option<Card>,
}

impl TurnPrompt {
    pub fn from_view(view: &TurnView) -> Self {
        TurnPrompt {
            player: view.player_id(),
            decision: view.decision(),
            hand: view.hand().to_vec(),
            board: view.board().to_vec(),
            parade: view.parade().to_vec(),
            drawn: view.drawn(),
        }
    }

    /// Borrow the prompt as a view for a local controller
    pub fn view<'a>(&'a self, logger: &'a GameLogger) -> TurnView<'a> {
        TurnView::new(
            self.player,
            self.decision,
            &self.hand,
            &self.board,
            &self.parade,
            self.drawn,
            logger,
        )
    }
}

/// Write one envelope as a frame and flush it
pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(message)?;
    if payload.len() > MAX_FRAME_LEN {
        return Err(ParadeError::NetworkFailure(format!(
            "outgoing frame of {} bytes exceeds limit of {}",
            payload.len(),
            MAX_FRAME_LEN
        )));
    }
    writer.write_u32(payload.len() as u32).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one envelope; `Ok(None)` when the peer closed cleanly between frames
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if len > MAX_FRAME_LEN {
        return Err(ParadeError::NetworkFailure(format!(
            "incoming frame of {} bytes exceeds limit of {}",
            len, MAX_FRAME_LEN
        )));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(serde_json::from_slice(&payload)?))
}
