//! Client side of a networked game
//!
//! A `ClientSession` owns the connection to the host and drives a local
//! `PlayerController` from the host's prompts.

use crate::config::NetworkSettings;
use crate::core::PlayerId;
use crate::game::controller::{GameEvent, PlayerController};
use crate::game::{GameLogger, GameResult};
use crate::net::connection::{Connection, ConnectionState};
use crate::net::protocol::{ClientMessage, ServerMessage};
use crate::{ParadeError, Result};
use std::time::Duration;
use tokio::runtime::Handle;

pub struct ClientSession {
    connection: Connection<ServerMessage, ClientMessage>,
    handshake_timeout: Duration,
    player_id: Option<PlayerId>,
}

impl ClientSession {
    /// Connect to the host; the session starts in `ConnectionState::Init`
    pub fn open(runtime: Handle, settings: &NetworkSettings) -> Result<Self> {
        let connection = Connection::open(runtime, &settings.addr(), settings.connect_timeout)?;
        Ok(ClientSession {
            connection,
            handshake_timeout: settings.handshake_timeout,
            player_id: None,
        })
    }

    /// Connect and handshake in one step
    pub fn connect(runtime: Handle, settings: &NetworkSettings, name: &str) -> Result<Self> {
        let mut session = Self::open(runtime, settings)?;
        session.handshake(name)?;
        Ok(session)
    }

    /// Ask to be seated as `name`
    ///
    /// Rejection, a timeout or any reply other than `ConnectAck` closes the
    /// session and returns `NetworkFailure`.
    pub fn handshake(&mut self, name: &str) -> Result<PlayerId> {
        if self.connection.state() != ConnectionState::Init {
            return Err(ParadeError::NetworkFailure(format!(
                "handshake not possible in state {:?}",
                self.connection.state()
            )));
        }

        self.connection.begin_handshake();
        self.connection.send(&ClientMessage::ConnectRequest {
            name: name.to_string(),
        })?;

        match self.connection.recv(Some(self.handshake_timeout))? {
            ServerMessage::ConnectAck {
                accepted: true,
                player: Some(player),
                ..
            } => {
                self.connection.mark_connected();
                self.player_id = Some(player);
                Ok(player)
            }
            ServerMessage::ConnectAck {
                accepted: true,
                player: None,
                ..
            } => Err(self.connection.abort("host accepted without assigning a seat")),
            ServerMessage::ConnectAck {
                accepted: false,
                message,
                ..
            } => Err(self.connection.abort(format!("host rejected connection: {}", message))),
            other => {
                let reason = format!("expected ConnectAck, got {}", other.kind());
                Err(self.connection.abort(reason))
            }
        }
    }

    /// Seat assigned by the host, once the handshake has succeeded
    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_closed()
    }

    /// Answer prompts with `controller` until the game ends
    ///
    /// Returns the final result and closes the session. If the controller
    /// fails, the host is told the player is leaving before the error is
    /// returned.
    pub fn play(
        &mut self,
        controller: &mut dyn PlayerController,
        logger: &GameLogger,
    ) -> Result<GameResult<PlayerId>> {
        if self.connection.state() != ConnectionState::Connected {
            return Err(ParadeError::NetworkFailure(format!(
                "cannot play in state {:?}",
                self.connection.state()
            )));
        }

        loop {
            match self.connection.recv(None)? {
                ServerMessage::YourTurn(prompt) => {
                    let index = match controller.choose_card(&prompt.view(logger)) {
                        Ok(index) => index,
                        Err(err) => return Err(self.leave(err)),
                    };
                    self.connection.send(&ClientMessage::PlayCard { index })?;
                }
                ServerMessage::InvalidChoice { reason } => {
                    logger.minimal(&format!("host rejected choice: {}", reason));
                }
                ServerMessage::Event(event) => {
                    if let Err(err) = controller.notify(&event) {
                        return Err(self.leave(err));
                    }
                    if let GameEvent::GameOver { result, .. } = event {
                        self.close()?;
                        return Ok(result);
                    }
                }
                other => {
                    let reason = format!("unexpected {} mid-game", other.kind());
                    return Err(self.connection.abort(reason));
                }
            }
        }
    }

    /// Close the session; safe to call more than once
    pub fn close(&mut self) -> Result<()> {
        self.connection.close()
    }

    /// Tell the host this player is gone, close, and hand back `err`
    fn leave(&mut self, err: ParadeError) -> ParadeError {
        // Best effort: the host may already have dropped us
        let _ = self.connection.send(&ClientMessage::Leave);
        let _ = self.close();
        err
    }
}
