//! Game host: accepts remote players and runs the server half of the handshake

use crate::config::NetworkSettings;
use crate::core::PlayerId;
use crate::game::{GameLogger, PlayerController};
use crate::net::connection::Connection;
use crate::net::protocol::{ClientMessage, ServerMessage};
use crate::net::remote_controller::RemoteController;
use crate::{ParadeError, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::runtime::Handle;

/// Listens for remote players and seats them
pub struct GameServer {
    runtime: Handle,
    listener: TcpListener,
    settings: NetworkSettings,
    /// Names already seated, local players included
    taken_names: Vec<String>,
}

impl GameServer {
    pub fn bind(runtime: Handle, settings: NetworkSettings) -> Result<Self> {
        let addr = settings.addr();
        let listener = runtime
            .block_on(TcpListener::bind(&addr))
            .map_err(|err| ParadeError::NetworkFailure(format!("could not bind {}: {}", addr, err)))?;

        Ok(GameServer {
            runtime,
            listener,
            settings,
            taken_names: Vec::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Mark a name as in use so remote players cannot claim it
    pub fn reserve_name(&mut self, name: impl Into<String>) {
        self.taken_names.push(name.into());
    }

    /// Accept one connection and run its handshake
    ///
    /// A rejected or failed handshake closes that connection and returns
    /// `NetworkFailure`.
    pub fn accept_one(&mut self, player_id: PlayerId) -> Result<RemoteController> {
        let (stream, _) = self.runtime.block_on(self.listener.accept())?;
        let mut connection: Connection<ClientMessage, ServerMessage> =
            Connection::new(self.runtime.clone(), stream)?;
        connection.begin_handshake();

        let name = match connection.recv(Some(self.settings.handshake_timeout))? {
            ClientMessage::ConnectRequest { name } => name,
            other => {
                let reason = format!(
                    "expected ConnectRequest from {}, got {}",
                    connection.peer(),
                    other.kind()
                );
                return Err(connection.abort(reason));
            }
        };

        if let Some(problem) = self.name_problem(&name) {
            // Best effort: the peer may already be gone
            let _ = connection.send(&ServerMessage::ConnectAck {
                accepted: false,
                message: problem.clone(),
                player: None,
            });
            let reason = format!("rejected {}: {}", connection.peer(), problem);
            return Err(connection.abort(reason));
        }

        connection.send(&ServerMessage::ConnectAck {
            accepted: true,
            message: format!("welcome, {}", name),
            player: Some(player_id),
        })?;
        connection.mark_connected();
        self.taken_names.push(name.clone());

        Ok(RemoteController::new(
            player_id,
            name,
            connection,
            self.settings.turn_timeout,
        ))
    }

    /// Keep accepting until a connection completes its handshake
    ///
    /// Failed handshakes are logged and skipped; listener errors are returned.
    pub fn accept_player(&mut self, player_id: PlayerId, logger: &GameLogger) -> Result<RemoteController> {
        loop {
            match self.accept_one(player_id) {
                Ok(controller) => {
                    logger.minimal(&format!(
                        "{} joined as player {}",
                        controller.name(),
                        player_id
                    ));
                    return Ok(controller);
                }
                Err(ParadeError::NetworkFailure(reason)) => {
                    logger.minimal(&format!("connection dropped during handshake: {}", reason));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn name_problem(&self, name: &str) -> Option<String> {
        if name.trim().is_empty() {
            Some("player name must not be empty".to_string())
        } else if self.taken_names.iter().any(|taken| taken == name) {
            Some(format!("name '{}' is already taken", name))
        } else {
            None
        }
    }
}
