//! Server-side controller for a player on the other end of a connection

use crate::core::PlayerId;
use crate::game::controller::{GameEvent, PlayerController, TurnView};
use crate::net::connection::{Connection, ConnectionState};
use crate::net::protocol::{ClientMessage, ServerMessage, TurnPrompt};
use crate::Result;
use std::time::Duration;

/// Forwards decisions to a remote player and waits for the reply
///
/// Produced by `GameServer` once the handshake has succeeded.
pub struct RemoteController {
    player_id: PlayerId,
    name: String,
    connection: Connection<ClientMessage, ServerMessage>,
    turn_timeout: Option<Duration>,
}

impl RemoteController {
    pub(crate) fn new(
        player_id: PlayerId,
        name: String,
        connection: Connection<ClientMessage, ServerMessage>,
        turn_timeout: Option<Duration>,
    ) -> Self {
        RemoteController {
            player_id,
            name,
            connection,
            turn_timeout,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_closed()
    }
}

impl PlayerController for RemoteController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_card(&mut self, view: &TurnView) -> Result<usize> {
        let prompt = TurnPrompt::from_view(view);
        let hand_len = prompt.hand.len();
        self.connection.send(&ServerMessage::YourTurn(prompt.clone()))?;

        loop {
            match self.connection.recv(self.turn_timeout)? {
                ClientMessage::PlayCard { index } if index < hand_len => {
                    view.logger().controller_choice(
                        "REMOTE",
                        &format!("{} chose {}", self.name, prompt.hand[index]),
                    );
                    return Ok(index);
                }
                ClientMessage::PlayCard { index } => {
                    view.logger().verbose(&format!(
                        "{} sent out-of-range index {} (hand has {})",
                        self.name, index, hand_len
                    ));
                    self.connection.send(&ServerMessage::InvalidChoice {
                        reason: format!("index {} is not in 0..{}", index, hand_len),
                    })?;
                    self.connection.send(&ServerMessage::YourTurn(prompt.clone()))?;
                }
                ClientMessage::Leave => {
                    return Err(self.connection.abort(format!("{} left the game", self.name)));
                }
                other => {
                    let reason = format!("unexpected {} from {} mid-game", other.kind(), self.name);
                    return Err(self.connection.abort(reason));
                }
            }
        }
    }

    fn notify(&mut self, event: &GameEvent) -> Result<()> {
        self.connection.send(&ServerMessage::Event(event.clone()))
    }

    fn close(&mut self) -> Result<()> {
        self.connection.close()
    }
}
