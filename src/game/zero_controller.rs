//! Zero controller for testing and automation
//!
//! Always plays the first card in hand. Useful for running games without
//! interaction and for reproducing a game from the deck order alone.

use crate::core::PlayerId;
use crate::game::controller::{PlayerController, TurnView};
use crate::{ParadeError, Result};

/// A controller that always chooses index 0
pub struct ZeroController {
    player_id: PlayerId,
    name: String,
}

impl ZeroController {
    pub fn new(player_id: PlayerId, name: impl Into<String>) -> Self {
        ZeroController {
            player_id,
            name: name.into(),
        }
    }
}

impl PlayerController for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_card(&mut self, view: &TurnView) -> Result<usize> {
        match view.hand().first() {
            Some(card) => {
                view.logger()
                    .controller_choice("ZERO", &format!("{} chose {}", self.name, card));
                Ok(0)
            }
            None => Err(ParadeError::InvalidAction(
                "asked to choose from an empty hand".to_string(),
            )),
        }
    }
}
