//! Fixed script controller for deterministic testing
//!
//! Follows a predetermined sequence of hand indices. Once the script is
//! exhausted it always picks index 0; indices past the end of the hand are
//! clamped to the last card.

use crate::core::PlayerId;
use crate::game::controller::{PlayerController, TurnView};
use crate::{ParadeError, Result};

/// A controller that follows a fixed script of choices
#[derive(Debug, Clone)]
pub struct FixedScriptController {
    player_id: PlayerId,
    name: String,
    /// The predetermined sequence of choice indices (0-based)
    script: Vec<usize>,
    /// Current position in the script
    current_index: usize,
}

impl FixedScriptController {
    /// Create a new scripted controller
    ///
    /// # Example
    /// ```
    /// use parade_engine::game::FixedScriptController;
    /// use parade_engine::core::PlayerId;
    ///
    /// let controller = FixedScriptController::new(PlayerId::new(0), "Script", vec![0, 2, 1]);
    /// assert_eq!(controller.remaining(), 3);
    /// ```
    pub fn new(player_id: PlayerId, name: impl Into<String>, script: Vec<usize>) -> Self {
        FixedScriptController {
            player_id,
            name: name.into(),
            script,
            current_index: 0,
        }
    }

    /// Script entries not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.current_index)
    }

    fn next_choice(&mut self) -> usize {
        if self.current_index < self.script.len() {
            let choice = self.script[self.current_index];
            self.current_index += 1;
            choice
        } else {
            0
        }
    }
}

impl PlayerController for FixedScriptController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_card(&mut self, view: &TurnView) -> Result<usize> {
        let hand = view.hand();
        if hand.is_empty() {
            return Err(ParadeError::InvalidAction(
                "asked to choose from an empty hand".to_string(),
            ));
        }

        let scripted = self.next_choice();
        let index = scripted.min(hand.len() - 1);
        if index != scripted {
            view.logger().controller_choice(
                "SCRIPT",
                &format!(
                    "{} chose {} (clamped from {}) out of choices 0-{}",
                    self.name,
                    index,
                    scripted,
                    hand.len() - 1
                ),
            );
        } else {
            view.logger().controller_choice(
                "SCRIPT",
                &format!("{} chose {}", self.name, hand[index]),
            );
        }
        Ok(index)
    }
}
