//! Player representation

use crate::core::{Card, Colour, PlayerId};
use serde::{Deserialize, Serialize};

/// Represents a player in the game
///
/// Only the engine mutates a player. The hand is private to the player's
/// controller; the board (captured cards) is public.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique ID for this player (seat index)
    pub id: PlayerId,

    /// Player name
    pub name: String,

    /// Cards currently held
    pub hand: Vec<Card>,

    /// Cards captured from the parade, in capture order
    pub board: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            hand: Vec::new(),
            board: Vec::new(),
        }
    }

    /// Remove and return the hand card at `index`
    pub fn take_from_hand(&mut self, index: usize) -> Option<Card> {
        if index < self.hand.len() {
            Some(self.hand.remove(index))
        } else {
            None
        }
    }

    pub fn add_to_board(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.board.extend(cards);
    }

    /// Number of board cards of the given colour
    pub fn board_count(&self, colour: Colour) -> usize {
        self.board.iter().filter(|c| c.colour == colour).count()
    }

    /// True once the board holds at least one card of every colour
    pub fn has_all_colours(&self) -> bool {
        Colour::ALL.iter().all(|&colour| self.board_count(colour) > 0)
    }
}
