//! Player controller trait and the per-decision view
//!
//! This module defines the interface between the game engine and player
//! controllers (AI, a human at the console, or a remote peer). The engine
//! calls the controller when a decision is needed and never branches on
//! which kind of controller it is talking to.

use crate::core::{Card, Captured, Parade, PlayerId};
use crate::game::result::{GameResult, Standing};
use crate::game::{GameEndReason, GameLogger};
use crate::Result;
use serde::{Deserialize, Serialize};

/// What the engine is asking the player to do with a hand card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Place a card at the end of the parade
    PlaceInParade,
    /// End of game: move a hand card onto the board (`remaining` picks left, including this one)
    AddToBoard { remaining: u8 },
}

/// Seat information announced at game start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatInfo {
    pub id: PlayerId,
    pub name: String,
}

/// Informational events pushed to controllers; none of them needs a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Seating order and names, sent once before the first turn
    GameStarted { players: Vec<SeatInfo>, you: PlayerId },
    /// A card was dealt to the receiving player
    CardDealt { card: Card },
    /// A player placed a card and captured `captured`
    CardPlaced {
        player: PlayerId,
        card: Card,
        captured: Vec<Card>,
        parade: Vec<Card>,
    },
    /// The end of the game was triggered; everyone takes one last turn
    FinalRound { reason: GameEndReason },
    /// A player moved hand cards onto the board at the end of the game
    BoardFinalized { player: PlayerId, added: Vec<Card> },
    /// Final outcome
    GameOver {
        result: GameResult<PlayerId>,
        standings: Vec<Standing<PlayerId>>,
    },
}

/// Read-only view handed to a controller for one decision
///
/// Indices returned by `choose_card` refer to `hand()`.
pub struct TurnView<'a> {
    player_id: PlayerId,
    decision: Decision,
    hand: &'a [Card],
    board: &'a [Card],
    parade: &'a [Card],
    drawn: Option<Card>,
    logger: &'a GameLogger,
}

impl<'a> TurnView<'a> {
    pub fn new(
        player_id: PlayerId,
        decision: Decision,
        hand: &'a [Card],
        board: &'a [Card],
        parade: &'a [Card],
        drawn: Option<Card>,
        logger: &'a GameLogger,
    ) -> Self {
        TurnView {
            player_id,
            decision,
            hand,
            board,
            parade,
            drawn,
            logger,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn hand(&self) -> &'a [Card] {
        self.hand
    }

    pub fn board(&self) -> &'a [Card] {
        self.board
    }

    pub fn parade(&self) -> &'a [Card] {
        self.parade
    }

    /// Card drawn at the start of this turn, if any
    pub fn drawn(&self) -> Option<Card> {
        self.drawn
    }

    pub fn logger(&self) -> &'a GameLogger {
        self.logger
    }

    /// Cards that placing `hand()[index]` would capture
    pub fn preview_capture(&self, index: usize) -> Captured {
        match self.hand.get(index) {
            Some(&card) => Parade::seeded(self.parade.to_vec()).place(card),
            None => Captured::new(),
        }
    }
}

/// Player controller trait
///
/// A local controller answers `choose_card` synchronously; a remote one
/// forwards the view over its connection and blocks until the peer replies
/// or the connection fails. Both look the same to the engine.
pub trait PlayerController {
    /// The player this controller acts for
    fn player_id(&self) -> PlayerId;

    /// Display name of the player
    fn name(&self) -> &str;

    /// Choose a card from `view.hand()`, returning its index
    fn choose_card(&mut self, view: &TurnView) -> Result<usize>;

    /// Observe a game event (no reply expected)
    fn notify(&mut self, _event: &GameEvent) -> Result<()> {
        Ok(())
    }

    /// Release any resources held by the controller; calling twice is a no-op
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Colour;
    use crate::game::VerbosityLevel;

    #[test]
    fn test_turn_view_accessors() {
        let logger = GameLogger::capturing(VerbosityLevel::Silent);
        let hand = [Card::new(4, Colour::Red), Card::new(9, Colour::Blue)];
        let parade = [
            Card::new(3, Colour::Red),
            Card::new(5, Colour::Blue),
            Card::new(1, Colour::Green),
            Card::new(2, Colour::Red),
            Card::new(4, Colour::Blue),
            Card::new(6, Colour::Green),
        ];
        let view = TurnView::new(
            PlayerId::new(1),
            Decision::PlaceInParade,
            &hand,
            &[],
            &parade,
            Some(hand[1]),
            &logger,
        );

        assert_eq!(view.player_id(), PlayerId::new(1));
        assert_eq!(view.decision(), Decision::PlaceInParade);
        assert_eq!(view.drawn(), Some(Card::new(9, Colour::Blue)));
        assert_eq!(view.preview_capture(0).as_slice(), &[Card::new(3, Colour::Red)]);
        assert!(view.preview_capture(1).is_empty());
        assert!(view.preview_capture(7).is_empty());
    }
}
