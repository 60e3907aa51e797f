//! Game loop implementation
//!
//! Drives turns (draw, choose, place, capture), detects the end trigger,
//! runs the final round and end-of-game board picks, then scores the boards.

/// Macro for conditional logging that avoids allocation when feature is disabled
///
/// When verbose-logging feature is disabled, this becomes a no-op at compile time,
/// eliminating all format! allocations.
macro_rules! log_if_verbose {
    ($self:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $self.log_normal(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$self;
        }
    };
}

use crate::core::{Card, PlayerId};
use crate::game::controller::{Decision, GameEvent, PlayerController, SeatInfo, TurnView};
use crate::game::render::{card_list, describe_result};
use crate::game::result::{GameResult, Standing, WinnerEvaluator};
use crate::game::scoring::final_standings;
use crate::game::GameState;
use crate::{ParadeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cards each player moves from hand to board once the final round is over
pub const FINAL_BOARD_PICKS: u8 = 2;

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns and captures (default)
    #[default]
    Normal = 2,
    /// Verbose - all actions and state changes
    Verbose = 3,
}

/// Reason the final round was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// A player could not draw because the deck ran out
    DeckExhausted,
    /// A player's board holds every colour
    AllColoursCollected(PlayerId),
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::DeckExhausted => write!(f, "the deck is exhausted"),
            GameEndReason::AllColoursCollected(id) => {
                write!(f, "player {} collected every colour", id)
            }
        }
    }
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// Winner / tie outcome
    pub result: GameResult<PlayerId>,
    /// Final scores in seat order
    pub standings: Vec<Standing<PlayerId>>,
    /// Number of cards placed into the parade
    pub turns_played: u32,
    /// What triggered the final round
    pub end_reason: GameEndReason,
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    /// Parade placements so far
    turns_played: u32,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        GameLoop {
            game,
            turns_played: 0,
        }
    }

    /// Set verbosity level (updates the game's logger)
    pub fn with_verbosity(self, verbosity: VerbosityLevel) -> Self {
        self.game.logger.set_verbosity(verbosity);
        self
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    /// Run a game to completion
    ///
    /// `controllers[i]` must act for `game.players[i]`. Every controller is
    /// closed before this returns, whether the game finished or failed.
    pub fn run_game(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameSummary> {
        let outcome = self.play(controllers);
        if let Err(err) = &outcome {
            self.game.logger.log_error("game aborted", err);
        }
        self.close_controllers(controllers);
        outcome
    }

    fn play(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameSummary> {
        self.check_seating(controllers)?;
        if !self.game.is_dealt() {
            self.game.deal()?;
        }

        let seats: Vec<SeatInfo> = self
            .game
            .players
            .iter()
            .map(|p| SeatInfo {
                id: p.id,
                name: p.name.clone(),
            })
            .collect();
        for controller in controllers.iter_mut() {
            let you = controller.player_id();
            controller.notify(&GameEvent::GameStarted {
                players: seats.clone(),
                you,
            })?;
        }

        let player_count = self.game.players.len();
        let mut seat = 0;
        let end_reason = loop {
            let drawn = match self.game.deck.draw_one() {
                Ok(card) => card,
                Err(ParadeError::EmptyDeck) => break GameEndReason::DeckExhausted,
                Err(err) => return Err(err),
            };
            self.game.players[seat].hand.push(drawn);
            controllers[seat].notify(&GameEvent::CardDealt { card: drawn })?;

            self.run_turn(seat, Some(drawn), controllers)?;

            let player = &self.game.players[seat];
            seat = (seat + 1) % player_count;
            if player.has_all_colours() {
                break GameEndReason::AllColoursCollected(player.id);
            }
        };

        log_if_verbose!(self, "Final round: {}", end_reason);
        self.broadcast(controllers, &GameEvent::FinalRound { reason: end_reason })?;

        for offset in 0..player_count {
            let final_seat = (seat + offset) % player_count;
            if !self.game.players[final_seat].hand.is_empty() {
                self.run_turn(final_seat, None, controllers)?;
            }
        }

        for final_seat in 0..player_count {
            self.finalize_board(final_seat, controllers)?;
        }

        let standings = final_standings(&self.game.players);
        let result = WinnerEvaluator::evaluate(standings.clone())
            .ok_or(ParadeError::InvalidPlayerCount(0))?;

        let game = &*self.game;
        game.logger.minimal(&format!(
            "Game over after {} turns: {}",
            self.turns_played,
            describe_result(&result, |id| game.player_name(id))
        ));
        for standing in &standings {
            game.logger.normal(&format!(
                "{}: {} points, {} cards",
                game.player_name(standing.player),
                standing.score,
                standing.board_size
            ));
        }

        self.broadcast(
            controllers,
            &GameEvent::GameOver {
                result: result.clone(),
                standings: standings.clone(),
            },
        )?;

        Ok(GameSummary {
            result,
            standings,
            turns_played: self.turns_played,
            end_reason,
        })
    }

    /// Ask the player in `seat` for a card, place it and capture
    pub fn run_turn(
        &mut self,
        seat: usize,
        drawn: Option<Card>,
        controllers: &mut [Box<dyn PlayerController>],
    ) -> Result<()> {
        let index = self.ask(seat, Decision::PlaceInParade, drawn, controllers)?;

        let player = &mut self.game.players[seat];
        let card = player.take_from_hand(index).ok_or_else(|| {
            ParadeError::InvalidAction(format!("card index {} is not in {}'s hand", index, player.name))
        })?;
        let captured = self.game.parade.place(card);
        let player = &mut self.game.players[seat];
        player.add_to_board(captured.iter().copied());
        let player_id = player.id;
        self.turns_played += 1;

        log_if_verbose!(
            self,
            "{} placed {} and captured {}",
            self.game.player_name(player_id),
            card,
            card_list(&captured)
        );

        self.broadcast(
            controllers,
            &GameEvent::CardPlaced {
                player: player_id,
                card,
                captured: captured.to_vec(),
                parade: self.game.parade.cards().to_vec(),
            },
        )
    }

    /// End of game: move picked hand cards to the board, discard the rest
    fn finalize_board(&mut self, seat: usize, controllers: &mut [Box<dyn PlayerController>]) -> Result<()> {
        let mut added = Vec::with_capacity(FINAL_BOARD_PICKS as usize);
        for remaining in (1..=FINAL_BOARD_PICKS).rev() {
            if self.game.players[seat].hand.is_empty() {
                break;
            }
            let index = self.ask(seat, Decision::AddToBoard { remaining }, None, controllers)?;
            let player = &mut self.game.players[seat];
            let card = player.take_from_hand(index).ok_or_else(|| {
                ParadeError::InvalidAction(format!("card index {} is not in {}'s hand", index, player.name))
            })?;
            player.add_to_board([card]);
            added.push(card);
        }

        let player = &mut self.game.players[seat];
        let player_id = player.id;
        self.game.discard.append(&mut player.hand);

        log_if_verbose!(
            self,
            "{} added {} to their board",
            self.game.player_name(player_id),
            card_list(&added)
        );
        self.broadcast(
            controllers,
            &GameEvent::BoardFinalized {
                player: player_id,
                added,
            },
        )
    }

    fn ask(
        &self,
        seat: usize,
        decision: Decision,
        drawn: Option<Card>,
        controllers: &mut [Box<dyn PlayerController>],
    ) -> Result<usize> {
        let player = &self.game.players[seat];
        let view = TurnView::new(
            player.id,
            decision,
            &player.hand,
            &player.board,
            self.game.parade.cards(),
            drawn,
            &self.game.logger,
        );
        controllers[seat].choose_card(&view)
    }

    fn broadcast(&self, controllers: &mut [Box<dyn PlayerController>], event: &GameEvent) -> Result<()> {
        for controller in controllers.iter_mut() {
            controller.notify(event)?;
        }
        Ok(())
    }

    fn check_seating(&self, controllers: &[Box<dyn PlayerController>]) -> Result<()> {
        if controllers.len() != self.game.players.len() {
            return Err(ParadeError::InvalidAction(format!(
                "{} controllers for {} players",
                controllers.len(),
                self.game.players.len()
            )));
        }
        for (player, controller) in self.game.players.iter().zip(controllers) {
            if controller.player_id() != player.id {
                return Err(ParadeError::InvalidAction(format!(
                    "controller for player {} sits in seat {}",
                    controller.player_id(),
                    player.id
                )));
            }
        }
        Ok(())
    }

    fn close_controllers(&self, controllers: &mut [Box<dyn PlayerController>]) {
        for controller in controllers.iter_mut() {
            if let Err(err) = controller.close() {
                self.game
                    .logger
                    .log_error(&format!("failed to close controller for {}", controller.name()), &err);
            }
        }
    }

    fn log_normal(&self, message: &str) {
        self.game.logger.normal(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Colour, Deck, Parade};
    use crate::game::{FixedScriptController, GameLogger, RandomController};

    fn random_controllers(n: u32, seed: u64) -> Vec<Box<dyn PlayerController>> {
        (0..n)
            .map(|i| {
                Box::new(RandomController::with_seed(PlayerId::new(i), format!("P{i}"), seed + i as u64))
                    as Box<dyn PlayerController>
            })
            .collect()
    }

    fn names(n: u32) -> Vec<String> {
        (0..n).map(|i| format!("P{i}")).collect()
    }

    #[test]
    fn test_game_loop_creation() {
        let mut game = GameState::with_seed(names(2), 1, GameLogger::new()).unwrap();
        let game_loop = GameLoop::new(&mut game);
        assert_eq!(game_loop.turns_played(), 0);
    }

    #[test]
    fn test_run_turn_moves_captures_to_board() {
        let logger = GameLogger::capturing(VerbosityLevel::Normal);
        let mut game = GameState::new(names(2), Deck::stacked(Vec::new()), logger).unwrap();
        game.parade = Parade::seeded(vec![
            Card::new(3, Colour::Red),
            Card::new(5, Colour::Blue),
            Card::new(1, Colour::Green),
            Card::new(2, Colour::Red),
            Card::new(4, Colour::Blue),
            Card::new(6, Colour::Green),
        ]);
        game.players[0].hand = vec![Card::new(9, Colour::Black), Card::new(4, Colour::Red)];

        let mut controllers: Vec<Box<dyn PlayerController>> = vec![
            Box::new(FixedScriptController::new(PlayerId::new(0), "A", vec![1])),
            Box::new(FixedScriptController::new(PlayerId::new(1), "B", vec![])),
        ];

        let mut game_loop = GameLoop::new(&mut game);
        game_loop.run_turn(0, None, &mut controllers).unwrap();
        assert_eq!(game_loop.turns_played(), 1);

        assert_eq!(game.players[0].board, vec![Card::new(3, Colour::Red)]);
        assert_eq!(game.players[0].hand, vec![Card::new(9, Colour::Black)]);
        assert_eq!(game.parade.cards().last(), Some(&Card::new(4, Colour::Red)));
        assert_eq!(game.parade.len(), 6);
    }

    #[test]
    fn test_full_game_conserves_cards() {
        for players in 2..=6 {
            let logger = GameLogger::capturing(VerbosityLevel::Silent);
            let mut game = GameState::with_seed(names(players), 100 + players as u64, logger).unwrap();
            let mut controllers = random_controllers(players, 7);

            let summary = GameLoop::new(&mut game).run_game(&mut controllers).unwrap();

            assert!(game.conserves_cards());
            assert_eq!(summary.standings.len(), players as usize);
            for player in &game.players {
                assert!(player.hand.is_empty());
            }
            assert!(!summary.result.players().is_empty());
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let run = |seed: u64| {
            let logger = GameLogger::capturing(VerbosityLevel::Silent);
            let mut game = GameState::with_seed(names(3), seed, logger).unwrap();
            let mut controllers = random_controllers(3, seed);
            GameLoop::new(&mut game).run_game(&mut controllers).unwrap()
        };

        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_deck_exhaustion_triggers_final_round() {
        // Two players, deck stacked so that after dealing exactly two cards remain
        let mut cards = crate::core::Card::universe();
        cards.truncate(2 * 4 + 6 + 2);
        let logger = GameLogger::capturing(VerbosityLevel::Silent);
        let mut game = GameState::new(names(2), Deck::stacked(cards), logger).unwrap();
        let mut controllers = random_controllers(2, 3);

        let summary = GameLoop::new(&mut game).run_game(&mut controllers).unwrap();

        // Two drawn turns, then one final turn each
        assert_eq!(summary.end_reason, GameEndReason::DeckExhausted);
        assert_eq!(summary.turns_played, 4);
        assert_eq!(game.card_count(), 16);
        for player in &game.players {
            assert!(player.board.len() >= FINAL_BOARD_PICKS as usize);
        }
        assert_eq!(game.discard.len(), 2);
    }

    #[test]
    fn test_mismatched_controllers_are_rejected() {
        let mut game = GameState::with_seed(names(2), 1, GameLogger::capturing(VerbosityLevel::Silent)).unwrap();
        let mut controllers = random_controllers(3, 1);
        let err = GameLoop::new(&mut game).run_game(&mut controllers).unwrap_err();
        assert!(matches!(err, ParadeError::InvalidAction(_)));
    }
}
