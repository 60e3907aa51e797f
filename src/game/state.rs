//! Main game state structure

use crate::core::{Card, Deck, Parade, Player, PlayerId, CARD_COUNT, PARADE_SEED_SIZE};
use crate::game::GameLogger;
use crate::{ParadeError, Result};

/// Fewest players a game can seat
pub const MIN_PLAYERS: usize = 2;
/// Most players a game can seat
pub const MAX_PLAYERS: usize = 6;
/// Cards dealt to each player before the first turn
///
/// Every turn draws before choosing, so a player holds one more than this
/// when picking a card. The final round has no draw, which leaves three
/// cards for the end-of-game board picks.
pub const STARTING_HAND_SIZE: usize = 4;

/// Complete game state
///
/// Owned and mutated only by the engine loop. Controllers see it through
/// a `TurnView`.
#[derive(Debug)]
pub struct GameState {
    /// Draw pile
    pub deck: Deck,

    /// Shared parade line
    pub parade: Parade,

    /// Players in seat order; `players[i].id == PlayerId::new(i)`
    pub players: Vec<Player>,

    /// Hand cards left over after the end-of-game board picks
    pub discard: Vec<Card>,

    /// Centralized logger for game events
    pub logger: GameLogger,
}

impl GameState {
    /// Seat the named players around a deck; nothing is dealt yet
    pub fn new(names: Vec<String>, deck: Deck, logger: GameLogger) -> Result<Self> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&names.len()) {
            return Err(ParadeError::InvalidPlayerCount(names.len()));
        }

        let players = names
            .into_iter()
            .enumerate()
            .map(|(seat, name)| Player::new(PlayerId::new(seat as u32), name))
            .collect();

        Ok(GameState {
            deck,
            parade: Parade::default(),
            players,
            discard: Vec::new(),
            logger,
        })
    }

    /// Seat players around a freshly shuffled, seeded deck
    pub fn with_seed(names: Vec<String>, seed: u64, logger: GameLogger) -> Result<Self> {
        Self::new(names, Deck::with_seed(seed), logger)
    }

    /// Deal starting hands in seat order, then seed the parade
    pub fn deal(&mut self) -> Result<()> {
        for player in &mut self.players {
            let cards = self.deck.draw_many(STARTING_HAND_SIZE)?;
            player.hand.extend(cards);
        }
        self.parade = Parade::seeded(self.deck.draw_many(PARADE_SEED_SIZE)?);
        Ok(())
    }

    pub fn is_dealt(&self) -> bool {
        !self.parade.is_empty()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.seat())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.seat())
    }

    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Player {}", id))
    }

    /// Total cards across every location; stays at the deck's starting size
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.parade.len()
            + self.discard.len()
            + self
                .players
                .iter()
                .map(|p| p.hand.len() + p.board.len())
                .sum::<usize>()
    }

    /// True if the full universe is accounted for
    pub fn conserves_cards(&self) -> bool {
        self.card_count() == CARD_COUNT
    }
}
