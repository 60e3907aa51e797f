//! The shared draw pile

use crate::core::Card;
use crate::{ParadeError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Shuffled stack of cards that players deplete
///
/// The top of the deck is the end of the vector, so drawing is a `pop`.
/// `Clone` copies a deck mid-game: it keeps the remaining cards in the same
/// order and never re-shuffles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Shuffle the full universe with the given RNG
    pub fn new(rng: &mut impl rand::Rng) -> Self {
        let mut cards = Card::universe();
        cards.shuffle(rng);
        Deck { cards }
    }

    /// Shuffle the full universe with a seeded RNG (reproducible games)
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        Self::new(&mut rng)
    }

    /// Build a deck that yields `draw_order` front to back
    ///
    /// Used for scripted scenarios; no shuffling takes place.
    pub fn stacked(draw_order: Vec<Card>) -> Self {
        let mut cards = draw_order;
        cards.reverse();
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look at the top card without removing it
    pub fn peek(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    /// Remove and return the top card
    pub fn draw_one(&mut self) -> Result<Card> {
        self.cards.pop().ok_or(ParadeError::EmptyDeck)
    }

    /// Remove and return `count` cards in draw order
    ///
    /// Fails without touching the deck when it is empty or too short.
    pub fn draw_many(&mut self, count: usize) -> Result<Vec<Card>> {
        if self.cards.is_empty() {
            return Err(ParadeError::EmptyDeck);
        }
        if count > self.cards.len() {
            return Err(ParadeError::InsufficientCards {
                requested: count,
                remaining: self.cards.len(),
            });
        }

        let split = self.cards.len() - count;
        let mut drawn = self.cards.split_off(split);
        drawn.reverse();
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Colour, CARD_COUNT};
    use std::collections::HashSet;

    #[test]
    fn test_fresh_deck_draws_every_card_once() {
        let mut deck = Deck::with_seed(7);
        let drawn = deck.draw_many(CARD_COUNT).unwrap();

        assert_eq!(drawn.len(), 66);
        let unique: HashSet<Card> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 66);
        for colour in Colour::ALL {
            for number in 0..=10 {
                assert!(unique.contains(&Card::new(number, colour)));
            }
        }
        assert!(deck.is_empty());
    }

    #[test]
    fn test_draw_one_until_empty() {
        let mut deck = Deck::stacked(vec![Card::new(1, Colour::Red), Card::new(2, Colour::Blue)]);

        assert_eq!(deck.draw_one().unwrap(), Card::new(1, Colour::Red));
        assert_eq!(deck.draw_one().unwrap(), Card::new(2, Colour::Blue));
        assert!(matches!(deck.draw_one(), Err(ParadeError::EmptyDeck)));
    }

    #[test]
    fn test_draw_many_insufficient_leaves_deck_untouched() {
        let mut deck = Deck::stacked(vec![
            Card::new(1, Colour::Red),
            Card::new(2, Colour::Red),
            Card::new(3, Colour::Red),
        ]);
        let before = deck.clone();

        let err = deck.draw_many(4).unwrap_err();
        assert!(matches!(
            err,
            ParadeError::InsufficientCards {
                requested: 4,
                remaining: 3
            }
        ));
        assert_eq!(deck, before);
    }

    #[test]
    fn test_draw_many_on_empty_deck() {
        let mut deck = Deck::stacked(Vec::new());
        assert!(matches!(deck.draw_many(1), Err(ParadeError::EmptyDeck)));
    }

    #[test]
    fn test_draw_many_preserves_draw_order() {
        let order = vec![
            Card::new(4, Colour::Green),
            Card::new(0, Colour::Yellow),
            Card::new(9, Colour::Black),
        ];
        let mut deck = Deck::stacked(order.clone());
        assert_eq!(deck.peek(), Some(order[0]));
        assert_eq!(deck.draw_many(2).unwrap(), order[..2].to_vec());
        assert_eq!(deck.draw_one().unwrap(), order[2]);
    }

    #[test]
    fn test_clone_does_not_reshuffle() {
        let mut original = Deck::with_seed(42);
        let mut copy = original.clone();

        let a = original.draw_many(66).unwrap();
        let b = copy.draw_many(66).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_decks_are_reproducible() {
        assert_eq!(Deck::with_seed(1), Deck::with_seed(1));
        assert_ne!(Deck::with_seed(1), Deck::with_seed(2));
    }
}
