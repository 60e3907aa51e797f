//! The parade line and its capture rule

use crate::core::Card;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of cards dealt into the parade at game start
pub const PARADE_SEED_SIZE: usize = 6;

/// Cards captured by a single placement, in parade order
pub type Captured = SmallVec<[Card; 8]>;

/// Shared line of face-up cards, oldest first, newest last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parade {
    cards: Vec<Card>,
}

impl Parade {
    /// Start a parade from the seed cards (oldest first)
    pub fn seeded(cards: Vec<Card>) -> Self {
        Parade { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Length of the capture-eligible prefix when a card of value `value` is placed
    ///
    /// The `value` most recently placed cards are protected; everything older is
    /// in the removal zone.
    pub fn removal_zone_len(&self, value: u8) -> usize {
        self.cards.len().saturating_sub(value as usize)
    }

    /// Place `card` at the end of the parade and return the captured cards
    ///
    /// A removal-zone card is captured when its number is at most the placed
    /// card's number, or when it shares the placed card's colour. Captured cards
    /// keep their relative order. The placed card is always appended.
    pub fn place(&mut self, card: Card) -> Captured {
        let zone_len = self.removal_zone_len(card.number);
        let mut captured = Captured::new();

        if zone_len > 0 {
            let mut kept = Vec::with_capacity(self.cards.len() + 1);
            for (position, existing) in self.cards.drain(..).enumerate() {
                if position < zone_len && captures(card, existing) {
                    captured.push(existing);
                } else {
                    kept.push(existing);
                }
            }
            self.cards = kept;
        }

        self.cards.push(card);
        captured
    }
}

#[inline]
fn captures(placed: Card, candidate: Card) -> bool {
    candidate.number <= placed.number || candidate.colour == placed.colour
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Colour;

    fn red(n: u8) -> Card {
        Card::new(n, Colour::Red)
    }
    fn blue(n: u8) -> Card {
        Card::new(n, Colour::Blue)
    }
    fn green(n: u8) -> Card {
        Card::new(n, Colour::Green)
    }

    #[test]
    fn test_capture_only_within_removal_zone() {
        let mut parade = Parade::seeded(vec![red(3), blue(5), green(1), red(2), blue(4), green(6)]);

        let captured = parade.place(red(4));

        assert_eq!(captured.as_slice(), &[red(3)]);
        assert_eq!(
            parade.cards(),
            &[blue(5), green(1), red(2), blue(4), green(6), red(4)]
        );
    }

    #[test]
    fn test_value_at_least_length_captures_nothing() {
        let seed = vec![red(3), blue(5), green(1)];
        let mut parade = Parade::seeded(seed.clone());

        let captured = parade.place(blue(3));
        assert!(captured.is_empty());
        assert_eq!(parade.len(), 4);

        let captured = parade.place(green(10));
        assert!(captured.is_empty());
        assert_eq!(parade.len(), 5);
        assert_eq!(&parade.cards()[..3], seed.as_slice());
    }

    #[test]
    fn test_zero_uses_whole_parade_as_zone() {
        let mut parade = Parade::seeded(vec![red(3), blue(5), red(8), green(1), red(2), blue(4)]);
        assert_eq!(parade.removal_zone_len(0), 6);

        let captured = parade.place(red(0));

        assert_eq!(captured.as_slice(), &[red(3), red(8), red(2)]);
        assert_eq!(parade.cards(), &[blue(5), green(1), blue(4), red(0)]);
    }

    #[test]
    fn test_zero_also_takes_other_zeros() {
        let mut parade = Parade::seeded(vec![blue(0), green(7)]);
        let captured = parade.place(red(0));
        assert_eq!(captured.as_slice(), &[blue(0)]);
        assert_eq!(parade.cards(), &[green(7), red(0)]);
    }

    #[test]
    fn test_colour_or_number_either_suffices() {
        // zone = first 3 cards
        let mut parade = Parade::seeded(vec![blue(9), red(1), green(8), blue(0), red(7), green(2)]);
        let captured = parade.place(blue(3));

        assert_eq!(captured.as_slice(), &[blue(9), red(1)]);
        assert_eq!(
            parade.cards(),
            &[green(8), blue(0), red(7), green(2), blue(3)]
        );
    }

    #[test]
    fn test_placed_card_is_always_appended() {
        let mut parade = Parade::seeded(vec![red(1), red(2), red(3), red(4), red(5), red(6)]);
        let captured = parade.place(red(1));

        // Every zone card shares the colour, so the zone empties completely
        assert_eq!(captured.len(), 5);
        assert_eq!(parade.cards(), &[red(6), red(1)]);
        assert!(!parade.is_empty());
    }
}
