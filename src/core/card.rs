//! Card and colour definitions

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Highest number printed on a card (numbers run 0..=MAX_NUMBER)
pub const MAX_NUMBER: u8 = 10;

/// Number of distinct cards in the game (11 numbers x 6 colours)
pub const CARD_COUNT: usize = (MAX_NUMBER as usize + 1) * Colour::ALL.len();

/// The six suit colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Colour {
    Black,
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
}

impl Colour {
    /// Every colour, in name order
    pub const ALL: [Colour; 6] = [
        Colour::Black,
        Colour::Blue,
        Colour::Green,
        Colour::Purple,
        Colour::Red,
        Colour::Yellow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Colour::Black => "Black",
            Colour::Blue => "Blue",
            Colour::Green => "Green",
            Colour::Purple => "Purple",
            Colour::Red => "Red",
            Colour::Yellow => "Yellow",
        }
    }

    /// Dense index into per-colour tables (same order as `ALL`)
    pub fn index(&self) -> usize {
        match self {
            Colour::Black => 0,
            Colour::Blue => 1,
            Colour::Green => 2,
            Colour::Purple => 3,
            Colour::Red => 4,
            Colour::Yellow => 5,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single Parade card
///
/// Cards are plain values: there is exactly one card for every
/// (number, colour) pair, so equality on the pair is card identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub number: u8,
    pub colour: Colour,
}

impl Card {
    pub fn new(number: u8, colour: Colour) -> Self {
        debug_assert!(number <= MAX_NUMBER, "card number out of range: {number}");
        Card { number, colour }
    }

    /// The full 66-card universe, ordered by colour then number
    pub fn universe() -> Vec<Card> {
        Colour::ALL
            .iter()
            .flat_map(|&colour| (0..=MAX_NUMBER).map(move |number| Card::new(number, colour)))
            .collect()
    }
}

// Display/sorting order: colour name, then number. Gameplay never relies on it.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.colour
            .name()
            .cmp(other.colour.name())
            .then(self.number.cmp(&other.number))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.colour, self.number)
    }
}
