//! Core game types: cards, the deck, the parade and players

pub mod card;
pub mod deck;
pub mod entity;
pub mod parade;
pub mod player;

pub use card::{Card, Colour, CARD_COUNT, MAX_NUMBER};
pub use deck::Deck;
pub use entity::PlayerId;
pub use parade::{Captured, Parade, PARADE_SEED_SIZE};
pub use player::Player;
