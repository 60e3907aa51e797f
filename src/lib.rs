//! Parade card game engine
//!
//! Deck and capture rules, the turn loop, winner evaluation and a
//! controller protocol that lets local and remote players take part in the
//! same game.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod net;

pub use error::{ParadeError, Result};
