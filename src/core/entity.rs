//! Player identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for players
///
/// IDs are seat indices: the first player seated is 0, the next 1, and so on.
/// They are stable for the whole game and double as the identity carried over
/// the wire to remote players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        PlayerId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Seat index of this player in `GameState::players`
    pub fn seat(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
