//! Random AI controller for testing and baseline gameplay
//!
//! Picks uniformly among the cards in hand.

use crate::core::PlayerId;
use crate::game::controller::{PlayerController, TurnView};
use crate::{ParadeError, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// A controller that makes random choices
pub struct RandomController {
    player_id: PlayerId,
    name: String,
    rng: Box<dyn rand::RngCore>,
}

impl RandomController {
    /// Create a new random controller with default RNG
    pub fn new(player_id: PlayerId, name: impl Into<String>) -> Self {
        RandomController {
            player_id,
            name: name.into(),
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, name: impl Into<String>, seed: u64) -> Self {
        RandomController {
            player_id,
            name: name.into(),
            rng: Box::new(ChaCha12Rng::seed_from_u64(seed)),
        }
    }
}

impl PlayerController for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_card(&mut self, view: &TurnView) -> Result<usize> {
        let hand = view.hand();
        if hand.is_empty() {
            return Err(ParadeError::InvalidAction(
                "asked to choose from an empty hand".to_string(),
            ));
        }

        let index = self.rng.gen_range(0..hand.len());
        view.logger().controller_choice(
            "RANDOM",
            &format!("{} chose {}", self.name, hand[index]),
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, Colour};
    use crate::game::controller::Decision;
    use crate::game::{GameLogger, VerbosityLevel};

    fn cards() -> Vec<Card> {
        (0..5).map(|n| Card::new(n, Colour::Yellow)).collect()
    }

    #[test]
    fn test_random_controller_creation() {
        let controller = RandomController::new(PlayerId::new(1), "Bot");
        assert_eq!(controller.player_id(), PlayerId::new(1));
        assert_eq!(controller.name(), "Bot");
    }

    #[test]
    fn test_choice_is_in_range() {
        let logger = GameLogger::capturing(VerbosityLevel::Silent);
        let hand = cards();
        let view = TurnView::new(
            PlayerId::new(0),
            Decision::PlaceInParade,
            &hand,
            &[],
            &[],
            None,
            &logger,
        );
        let mut controller = RandomController::with_seed(PlayerId::new(0), "Bot", 42);

        for _ in 0..50 {
            assert!(controller.choose_card(&view).unwrap() < hand.len());
        }
    }

    #[test]
    fn test_empty_hand_is_rejected() {
        let logger = GameLogger::capturing(VerbosityLevel::Silent);
        let view = TurnView::new(
            PlayerId::new(0),
            Decision::PlaceInParade,
            &[],
            &[],
            &[],
            None,
            &logger,
        );
        let mut controller = RandomController::with_seed(PlayerId::new(0), "Bot", 1);
        assert!(matches!(controller.choose_card(&view), Err(ParadeError::InvalidAction(_))));
    }

    #[test]
    fn test_seeded_determinism() {
        let logger = GameLogger::capturing(VerbosityLevel::Silent);
        let hand = cards();
        let view = TurnView::new(
            PlayerId::new(0),
            Decision::PlaceInParade,
            &hand,
            &[],
            &[],
            None,
            &logger,
        );

        let mut controller1 = RandomController::with_seed(PlayerId::new(0), "A", 42);
        let mut controller2 = RandomController::with_seed(PlayerId::new(0), "B", 42);

        let picks1: Vec<usize> = (0..10).map(|_| controller1.choose_card(&view).unwrap()).collect();
        let picks2: Vec<usize> = (0..10).map(|_| controller2.choose_card(&view).unwrap()).collect();
        assert_eq!(picks1, picks2);
    }
}
