//! Game state, turn loop, controllers and scoring

pub mod controller;
pub mod fixed_script_controller;
pub mod game_loop;
pub mod interactive_controller;
pub mod logger;
pub mod random_controller;
pub mod render;
pub mod result;
pub mod scoring;
pub mod state;
pub mod zero_controller;

pub use controller::{Decision, GameEvent, PlayerController, SeatInfo, TurnView};
pub use fixed_script_controller::FixedScriptController;
pub use game_loop::{GameEndReason, GameLoop, GameSummary, VerbosityLevel, FINAL_BOARD_PICKS};
pub use interactive_controller::InteractiveController;
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use random_controller::RandomController;
pub use result::{GameResult, Standing, WinnerEvaluator};
pub use state::{GameState, MAX_PLAYERS, MIN_PLAYERS, STARTING_HAND_SIZE};
pub use zero_controller::ZeroController;
