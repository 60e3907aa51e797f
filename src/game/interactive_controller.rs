//! Interactive console controller for human players
//!
//! Shows the turn through the text renderer and reads a 1-based card number.
//! Malformed or out-of-range input is reported and re-prompted; it never
//! reaches the engine.

use crate::core::{Card, PlayerId};
use crate::game::controller::{GameEvent, PlayerController, SeatInfo, TurnView};
use crate::game::render;
use crate::{ParadeError, Result};
use std::io::{self, BufRead, Write};

/// A controller that prompts a human player for decisions
pub struct InteractiveController<R, W> {
    player_id: PlayerId,
    name: String,
    input: R,
    output: W,
    /// Last card dealt to this player (display hint only)
    last_drawn: Option<Card>,
    seats: Vec<SeatInfo>,
}

impl InteractiveController<io::StdinLock<'static>, io::Stdout> {
    /// Controller bound to the process's stdin/stdout
    pub fn stdio(player_id: PlayerId, name: impl Into<String>) -> Self {
        Self::new(player_id, name, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveController<R, W> {
    pub fn new(player_id: PlayerId, name: impl Into<String>, input: R, output: W) -> Self {
        InteractiveController {
            player_id,
            name: name.into(),
            input,
            output,
            last_drawn: None,
            seats: Vec::new(),
        }
    }

    /// Rebind the seat, used when a server assigns the id after the handshake
    pub fn set_player_id(&mut self, player_id: PlayerId) {
        self.player_id = player_id;
    }

    pub fn last_drawn(&self) -> Option<Card> {
        self.last_drawn
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn seat_name(&self, id: PlayerId) -> String {
        self.seats
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("Player {}", id))
    }

    /// Read one line; end of input is an I/O error, not bad user input
    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(ParadeError::IoError(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a card choice",
            )));
        }
        Ok(line)
    }
}

/// Parse a 1-based card number into a 0-based index
fn parse_choice(line: &str, hand_size: usize) -> Result<usize> {
    let trimmed = line.trim();
    let number: usize = trimmed
        .parse()
        .map_err(|_| ParadeError::InvalidUserInput(format!("'{}' is not a number", trimmed)))?;
    if number == 0 || number > hand_size {
        return Err(ParadeError::InvalidUserInput(format!(
            "choose a card between 1 and {}",
            hand_size
        )));
    }
    Ok(number - 1)
}

impl<R: BufRead, W: Write> PlayerController for InteractiveController<R, W> {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_card(&mut self, view: &TurnView) -> Result<usize> {
        let hand_size = view.hand().len();
        if hand_size == 0 {
            return Err(ParadeError::InvalidAction(
                "asked to choose from an empty hand".to_string(),
            ));
        }

        render::render_turn(&mut self.output, &self.name, view)?;
        loop {
            write!(self.output, "Choose a card (1-{}): ", hand_size)?;
            self.output.flush()?;

            let line = self.read_line()?;
            match parse_choice(&line, hand_size) {
                Ok(index) => {
                    view.logger().controller_choice(
                        "HUMAN",
                        &format!("{} chose {}", self.name, view.hand()[index]),
                    );
                    return Ok(index);
                }
                Err(ParadeError::InvalidUserInput(reason)) => {
                    writeln!(self.output, "Invalid choice: {}", reason)?;
                }
                Err(other) => return Err(other),
            }
        }
    }

    fn notify(&mut self, event: &GameEvent) -> Result<()> {
        match event {
            GameEvent::GameStarted { players, .. } => self.seats = players.clone(),
            GameEvent::CardDealt { card } => self.last_drawn = Some(*card),
            _ => {}
        }
        let line = render::describe_event(event, |id| self.seat_name(id));
        writeln!(self.output, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Colour;
    use crate::game::controller::Decision;
    use crate::game::{GameLogger, VerbosityLevel};
    use std::io::Cursor;

    fn hand() -> Vec<Card> {
        vec![
            Card::new(1, Colour::Red),
            Card::new(5, Colour::Blue),
            Card::new(9, Colour::Green),
        ]
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("2\n", 3).unwrap(), 1);
        assert_eq!(parse_choice("  3 ", 3).unwrap(), 2);
        assert!(matches!(parse_choice("0", 3), Err(ParadeError::InvalidUserInput(_))));
        assert!(matches!(parse_choice("4", 3), Err(ParadeError::InvalidUserInput(_))));
        assert!(matches!(parse_choice("abc", 3), Err(ParadeError::InvalidUserInput(_))));
    }

    #[test]
    fn test_reprompts_until_valid() {
        let logger = GameLogger::capturing(VerbosityLevel::Normal);
        let cards = hand();
        let view = TurnView::new(
            PlayerId::new(0),
            Decision::PlaceInParade,
            &cards,
            &[],
            &[],
            None,
            &logger,
        );

        let input = Cursor::new("banana\n7\n\n2\n");
        let mut controller = InteractiveController::new(PlayerId::new(0), "Alice", input, Vec::new());

        assert_eq!(controller.choose_card(&view).unwrap(), 1);

        let output = String::from_utf8(controller.into_output()).unwrap();
        assert_eq!(output.matches("Invalid choice").count(), 3);
        assert_eq!(logger.logs()[0].message, "Alice chose Blue 5");
    }

    #[test]
    fn test_end_of_input_is_io_error() {
        let logger = GameLogger::capturing(VerbosityLevel::Silent);
        let cards = hand();
        let view = TurnView::new(
            PlayerId::new(0),
            Decision::PlaceInParade,
            &cards,
            &[],
            &[],
            None,
            &logger,
        );

        let mut controller =
            InteractiveController::new(PlayerId::new(0), "Alice", Cursor::new("x\n"), Vec::new());
        assert!(matches!(controller.choose_card(&view), Err(ParadeError::IoError(_))));
    }

    #[test]
    fn test_notify_tracks_last_drawn() {
        let mut controller =
            InteractiveController::new(PlayerId::new(0), "Alice", Cursor::new(""), Vec::new());
        controller
            .notify(&GameEvent::CardDealt {
                card: Card::new(6, Colour::Purple),
            })
            .unwrap();
        assert_eq!(controller.last_drawn(), Some(Card::new(6, Colour::Purple)));

        let output = String::from_utf8(controller.into_output()).unwrap();
        assert!(output.contains("You were dealt Purple 6"));
    }
}
