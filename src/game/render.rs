//! Plain-text rendering of turns and events

use crate::core::{Card, PlayerId};
use crate::game::controller::{Decision, GameEvent, TurnView};
use crate::game::result::GameResult;
use std::io::{self, Write};

/// Render a list of cards as "Red 3, Blue 5"
pub fn card_list(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "(none)".to_string();
    }
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Show the parade, the player's board and a 1-based hand menu
pub fn render_turn(out: &mut dyn Write, name: &str, view: &TurnView) -> io::Result<()> {
    writeln!(out)?;
    match view.decision() {
        Decision::PlaceInParade => writeln!(out, "=== {}'s turn ===", name)?,
        Decision::AddToBoard { remaining } => writeln!(
            out,
            "=== {}: add {} more card(s) to your board ===",
            name, remaining
        )?,
    }
    writeln!(out, "Parade (oldest first): {}", card_list(view.parade()))?;
    writeln!(out, "Your board: {}", card_list(view.board()))?;
    if let Some(card) = view.drawn() {
        writeln!(out, "You drew: {}", card)?;
    }
    writeln!(out, "Your hand:")?;
    for (i, card) in view.hand().iter().enumerate() {
        if view.decision() == Decision::PlaceInParade {
            let captured = view.preview_capture(i);
            writeln!(out, "  {}) {}  [captures {}]", i + 1, card, captured.len())?;
        } else {
            writeln!(out, "  {}) {}", i + 1, card)?;
        }
    }
    Ok(())
}

/// One-line description of an event, from the receiving player's point of view
pub fn describe_event(event: &GameEvent, name_of: impl Fn(PlayerId) -> String) -> String {
    match event {
        GameEvent::GameStarted { players, you } => {
            let names: Vec<&str> = players.iter().map(|s| s.name.as_str()).collect();
            format!("Game started: {} (you are seat {})", names.join(", "), you)
        }
        GameEvent::CardDealt { card } => format!("You were dealt {}", card),
        GameEvent::CardPlaced {
            player,
            card,
            captured,
            ..
        } => format!(
            "{} placed {} and captured {}",
            name_of(*player),
            card,
            card_list(captured)
        ),
        GameEvent::FinalRound { reason } => format!("Final round! ({})", reason),
        GameEvent::BoardFinalized { player, added } => {
            format!("{} added {} to their board", name_of(*player), card_list(added))
        }
        GameEvent::GameOver { result, standings } => {
            let scores: Vec<String> = standings
                .iter()
                .map(|s| format!("{}: {} ({} cards)", name_of(s.player), s.score, s.board_size))
                .collect();
            format!("Game over: {}. Scores: {}", describe_result(result, &name_of), scores.join(", "))
        }
    }
}

pub fn describe_result(result: &GameResult<PlayerId>, name_of: impl Fn(PlayerId) -> String) -> String {
    match result {
        GameResult::Winner(id) => format!("{} wins", name_of(*id)),
        GameResult::WinnerWithTie(id) => {
            format!("{} wins the tie-break on fewer cards", name_of(*id))
        }
        GameResult::TieNoWinner(ids) => {
            let names: Vec<String> = ids.iter().map(|id| name_of(*id)).collect();
            format!("tie between {}", names.join(" and "))
        }
    }
}
