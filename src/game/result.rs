//! Game outcome and the winner/tie-break evaluator
//!
//! Lower scores are better. A score tie is broken in favour of the player
//! with fewer captured cards; if board sizes are equal too the tie stands.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Final outcome of a game, generic over the player identity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult<I> {
    /// Single winner with the strictly lowest score
    Winner(I),
    /// Single winner that shared the lowest score but had the smaller board
    WinnerWithTie(I),
    /// Several players share both the lowest score and the smallest board
    TieNoWinner(Vec<I>),
}

impl<I> GameResult<I> {
    /// The single winner, if there is one
    pub fn winner(&self) -> Option<&I> {
        match self {
            GameResult::Winner(id) | GameResult::WinnerWithTie(id) => Some(id),
            GameResult::TieNoWinner(_) => None,
        }
    }

    /// True if a score tie was involved in the outcome
    pub fn had_tie(&self) -> bool {
        !matches!(self, GameResult::Winner(_))
    }

    /// Every player named by the result
    pub fn players(&self) -> &[I] {
        match self {
            GameResult::Winner(id) | GameResult::WinnerWithTie(id) => std::slice::from_ref(id),
            GameResult::TieNoWinner(ids) => ids,
        }
    }

    /// Translate the identities (e.g. ids to display names)
    pub fn map<J>(self, mut f: impl FnMut(I) -> J) -> GameResult<J> {
        match self {
            GameResult::Winner(id) => GameResult::Winner(f(id)),
            GameResult::WinnerWithTie(id) => GameResult::WinnerWithTie(f(id)),
            GameResult::TieNoWinner(ids) => GameResult::TieNoWinner(ids.into_iter().map(f).collect()),
        }
    }
}

/// One player's row of the final snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing<I> {
    pub player: I,
    pub score: u32,
    pub board_size: usize,
}

impl<I> Standing<I> {
    pub fn new(player: I, score: u32, board_size: usize) -> Self {
        Standing {
            player,
            score,
            board_size,
        }
    }
}

/// Single-pass evaluator over final standings
///
/// Candidates always share one board size. The tie flag records that a score
/// tie was seen at any point of the pass, whether or not board size then
/// separated the players. It only changes the label on a single winner,
/// never who wins.
#[derive(Debug, Clone)]
pub struct WinnerEvaluator<I> {
    lowest_score: Option<u32>,
    candidates: Vec<I>,
    candidate_board_size: usize,
    tie_observed: bool,
}

impl<I> Default for WinnerEvaluator<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> WinnerEvaluator<I> {
    pub fn new() -> Self {
        WinnerEvaluator {
            lowest_score: None,
            candidates: Vec::new(),
            candidate_board_size: 0,
            tie_observed: false,
        }
    }

    /// Evaluate a complete snapshot; `None` when there are no players
    pub fn evaluate(standings: impl IntoIterator<Item = Standing<I>>) -> Option<GameResult<I>> {
        let mut evaluator = Self::new();
        for standing in standings {
            evaluator.observe(standing);
        }
        evaluator.finish()
    }

    pub fn observe(&mut self, standing: Standing<I>) {
        let Standing {
            player,
            score,
            board_size,
        } = standing;

        let ordering = match self.lowest_score {
            None => Ordering::Less,
            Some(lowest) => score.cmp(&lowest),
        };

        match ordering {
            Ordering::Less => {
                self.lowest_score = Some(score);
                self.candidates.clear();
                self.candidates.push(player);
                self.candidate_board_size = board_size;
            }
            Ordering::Equal => {
                self.tie_observed = true;
                match board_size.cmp(&self.candidate_board_size) {
                    Ordering::Less => {
                        self.candidates.clear();
                        self.candidates.push(player);
                        self.candidate_board_size = board_size;
                    }
                    Ordering::Equal => self.candidates.push(player),
                    Ordering::Greater => {}
                }
            }
            Ordering::Greater => {}
        }
    }

    pub fn finish(mut self) -> Option<GameResult<I>> {
        match self.candidates.len() {
            0 => None,
            1 => {
                let winner = self.candidates.pop()?;
                Some(if self.tie_observed {
                    GameResult::WinnerWithTie(winner)
                } else {
                    GameResult::Winner(winner)
                })
            }
            _ => Some(GameResult::TieNoWinner(self.candidates)),
        }
    }
}
