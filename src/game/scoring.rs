//! End-of-game board scoring
//!
//! For each colour, the player(s) holding the most cards of that colour have
//! the majority and count those cards as 1 point each. Every other board card
//! counts its face value. In a two-player game the majority needs a lead of
//! at least two cards.

use crate::core::{Colour, Player, PlayerId};
use crate::game::result::Standing;
use smallvec::SmallVec;

/// Lead needed for a majority when only two players are seated
const TWO_PLAYER_MAJORITY_LEAD: usize = 2;

/// Players holding the majority of `colour`
pub fn majority_holders(players: &[Player], colour: Colour) -> SmallVec<[PlayerId; 6]> {
    let counts: SmallVec<[(PlayerId, usize); 6]> =
        players.iter().map(|p| (p.id, p.board_count(colour))).collect();

    if let [(first, a), (second, b)] = counts.as_slice() {
        let mut holders = SmallVec::new();
        if *a >= b + TWO_PLAYER_MAJORITY_LEAD {
            holders.push(*first);
        } else if *b >= a + TWO_PLAYER_MAJORITY_LEAD {
            holders.push(*second);
        }
        return holders;
    }

    let most = counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
    if most == 0 {
        return SmallVec::new();
    }
    counts
        .iter()
        .filter(|&&(_, n)| n == most)
        .map(|&(id, _)| id)
        .collect()
}

/// Score a single player's board given the per-colour majority table
fn board_score(player: &Player, majorities: &[SmallVec<[PlayerId; 6]>; 6]) -> u32 {
    player
        .board
        .iter()
        .map(|card| {
            if majorities[card.colour.index()].contains(&player.id) {
                1
            } else {
                u32::from(card.number)
            }
        })
        .sum()
}

/// Final standings in seat order
pub fn final_standings(players: &[Player]) -> Vec<Standing<PlayerId>> {
    let majorities: [SmallVec<[PlayerId; 6]>; 6] =
        Colour::ALL.map(|colour| majority_holders(players, colour));

    players
        .iter()
        .map(|p| Standing::new(p.id, board_score(p, &majorities), p.board.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Card;

    fn player(id: u32, board: &[(u8, Colour)]) -> Player {
        let mut p = Player::new(PlayerId::new(id), format!("P{id}"));
        p.add_to_board(board.iter().map(|&(n, c)| Card::new(n, c)));
        p
    }

    #[test]
    fn test_two_player_needs_lead_of_two() {
        let players = vec![
            player(0, &[(5, Colour::Red), (7, Colour::Red)]),
            player(1, &[(9, Colour::Red)]),
        ];
        assert!(majority_holders(&players, Colour::Red).is_empty());

        let standings = final_standings(&players);
        assert_eq!(standings[0].score, 12);
        assert_eq!(standings[1].score, 9);
    }

    #[test]
    fn test_two_player_majority_counts_one_each() {
        let players = vec![
            player(0, &[(5, Colour::Red), (7, Colour::Red), (8, Colour::Red)]),
            player(1, &[(9, Colour::Red), (2, Colour::Blue)]),
        ];
        assert_eq!(
            majority_holders(&players, Colour::Red).as_slice(),
            &[PlayerId::new(0)]
        );

        let standings = final_standings(&players);
        assert_eq!(standings[0], Standing::new(PlayerId::new(0), 3, 3));
        // Player 1 is alone in blue but only leads by one card
        assert_eq!(standings[1], Standing::new(PlayerId::new(1), 11, 2));
    }

    #[test]
    fn test_multiplayer_shared_majority() {
        let players = vec![
            player(0, &[(4, Colour::Green), (6, Colour::Green)]),
            player(1, &[(10, Colour::Green), (3, Colour::Green)]),
            player(2, &[(1, Colour::Green), (9, Colour::Yellow)]),
        ];
        assert_eq!(
            majority_holders(&players, Colour::Green).as_slice(),
            &[PlayerId::new(0), PlayerId::new(1)]
        );
        assert_eq!(
            majority_holders(&players, Colour::Yellow).as_slice(),
            &[PlayerId::new(2)]
        );

        let scores: Vec<u32> = final_standings(&players).iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![2, 2, 2]);
    }

    #[test]
    fn test_empty_boards_score_zero() {
        let players = vec![player(0, &[]), player(1, &[]), player(2, &[])];
        for standing in final_standings(&players) {
            assert_eq!(standing.score, 0);
            assert_eq!(standing.board_size, 0);
        }
    }
}
