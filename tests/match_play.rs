/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Duration;

use kingme::{play_game, Board, Color, MctsConfig, MatchTally, Outcome, Strategy};

fn quick_mcts() -> Strategy {
    Strategy::Mcts(MctsConfig {
        time_budget: Duration::from_secs(3600),
        max_iterations: Some(200),
        ..Default::default()
    })
}

/// Replays `moves` on a fresh board, checking each one is legal for the side to act.
fn replay(cols: u8, rows: u8, p: u8, moves: &[kingme::Move]) -> (Board, Color) {
    let mut board = Board::new(cols, rows, p).unwrap();
    let mut side = Color::Black;

    for mv in moves {
        board.make_move(mv, side).unwrap();
        side = side.opponent();
    }

    (board, side)
}

#[test]
fn test_games_are_legal_and_finish() {
    let pairings = [
        (Strategy::minimax(2), Strategy::Random),
        (Strategy::Random, quick_mcts()),
        (quick_mcts(), Strategy::minimax(1)),
    ];

    for (seed, (black, white)) in pairings.into_iter().enumerate() {
        let record = play_game(7, 7, 2, black, white, seed as u64).unwrap();
        assert_ne!(record.outcome, Outcome::Ongoing);

        let (board, side) = replay(7, 7, 2, &record.moves);
        let final_outcome = board.outcome(side);

        // Either the board shows the result, or the side to act resigned for lack of moves.
        assert!(final_outcome.is_decided(), "{black} vs {white} stopped early:\n{board}");
        assert_eq!(final_outcome, record.outcome);
    }
}

#[test]
fn test_minimax_beats_random() {
    let mut tally = MatchTally::default();

    for seed in 0..4 {
        let (black, white, ours) = if seed % 2 == 0 {
            (Strategy::minimax(3), Strategy::Random, Color::Black)
        } else {
            (Strategy::Random, Strategy::minimax(3), Color::White)
        };

        let record = play_game(8, 8, 3, black, white, seed).unwrap();
        tally.record(record.outcome, ours);
    }

    assert!(tally.wins > tally.losses, "minimax did not outplay random: {tally}");
}

#[test]
fn test_games_are_reproducible() {
    let first = play_game(7, 7, 2, quick_mcts(), Strategy::Random, 99).unwrap();
    let second = play_game(7, 7, 2, quick_mcts(), Strategy::Random, 99).unwrap();
    assert_eq!(first, second);
}
