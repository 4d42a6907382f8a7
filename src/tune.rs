/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Score of a proven win.
macro_rules! win_score {
    () => {
        10_000
    };
}
pub(crate) use win_score;

/// Evaluation weight of a king.
macro_rules! king_weight {
    () => {
        100
    };
}
pub(crate) use king_weight;

/// Evaluation weight of an uncrowned man.
macro_rules! man_weight {
    () => {
        50
    };
}
pub(crate) use man_weight;

/// Evaluation weight of a single legal move.
macro_rules! mobility_weight {
    () => {
        5
    };
}
pub(crate) use mobility_weight;

/// Evaluation weight of a piece off the outer ring of the board.
macro_rules! center_weight {
    () => {
        2
    };
}
pub(crate) use center_weight;

/// Evaluation weight of a single row of advancement.
macro_rules! advancement_weight {
    () => {
        1
    };
}
pub(crate) use advancement_weight;

/// Move ordering bonus per captured piece.
macro_rules! capture_bonus {
    () => {
        10
    };
}
pub(crate) use capture_bonus;

/// Move ordering bonus for a man landing on its promotion row.
macro_rules! promotion_bonus {
    () => {
        5
    };
}
pub(crate) use promotion_bonus;

/// Default ply budget of the minimax search.
macro_rules! default_depth {
    () => {
        3
    };
}
pub(crate) use default_depth;

/// Default thinking time of the MCTS search, in milliseconds.
macro_rules! default_mcts_millis {
    () => {
        1_000
    };
}
pub(crate) use default_mcts_millis;

/// Exploration constant of UCB1.
macro_rules! exploration_constant {
    () => {
        std::f64::consts::SQRT_2
    };
}
pub(crate) use exploration_constant;

/// Maximum plies played out during a single MCTS rollout.
macro_rules! rollout_limit {
    () => {
        80
    };
}
pub(crate) use rollout_limit;

/// Material weight of a king when a rollout is cut off.
macro_rules! rollout_king_weight {
    () => {
        3
    };
}
pub(crate) use rollout_king_weight;

/// Consecutive plies without a capture before the game is drawn.
macro_rules! tie_max {
    () => {
        40
    };
}
pub(crate) use tie_max;
