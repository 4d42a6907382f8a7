/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Per-game session state and strategy dispatch.
mod agent;

/// The rules of checkers: boards, pieces, moves, and move generation.
mod board;

/// Command-line arguments and interactive commands.
mod cli;

/// Code related to the engine's functionality, such as user input handling and self-play.
mod engine;

/// Evaluation of checkers positions.
mod eval;

/// Logger setup.
mod logging;

/// Monte Carlo Tree Search.
mod mcts;

/// Move ordering.
mod movepicker;

/// Alpha-beta search.
mod search;

/// Scores of positions.
mod score;

/// Tunable constants.
mod tune;

pub use agent::*;
pub use board::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use logging::*;
pub use mcts::*;
pub use movepicker::*;
pub use search::*;
pub use score::*;
