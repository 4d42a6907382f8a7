/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Move representation and parsing.
mod moves;

/// Move generation verification.
mod perft;

/// Colors and pieces.
mod piece;

/// The board itself: piece placement, move generation, move application, and game outcomes.
mod position;

/// Board coordinates.
mod square;

pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;

use thiserror::Error;

/// Errors raised by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("cannot build a {cols}x{rows} board with {p} rows of pieces per side")]
    InvalidDimensions { cols: u8, rows: u8, p: u8 },

    #[error("{mv} is not a legal move for {color}")]
    IllegalMove { mv: String, color: Color },

    #[error("the empty move cannot be applied to a board")]
    EmptyMove,

    #[error("invalid player number {0}; expected 1 or 2")]
    InvalidPlayer(u8),

    #[error("could not parse {0:?} as a color")]
    ParseColor(String),

    #[error("could not parse {0:?} as a square; expected `(row,col)`")]
    ParseSquare(String),

    #[error("could not parse {0:?} as a move; expected squares joined by `-`")]
    ParseMove(String),

    #[error("could not parse board: {0}")]
    ParseBoard(String),
}
