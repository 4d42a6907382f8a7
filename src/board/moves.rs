/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use super::{BoardError, Square};

/// A list of moves, as produced by move generation.
pub type MoveList = Vec<Move>;

/// Represents a single turn: the sequence of squares a piece visits.
///
/// A simple step has two squares. Every additional square is one more capture in a chain,
/// so a move with more than two squares always captures.
///
/// The empty move is a sentinel: handed to an engine it means "you move first",
/// returned by an engine it means "no legal moves, I resign".
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Move(Vec<Square>);

impl Move {
    /// The empty sentinel move.
    pub const NONE: Self = Self(Vec::new());

    /// Creates a new [`Move`] visiting `squares` in order.
    #[inline(always)]
    pub fn new(squares: impl IntoIterator<Item = Square>) -> Self {
        Self(squares.into_iter().collect())
    }

    /// Returns `true` if this is the empty sentinel move.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of squares in the sequence.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The squares of this move, in order.
    #[inline(always)]
    pub fn squares(&self) -> &[Square] {
        &self.0
    }

    /// The square this move starts from.
    #[inline(always)]
    pub fn from(&self) -> Option<Square> {
        self.0.first().copied()
    }

    /// The square this move ends on.
    #[inline(always)]
    pub fn to(&self) -> Option<Square> {
        self.0.last().copied()
    }

    /// Returns `true` if this move jumps over at least one piece.
    ///
    /// # Example
    /// ```
    /// # use kingme::Move;
    /// let step: Move = "(5,0)-(4,1)".parse().unwrap();
    /// assert!(!step.is_capture());
    ///
    /// let jump: Move = "(5,0)-(3,2)".parse().unwrap();
    /// assert!(jump.is_capture());
    /// ```
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        match self.0.as_slice() {
            [] | [_] => false,
            [a, b, ..] => a.distance_rows(b) == 2,
        }
    }

    /// Number of captures this move performs.
    #[inline(always)]
    pub fn num_captures(&self) -> usize {
        if self.is_capture() {
            self.0.len() - 1
        } else {
            0
        }
    }

    /// Appends a square to the end of this move.
    #[inline(always)]
    pub(crate) fn push(&mut self, square: Square) {
        self.0.push(square);
    }
}

impl FromStr for Move {
    type Err = BoardError;
    /// Parses a move written as squares joined by `-`, like `(5,0)-(4,1)`.
    ///
    /// An empty string or `-1` parses to the empty sentinel move.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "-1" {
            return Ok(Self::NONE);
        }

        let squares = s
            .split('-')
            .map(str::parse)
            .collect::<Result<Vec<Square>, _>>()
            .map_err(|_| BoardError::ParseMove(s.to_string()))?;

        if squares.len() < 2 {
            return Err(BoardError::ParseMove(s.to_string()));
        }

        Ok(Self(squares))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-1");
        }

        let squares = self
            .0
            .iter()
            .map(|sq| sq.to_string())
            .collect::<Vec<_>>()
            .join("-");

        write!(f, "{squares}")
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<T: AsRef<str>> PartialEq<T> for Move {
    fn eq(&self, other: &T) -> bool {
        self.to_string() == other.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_parsing() {
        let mv: Move = "(2,1)-(4,3)-(6,5)".parse().unwrap();
        assert_eq!(mv.len(), 3);
        assert_eq!(mv.from(), Some(Square::new(2, 1)));
        assert_eq!(mv.to(), Some(Square::new(6, 5)));
        assert_eq!(mv.num_captures(), 2);
        assert_eq!(mv, "(2,1)-(4,3)-(6,5)");
    }

    #[test]
    fn test_empty_move() {
        assert!("".parse::<Move>().unwrap().is_empty());
        assert!("-1".parse::<Move>().unwrap().is_empty());
        assert_eq!(Move::NONE.to_string(), "-1");
        assert!(!Move::NONE.is_capture());
    }

    #[test]
    fn test_invalid_moves() {
        assert!("(2,1)".parse::<Move>().is_err());
        assert!("(2,1)-(x,3)".parse::<Move>().is_err());
    }

    #[test]
    fn test_step_is_not_capture() {
        let mv: Move = "(2,1)-(3,2)".parse().unwrap();
        assert!(!mv.is_capture());
        assert_eq!(mv.num_captures(), 0);
    }
}
