/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use super::BoardError;

/// A single cell of the board, addressed by `(row, col)` with `(0, 0)` in the top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.row
    }

    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Returns `true` if pieces may stand on this square.
    ///
    /// Only the "dark" cells, where `row + col` is odd, are playable.
    #[inline(always)]
    pub const fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// Returns the square `(dr, dc)` away from this one, if it lies within a `rows x cols` board.
    ///
    /// # Example
    /// ```
    /// # use kingme::Square;
    /// let sq = Square::new(0, 1);
    /// assert_eq!(sq.offset(1, -1, 8, 8), Some(Square::new(1, 0)));
    /// assert_eq!(sq.offset(-1, 1, 8, 8), None);
    /// ```
    #[inline(always)]
    pub fn offset(&self, dr: i8, dc: i8, rows: u8, cols: u8) -> Option<Self> {
        let row = self.row as i16 + dr as i16;
        let col = self.col as i16 + dc as i16;

        ((0..rows as i16).contains(&row) && (0..cols as i16).contains(&col))
            .then(|| Self::new(row as u8, col as u8))
    }

    /// The square halfway between `self` and `other`, i.e. the square jumped over by a capture.
    #[inline(always)]
    pub const fn midpoint(&self, other: &Self) -> Self {
        Self::new(
            ((self.row as u16 + other.row as u16) / 2) as u8,
            ((self.col as u16 + other.col as u16) / 2) as u8,
        )
    }

    /// Returns `true` if this square is not on the outer ring of a `rows x cols` board.
    #[inline(always)]
    pub const fn is_center(&self, rows: u8, cols: u8) -> bool {
        self.row >= 1 && self.row + 1 < rows && self.col >= 1 && self.col + 1 < cols
    }

    /// Absolute row distance between two squares.
    #[inline(always)]
    pub const fn distance_rows(&self, other: &Self) -> u8 {
        self.row.abs_diff(other.row)
    }
}

impl FromStr for Square {
    type Err = BoardError;
    /// Parses a square written as `(row,col)`. Surrounding whitespace and the parentheses are optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || BoardError::ParseSquare(s.to_string());

        let inner = s
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim();
        let (row, col) = inner.split_once(',').ok_or_else(err)?;
        let row = row.trim().parse().map_err(|_| err())?;
        let col = col.trim().parse().map_err(|_| err())?;

        Ok(Self::new(row, col))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
