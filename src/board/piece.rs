/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use super::BoardError;

/// Represents the color of a player or a piece.
///
/// [`Color::Black`] is player 1: it starts on the top rows, moves first, and promotes on the last row.
/// [`Color::White`] is player 2: it starts on the bottom rows and promotes on row 0.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    Black,
    White,
}

impl Color {
    /// Creates a [`Color`] from the framework's player number (`1` or `2`).
    ///
    /// # Example
    /// ```
    /// # use kingme::Color;
    /// assert_eq!(Color::from_player(1).unwrap(), Color::Black);
    /// assert!(Color::from_player(3).is_err());
    /// ```
    #[inline(always)]
    pub fn from_player(player: u8) -> Result<Self, BoardError> {
        match player {
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            _ => Err(BoardError::InvalidPlayer(player)),
        }
    }

    /// Returns the framework's player number for this [`Color`].
    #[inline(always)]
    pub const fn player(&self) -> u8 {
        *self as u8 + 1
    }

    /// Returns this [`Color`]'s opposite.
    ///
    /// # Example
    /// ```
    /// # use kingme::Color;
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Row direction that men of this color travel in.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::Black => 1,
            Self::White => -1,
        }
    }

    /// Row on which men of this color are crowned, on a board with `rows` rows.
    #[inline(always)]
    pub const fn promotion_row(&self, rows: u8) -> u8 {
        match self {
            Self::Black => rows - 1,
            Self::White => 0,
        }
    }

    /// Number of rows a piece of this color on `row` has travelled from its own back row.
    #[inline(always)]
    pub const fn advancement(&self, row: u8, rows: u8) -> u8 {
        match self {
            Self::Black => row,
            Self::White => rows - 1 - row,
        }
    }

    /// Converts this [`Color`] to the framework's board character.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Black => 'B',
            Self::White => 'W',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl FromStr for Color {
    type Err = BoardError;
    /// Parses a color name, its initial, or the framework's player number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(player) = s.parse::<u8>() {
            return Self::from_player(player);
        }

        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Self::Black),
            "w" | "white" => Ok(Self::White),
            _ => Err(BoardError::ParseColor(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// A single checker on the board: its owner, and whether it has been crowned.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    king: bool,
}

impl Piece {
    /// An uncrowned piece.
    #[inline(always)]
    pub const fn man(color: Color) -> Self {
        Self { color, king: false }
    }

    /// A crowned piece.
    #[inline(always)]
    pub const fn king(color: Color) -> Self {
        Self { color, king: true }
    }

    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        self.king
    }

    /// Returns a crowned copy of this piece.
    #[inline(always)]
    pub const fn promoted(self) -> Self {
        Self::king(self.color)
    }

    /// Row directions this piece may move and capture in.
    #[inline(always)]
    pub fn row_directions(&self) -> &'static [i8] {
        match (self.king, self.color) {
            (true, _) => &[-1, 1],
            (false, Color::Black) => &[1],
            (false, Color::White) => &[-1],
        }
    }

    /// Character used when printing a board: uppercase for kings.
    ///
    /// # Example
    /// ```
    /// # use kingme::{Color, Piece};
    /// assert_eq!(Piece::man(Color::White).char(), 'w');
    /// assert_eq!(Piece::king(Color::Black).char(), 'B');
    /// ```
    #[inline(always)]
    pub const fn char(&self) -> char {
        let c = self.color.char();
        if self.king {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_rows() {
        assert_eq!(Color::Black.promotion_row(8), 7);
        assert_eq!(Color::White.promotion_row(8), 0);
    }

    #[test]
    fn test_advancement() {
        assert_eq!(Color::Black.advancement(0, 7), 0);
        assert_eq!(Color::Black.advancement(5, 7), 5);
        assert_eq!(Color::White.advancement(6, 7), 0);
        assert_eq!(Color::White.advancement(1, 7), 5);
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("W".parse::<Color>().unwrap(), Color::White);
        assert_eq!("1".parse::<Color>().unwrap(), Color::Black);
        assert!("red".parse::<Color>().is_err());
        assert_eq!("3".parse::<Color>(), Err(BoardError::InvalidPlayer(3)));
        assert_eq!(Color::White.player(), 2);
    }

    #[test]
    fn test_king_directions() {
        assert_eq!(Piece::man(Color::Black).row_directions(), &[1]);
        assert_eq!(Piece::man(Color::White).row_directions(), &[-1]);
        assert_eq!(Piece::king(Color::White).row_directions(), &[-1, 1]);
    }
}
