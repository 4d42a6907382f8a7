/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::tune;

/// A numerical evaluation of a position, from one player's perspective.
///
/// Heuristic scores always lie strictly between [`Score::LOSS`] and [`Score::WIN`],
/// so any decided game compares correctly against any undecided one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Larger than any score a position can receive. Only used as a search bound.
    pub const INF: Self = Self(i16::MAX as i32);

    /// Score of a game won by the perspective player.
    pub const WIN: Self = Self(tune::win_score!());

    /// Score of a game lost by the perspective player.
    pub const LOSS: Self = Self(-tune::win_score!());

    /// Score of a drawn game.
    pub const DRAW: Self = Self(0);

    /// Highest score a heuristic evaluation may produce.
    pub const MAX_HEURISTIC: Self = Self(Self::WIN.0 - 1);

    /// Lowest score a heuristic evaluation may produce.
    pub const MIN_HEURISTIC: Self = Self(Self::LOSS.0 + 1);

    /// Creates a new [`Score`].
    #[inline(always)]
    pub const fn new(score: i32) -> Self {
        Self(score)
    }

    /// Returns `true` if this is the score of a decided game won or lost.
    #[inline(always)]
    pub const fn is_decisive(&self) -> bool {
        self.0.abs() >= Self::WIN.0
    }

    /// Clamps a heuristic score into the range reserved for undecided positions.
    ///
    /// # Example
    /// ```
    /// # use kingme::Score;
    /// assert_eq!(Score::new(123_456).heuristic(), Score::MAX_HEURISTIC);
    /// assert_eq!(Score::new(-40).heuristic(), Score::new(-40));
    /// ```
    #[inline(always)]
    pub fn heuristic(self) -> Self {
        self.clamp(Self::MIN_HEURISTIC, Self::MAX_HEURISTIC)
    }
}

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(self.0.neg())
    }
}

impl PartialEq<i32> for Score {
    fn eq(&self, other: &i32) -> bool {
        self.0.eq(other)
    }
}

impl fmt::Display for Score {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::WIN => write!(f, "{} (win)", self.0),
            Self::LOSS => write!(f, "{} (loss)", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_ordered() {
        assert!(-Score::INF < Score::LOSS);
        assert!(Score::LOSS < Score::MIN_HEURISTIC);
        assert!(Score::MAX_HEURISTIC < Score::WIN);
        assert!(Score::WIN < Score::INF);
        assert_eq!(-Score::WIN, Score::LOSS);
    }

    #[test]
    fn test_decisive() {
        assert!(Score::WIN.is_decisive());
        assert!(Score::LOSS.is_decisive());
        assert!(!Score::DRAW.is_decisive());
        assert!(!Score::MAX_HEURISTIC.is_decisive());
    }

    #[test]
    fn test_heuristic_clamp() {
        assert_eq!(Score::new(-99_999).heuristic(), Score::MIN_HEURISTIC);
        assert_eq!(Score::new(250).heuristic(), 250);
    }
}
