/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{tune, Color, Move, MoveList};

/// Yields moves in descending order of a score, lazily.
///
/// Each call to [`Iterator::next`] performs one pass of a selection sort,
/// so a search that cuts off after the first few moves never pays for sorting the rest.
pub struct MovePicker {
    moves: MoveList,
    scores: Vec<i32>,
    current: usize,
}

impl MovePicker {
    /// Scores every move in `moves` with `score_fn`. Higher scores are yielded first.
    pub fn new(moves: MoveList, score_fn: impl Fn(&Move) -> i32) -> Self {
        let scores = moves.iter().map(score_fn).collect();

        Self {
            moves,
            scores,
            current: 0,
        }
    }

    /// Orders moves for `color` on a board with `rows` rows, by [`move_priority`].
    #[inline(always)]
    pub fn for_color(moves: MoveList, color: Color, rows: u8) -> Self {
        Self::new(moves, |mv| move_priority(mv, color, rows))
    }
}

impl Iterator for MovePicker {
    type Item = (Move, i32);

    fn next(&mut self) -> Option<Self::Item> {
        // No more moves left
        if self.current >= self.moves.len() {
            return None;
        }

        // Fetch the current best
        let mut best_index = self.current;
        let mut best_score = self.scores[best_index];

        // Find the index of the next highest score
        for i in (self.current + 1)..self.moves.len() {
            if self.scores[i] > best_score {
                best_index = i;
                best_score = self.scores[i];
            }
        }

        // Swap, if necessary
        if best_index != self.current {
            self.moves.swap(self.current, best_index);
            self.scores.swap(self.current, best_index);
        }

        let mv = std::mem::take(&mut self.moves[self.current]);
        let score = self.scores[self.current];

        // Increment for next call
        self.current += 1;

        Some((mv, score))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.moves.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MovePicker {}

/// Ordering priority of `mv` when played by `color` on a board with `rows` rows.
///
/// Every capture outranks every step, and longer capture chains rank first.
/// Moves ending on `color`'s promotion row get a smaller flat bonus.
///
/// # Example
/// ```
/// # use kingme::{move_priority, Color, Move};
/// let step: Move = "(2,1)-(3,2)".parse().unwrap();
/// let jump: Move = "(2,1)-(4,3)".parse().unwrap();
/// assert!(move_priority(&jump, Color::Black, 8) > move_priority(&step, Color::Black, 8));
/// ```
#[inline(always)]
pub fn move_priority(mv: &Move, color: Color, rows: u8) -> i32 {
    let captures = mv.num_captures() as i32;
    let promotes = mv.to().is_some_and(|to| to.row() == color.promotion_row(rows));

    captures * tune::capture_bonus!() + promotes as i32 * tune::promotion_bonus!()
}

/// Sorts `moves` for `color` so the most promising moves come first.
pub fn order_moves(moves: MoveList, color: Color, rows: u8) -> MoveList {
    MovePicker::for_color(moves, color, rows)
        .map(|(mv, _)| mv)
        .collect()
}
