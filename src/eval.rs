/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{tune, Board, Color, Outcome, Score};

/// Per-side counts that feed the evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    /// Uncrowned pieces.
    pub men: i32,

    /// Crowned pieces.
    pub kings: i32,

    /// Number of legal moves.
    pub mobility: i32,

    /// Pieces off the outer ring of the board.
    pub center: i32,

    /// Sum of rows every piece has travelled from its own back row.
    pub advancement: i32,
}

impl Features {
    /// Collects the features of `color` on `board`.
    pub fn collect(board: &Board, color: Color) -> Self {
        let (rows, cols) = (board.rows(), board.cols());

        let mut features = board
            .pieces_of(color)
            .fold(Self::default(), |mut acc, (square, piece)| {
                if piece.is_king() {
                    acc.kings += 1;
                } else {
                    acc.men += 1;
                }

                acc.center += square.is_center(rows, cols) as i32;
                acc.advancement += color.advancement(square.row(), rows) as i32;
                acc
            });

        features.mobility = board.all_legal_moves(color).len() as i32;
        features
    }

    /// Weighted sum of these features.
    #[inline(always)]
    pub fn weighted(&self) -> i32 {
        tune::king_weight!() * self.kings
            + tune::man_weight!() * self.men
            + tune::mobility_weight!() * self.mobility
            + tune::center_weight!() * self.center
            + tune::advancement_weight!() * self.advancement
    }
}

/// Encapsulates the logic of scoring a board.
///
/// Scores are always relative to the `perspective` color: positive is good for it, negative is good for its opponent.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The board to evaluate.
    board: &'a Board,

    /// Whose point of view the score is expressed in.
    perspective: Color,

    /// The color about to act on `board`, used when deciding whether the game is already over.
    to_move: Color,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`] for `board` from `perspective`'s point of view.
    ///
    /// By default, `perspective` is assumed to be the side to act.
    #[inline(always)]
    pub fn new(board: &'a Board, perspective: Color) -> Self {
        Self {
            board,
            perspective,
            to_move: perspective,
        }
    }

    /// Sets the color about to act on the board.
    #[inline(always)]
    pub fn to_move(mut self, color: Color) -> Self {
        self.to_move = color;
        self
    }

    /// Evaluate the board.
    ///
    /// Decided games score exactly [`Score::WIN`], [`Score::LOSS`] or [`Score::DRAW`].
    /// Every other board receives a heuristic score strictly between the win and loss scores.
    pub fn eval(&self) -> Score {
        match self.board.outcome(self.to_move) {
            Outcome::Win(color) if color == self.perspective => Score::WIN,
            Outcome::Win(_) => Score::LOSS,
            Outcome::Draw => Score::DRAW,
            Outcome::Ongoing => self.heuristic(),
        }
    }

    /// Material, mobility, center control, and advancement, ignoring whether the game is over.
    pub fn heuristic(&self) -> Score {
        let ours = Features::collect(self.board, self.perspective);
        let theirs = Features::collect(self.board, self.perspective.opponent());

        Score::new(ours.weighted() - theirs.weighted()).heuristic()
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ours = Features::collect(self.board, self.perspective);
        let theirs = Features::collect(self.board, self.perspective.opponent());

        let rows = [
            ("kings", ours.kings, theirs.kings, tune::king_weight!()),
            ("men", ours.men, theirs.men, tune::man_weight!()),
            ("mobility", ours.mobility, theirs.mobility, tune::mobility_weight!()),
            ("center", ours.center, theirs.center, tune::center_weight!()),
            (
                "advancement",
                ours.advancement,
                theirs.advancement,
                tune::advancement_weight!(),
            ),
        ];

        writeln!(
            f,
            "{:<12}{:>8}{:>8}{:>8}{:>8}",
            "feature",
            self.perspective.name(),
            self.perspective.opponent().name(),
            "weight",
            "total"
        )?;
        for (name, us, them, weight) in rows {
            writeln!(
                f,
                "{name:<12}{us:>8}{them:>8}{weight:>8}{:>8}",
                weight * (us - them)
            )?;
        }

        write!(f, "Score: {:?}", self.eval())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Piece, Square};

    #[test]
    fn test_start_position_is_balanced() {
        let board = Board::new(8, 8, 3).unwrap();
        assert_eq!(Evaluator::new(&board, Color::Black).eval(), Score::DRAW);
        assert_eq!(Evaluator::new(&board, Color::White).eval(), Score::DRAW);
    }

    #[test]
    fn test_won_board_ignores_material() {
        // Material is level, but White is to act and both kings are smothered.
        let board: Board = "
            W . W .
            . b . b
            b . b .
            . . . .
        "
        .parse()
        .unwrap();

        assert_eq!(board.outcome(Color::White), Outcome::Win(Color::Black));
        assert_eq!(
            Evaluator::new(&board, Color::Black)
                .to_move(Color::White)
                .eval(),
            Score::WIN
        );
        assert_eq!(
            Evaluator::new(&board, Color::White).eval(),
            Score::LOSS
        );
    }

    #[test]
    fn test_no_pieces_is_a_loss() {
        let board: Board = "
            . b . .
            . . . .
            . . . .
            . . . .
        "
        .parse()
        .unwrap();

        assert_eq!(Evaluator::new(&board, Color::Black).eval(), Score::WIN);
        assert_eq!(Evaluator::new(&board, Color::White).eval(), Score::LOSS);
    }

    #[test]
    fn test_kings_outweigh_men() {
        let kings: Board = "
            . . . . . .
            . . . . . .
            . . W . . .
            . . . . . .
            . . . b . .
            . . . . . .
        "
        .parse()
        .unwrap();

        let score = Evaluator::new(&kings, Color::White).eval();
        assert!(score > Score::DRAW, "{score:?}");
        assert!(!score.is_decisive());
    }

    #[test]
    fn test_heuristic_is_bounded() {
        // A huge material imbalance on the largest board still stays below a proven win.
        let mut board = Board::empty(16, 16).unwrap();
        for (square, _) in Board::new(16, 16, 7).unwrap().pieces() {
            board.set(square, Some(Piece::king(Color::White)));
        }
        board.set(Square::new(7, 0), Some(Piece::man(Color::Black)));

        let score = Evaluator::new(&board, Color::White).heuristic();
        assert!(score <= Score::MAX_HEURISTIC);
        assert!(score < Score::WIN);
    }

    #[test]
    fn test_features() {
        let board = Board::new(7, 7, 2).unwrap();
        let black = Features::collect(&board, Color::Black);

        assert_eq!(black.men, 7);
        assert_eq!(black.kings, 0);
        // Row 1 pieces are advanced by one row each, row 0 pieces not at all
        assert_eq!(black.advancement, 4);
        assert!(black.mobility > 0);
    }
}
