/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use super::{BoardError, Color, Move, MoveList, Piece, Square};
use crate::tune;

/// Smallest permitted number of rows or columns.
pub const MIN_DIMENSION: u8 = 2;

/// Largest permitted number of rows or columns.
pub const MAX_DIMENSION: u8 = 16;

/// Number of consecutive non-capturing plies after which the game is drawn.
pub const TIE_MAX: u16 = tune::tie_max!();

/// The state of a game, as seen by the side about to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The game continues.
    Ongoing,

    /// The provided color has won.
    Win(Color),

    /// Neither side can win.
    Draw,
}

impl Outcome {
    /// Returns `true` if the game is over.
    #[inline(always)]
    pub const fn is_decided(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// Returns the winner, if there is one.
    #[inline(always)]
    pub const fn winner(&self) -> Option<Color> {
        match self {
            Self::Win(color) => Some(*color),
            _ => None,
        }
    }
}

/// A checkers board: the placement of every piece, plus the bookkeeping the draw rule needs.
///
/// The side to move is *not* stored here; callers track whose turn it is.
/// Cloning a [`Board`] yields a fully independent copy, which is how search branches stay isolated.
///
/// The basic methods you're probably looking for are [`Board::new`], [`Board::legal_moves`],
/// [`Board::make_move`], and [`Board::outcome`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cols: u8,
    rows: u8,

    /// Row-major cells, `rows * cols` long.
    cells: Vec<Option<Piece>>,

    /// Plies played since the last capture.
    quiet_plies: u16,
}

impl Board {
    /// Creates a board with `cols` columns and `rows` rows, and `p` rows of men for each side.
    ///
    /// Black fills the top `p` rows and White the bottom `p` rows, on dark squares only.
    ///
    /// # Example
    /// ```
    /// # use kingme::{Board, Color};
    /// let board = Board::new(7, 7, 2).unwrap();
    /// assert_eq!(board.count(Color::Black), (7, 0));
    /// assert!(Board::new(7, 4, 2).is_err());
    /// ```
    pub fn new(cols: u8, rows: u8, p: u8) -> Result<Self, BoardError> {
        if p == 0 || rows <= 2 * p {
            return Err(BoardError::InvalidDimensions { cols, rows, p });
        }

        let mut board =
            Self::empty(cols, rows).map_err(|_| BoardError::InvalidDimensions { cols, rows, p })?;

        for row in 0..p {
            board.fill_row(row, Color::Black);
            board.fill_row(rows - 1 - row, Color::White);
        }

        Ok(board)
    }

    /// Creates a board of the provided size with no pieces on it.
    pub fn empty(cols: u8, rows: u8) -> Result<Self, BoardError> {
        let range = MIN_DIMENSION..=MAX_DIMENSION;
        if !range.contains(&cols) || !range.contains(&rows) {
            return Err(BoardError::InvalidDimensions { cols, rows, p: 0 });
        }

        Ok(Self {
            cols,
            rows,
            cells: vec![None; rows as usize * cols as usize],
            quiet_plies: 0,
        })
    }

    /// Places men of `color` on every dark square of `row`.
    fn fill_row(&mut self, row: u8, color: Color) {
        for col in 0..self.cols {
            let square = Square::new(row, col);
            if square.is_dark() {
                self.set(square, Some(Piece::man(color)));
            }
        }
    }

    #[inline(always)]
    pub const fn cols(&self) -> u8 {
        self.cols
    }

    #[inline(always)]
    pub const fn rows(&self) -> u8 {
        self.rows
    }

    /// Plies played since the last capture.
    #[inline(always)]
    pub const fn quiet_plies(&self) -> u16 {
        self.quiet_plies
    }

    #[inline(always)]
    fn index(&self, square: Square) -> usize {
        square.row() as usize * self.cols as usize + square.col() as usize
    }

    /// Returns `true` if `square` lies on this board.
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        square.row() < self.rows && square.col() < self.cols
    }

    /// Fetches the piece on `square`, if there is one.
    #[inline(always)]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if self.contains(square) {
            self.cells[self.index(square)]
        } else {
            None
        }
    }

    /// Places `piece` on `square` (or clears it, for `None`). Squares off the board are ignored.
    #[inline(always)]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        if self.contains(square) {
            let index = self.index(square);
            self.cells[index] = piece;
        }
    }

    /// Iterates over every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            let square = Square::new((i / self.cols as usize) as u8, (i % self.cols as usize) as u8);
            cell.map(|piece| (square, piece))
        })
    }

    /// Iterates over every square occupied by `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color() == color)
    }

    /// Counts the `(men, kings)` that `color` has on the board.
    pub fn count(&self, color: Color) -> (u32, u32) {
        self.pieces_of(color)
            .fold((0, 0), |(men, kings), (_, piece)| {
                if piece.is_king() {
                    (men, kings + 1)
                } else {
                    (men + 1, kings)
                }
            })
    }

    /// Generates every legal move for `color`, grouped by the square each move starts from.
    ///
    /// Captures are compulsory: if any capture exists, only capture sequences are returned.
    /// Pieces without a legal move produce no group.
    pub fn legal_moves(&self, color: Color) -> Vec<MoveList> {
        let captures = self
            .pieces_of(color)
            .map(|(square, piece)| {
                let mut moves = MoveList::new();
                self.extend_captures(square, piece, Move::new([square]), &mut moves);
                moves
            })
            .filter(|moves| !moves.is_empty())
            .collect::<Vec<_>>();

        if !captures.is_empty() {
            return captures;
        }

        self.pieces_of(color)
            .map(|(square, piece)| self.steps_from(square, piece))
            .filter(|moves| !moves.is_empty())
            .collect()
    }

    /// Generates every legal move for `color` as a single flat list.
    #[inline(always)]
    pub fn all_legal_moves(&self, color: Color) -> MoveList {
        self.legal_moves(color).into_iter().flatten().collect()
    }

    /// Returns `true` if `color` has at least one legal move.
    ///
    /// Cheaper than generating every move, as capture chains are not followed.
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pieces_of(color).any(|(square, piece)| {
            piece.row_directions().iter().any(|&dr| {
                [-1, 1].into_iter().any(|dc| {
                    let step = square.offset(dr, dc, self.rows, self.cols);
                    let land = square.offset(2 * dr, 2 * dc, self.rows, self.cols);

                    step.is_some_and(|step| self.piece_at(step).is_none())
                        || self.can_jump(color, step, land)
                })
            })
        })
    }

    /// Returns `true` if a piece of `color` can capture over `over` onto `land`.
    #[inline(always)]
    fn can_jump(&self, color: Color, over: Option<Square>, land: Option<Square>) -> bool {
        match (over, land) {
            (Some(over), Some(land)) => {
                self.piece_at(over).is_some_and(|p| p.color() != color)
                    && self.piece_at(land).is_none()
            }
            _ => false,
        }
    }

    /// Every non-capturing step available to `piece` on `from`.
    fn steps_from(&self, from: Square, piece: Piece) -> MoveList {
        let mut moves = MoveList::new();

        for &dr in piece.row_directions() {
            for dc in [-1, 1] {
                if let Some(to) = from.offset(dr, dc, self.rows, self.cols) {
                    if self.piece_at(to).is_none() {
                        moves.push(Move::new([from, to]));
                    }
                }
            }
        }

        moves
    }

    /// Recursively follows every capture chain available to `piece` standing on `at`, having travelled `path` so far.
    ///
    /// Each jump is made on a copy of the board, so captured pieces are removed as the chain progresses.
    /// A man that is crowned mid-chain ends its move.
    fn extend_captures(&self, at: Square, piece: Piece, path: Move, moves: &mut MoveList) {
        let color = piece.color();
        let mut extended = false;

        for &dr in piece.row_directions() {
            for dc in [-1, 1] {
                let over = at.offset(dr, dc, self.rows, self.cols);
                let land = at.offset(2 * dr, 2 * dc, self.rows, self.cols);

                if !self.can_jump(color, over, land) {
                    continue;
                }
                let (Some(over), Some(land)) = (over, land) else {
                    continue;
                };

                extended = true;

                let crowned = !piece.is_king() && land.row() == color.promotion_row(self.rows);
                let moved = if crowned { piece.promoted() } else { piece };

                let mut next = self.clone();
                next.set(at, None);
                next.set(over, None);
                next.set(land, Some(moved));

                let mut path = path.clone();
                path.push(land);

                if crowned {
                    moves.push(path);
                } else {
                    next.extend_captures(land, moved, path, moves);
                }
            }
        }

        if !extended && path.len() > 1 {
            moves.push(path);
        }
    }

    /// Applies `mv` for `color`, after checking that it is legal.
    ///
    /// Illegal moves leave the board untouched and return an error.
    pub fn make_move(&mut self, mv: &Move, color: Color) -> Result<(), BoardError> {
        if mv.is_empty() {
            return Err(BoardError::EmptyMove);
        }

        let legal = self
            .legal_moves(color)
            .into_iter()
            .flatten()
            .any(|candidate| candidate == *mv);

        if !legal {
            return Err(BoardError::IllegalMove {
                mv: mv.to_string(),
                color,
            });
        }

        self.make_move_unchecked(mv);
        Ok(())
    }

    /// Applies `mv` without checking legality.
    ///
    /// Only moves produced by [`Board::legal_moves`] for this exact board should be passed here.
    pub fn make_move_unchecked(&mut self, mv: &Move) {
        let (Some(from), Some(to)) = (mv.from(), mv.to()) else {
            return;
        };
        let Some(mut piece) = self.piece_at(from) else {
            return;
        };

        for pair in mv.squares().windows(2) {
            if pair[0].distance_rows(&pair[1]) == 2 {
                self.set(pair[0].midpoint(&pair[1]), None);
            }
        }

        if !piece.is_king() && to.row() == piece.color().promotion_row(self.rows) {
            piece = piece.promoted();
        }

        self.set(from, None);
        self.set(to, Some(piece));

        if mv.is_capture() {
            self.quiet_plies = 0;
        } else {
            self.quiet_plies = self.quiet_plies.saturating_add(1);
        }
    }

    /// Copies `self` and returns a [`Board`] after having applied the provided [`Move`].
    #[inline(always)]
    pub fn with_move_made(&self, mv: &Move) -> Self {
        let mut copied = self.clone();
        copied.make_move_unchecked(mv);
        copied
    }

    /// Determines whether the game is over, given that `to_move` is about to act.
    ///
    /// Both sides are checked: a side without pieces has lost, the side to act loses if it cannot move,
    /// and the game is drawn once [`TIE_MAX`] plies pass without a capture.
    pub fn outcome(&self, to_move: Color) -> Outcome {
        let opponent = to_move.opponent();

        let (men, kings) = self.count(to_move);
        if men + kings == 0 {
            return Outcome::Win(opponent);
        }

        let (men, kings) = self.count(opponent);
        if men + kings == 0 {
            return Outcome::Win(to_move);
        }

        if self.quiet_plies >= TIE_MAX {
            return Outcome::Draw;
        }

        if !self.has_legal_move(to_move) {
            return Outcome::Win(opponent);
        }

        Outcome::Ongoing
    }
}

impl FromStr for Board {
    type Err = BoardError;
    /// Parses a board drawn as one line per row, using `.` for empty cells,
    /// `b`/`w` for men and `B`/`W` for kings. Whitespace within a line is ignored.
    ///
    /// # Example
    /// ```
    /// # use kingme::{Board, Color, Square};
    /// let board: Board = "
    ///     . b . .
    ///     . . . .
    ///     . . . .
    ///     W . . .
    /// ".parse().unwrap();
    /// assert_eq!(board.count(Color::White), (0, 1));
    /// assert!(board.piece_at(Square::new(0, 1)).is_some());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(|line| line.split_whitespace().collect::<String>())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();

        let rows = lines.len();
        let cols = lines.first().map(|line| line.chars().count()).unwrap_or(0);
        if lines.iter().any(|line| line.chars().count() != cols) {
            return Err(BoardError::ParseBoard(String::from(
                "every row must have the same number of cells",
            )));
        }

        let mut board = Self::empty(
            u8::try_from(cols).unwrap_or(u8::MAX),
            u8::try_from(rows).unwrap_or(u8::MAX),
        )?;

        for (row, line) in lines.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                let piece = match c {
                    '.' => None,
                    'b' => Some(Piece::man(Color::Black)),
                    'w' => Some(Piece::man(Color::White)),
                    'B' => Some(Piece::king(Color::Black)),
                    'W' => Some(Piece::king(Color::White)),
                    _ => return Err(BoardError::ParseBoard(format!("unknown cell {c:?}"))),
                };
                board.set(Square::new(row as u8, col as u8), piece);
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.cols {
            write!(f, "{col:>3}")?;
        }
        writeln!(f)?;

        write!(f, "  +")?;
        for _ in 0..self.cols {
            write!(f, "---")?;
        }
        writeln!(f)?;

        for row in 0..self.rows {
            write!(f, "{row:>2}|")?;
            for col in 0..self.cols {
                let c = self
                    .piece_at(Square::new(row, col))
                    .map(|p| p.char())
                    .unwrap_or('.');
                write!(f, "{c:>3}")?;
            }
            writeln!(f)?;
        }

        write!(f, "Quiet plies: {}/{TIE_MAX}", self.quiet_plies)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    #[test]
    fn test_initial_layout() {
        let board = Board::new(8, 8, 3).unwrap();
        assert_eq!(board.count(Color::Black), (12, 0));
        assert_eq!(board.count(Color::White), (12, 0));
        assert!(board.pieces().all(|(square, _)| square.is_dark()));
        assert_eq!(board.piece_at(sq(0, 1)), Some(Piece::man(Color::Black)));
        assert_eq!(board.piece_at(sq(7, 0)), Some(Piece::man(Color::White)));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Board::new(8, 6, 3).is_err());
        assert!(Board::new(1, 8, 3).is_err());
        assert!(Board::new(8, 8, 0).is_err());
        assert!(Board::new(17, 17, 2).is_err());
    }

    #[test]
    fn test_opening_moves() {
        let board = Board::new(8, 8, 3).unwrap();
        assert_eq!(board.all_legal_moves(Color::Black).len(), 7);
        assert_eq!(board.all_legal_moves(Color::White).len(), 7);

        // Grouped by origin: four front-row men can move
        assert_eq!(board.legal_moves(Color::Black).len(), 4);
    }

    #[test]
    fn test_captures_are_compulsory() {
        let board: Board = "
            . . . . .
            . . b . .
            . w . . .
            . . . . .
            . . . w .
        "
        .parse()
        .unwrap();

        let moves = board.all_legal_moves(Color::Black);
        assert_eq!(moves, vec![Move::new([sq(1, 2), sq(3, 0)])]);
    }

    #[test]
    fn test_multi_capture_chain() {
        let board: Board = "
            . b . . . . .
            . . w . . . .
            . . . . . . .
            . . . . w . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
        "
        .parse()
        .unwrap();

        let moves = board.all_legal_moves(Color::Black);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0], "(0,1)-(2,3)-(4,5)");

        let after = board.with_move_made(&moves[0]);
        assert_eq!(after.count(Color::White), (0, 0));
        assert_eq!(after.piece_at(sq(4, 5)), Some(Piece::man(Color::Black)));
        assert_eq!(after.outcome(Color::White), Outcome::Win(Color::Black));
    }

    #[test]
    fn test_branching_captures() {
        let board: Board = "
            . . . . . . .
            . . . b . . .
            . . w . w . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
            . . . . . . .
        "
        .parse()
        .unwrap();

        let moves = board.all_legal_moves(Color::Black);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|mv| mv.num_captures() == 1));
    }

    #[test]
    fn test_promotion_ends_capture() {
        let board: Board = "
            . . . . .
            . . . . .
            . . . . .
            . b . . .
            . . w . .
            . . . . .
        "
        .parse()
        .unwrap();

        // Jumping onto the last row crowns the man; it may not continue as a king.
        let mv: Move = "(3,1)-(5,3)".parse().unwrap();
        let moves = board.all_legal_moves(Color::Black);
        assert_eq!(moves, vec![mv.clone()]);

        let after = board.with_move_made(&mv);
        assert_eq!(after.piece_at(sq(5, 3)), Some(Piece::king(Color::Black)));
    }

    #[test]
    fn test_kings_move_backwards() {
        let board: Board = "
            . . . .
            . . . .
            . W . .
            . . . .
        "
        .parse()
        .unwrap();

        assert_eq!(board.all_legal_moves(Color::White).len(), 4);
    }

    #[test]
    fn test_make_move_rejects_illegal() {
        let mut board = Board::new(7, 7, 2).unwrap();
        let before = board.clone();

        let bogus: Move = "(0,1)-(1,2)".parse().unwrap();
        assert!(board.make_move(&bogus, Color::Black).is_err());
        assert!(board.make_move(&Move::NONE, Color::Black).is_err());
        assert_eq!(board, before);

        let mv = board.all_legal_moves(Color::White)[0].clone();
        assert!(board.make_move(&mv, Color::White).is_ok());
        assert_ne!(board, before);
        assert_eq!(board.quiet_plies(), 1);
    }

    #[test]
    fn test_blocked_side_loses() {
        let board: Board = "
            . . . .
            . . . .
            . w . .
            b . b .
        "
        .parse()
        .unwrap();

        // Black's men sit on their promotion row, so they have nowhere to go.
        assert_eq!(board.outcome(Color::White), Outcome::Ongoing);
        assert_eq!(board.outcome(Color::Black), Outcome::Win(Color::White));
    }

    #[test]
    fn test_tie_counter_draws() {
        let mut board = Board::new(8, 8, 3).unwrap();
        board.quiet_plies = TIE_MAX;
        assert_eq!(board.outcome(Color::Black), Outcome::Draw);
    }

    #[test]
    fn test_clones_are_independent() {
        let board = Board::new(7, 7, 2).unwrap();
        let mv = board.all_legal_moves(Color::Black)[0].clone();
        let child = board.with_move_made(&mv);

        assert_ne!(board, child);
        assert_eq!(board, Board::new(7, 7, 2).unwrap());
    }
}
