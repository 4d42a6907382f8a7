/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use crate::{order_moves, tune, Board, Color, Evaluator, Move, Score};

/// Maximum depth that can be searched
pub const MAX_DEPTH: usize = 64;

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search, or `None` if there were no legal moves.
    pub bestmove: Option<Move>,

    /// Evaluation of the position after `bestmove` is made, from the searching side's perspective.
    pub score: Score,

    /// Depth the search was conducted at.
    pub depth: usize,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: -Score::INF,
            depth: 0,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum depth to execute the search, in plies. The root move counts as the first ply.
    pub max_depth: usize,
}

impl SearchConfig {
    /// A config searching to `max_depth` plies, clamped to `1..=MAX_DEPTH`.
    #[inline(always)]
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.clamp(1, MAX_DEPTH),
        }
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::with_depth(tune::default_depth!())
    }
}

/// Lower and upper bounds of the scores still relevant to a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchBounds {
    alpha: Score,
    beta: Score,
}

impl Default for SearchBounds {
    #[inline(always)]
    fn default() -> Self {
        Self {
            alpha: -Score::INF,
            beta: Score::INF,
        }
    }
}

/// Executes a depth-limited [alpha-beta](https://www.chessprogramming.org/Alpha-Beta) search on the provided board.
///
/// The searching color is the MAX player; its opponent is the MIN player.
/// Every successor is searched on its own copy of the board.
pub struct Search<'a> {
    /// The board to search on.
    ///
    /// This board will be copied when moves are applied to it.
    board: &'a Board,

    /// The side to move on `board`, and the side the search is maximizing for.
    color: Color,

    /// Number of nodes visited so far.
    nodes: u64,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,
}

impl<'a> Search<'a> {
    /// Construct a new [`Search`] instance for `color` to move on `board`.
    #[inline(always)]
    pub fn new(board: &'a Board, color: Color, config: SearchConfig) -> Self {
        Self {
            board,
            color,
            nodes: 0,
            config,
        }
    }

    /// Start the search, returning its results.
    ///
    /// If there are no legal moves, the result has no `bestmove`.
    /// If there is exactly one, it is returned without searching.
    pub fn start(mut self) -> SearchResult {
        let starttime = Instant::now();
        let depth = self.config.max_depth.clamp(1, MAX_DEPTH);
        let moves = order_moves(
            self.board.all_legal_moves(self.color),
            self.color,
            self.board.rows(),
        );

        let res = match moves.len() {
            0 => SearchResult {
                score: self.evaluate(self.board, self.color),
                depth,
                ..Default::default()
            },

            1 => {
                let after = self.board.with_move_made(&moves[0]);
                SearchResult {
                    nodes: 1,
                    score: self.evaluate(&after, self.color.opponent()),
                    bestmove: moves.into_iter().next(),
                    depth,
                }
            }

            _ => self.search_root(moves, depth),
        };

        log::debug!(
            "{} searched depth {} in {:?}: bestmove {} score {:?} nodes {}",
            self.color,
            res.depth,
            starttime.elapsed(),
            res.bestmove.clone().unwrap_or_default(),
            res.score,
            res.nodes,
        );

        res
    }

    /// Searches every root candidate, keeping the first move to reach the strictly greatest score.
    fn search_root(&mut self, moves: Vec<Move>, depth: usize) -> SearchResult {
        let mut bounds = SearchBounds::default();
        let mut best = SearchResult {
            depth,
            ..Default::default()
        };

        self.nodes += 1;
        for mv in moves {
            let child = self.board.with_move_made(&mv);
            let score = self.min_value(&child, depth - 1, bounds);

            if score > best.score {
                best.score = score;
                best.bestmove = Some(mv);
            }

            bounds.alpha = bounds.alpha.max(best.score);
            if best.score >= bounds.beta {
                break;
            }
        }

        best.nodes = self.nodes;
        best
    }

    /// A layer where the searching color is to act.
    fn max_value(&mut self, board: &Board, depth: usize, mut bounds: SearchBounds) -> Score {
        self.nodes += 1;
        let side = self.color;

        if depth == 0 || board.outcome(side).is_decided() {
            return self.evaluate(board, side);
        }

        let moves = order_moves(board.all_legal_moves(side), side, board.rows());
        if moves.is_empty() {
            return self.evaluate(board, side);
        }

        let mut value = -Score::INF;
        for mv in moves {
            let child = board.with_move_made(&mv);
            value = value.max(self.min_value(&child, depth - 1, bounds));

            if value >= bounds.beta {
                return value;
            }
            bounds.alpha = bounds.alpha.max(value);
        }

        value
    }

    /// A layer where the opponent of the searching color is to act.
    fn min_value(&mut self, board: &Board, depth: usize, mut bounds: SearchBounds) -> Score {
        self.nodes += 1;
        let side = self.color.opponent();

        if depth == 0 || board.outcome(side).is_decided() {
            return self.evaluate(board, side);
        }

        let moves = order_moves(board.all_legal_moves(side), side, board.rows());
        if moves.is_empty() {
            return self.evaluate(board, side);
        }

        let mut value = Score::INF;
        for mv in moves {
            let child = board.with_move_made(&mv);
            value = value.min(self.max_value(&child, depth - 1, bounds));

            if value <= bounds.alpha {
                return value;
            }
            bounds.beta = bounds.beta.min(value);
        }

        value
    }

    /// Scores `board` for the searching color, with `side` about to act.
    #[inline(always)]
    fn evaluate(&self, board: &Board, side: Color) -> Score {
        Evaluator::new(board, self.color).to_move(side).eval()
    }
}

/// Exhaustive minimax value of `board` for `color` to move, searched to `depth` plies without pruning.
///
/// Far slower than [`Search`], but useful as a reference for what the pruned search must return.
pub fn minimax(board: &Board, color: Color, depth: usize) -> Score {
    fn value(board: &Board, perspective: Color, side: Color, depth: usize) -> Score {
        let leaf = || Evaluator::new(board, perspective).to_move(side).eval();

        if depth == 0 || board.outcome(side).is_decided() {
            return leaf();
        }

        let children = board
            .all_legal_moves(side)
            .into_iter()
            .map(|mv| value(&board.with_move_made(&mv), perspective, side.opponent(), depth - 1));

        let best = if side == perspective {
            children.max()
        } else {
            children.min()
        };

        best.unwrap_or_else(leaf)
    }

    value(board, color, color, depth)
}
