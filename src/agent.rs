/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Board, Color, MctsConfig, MctsSearch, Move, Search, SearchConfig};

/// The families of move-selection strategy an [`Agent`] can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum EngineKind {
    /// Depth-limited alpha-beta search.
    #[default]
    Minimax,

    /// Time-bounded Monte Carlo Tree Search.
    Mcts,

    /// A uniformly random legal move.
    Random,
}

/// How an [`Agent`] picks its move when it has more than one option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Alpha-beta search with the provided config.
    Minimax(SearchConfig),

    /// Monte Carlo Tree Search with the provided config.
    Mcts(MctsConfig),

    /// Uniformly random legal moves.
    Random,
}

impl Strategy {
    /// Alpha-beta search to `depth` plies.
    #[inline(always)]
    pub fn minimax(depth: usize) -> Self {
        Self::Minimax(SearchConfig::with_depth(depth))
    }

    /// Monte Carlo Tree Search for `budget` per move.
    #[inline(always)]
    pub fn mcts(budget: Duration) -> Self {
        Self::Mcts(MctsConfig::with_budget(budget))
    }

    /// The family this strategy belongs to.
    #[inline(always)]
    pub const fn kind(&self) -> EngineKind {
        match self {
            Self::Minimax(_) => EngineKind::Minimax,
            Self::Mcts(_) => EngineKind::Mcts,
            Self::Random => EngineKind::Random,
        }
    }
}

impl Default for Strategy {
    #[inline(always)]
    fn default() -> Self {
        Self::Minimax(SearchConfig::default())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimax(config) => write!(f, "minimax (depth {})", config.max_depth),
            Self::Mcts(config) => write!(f, "mcts ({}ms)", config.time_budget.as_millis()),
            Self::Random => write!(f, "random"),
        }
    }
}

/// One side of a game: the authoritative board, which color this side plays, and how it chooses moves.
///
/// An [`Agent`] learns its color from the first call to [`Agent::decide`].
#[derive(Debug, Clone)]
pub struct Agent {
    /// The board as this agent knows it.
    board: Board,

    /// The initial layout, restored on a new game.
    initial: Board,

    /// The color this agent plays, once known.
    color: Option<Color>,

    /// How moves are chosen.
    strategy: Strategy,

    /// Source of randomness for rollouts and random play.
    rng: ChaCha8Rng,
}

impl Agent {
    /// Creates an agent for a `cols`x`rows` board with `p` rows of men per side.
    ///
    /// # Example
    /// ```
    /// # use kingme::{Agent, Strategy};
    /// assert!(Agent::new(7, 7, 2, Strategy::Random, 0).is_ok());
    /// assert!(Agent::new(7, 4, 2, Strategy::Random, 0).is_err());
    /// ```
    pub fn new(cols: u8, rows: u8, p: u8, strategy: Strategy, seed: u64) -> Result<Self> {
        let board = Board::new(cols, rows, p).context("Failed to set up the board")?;

        Ok(Self {
            initial: board.clone(),
            board,
            color: None,
            strategy,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// The board as this agent currently knows it.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The color this agent plays, or `None` before its first decision.
    #[inline(always)]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline(always)]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The side about to act on [`Agent::board`].
    ///
    /// Before the agent has played, this is Black. Afterwards it is the agent's opponent.
    #[inline(always)]
    pub fn to_move(&self) -> Color {
        self.color.map(|color| color.opponent()).unwrap_or(Color::Black)
    }

    /// Resets the board to its initial layout and forgets this agent's color.
    pub fn new_game(&mut self) {
        self.board = self.initial.clone();
        self.color = None;
    }

    /// Takes a turn: applies the opponent's `last` move, then chooses, applies, and returns this side's reply.
    ///
    /// On the first call, an empty `last` means this side moves first and plays Black.
    /// Returns the empty move to resign when there are no legal moves.
    pub fn decide(&mut self, last: &Move) -> Result<Move> {
        let color = match self.color {
            Some(color) => {
                if !last.is_empty() {
                    self.apply(last, color.opponent())?;
                }
                color
            }

            None => {
                let color = if last.is_empty() {
                    Color::Black
                } else {
                    self.apply(last, Color::Black)?;
                    Color::White
                };

                log::info!("Playing as {color} (player {}) with {}", color.player(), self.strategy);
                self.color = Some(color);
                color
            }
        };

        let mut moves = self.board.all_legal_moves(color);
        let mv = match moves.len() {
            0 => {
                log::info!("{color} has no legal moves and resigns");
                return Ok(Move::NONE);
            }

            1 => moves.swap_remove(0),

            _ => match self.choose(color) {
                Some(mv) => mv,
                None => {
                    log::warn!("{} found no move; playing the first legal move", self.strategy);
                    moves.swap_remove(0)
                }
            },
        };

        self.apply(&mv, color)?;
        log::info!("{color} plays {mv}");

        Ok(mv)
    }

    /// Runs this agent's strategy for `color` on a snapshot of the board, without applying the result.
    pub fn choose(&mut self, color: Color) -> Option<Move> {
        let snapshot = self.board.clone();

        match self.strategy {
            Strategy::Minimax(config) => Search::new(&snapshot, color, config).start().bestmove,

            Strategy::Mcts(config) => MctsSearch::new(&snapshot, color, config)
                .run(&mut self.rng)
                .bestmove,

            Strategy::Random => snapshot
                .all_legal_moves(color)
                .choose(&mut self.rng)
                .cloned(),
        }
    }

    /// Applies `mv` for `color` to the authoritative board.
    fn apply(&mut self, mv: &Move, color: Color) -> Result<()> {
        self.board
            .make_move(mv, color)
            .with_context(|| format!("Failed to apply {mv} for {color}"))
    }
}
