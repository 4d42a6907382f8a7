/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{str::FromStr, time::Duration};

use clap::Parser;

use crate::{tune, Color, EngineKind, MctsConfig, Move, SearchConfig, Strategy};

/// A checkers engine that plays with alpha-beta search or Monte Carlo Tree Search.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of columns on the board.
    #[arg(long, default_value_t = 7)]
    pub cols: u8,

    /// Number of rows on the board.
    #[arg(long, default_value_t = 7)]
    pub rows: u8,

    /// Rows of men each side starts with.
    #[arg(short, long, default_value_t = 2)]
    pub pieces: u8,

    /// Strategy used to choose moves.
    #[arg(short, long, value_enum, default_value_t = EngineKind::Minimax)]
    pub engine: EngineKind,

    /// Search depth, in plies, for the minimax engine.
    #[arg(short, long, default_value_t = tune::default_depth!())]
    pub depth: usize,

    /// Thinking time per move, in milliseconds, for the MCTS engine.
    #[arg(short, long, default_value_t = tune::default_mcts_millis!())]
    pub time_ms: u64,

    /// Exploration constant of UCB1 for the MCTS engine.
    #[arg(long, default_value_t = tune::exploration_constant!())]
    pub exploration: f64,

    /// Seed for the engine's random number generator. Random if not provided.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Log filter, such as `info` or `kingme=debug`. Overridden by `RUST_LOG`.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Builds the [`Strategy`] of the provided kind, configured from these arguments.
    pub fn strategy(&self, kind: EngineKind) -> Strategy {
        match kind {
            EngineKind::Minimax => Strategy::Minimax(SearchConfig::with_depth(self.depth)),

            EngineKind::Mcts => Strategy::Mcts(MctsConfig {
                time_budget: Duration::from_millis(self.time_ms),
                exploration: self.exploration,
                ..Default::default()
            }),

            EngineKind::Random => Strategy::Random,
        }
    }

    /// The seed provided on the command line, or a fresh random one.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// A command to be sent to the engine.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND> | <MOVE>")
)]
pub enum EngineCommand {
    /// Have the engine make the first move of the game, playing Black.
    #[command(alias = "go")]
    Begin,

    /// Apply the opponent's move and reply with the engine's move.
    ///
    /// A line containing only a move is treated the same way. `-1` means the engine moves first.
    Play {
        #[arg(allow_hyphen_values = true)]
        mv: Move,
    },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position.
    Eval {
        /// If set, the feature breakdown will be printed as well.
        #[arg(short, long, default_value = "false")]
        pretty: bool,

        /// Evaluate from this color's point of view instead of the side to move.
        #[arg(short, long)]
        color: Option<Color>,
    },

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Shows all legal moves in the current position.
    Moves {
        /// List the moves of this color instead of the side to move.
        color: Option<Color>,

        /// If set, moves will be listed in search order.
        #[arg(short, long, default_value = "false")]
        ordered: bool,
    },

    /// Reset the board and forget which color the engine plays.
    NewGame,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft {
        depth: usize,

        /// If set, the node count under every root move is printed as well.
        #[arg(short, long, default_value = "false")]
        split: bool,
    },

    /// Play full games between the engine's strategy and another one, printing the tally.
    SelfPlay {
        /// Number of games to play. Colors alternate between games.
        #[arg(short, long, default_value_t = 2)]
        games: usize,

        /// Strategy of the opponent.
        #[arg(short, long, value_enum, default_value_t = EngineKind::Random)]
        opponent: EngineKind,
    },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a bare [`Move`] to play.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => match s.trim().parse::<Move>() {
                Ok(mv) => Ok(Self::Play { mv }),
                Err(_) => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert!(matches!("display".parse::<EngineCommand>(), Ok(EngineCommand::Display)));
        assert!(matches!("newgame".parse::<EngineCommand>(), Ok(EngineCommand::NewGame)));
        assert!(matches!(
            "perft 3 --split".parse::<EngineCommand>(),
            Ok(EngineCommand::Perft { depth: 3, split: true })
        ));
        assert!(matches!(
            "selfplay --games 4 --opponent mcts".parse::<EngineCommand>(),
            Ok(EngineCommand::SelfPlay {
                games: 4,
                opponent: EngineKind::Mcts
            })
        ));
    }

    #[test]
    fn test_parse_moves() {
        let Ok(EngineCommand::Play { mv }) = "play (2,1)-(3,2)".parse::<EngineCommand>() else {
            panic!("failed to parse `play`");
        };
        assert_eq!(mv, "(2,1)-(3,2)");

        let Ok(EngineCommand::Play { mv }) = "(5,0)-(3,2)-(1,4)".parse::<EngineCommand>() else {
            panic!("failed to parse a bare move");
        };
        assert_eq!(mv.num_captures(), 2);

        let Ok(EngineCommand::Play { mv }) = "-1".parse::<EngineCommand>() else {
            panic!("failed to parse the empty move");
        };
        assert!(mv.is_empty());

        assert!("fly (1,1)".parse::<EngineCommand>().is_err());
    }

    #[test]
    fn test_cli_strategies() {
        let cli = Cli::parse_from(["kingme", "--depth", "5", "--time-ms", "250", "--seed", "9"]);
        assert_eq!(cli.strategy(EngineKind::Minimax), Strategy::minimax(5));
        assert_eq!(
            cli.strategy(EngineKind::Mcts),
            Strategy::mcts(Duration::from_millis(250))
        );
        assert_eq!(cli.seed(), 9);
    }
}
