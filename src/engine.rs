/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{bail, Context, Result};

use crate::{
    order_moves, perft, splitperft, Agent, Board, Cli, Color, EngineCommand, Evaluator, Move, Outcome,
    Strategy,
};

/// The kingme checkers engine.
#[derive(Debug)]
pub struct Engine {
    /// The engine's side of the game, including the board as known to the engine.
    ///
    /// This is modified whenever moves are played,
    /// and is reset whenever the engine is told to start a new game.
    agent: Agent,

    /// Arguments the engine was started with, used to build opponents for self-play.
    cli: Cli,

    /// Seed the engine's own randomness was derived from.
    seed: u64,

    /// One half of a channel, responsible for sending commands to the engine to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the engine to execute.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Constructs a new [`Engine`] instance from command-line arguments, to be executed with [`Engine::run`].
    pub fn new(cli: Cli) -> Result<Self> {
        let (sender, receiver) = channel();
        let seed = cli.seed();
        let agent = Agent::new(
            cli.cols,
            cli.rows,
            cli.pieces,
            cli.strategy(cli.engine),
            seed,
        )?;

        log::debug!("Engine seeded with {seed}");

        Ok(Self {
            agent,
            cli,
            seed,
            sender,
            receiver,
        })
    }

    /// Returns a string of the engine's name and current version.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Execute the main event loop for the engine.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                log::error!("Input handler thread stopping after fatal error: {err}");
            }
        });

        log::info!(
            "{} ready on a {}x{} board with {}",
            self.name(),
            self.cli.cols,
            self.cli.rows,
            self.agent.strategy()
        );

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if matches!(cmd, EngineCommand::Exit) {
                break;
            }

            // Keep running, even on error
            if let Err(e) = self.handle_command(cmd) {
                eprintln!("Error: {e:#}");
            }
        }

        Ok(())
    }

    /// Handle the execution of a single [`EngineCommand`].
    pub fn handle_command(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Begin => self.play(&Move::NONE)?,

            EngineCommand::Play { mv } => self.play(&mv)?,

            EngineCommand::Display => self.display(),

            EngineCommand::Eval { pretty, color } => self.eval(pretty, color),

            EngineCommand::Exit => {}

            EngineCommand::Moves { color, ordered } => {
                let color = color.unwrap_or(self.agent.to_move());
                let board = self.agent.board();

                let mut moves = board.all_legal_moves(color);
                if ordered {
                    moves = order_moves(moves, color, board.rows());
                }

                // If there are none, print "(none)"
                let moves_string = if moves.is_empty() {
                    String::from("(none)")
                } else {
                    moves
                        .iter()
                        .map(|mv| mv.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{moves_string}");
            }

            EngineCommand::NewGame => self.agent.new_game(),

            EngineCommand::Perft { depth, split } => self.perft(depth, split),

            EngineCommand::SelfPlay { games, opponent } => {
                let opponent = self.cli.strategy(opponent);
                self.self_play(games, opponent)?;
            }
        }

        Ok(())
    }

    /// Executes the `play` command: applies the opponent's move, if any, and prints the engine's reply.
    ///
    /// The reply is `-1` when the engine resigns.
    fn play(&mut self, last: &Move) -> Result<()> {
        let mv = self.agent.decide(last)?;
        println!("{mv}");
        Ok(())
    }

    /// Executes the `display` command, printing the current position.
    fn display(&self) {
        let board = self.agent.board();
        let to_move = self.agent.to_move();

        println!("{board}");
        match board.outcome(to_move) {
            Outcome::Ongoing => println!("{to_move} to move"),
            Outcome::Win(color) => println!("{color} has won"),
            Outcome::Draw => println!("Drawn"),
        }
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool, color: Option<Color>) {
        let to_move = self.agent.to_move();
        let evaluator = Evaluator::new(self.agent.board(), color.unwrap_or(to_move)).to_move(to_move);

        if pretty {
            println!("{evaluator}");
        } else {
            println!("{}", evaluator.eval());
        }
    }

    /// Executes the `perft` command on the current position, for the side to move.
    fn perft(&self, depth: usize, split: bool) {
        let board = self.agent.board();
        let color = self.agent.to_move();

        let now = Instant::now();
        let nodes = if split {
            splitperft(board, color, depth)
        } else {
            perft(board, color, depth)
        };
        let elapsed = now.elapsed();

        println!("\n{nodes} nodes in {elapsed:?}");
    }

    /// Executes the `selfplay` command, pitting the engine's strategy against `opponent` for `games` games.
    ///
    /// The engine plays Black in even-numbered games and White in odd-numbered ones.
    fn self_play(&self, games: usize, opponent: Strategy) -> Result<MatchTally> {
        let ours = self.agent.strategy();
        let (cols, rows, p) = (self.cli.cols, self.cli.rows, self.cli.pieces);
        let mut tally = MatchTally::default();

        for game in 0..games {
            let ours_is_black = game % 2 == 0;
            let (black, white) = if ours_is_black {
                (ours, opponent)
            } else {
                (opponent, ours)
            };

            let seed = self.seed.wrapping_add(game as u64);
            let record = play_game(cols, rows, p, black, white, seed)?;

            let ours_color = if ours_is_black {
                Color::Black
            } else {
                Color::White
            };
            tally.record(record.outcome, ours_color);

            println!(
                "Game {}/{games}: {black} (Black) vs {white} (White): {} after {} plies",
                game + 1,
                describe(record.outcome),
                record.moves.len()
            );
        }

        println!("{ours} vs {opponent}: {tally}");
        Ok(tally)
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Engine received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to engine")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => eprintln!("{err}"),
        }
    }
}

/// The moves and result of a single complete game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Every move played, starting with Black's first.
    pub moves: Vec<Move>,

    /// How the game ended. Never [`Outcome::Ongoing`].
    pub outcome: Outcome,
}

/// Plays a full game between two agents, the way a referee would: each side is only told the other's last move.
///
/// Both agents and the referee keep their own boards. A resignation loses the game.
pub fn play_game(
    cols: u8,
    rows: u8,
    p: u8,
    black: Strategy,
    white: Strategy,
    seed: u64,
) -> Result<GameRecord> {
    let mut referee = Board::new(cols, rows, p)?;
    let mut agents = [
        Agent::new(cols, rows, p, black, seed)?,
        Agent::new(cols, rows, p, white, seed.wrapping_add(1))?,
    ];

    let mut side = Color::Black;
    let mut last = Move::NONE;
    let mut moves = Vec::new();

    let outcome = loop {
        let outcome = referee.outcome(side);
        if outcome.is_decided() {
            break outcome;
        }

        let mv = agents[side.index()].decide(&last)?;
        if mv.is_empty() {
            log::debug!("{side} resigned");
            break Outcome::Win(side.opponent());
        }

        referee
            .make_move(&mv, side)
            .with_context(|| format!("{side} played an illegal move"))?;

        moves.push(mv.clone());
        last = mv;
        side = side.opponent();
    };

    Ok(GameRecord { moves, outcome })
}

/// Wins, losses, and draws from one player's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl MatchTally {
    /// Counts `outcome` for the player of `color`.
    pub fn record(&mut self, outcome: Outcome, color: Color) {
        match outcome.winner() {
            Some(winner) if winner == color => self.wins += 1,
            Some(_) => self.losses += 1,
            None => self.draws += 1,
        }
    }

    /// Total games recorded.
    #[inline(always)]
    pub fn games(&self) -> usize {
        self.wins + self.losses + self.draws
    }
}

impl std::fmt::Display for MatchTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "+{} -{} ={} ({} games)",
            self.wins,
            self.losses,
            self.draws,
            self.games()
        )
    }
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win(color) => format!("{color} wins"),
        Outcome::Draw | Outcome::Ongoing => String::from("draw"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(args: &[&str]) -> Engine {
        use clap::Parser;
        let args = ["kingme", "--seed", "11"].iter().chain(args);
        Engine::new(Cli::parse_from(args)).unwrap()
    }

    #[test]
    fn test_random_games_finish() {
        for seed in 0..4 {
            let record = play_game(7, 7, 2, Strategy::Random, Strategy::Random, seed).unwrap();
            assert!(record.outcome.is_decided());
            assert!(!record.moves.is_empty());
        }
    }

    #[test]
    fn test_tally() {
        let mut tally = MatchTally::default();
        tally.record(Outcome::Win(Color::Black), Color::Black);
        tally.record(Outcome::Win(Color::Black), Color::White);
        tally.record(Outcome::Draw, Color::White);

        assert_eq!(tally, MatchTally { wins: 1, losses: 1, draws: 1 });
        assert_eq!(tally.to_string(), "+1 -1 =1 (3 games)");
    }

    #[test]
    fn test_commands_drive_the_agent() {
        let mut engine = engine(&["--engine", "random"]);

        engine.handle_command(EngineCommand::Begin).unwrap();
        assert_eq!(engine.agent.color(), Some(Color::Black));

        // The engine may not move twice in a row for the opponent.
        let bogus: Move = "(0,1)-(1,0)".parse().unwrap();
        assert!(engine.handle_command(EngineCommand::Play { mv: bogus }).is_err());

        engine.handle_command(EngineCommand::NewGame).unwrap();
        assert_eq!(engine.agent.color(), None);
        assert_eq!(engine.agent.board(), &Board::new(7, 7, 2).unwrap());
    }

    #[test]
    fn test_self_play_tally() {
        let engine = engine(&["--engine", "minimax", "--depth", "1"]);
        let tally = engine.self_play(2, Strategy::Random).unwrap();
        assert_eq!(tally.games(), 2);
    }
}
