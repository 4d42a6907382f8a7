/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::{Duration, Instant};

use rand::{seq::SliceRandom, Rng};

use crate::{tune, Board, Color, Move, MoveList, Outcome};

/// Configuration variables for executing an [`MctsSearch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock time the search may run for. Checked once per iteration.
    pub time_budget: Duration,

    /// Exploration constant `c` of UCB1.
    pub exploration: f64,

    /// Plies a rollout may play before it is resolved by material.
    pub rollout_limit: usize,

    /// Optional cap on the number of iterations, regardless of time remaining.
    pub max_iterations: Option<u64>,
}

impl MctsConfig {
    /// A default config that thinks for `time_budget`.
    #[inline(always)]
    pub fn with_budget(time_budget: Duration) -> Self {
        Self {
            time_budget,
            ..Default::default()
        }
    }
}

impl Default for MctsConfig {
    #[inline(always)]
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(tune::default_mcts_millis!()),
            exploration: tune::exploration_constant!(),
            rollout_limit: tune::rollout_limit!(),
            max_iterations: None,
        }
    }
}

/// Index of a node in an [`MctsTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A single state in the search tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Snapshot of the board at this node.
    pub board: Board,

    /// The side about to act on `board`.
    pub to_move: Color,

    /// The node this one was expanded from. `None` only for the root.
    pub parent: Option<NodeId>,

    /// The move that led here from `parent`.
    pub mv: Option<Move>,

    /// Legal moves not yet expanded into children. Popped from the end.
    pub untried: MoveList,

    /// Expanded children, in order of expansion.
    pub children: Vec<NodeId>,

    /// Number of rollouts that passed through this node.
    pub visits: u32,

    /// Accumulated rollout value, from the root player's point of view.
    pub wins: f64,
}

impl MctsNode {
    fn new(board: Board, to_move: Color, parent: Option<NodeId>, mv: Option<Move>) -> Self {
        // Decided games are leaves: nothing is left to expand.
        let untried = if board.outcome(to_move).is_decided() {
            MoveList::new()
        } else {
            board.all_legal_moves(to_move)
        };

        Self {
            board,
            to_move,
            parent,
            mv,
            untried,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
        }
    }

    /// UCB1 score of this node, given the visits of its parent.
    ///
    /// Unvisited nodes score infinitely high, so every child is tried once before any is revisited.
    #[inline(always)]
    pub fn ucb1(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }

        let visits = self.visits as f64;
        self.wins / visits + exploration * (parent_visits_ln / visits).sqrt()
    }

    /// Average rollout value through this node, or zero if it was never visited.
    #[inline(always)]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }
}

/// Search tree with arena-based node storage.
///
/// Nodes are never removed; the whole tree is discarded once a search finishes.
#[derive(Debug, Clone)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0)
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree rooted at `board`, with `to_move` about to act.
    pub fn new(board: Board, to_move: Color) -> Self {
        Self {
            nodes: vec![MctsNode::new(board, to_move, None, None)],
            root: NodeId(0),
        }
    }

    #[inline(always)]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline(always)]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the tree.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`, as the root exists from construction.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in order of creation.
    #[inline(always)]
    pub fn arena(&self) -> &[MctsNode] {
        &self.nodes
    }

    /// Selects the child of `id` with the highest UCB1 score. The first of equal scores wins.
    pub fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let parent_visits_ln = (node.visits.max(1) as f64).ln();

        node.children
            .iter()
            .map(|&child| (child, self.get(child).ucb1(parent_visits_ln, exploration)))
            .fold(None, |best: Option<(NodeId, f64)>, (child, score)| match best {
                Some((_, best_score)) if score <= best_score => best,
                _ => Some((child, score)),
            })
            .map(|(child, _)| child)
    }

    /// Descends from the root while the current node is fully expanded and has children.
    pub fn select(&self, exploration: f64) -> NodeId {
        let mut current = self.root;

        while self.get(current).untried.is_empty() {
            match self.select_child(current, exploration) {
                Some(child) => current = child,
                None => break,
            }
        }

        current
    }

    /// Expands one untried move of `id` into a new child, returning it.
    ///
    /// Returns `None` if `id` has nothing left to expand.
    pub fn expand(&mut self, id: NodeId) -> Option<NodeId> {
        let mv = self.get_mut(id).untried.pop()?;
        let parent = self.get(id);

        let child = MctsNode::new(
            parent.board.with_move_made(&mv),
            parent.to_move.opponent(),
            Some(id),
            Some(mv),
        );

        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(id).children.push(child_id);

        Some(child_id)
    }

    /// Credits `value` to `id` and every ancestor up to the root, and counts a visit on each.
    pub fn backpropagate(&mut self, id: NodeId, value: f64) {
        let mut current = Some(id);

        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            node.wins += value;
            current = node.parent;
        }
    }

    /// The most-visited child of the root. The first of equal counts wins.
    pub fn most_visited(&self) -> Option<NodeId> {
        self.get(self.root)
            .children
            .iter()
            .copied()
            .fold(None, |best: Option<NodeId>, child| match best {
                Some(b) if self.get(child).visits <= self.get(b).visits => best,
                _ => Some(child),
            })
    }
}

/// The result of an [`MctsSearch`].
#[derive(Debug, Clone, PartialEq)]
pub struct MctsResult {
    /// The chosen move, or `None` if there were no legal moves.
    pub bestmove: Option<Move>,

    /// Number of completed iterations.
    pub iterations: u64,

    /// Number of nodes in the tree when the search ended.
    pub nodes: usize,

    /// Visits of the chosen root child. Zero if the move came from the fallback.
    pub visits: u32,

    /// Average rollout value of the chosen root child, from the searching side's point of view.
    pub win_rate: f64,
}

/// Time-bounded Monte Carlo Tree Search with UCB1 selection and random rollouts.
pub struct MctsSearch {
    /// The tree, rebuilt from scratch for every search.
    tree: MctsTree,

    /// The side to move at the root. All values are from its point of view.
    color: Color,

    /// Configuration variables for this instance of the search.
    config: MctsConfig,
}

impl MctsSearch {
    /// Construct a new [`MctsSearch`] for `color` to move on a copy of `board`.
    pub fn new(board: &Board, color: Color, config: MctsConfig) -> Self {
        Self {
            tree: MctsTree::new(board.clone(), color),
            color,
            config,
        }
    }

    /// The search tree, as built so far.
    #[inline(always)]
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    /// Runs iterations until the time budget elapses or the iteration cap is reached,
    /// then picks the most-visited root move.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MctsResult {
        let starttime = Instant::now();
        let mut iterations = 0;

        while starttime.elapsed() < self.config.time_budget
            && self.config.max_iterations.map_or(true, |max| iterations < max)
        {
            self.iterate(rng);
            iterations += 1;
        }

        let res = self.result(iterations);

        log::debug!(
            "{} ran {} iterations in {:?}: bestmove {} visits {} win rate {:.3} nodes {}",
            self.color,
            res.iterations,
            starttime.elapsed(),
            res.bestmove.clone().unwrap_or_default(),
            res.visits,
            res.win_rate,
            res.nodes,
        );

        res
    }

    /// One round of selection, expansion, simulation, and backpropagation.
    pub fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let selected = self.tree.select(self.config.exploration);
        let leaf = self.tree.expand(selected).unwrap_or(selected);

        let node = self.tree.get(leaf);
        let outcome = rollout(&node.board, node.to_move, self.config.rollout_limit, rng);

        self.tree.backpropagate(leaf, outcome_value(outcome, self.color));
    }

    /// Builds the result of the search after `iterations` iterations.
    fn result(&self, iterations: u64) -> MctsResult {
        let mut res = MctsResult {
            bestmove: None,
            iterations,
            nodes: self.tree.len(),
            visits: 0,
            win_rate: 0.0,
        };

        if let Some(child) = self.tree.most_visited() {
            let node = self.tree.get(child);
            res.bestmove = node.mv.clone();
            res.visits = node.visits;
            res.win_rate = node.win_rate();
        } else {
            // Nothing was expanded, so any legal move will do.
            let root = self.tree.get(self.tree.root());
            res.bestmove = root.board.all_legal_moves(self.color).into_iter().next();
            if res.bestmove.is_some() {
                log::warn!("no root move was expanded; falling back to the first legal move");
            }
        }

        res
    }
}

/// Plays uniformly random moves from `board` with `to_move` acting first, on a copy of the board.
///
/// The playout ends when the game is decided or after `limit` plies, when the side with more material
/// (kings counting triple) wins and equal material is a draw.
pub fn rollout<R: Rng + ?Sized>(board: &Board, to_move: Color, limit: usize, rng: &mut R) -> Outcome {
    let mut board = board.clone();
    let mut side = to_move;

    for _ in 0..limit {
        let outcome = board.outcome(side);
        if outcome.is_decided() {
            return outcome;
        }

        let moves = board.all_legal_moves(side);
        let Some(mv) = moves.choose(rng) else {
            return Outcome::Win(side.opponent());
        };

        board.make_move_unchecked(mv);
        side = side.opponent();
    }

    let outcome = board.outcome(side);
    if outcome.is_decided() {
        return outcome;
    }

    let ours = rollout_material(&board, to_move);
    let theirs = rollout_material(&board, to_move.opponent());

    match ours.cmp(&theirs) {
        std::cmp::Ordering::Greater => Outcome::Win(to_move),
        std::cmp::Ordering::Less => Outcome::Win(to_move.opponent()),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

/// Material of `color` used to settle a rollout that hit its ply limit.
#[inline(always)]
fn rollout_material(board: &Board, color: Color) -> u32 {
    let (men, kings) = board.count(color);
    tune::rollout_king_weight!() * kings + men
}

/// Value of `outcome` to `color`: one for a win, a half for a draw, and nothing for a loss.
#[inline(always)]
pub fn outcome_value(outcome: Outcome, color: Color) -> f64 {
    match outcome {
        Outcome::Win(winner) if winner == color => 1.0,
        Outcome::Draw | Outcome::Ongoing => 0.5,
        Outcome::Win(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn capped(iterations: u64) -> MctsConfig {
        MctsConfig {
            time_budget: Duration::from_secs(3600),
            max_iterations: Some(iterations),
            ..Default::default()
        }
    }

    #[test]
    fn test_visits_are_conserved() {
        let board = Board::new(7, 7, 2).unwrap();
        let config = MctsConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut tree = MctsTree::new(board, Color::Black);

        // Times each node was the point a rollout started from.
        let mut leaf_hits = vec![0u32; 1];

        for _ in 0..500 {
            let selected = tree.select(config.exploration);
            let leaf = tree.expand(selected).unwrap_or(selected);
            leaf_hits.resize(tree.len(), 0);
            leaf_hits[leaf.0 as usize] += 1;

            let node = tree.get(leaf);
            let outcome = rollout(&node.board, node.to_move, config.rollout_limit, &mut rng);
            tree.backpropagate(leaf, outcome_value(outcome, Color::Black));
        }

        assert_eq!(tree.get(tree.root()).visits, 500);
        // Every iteration creates at most one node.
        assert!(tree.len() <= 501);

        for (i, node) in tree.arena().iter().enumerate() {
            let from_children: u32 = node.children.iter().map(|&c| tree.get(c).visits).sum();
            assert_eq!(node.visits, from_children + leaf_hits[i], "node {i}");
            assert!(node.wins <= node.visits as f64);
        }
    }

    #[test]
    fn test_longer_runs_never_lose_visits() {
        let board = Board::new(8, 8, 3).unwrap();

        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let short = MctsSearch::new(&board, Color::Black, capped(50)).run(&mut rng);

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut search = MctsSearch::new(&board, Color::Black, capped(400));
            search.run(&mut rng);

            let tree = search.tree();
            let long_visits = tree
                .get(tree.root())
                .children
                .iter()
                .map(|&c| tree.get(c))
                .find(|node| node.mv == short.bestmove)
                .map_or(0, |node| node.visits);

            assert!(
                long_visits >= short.visits,
                "seed {seed}: {long_visits} < {}",
                short.visits
            );
        }
    }

    #[test]
    fn test_zero_budget_falls_back() {
        let board = Board::new(8, 8, 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = MctsConfig::with_budget(Duration::ZERO);

        let res = MctsSearch::new(&board, Color::White, config).run(&mut rng);
        assert_eq!(res.iterations, 0);
        assert_eq!(res.visits, 0);

        let mv = res.bestmove.unwrap();
        assert!(board.all_legal_moves(Color::White).contains(&mv));
    }

    #[test]
    fn test_single_iteration_expands_last_move() {
        let board = Board::new(7, 7, 2).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut search = MctsSearch::new(&board, Color::Black, capped(1));

        let res = search.run(&mut rng);
        let last = board.all_legal_moves(Color::Black).pop();
        assert_eq!(res.bestmove, last);
        assert_eq!(res.visits, 1);
        assert_eq!(search.tree().len(), 2);
    }

    #[test]
    fn test_every_root_move_tried_before_revisits() {
        let board = Board::new(8, 8, 3).unwrap();
        let moves = board.all_legal_moves(Color::Black).len();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut search = MctsSearch::new(&board, Color::Black, capped(moves as u64 * 2));
        search.run(&mut rng);

        let tree = search.tree();
        let root = tree.get(tree.root());
        assert_eq!(root.children.len(), moves);
        assert!(root.children.iter().all(|&c| tree.get(c).visits >= 1));
    }

    #[test]
    fn test_no_moves_resigns() {
        let board: Board = "
            . . . .
            . . . .
            . w . .
            b . b .
        "
        .parse()
        .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let res = MctsSearch::new(&board, Color::Black, capped(10)).run(&mut rng);
        assert!(res.bestmove.is_none());
    }

    #[test]
    fn test_finds_obvious_win() {
        // Black's only move jumps White's last man, so every rollout through it is a win.
        let board: Board = "
            . . . . . . . .
            . . b . . . . .
            . . . w . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
        "
        .parse()
        .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let res = MctsSearch::new(&board, Color::Black, capped(50)).run(&mut rng);
        assert_eq!(res.bestmove.unwrap(), "(1,2)-(3,4)");
        assert_eq!(res.win_rate, 1.0);
    }

    #[test]
    fn test_rollout_resolves_by_material() {
        let board: Board = "
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . B . . . .
            . . . . . . . .
            . w . . . . . w
            . . . . . . . .
            . . . . . . . .
        "
        .parse()
        .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // No plies are played, so only material decides: one king outweighs two men.
        assert_eq!(rollout(&board, Color::White, 0, &mut rng), Outcome::Win(Color::Black));
    }

    #[test]
    fn test_rollout_stops_on_decided_games() {
        let board: Board = "
            . b . .
            . . . .
            . . . .
            . . . .
        "
        .parse()
        .unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert_eq!(rollout(&board, Color::White, 80, &mut rng), Outcome::Win(Color::Black));
    }

    #[test]
    fn test_outcome_values() {
        assert_eq!(outcome_value(Outcome::Win(Color::Black), Color::Black), 1.0);
        assert_eq!(outcome_value(Outcome::Win(Color::White), Color::Black), 0.0);
        assert_eq!(outcome_value(Outcome::Draw, Color::White), 0.5);
    }

    #[test]
    fn test_ucb_prefers_unvisited() {
        let board = Board::new(7, 7, 2).unwrap();
        let mut tree = MctsTree::new(board, Color::Black);
        let a = tree.expand(tree.root()).unwrap();
        let b = tree.expand(tree.root()).unwrap();

        tree.backpropagate(a, 1.0);
        assert_eq!(tree.select_child(tree.root(), tune::exploration_constant!()), Some(b));

        tree.backpropagate(b, 0.0);
        assert_eq!(tree.select_child(tree.root(), tune::exploration_constant!()), Some(a));
    }
}
