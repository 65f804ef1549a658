//! Monte Carlo Tree Search (MCTS) with UCT selection.
//!
//! Each iteration runs the four classic phases:
//! 1. Selection: descend with UCT while the node is fully expanded
//! 2. Expansion: add one random untried move as a new child
//! 3. Simulation: a guided rollout from the new child (see [`crate::playout`])
//! 4. Backpropagation: credit visits, and wins to nodes whose mover won
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Game states
//! are not stored in the tree; they are rebuilt by replaying the moves on the
//! path from the root.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::constants::{DEFAULT_ITERATIONS, EXPLORATION, ROLLOUT_EPSILON, ROLLOUT_STEPS};
use crate::eval::winner;
use crate::movegen::generate_moves;
use crate::playout::{choose, rollout, winning_moves};
use crate::state::{apply_move, GameState, Move, Player};

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of iterations to run per search.
    pub iterations: usize,

    /// Exploration constant `C` of the UCT formula.
    pub exploration: f64,

    /// Maximum number of plies in a rollout.
    pub rollout_steps: usize,

    /// Probability of a uniformly random rollout move.
    pub epsilon: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            exploration: EXPLORATION,
            rollout_steps: ROLLOUT_STEPS,
            epsilon: ROLLOUT_EPSILON,
        }
    }
}

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A node in the MCTS search tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Parent node (`None` for the root)
    pub parent: Option<NodeId>,
    /// Move that led here from the parent
    pub mv: Option<Move>,
    /// Player who played `mv`
    pub player_just_moved: Option<Player>,
    /// Player to move in this node
    pub next_player: Player,
    /// Rollouts won by `player_just_moved`
    pub wins: u32,
    /// Number of visits
    pub visits: u32,
    /// Legal moves of `next_player` without a child yet
    pub untried: Vec<Move>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    fn new(
        state: &GameState,
        parent: Option<NodeId>,
        mv: Option<Move>,
        player_just_moved: Option<Player>,
        next_player: Player,
    ) -> Self {
        // A decided game has nothing left to expand.
        let untried = if winner(state).is_some() {
            Vec::new()
        } else {
            generate_moves(state, next_player, None)
        };
        Self {
            parent,
            mv,
            player_just_moved,
            next_player,
            wins: 0,
            visits: 0,
            untried,
            children: Vec::new(),
        }
    }

    /// Fraction of visits won by the player who moved into this node.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            0.0
        }
    }

    /// UCT score, given `ln(parent.visits)`.
    fn uct(&self, ln_parent_visits: f64, exploration: f64) -> f64 {
        let visits = self.visits as f64;
        self.winrate() + exploration * (ln_parent_visits / visits).sqrt()
    }
}

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<TreeNode>,
    root_state: GameState,
    root_player: Player,
}

impl MctsTree {
    /// Create a tree whose root is `state` with `player` to move.
    pub fn new(state: &GameState, player: Player) -> Self {
        let root = TreeNode::new(state, None, None, None, player);
        Self {
            nodes: vec![root],
            root_state: state.clone(),
            root_player: player,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of the root, in expansion order.
    pub fn root_children(&self) -> impl Iterator<Item = &TreeNode> {
        self.get(self.root()).children.iter().map(|&id| self.get(id))
    }

    fn add_child(&mut self, parent: NodeId, mv: Move, state: &GameState) -> NodeId {
        let mover = self.get(parent).next_player;
        let child = TreeNode::new(state, Some(parent), Some(mv), Some(mover), mover.opponent());
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Child of `id` with the highest UCT score.
    fn select_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let ln_visits = (node.visits as f64).ln();
        node.children.iter().copied().max_by(|&a, &b| {
            self.get(a)
                .uct(ln_visits, exploration)
                .partial_cmp(&self.get(b).uct(ln_visits, exploration))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    fn backpropagate(&mut self, leaf: NodeId, winner: Player) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if node.player_just_moved == Some(winner) {
                node.wins += 1;
            }
            current = node.parent;
        }
    }

    /// Run one selection, expansion, rollout and backpropagation pass.
    fn iterate(&mut self, config: &MctsConfig, rng: &mut Rng) {
        let mut node = self.root();
        let mut state = self.root_state.clone();
        let mut depth = 0;

        while self.get(node).untried.is_empty() {
            let Some(child) = self.select_child(node, config.exploration) else {
                break;
            };
            let child_node = self.get(child);
            if let (Some(mv), Some(mover)) = (child_node.mv, child_node.player_just_moved) {
                state = apply_move(&state, mv, mover);
            }
            node = child;
            depth += 1;
        }

        if !self.get(node).untried.is_empty() {
            let mover = self.get(node).next_player;
            let untried = &mut self.get_mut(node).untried;
            let index = rng.usize(..untried.len());
            let mv = untried.swap_remove(index);
            state = apply_move(&state, mv, mover);
            node = self.add_child(node, mv, &state);
            depth += 1;
        }

        let turn = self.get(node).next_player;
        let rollout_winner = rollout(&state, turn, self.root_player, config, rng);
        self.backpropagate(node, rollout_winner);

        trace!(depth, winner = %rollout_winner, nodes = self.len(), "MCTS iteration complete");
    }

    /// Run `config.iterations` iterations.
    pub fn run(&mut self, config: &MctsConfig, rng: &mut Rng) {
        for _ in 0..config.iterations {
            self.iterate(config, rng);
        }
    }

    /// The most visited root child (the first one on ties).
    pub fn best_child(&self) -> Option<&TreeNode> {
        let mut best: Option<&TreeNode> = None;
        for child in self.root_children() {
            if best.is_none_or(|b| child.visits > b.visits) {
                best = Some(child);
            }
        }
        best
    }
}

/// Build a tree from `state` with `player` to move and run the search.
pub fn tree_search(state: &GameState, player: Player, config: &MctsConfig, rng: &mut Rng) -> MctsTree {
    let mut tree = MctsTree::new(state, player);
    tree.run(config, rng);
    tree
}

/// Pick a move for `player` with MCTS using `iterations` iterations and the
/// default exploration and rollout parameters.
///
/// Returns `None` if `player` has no legal move.
pub fn best_move_mcts(state: &GameState, player: Player, iterations: usize, rng: &mut Rng) -> Option<Move> {
    let config = MctsConfig {
        iterations,
        ..MctsConfig::default()
    };
    best_move_mcts_with(state, player, &config, rng)
}

/// Pick a move for `player` with MCTS using an explicit configuration.
///
/// A move that wins on the spot is returned without searching.
pub fn best_move_mcts_with(
    state: &GameState,
    player: Player,
    config: &MctsConfig,
    rng: &mut Rng,
) -> Option<Move> {
    let moves = generate_moves(state, player, None);
    if moves.is_empty() {
        return None;
    }

    let wins = winning_moves(state, player, &moves);
    if !wins.is_empty() {
        let mv = choose(&wins, rng);
        debug!(%player, %mv, candidates = wins.len(), "MCTS found immediate win");
        return Some(mv);
    }

    let tree = tree_search(state, player, config, rng);
    match tree.best_child() {
        Some(best) => {
            debug!(
                %player,
                mv = ?best.mv,
                visits = best.visits,
                wins = best.wins,
                nodes = tree.len(),
                "MCTS search complete"
            );
            best.mv
        }
        // No iterations were run.
        None => Some(choose(&moves, rng)),
    }
}
