//! Tournament over the action tree: prediction and training
//!
//! Prediction is a single root-to-leaf descent, one base-learner call per
//! decision node. Training runs a leaf-to-root tournament: the observed
//! action's leaf plays its sibling at every level, the parent's classifier
//! is trained toward the cheaper side, and the parent is then probed to see
//! which side it now favours. The probe decides the cost that the winner
//! carries into the next level, so a level whose two sides cost the same is
//! passed through without training.
//!
//! Only the first and the last triple of a label open a bracket; triples in
//! between contribute through the cost of the interval the two span.

use cascade_tree::{build_tree, BinaryTree, NodeId, TreeNode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt;
use tracing::{debug, trace};

use crate::config::TournamentConfig;
use crate::error::EngineError;
use crate::label::{CbClass, CbLabel};
use crate::learner::{BaseLearner, BinaryLabel};

/// Updates lighter than this are kept only with probability `weight / MIN_WEIGHT`
pub const MIN_WEIGHT: f32 = 0.00001;

/// Nodes listed by [`TreeStats`]
const STATS_NODE_LIMIT: NodeId = 16;

/// Leaf (or subtree winner) still in the tournament, with the cost it carries
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contender {
    node: NodeId,
    cost: f32,
}

/// The two contenders opened by a label and the cost of the range between them
#[derive(Debug, Clone, Copy)]
struct Bracket {
    low: Contender,
    high: Contender,
    interval_cost: f32,
}

impl Bracket {
    /// Cost credited to an arbitrary node when it meets a contender.
    ///
    /// Relies on ids growing left to right within a level.
    fn cost_of(&self, id: NodeId) -> f32 {
        if id < self.low.node {
            0.0
        } else if id == self.low.node {
            self.low.cost
        } else if id < self.high.node {
            self.interval_cost
        } else if id == self.high.node {
            self.high.cost
        } else {
            0.0
        }
    }
}

/// Tournament engine owning its tree and per-node learn statistics
pub struct Tournament {
    tree: BinaryTree,
    config: TournamentConfig,
    learn_counts: Vec<u64>,
    rng: StdRng,
}

impl Tournament {
    /// Build the tree described by `config`
    pub fn new(config: TournamentConfig) -> Result<Self, EngineError> {
        let tree = build_tree(config.num_leaves(), config.bandwidth())?;
        let learn_counts = vec![0; tree.len()];
        Ok(Tournament {
            tree,
            config,
            learn_counts,
            rng: StdRng::seed_from_u64(config.seed()),
        })
    }

    pub fn tree(&self) -> &BinaryTree {
        &self.tree
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn num_actions(&self) -> u32 {
        self.tree.num_leaves()
    }

    /// Choose an action in `1..=num_actions`, or 0 for an empty tree.
    pub fn predict<E, L>(&self, learner: &L, example: &E) -> u32
    where
        E: ?Sized,
        L: BaseLearner<E> + ?Sized,
    {
        if self.tree.is_empty() {
            return 0;
        }
        let leaf = self.descend(learner, example);
        self.tree.action_for_leaf(leaf).unwrap_or(0)
    }

    /// Predict independent examples in parallel; output keeps input order.
    pub fn predict_batch<E, L>(&self, learner: &L, examples: &[E]) -> Vec<u32>
    where
        E: Sync,
        L: BaseLearner<E> + Sync + ?Sized,
    {
        examples.par_iter().map(|example| self.predict(learner, example)).collect()
    }

    /// Train every node whose contest the label decides.
    ///
    /// Actions, probabilities and importance weights are validated before the
    /// learner is touched; a bad triple rejects the whole example.
    pub fn learn<E, L>(&mut self, learner: &mut L, example: &E, label: &CbLabel) -> Result<(), EngineError>
    where
        E: ?Sized,
        L: BaseLearner<E> + ?Sized,
    {
        if self.tree.is_empty() {
            return Ok(());
        }
        let (first, last) = match (label.first(), label.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(()),
        };
        for class in label {
            self.validate(class)?;
        }

        let interval_cost = first.importance_weight();
        let mut low = Contender { node: self.leaf_of(first.action)?, cost: interval_cost };
        let mut high = Contender { node: self.leaf_of(last.action)?, cost: interval_cost };
        debug!(first = low.node, last = high.node, cost = interval_cost, "opening bracket");

        for depth in (1..=self.tree.depth()).rev() {
            // A leaf promoted one level up can outrank the other contender's parent.
            if high.node < low.node {
                std::mem::swap(&mut low, &mut high);
            }
            let bracket = Bracket { low, high, interval_cost };
            let shared_parent = self.node(low.node).parent_id == self.node(high.node).parent_id;

            let mut next_low = low;
            if self.node(low.node).depth == depth {
                next_low = self.play_match(learner, example, &bracket, low);
            }
            let mut next_high = Contender { node: self.parent_at(high.node, depth), cost: high.cost };
            if !shared_parent && self.node(high.node).depth == depth {
                next_high = self.play_match(learner, example, &bracket, high);
            }

            low = next_low;
            high = next_high;
        }
        Ok(())
    }

    /// Number of `learn` calls made at `id` over the engine's lifetime
    pub fn learn_count(&self, id: NodeId) -> Option<u64> {
        self.learn_counts.get(id as usize).copied()
    }

    pub fn stats(&self) -> TreeStats<'_> {
        TreeStats { tree: &self.tree, learn_counts: &self.learn_counts }
    }

    /// Walk from the root to a leaf, consulting the learner at decision nodes
    fn descend<E, L>(&self, learner: &L, example: &E) -> NodeId
    where
        E: ?Sized,
        L: BaseLearner<E> + ?Sized,
    {
        let mut current = self.node(0);
        while !current.is_leaf() {
            let next = if current.right_only() {
                current.right_id
            } else if current.left_only() {
                current.left_id
            } else {
                let score = learner.predict(example, current.id);
                trace!(node = current.id, score, "routing");
                current.child(BinaryLabel::from_score(score).into())
            };
            current = self.node(next);
        }
        current.id
    }

    /// Contest between `contender` and its sibling at the parent node.
    ///
    /// Returns the contender advanced to its parent with the cost the
    /// parent's winner carries upward.
    fn play_match<E, L>(&mut self, learner: &mut L, example: &E, bracket: &Bracket, contender: Contender) -> Contender
    where
        E: ?Sized,
        L: BaseLearner<E> + ?Sized,
    {
        let node = self.node(contender.node);
        let parent = self.node(node.parent_id);
        let carried = Contender { node: parent.id, cost: contender.cost };

        if !parent.is_decision() {
            trace!(node = parent.id, "pass-through node, no classifier");
            return carried;
        }
        let Some(side) = parent.side_of(node.id) else {
            return carried;
        };
        let opponent = parent.child(side.opposite());
        let own_cost = contender.cost;
        let opponent_cost = bracket.cost_of(opponent);
        if own_cost == opponent_cost {
            return carried;
        }

        let cheaper = if own_cost < opponent_cost { side } else { side.opposite() };
        let label = BinaryLabel::from(cheaper);
        let mut weight = (own_cost - opponent_cost).abs();
        if weight < MIN_WEIGHT {
            let draw: f32 = self.rng.random::<f32>() * MIN_WEIGHT;
            if draw < weight {
                weight = MIN_WEIGHT;
            } else {
                debug!(node = parent.id, weight, "filtered near-zero update");
                return carried;
            }
        }

        learner.learn(example, label, weight, parent.id);
        let count = &mut self.learn_counts[parent.id as usize];
        *count = count.saturating_add(1);

        let score = learner.predict(example, parent.id);
        trace!(node = parent.id, label = label.value(), weight, score, "trained node");

        let confidence = score.abs();
        let (lo, hi) = (own_cost.min(opponent_cost), own_cost.max(opponent_cost));
        let cost = if BinaryLabel::from_score(score) == label {
            lo * confidence + hi * (1.0 - confidence)
        } else {
            hi * confidence + lo * (1.0 - confidence)
        };
        Contender { node: parent.id, cost }
    }

    /// Parent of `id` when it plays at `depth`; shallower nodes wait in place
    fn parent_at(&self, id: NodeId, depth: u32) -> NodeId {
        let node = self.node(id);
        if node.depth == depth {
            node.parent_id
        } else {
            id
        }
    }

    fn validate(&self, class: &CbClass) -> Result<(), EngineError> {
        self.leaf_of(class.action)?;
        if !(class.probability > 0.0 && class.probability <= 1.0) {
            return Err(EngineError::InvalidProbability {
                action: class.action,
                probability: class.probability,
            });
        }
        if !class.cost.is_finite() || !class.importance_weight().is_finite() {
            return Err(EngineError::InvalidCost { action: class.action, cost: class.cost });
        }
        Ok(())
    }

    fn leaf_of(&self, action: u32) -> Result<NodeId, EngineError> {
        self.tree.leaf_for_action(action).ok_or(EngineError::ActionOutOfRange {
            action,
            num_actions: self.tree.num_leaves(),
        })
    }

    fn node(&self, id: NodeId) -> TreeNode {
        self.tree.nodes()[id as usize]
    }
}

/// Per-node learn counts for the first internal nodes
pub struct TreeStats<'a> {
    tree: &'a BinaryTree,
    learn_counts: &'a [u64],
}

impl fmt::Display for TreeStats<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "learn count per node: ")?;
        for node in self.tree.nodes() {
            if node.is_leaf() || node.id >= STATS_NODE_LIMIT {
                break;
            }
            write!(f, "id={}, #l={}; ", node.id, self.learn_counts[node.id as usize])?;
        }
        Ok(())
    }
}
