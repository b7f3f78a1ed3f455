//! Leaf reordering strategies over a built tree
//!
//! Strategies only flip which child of an internal node sits on the left and
//! refresh boundary caches; parent/child membership never changes. Both run
//! through [`Orderer::apply`], which scores the tree before and after and
//! restores the previous orientation if the new one scores worse.

use crate::algorithm::distance::DistanceMatrix;
use crate::algorithm::optimal::order_optimally;
use crate::algorithm::score::adjacency_score;
use crate::io::configuration::DEFAULT_OPTIMAL_LEAF_LIMIT;
use crate::tree::{Dendrogram, Node};
use clap::ValueEnum;
use log::{debug, warn};
use std::fmt;

/// Selectable reordering heuristic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Strategy {
    /// Single post-order pass choosing the shorter junction at each node
    #[default]
    Local,
    /// Best leaf ordering over all child flips, via per-endpoint cost tables
    Optimal,
}

impl Strategy {
    /// Short name used in logs and output file names
    pub const fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Optimal => "optimal",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one reordering pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderingReport {
    /// Strategy that was requested
    pub requested: Strategy,
    /// Strategy that actually ran (differs when the size bound forced a fallback)
    pub applied: Strategy,
    /// Adjacency score before reordering
    pub score_before: f64,
    /// Adjacency score after reordering
    pub score_after: f64,
    /// Whether the new arrangement scored worse and was discarded
    pub reverted: bool,
}

impl OrderingReport {
    /// Score reduction achieved, never negative
    pub fn improvement(&self) -> f64 {
        self.score_before - self.score_after
    }
}

/// Runs a [`Strategy`] over a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orderer {
    strategy: Strategy,
    optimal_leaf_limit: Option<usize>,
}

impl Default for Orderer {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

impl Orderer {
    /// Orderer with the default size bound for the optimal strategy
    pub const fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            optimal_leaf_limit: Some(DEFAULT_OPTIMAL_LEAF_LIMIT),
        }
    }

    /// Set the largest leaf count the optimal strategy accepts; `None` removes the bound
    #[must_use]
    pub const fn with_optimal_leaf_limit(mut self, limit: Option<usize>) -> Self {
        self.optimal_leaf_limit = limit;
        self
    }

    /// Requested strategy
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Strategy that will run for a tree with `leaf_count` leaves
    pub const fn effective_strategy(&self, leaf_count: usize) -> Strategy {
        match (self.strategy, self.optimal_leaf_limit) {
            (Strategy::Optimal, Some(limit)) if leaf_count > limit => Strategy::Local,
            (strategy, _) => strategy,
        }
    }

    /// Reorder `tree` in place
    ///
    /// The returned report's `score_after` never exceeds `score_before`.
    pub fn apply(&self, tree: &mut Dendrogram, distances: &DistanceMatrix) -> OrderingReport {
        let applied = self.effective_strategy(tree.leaf_count());
        if applied != self.strategy {
            warn!(
                "{} rows exceed the optimal ordering limit, using the {applied} strategy",
                tree.leaf_count()
            );
        }

        let snapshot = tree.orientation();
        let score_before = adjacency_score(tree, distances);

        match applied {
            Strategy::Local => order_locally(tree, distances),
            Strategy::Optimal => order_optimally(tree, distances),
        }

        let mut score_after = adjacency_score(tree, distances);
        let reverted = score_after > score_before;
        if reverted {
            warn!("{applied} ordering scored {score_after} over {score_before}, kept old order");
            tree.restore_orientation(&snapshot);
            score_after = adjacency_score(tree, distances);
        }
        debug!("{applied} ordering: {score_before} -> {score_after}");

        OrderingReport {
            requested: self.strategy,
            applied,
            score_before,
            score_after,
            reverted,
        }
    }
}

/// Greedy pass: at each node, children first, keep whichever placement of
/// the two children gives the shorter junction; ties keep the current one
pub fn order_locally(tree: &mut Dendrogram, distances: &DistanceMatrix) {
    for id in tree.post_order() {
        let Some(internal) = tree.node(id).and_then(Node::as_internal) else {
            continue;
        };
        let swapped = internal.is_swapped();
        let (Some(left), Some(right)) = (tree.node(internal.left()), tree.node(internal.right()))
        else {
            continue;
        };

        let keep = distances.between(left.rightmost(), right.leftmost());
        let swap = distances.between(right.rightmost(), left.leftmost());
        // Children may have flipped since this node's cache was written
        tree.set_swapped(id, if swap < keep { !swapped } else { swapped });
    }
}
