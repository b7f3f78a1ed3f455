//! Reordering pipeline: distances, clustering, ordering, validation, output rows

use crate::algorithm::builder::{Linkage, TreeBuilder};
use crate::algorithm::distance::{DistanceMatrix, Metric};
use crate::algorithm::ordering::{Orderer, OrderingReport, Strategy};
use crate::algorithm::score::{adjacency_score, flatten};
use crate::algorithm::validator::{TreeSummary, Validator};
use crate::dataset::RowVector;
use crate::io::configuration::DEFAULT_OPTIMAL_LEAF_LIMIT;
use crate::io::error::Result;
use crate::tree::Dendrogram;
use log::debug;

/// Parameters of one reordering run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Row dissimilarity
    pub metric: Metric,
    /// Cluster distance update rule
    pub linkage: Linkage,
    /// Reordering heuristic
    pub strategy: Strategy,
    /// Largest row count for the optimal strategy; `None` lifts the bound
    pub optimal_leaf_limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            linkage: Linkage::default(),
            strategy: Strategy::default(),
            optimal_leaf_limit: Some(DEFAULT_OPTIMAL_LEAF_LIMIT),
        }
    }
}

impl PipelineConfig {
    /// Same configuration with a different strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Orderer matching this configuration
    pub const fn orderer(&self) -> Orderer {
        Orderer::new(self.strategy).with_optimal_leaf_limit(self.optimal_leaf_limit)
    }
}

/// Owns one dataset snapshot together with its distance matrix and tree
///
/// `build` replaces everything from a fresh snapshot, `sort` reorders and
/// validates, and `clear` discards all state. No state is shared between
/// builds.
#[derive(Debug, Clone, Default)]
pub struct Reorderer {
    config: PipelineConfig,
    rows: Vec<RowVector>,
    distances: Option<DistanceMatrix>,
    tree: Dendrogram,
}

impl Reorderer {
    /// Create a pipeline with no dataset loaded
    pub const fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            rows: Vec::new(),
            distances: None,
            tree: Dendrogram::empty(),
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Snapshot `rows`, compute their distances and cluster them into a tree
    ///
    /// Any previous tree is discarded first, even when this build fails.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `rows` is empty
    /// - Rows differ in length
    pub fn build(&mut self, rows: &[RowVector]) -> Result<()> {
        self.clear();
        let distances = DistanceMatrix::compute(rows, self.config.metric)?;
        let builder = TreeBuilder::new(self.config.linkage, self.config.metric);
        let tree = builder.build(rows, &distances)?;
        debug!(
            "built tree over {} rows with {} {} linkage",
            rows.len(),
            self.config.metric,
            self.config.linkage
        );

        self.rows = rows.to_vec();
        self.distances = Some(distances);
        self.tree = tree;
        Ok(())
    }

    /// Discard the dataset snapshot, distances and tree
    pub fn clear(&mut self) {
        self.rows.clear();
        self.distances = None;
        self.tree.clear();
    }

    /// Current tree
    pub const fn tree(&self) -> &Dendrogram {
        &self.tree
    }

    /// Distances of the current snapshot, if built
    pub const fn distances(&self) -> Option<&DistanceMatrix> {
        self.distances.as_ref()
    }

    /// Total adjacency distance of the current leaf order, zero when nothing is built
    pub fn score(&self) -> f64 {
        self.distances
            .as_ref()
            .map_or(0.0, |distances| adjacency_score(&self.tree, distances))
    }

    /// Reorder the tree with the configured strategy and validate the result
    ///
    /// # Errors
    ///
    /// Returns a structural corruption error if the reordered tree fails validation
    pub fn sort(&mut self) -> Result<OrderingReport> {
        self.sort_with(self.config.strategy)
    }

    /// Reorder the tree with an explicit strategy and validate the result
    ///
    /// # Errors
    ///
    /// Returns a structural corruption error if the reordered tree fails validation
    pub fn sort_with(&mut self, strategy: Strategy) -> Result<OrderingReport> {
        let orderer = self.config.with_strategy(strategy).orderer();
        let report = match &self.distances {
            Some(distances) => orderer.apply(&mut self.tree, distances),
            None => OrderingReport {
                requested: strategy,
                applied: orderer.effective_strategy(0),
                score_before: 0.0,
                score_after: 0.0,
                reverted: false,
            },
        };
        self.validate()?;
        Ok(report)
    }

    /// Run the structural check on the current tree
    ///
    /// # Errors
    ///
    /// Returns a structural corruption error if the tree is malformed
    pub fn validate(&self) -> Result<TreeSummary> {
        Validator::check(&self.tree)
    }

    /// Snapshot row indices in the current leaf order
    pub fn order(&self) -> Vec<usize> {
        flatten(&self.tree)
    }

    /// Snapshot rows in the current leaf order
    pub fn ordered_rows(&self) -> Vec<RowVector> {
        self.order()
            .into_iter()
            .filter_map(|row| self.rows.get(row).cloned())
            .collect()
    }
}

/// Result of [`reorder_rows`]
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderOutcome {
    /// Rows in their new order
    pub rows: Vec<RowVector>,
    /// Original row index of each output row
    pub order: Vec<usize>,
    /// Scores and strategy actually used
    pub report: OrderingReport,
}

/// Build, reorder and validate in one call
///
/// # Errors
///
/// Returns an error if:
/// - `rows` is empty or rows differ in length
/// - The reordered tree fails validation
pub fn reorder_rows(rows: &[RowVector], config: PipelineConfig) -> Result<ReorderOutcome> {
    let mut reorderer = Reorderer::new(config);
    reorderer.build(rows)?;
    let report = reorderer.sort()?;
    Ok(ReorderOutcome {
        rows: reorderer.ordered_rows(),
        order: reorderer.order(),
        report,
    })
}
