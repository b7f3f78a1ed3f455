//! Greedy agglomerative clustering into a binary tree
//!
//! Clusters live in slots: slot `i` starts as row `i`, and merging slots
//! `i < j` stores the result in slot `i` and retires slot `j`. A slot's index
//! is therefore the smallest row index it contains, and scanning active slot
//! pairs in lexicographic order with a strict comparison breaks distance ties
//! toward the lowest pair of original indices.

use crate::algorithm::distance::{DistanceMatrix, Metric};
use crate::dataset::RowVector;
use crate::io::error::{InputError, Result, invalid_parameter, structural_corruption};
use crate::tree::{Dendrogram, NodeId};
use clap::ValueEnum;
use log::debug;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use std::fmt;

/// Rule deriving a merged cluster's distance to the remaining clusters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Linkage {
    /// Size-weighted mean of the two merged distances (UPGMA)
    #[default]
    Average,
    /// Metric distance between size-weighted centroids
    Centroid,
    /// Smaller of the two merged distances
    Single,
    /// Larger of the two merged distances
    Complete,
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Average => "average",
            Self::Centroid => "centroid",
            Self::Single => "single",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Active cluster occupying a slot
#[derive(Debug, Clone)]
struct Cluster {
    node: NodeId,
    size: usize,
    centroid: Array1<f64>,
}

/// Builds a [`Dendrogram`] by repeatedly merging the two closest clusters
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    linkage: Linkage,
    metric: Metric,
}

impl TreeBuilder {
    /// Create a builder; `metric` is only consulted by centroid linkage
    pub const fn new(linkage: Linkage, metric: Metric) -> Self {
        Self { linkage, metric }
    }

    /// Linkage rule used for distance updates
    pub const fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Cluster `rows` into a tree of `rows.len()` leaves and one fewer merges
    ///
    /// Each internal node records the minimum distance at which it was
    /// merged and the size-weighted centroid of its rows. The lower slot
    /// becomes the left child.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `rows` is empty
    /// - `distances` does not cover exactly `rows.len()` rows
    pub fn build(&self, rows: &[RowVector], distances: &DistanceMatrix) -> Result<Dendrogram> {
        let n = rows.len();
        if n == 0 {
            return Err(InputError::EmptyDataset.into());
        }
        if distances.len() != n {
            return Err(invalid_parameter(
                "distances",
                &distances.len(),
                &format!("distance matrix must cover all {n} rows"),
            ));
        }

        let mut tree = Dendrogram::with_leaves(n);
        let mut table: Array2<f64> = distances.as_array().clone();
        let mut slots: Vec<Option<Cluster>> = rows
            .iter()
            .enumerate()
            .map(|(row, vector)| {
                Some(Cluster {
                    node: NodeId::new(row),
                    size: 1,
                    centroid: vector.to_array(),
                })
            })
            .collect();
        let mut active: Vec<usize> = (0..n).collect();

        while active.len() > 1 {
            let (i, j, merge_distance) = closest_pair(&table, &active)
                .ok_or_else(|| structural_corruption(&"no mergeable cluster pair remains"))?;

            let (Some(first), Some(second)) = (
                slots.get_mut(i).and_then(Option::take),
                slots.get_mut(j).and_then(Option::take),
            ) else {
                return Err(structural_corruption(&format!(
                    "slots {i} and {j} are not both active"
                )));
            };

            let size = first.size + second.size;
            let sum = &first.centroid * first.size as f64 + &second.centroid * second.size as f64;
            let centroid = sum / size as f64;
            let node = tree.merge(first.node, second.node, merge_distance, centroid.clone())?;
            debug!(
                "merged slots {i} and {j} at distance {merge_distance:.4} into {node} ({size} rows)"
            );

            active.retain(|&slot| slot != j);
            let merged = Cluster {
                node,
                size,
                centroid,
            };
            let updates: Vec<(usize, f64)> = active
                .par_iter()
                .filter(|&&k| k != i)
                .map(|&k| {
                    let distance =
                        self.linkage_distance(&table, &slots, &first, &second, &merged, (i, j, k));
                    (k, distance)
                })
                .collect();
            for (k, distance) in updates {
                if let Some(cell) = table.get_mut((i, k)) {
                    *cell = distance;
                }
                if let Some(cell) = table.get_mut((k, i)) {
                    *cell = distance;
                }
            }
            if let Some(slot) = slots.get_mut(i) {
                *slot = Some(merged);
            }
        }

        Ok(tree)
    }

    // Distance from the cluster just merged out of slots i and j to slot k
    fn linkage_distance(
        self,
        table: &Array2<f64>,
        slots: &[Option<Cluster>],
        first: &Cluster,
        second: &Cluster,
        merged: &Cluster,
        (i, j, k): (usize, usize, usize),
    ) -> f64 {
        let to_first = table.get((k, i)).copied().unwrap_or(f64::INFINITY);
        let to_second = table.get((k, j)).copied().unwrap_or(f64::INFINITY);
        match self.linkage {
            Linkage::Average => {
                let (a, b) = (first.size as f64, second.size as f64);
                a.mul_add(to_first, b * to_second) / (a + b)
            }
            Linkage::Single => to_first.min(to_second),
            Linkage::Complete => to_first.max(to_second),
            Linkage::Centroid => {
                let Some(other) = slots.get(k).and_then(Option::as_ref) else {
                    return f64::INFINITY;
                };
                let from = merged.centroid.iter().copied();
                let to = other.centroid.iter().copied();
                self.metric.distance(from, to)
            }
        }
    }
}

/// Lowest-indexed active pair at minimum distance, as `(i, j, distance)` with `i < j`
fn closest_pair(table: &Array2<f64>, active: &[usize]) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for (position, &i) in active.iter().enumerate() {
        for &j in active.get(position + 1..).unwrap_or(&[]) {
            let distance = table.get((i, j)).copied().unwrap_or(f64::INFINITY);
            if best.is_none_or(|(_, _, current)| distance < current) {
                best = Some((i, j, distance));
            }
        }
    }
    best
}
