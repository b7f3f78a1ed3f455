//! Adjacency scoring of a tree's flattened leaf order

use crate::algorithm::distance::DistanceMatrix;
use crate::tree::Dendrogram;

/// Rows in the left-to-right order implied by every node's current orientation
pub fn flatten(tree: &Dendrogram) -> Vec<usize> {
    tree.leaf_order()
}

/// Sum of distances between consecutive rows of `order`
///
/// Zero for sequences of fewer than two rows.
pub fn sequence_score(order: &[usize], distances: &DistanceMatrix) -> f64 {
    order
        .windows(2)
        .map(|pair| match pair {
            [a, b] => distances.between(*a, *b),
            _ => 0.0,
        })
        .sum()
}

/// Total adjacency distance of the tree's current leaf order
///
/// Reads the tree only, so it is safe to call before and after reordering.
pub fn adjacency_score(tree: &Dendrogram, distances: &DistanceMatrix) -> f64 {
    sequence_score(&flatten(tree), distances)
}
