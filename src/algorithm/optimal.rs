//! Optimal leaf ordering over child flips
//!
//! `costs[l][r]` holds the cheapest arrangement of the subtree rooted at the
//! lowest common ancestor of rows `l` and `r` that starts at `l` and ends at
//! `r`. Every row pair has exactly one such ancestor, so a single N x N table
//! holds every subtree's endpoint costs. Subtrees of equal height never read
//! each other's entries, so each height level is filled in parallel before
//! the next one starts. A sequential top-down pass then picks the cheapest
//! endpoints at the root and fixes each node's orientation.

use crate::algorithm::distance::DistanceMatrix;
use crate::tree::{Dendrogram, Internal, Node, NodeId};
use log::debug;
use ndarray::Array2;
use rayon::prelude::*;

/// Leaves of a node split by the child (in merge order) that holds them
///
/// A leaf has an empty second half.
#[derive(Debug, Clone, Default)]
struct Halves {
    first: Vec<usize>,
    second: Vec<usize>,
}

impl Halves {
    fn of(tree: &Dendrogram, node: &Node) -> Self {
        match node {
            Node::Leaf { row } => Self {
                first: vec![*row],
                second: Vec::new(),
            },
            Node::Internal(internal) => {
                let [a, b] = internal.children();
                Self {
                    first: tree.leaves_under(a),
                    second: tree.leaves_under(b),
                }
            }
        }
    }

    const fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    fn contains_in_first(&self, row: usize) -> bool {
        self.first.contains(&row)
    }

    /// Every leaf tagged with whether it lies in the first half
    fn tagged(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.first
            .iter()
            .map(|&row| (row, true))
            .chain(self.second.iter().map(|&row| (row, false)))
    }

    /// Rows that may end an arrangement starting in the given half, with the
    /// position of the first of them in [`Self::tagged`] order
    const fn partners(&self, in_first: bool) -> (usize, &[usize]) {
        if self.second.is_empty() || !in_first {
            (0, self.first.as_slice())
        } else {
            (self.first.len(), self.second.as_slice())
        }
    }
}

fn cost(costs: &Array2<f64>, from: usize, to: usize) -> f64 {
    costs.get((from, to)).copied().unwrap_or(f64::INFINITY)
}

/// Endpoint costs for every (l in `a`, r in `b`) arrangement of `a` followed by `b`
fn cross_costs(
    costs: &Array2<f64>,
    distances: &DistanceMatrix,
    a: &Halves,
    b: &Halves,
) -> Vec<(usize, usize, f64)> {
    let b_leaves: Vec<(usize, bool)> = b.tagged().collect();
    let mut block = Vec::with_capacity(a.len() * b.len());

    for (l, l_first) in a.tagged() {
        let (_, a_partners) = a.partners(l_first);
        // Cheapest way to arrange `a` from `l` and then step onto each leaf of `b`
        let via: Vec<f64> = b_leaves
            .iter()
            .map(|&(k, _)| {
                a_partners
                    .iter()
                    .map(|&m| cost(costs, l, m) + distances.between(m, k))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        for &(r, r_first) in &b_leaves {
            let (offset, b_partners) = b.partners(r_first);
            let best = b_partners
                .iter()
                .enumerate()
                .map(|(index, &k)| {
                    via.get(offset + index).copied().unwrap_or(f64::INFINITY) + cost(costs, k, r)
                })
                .fold(f64::INFINITY, f64::min);
            block.push((l, r, best));
        }
    }
    block
}

/// Fill the endpoint cost table bottom-up, one height level at a time
fn endpoint_costs(
    tree: &Dendrogram,
    distances: &DistanceMatrix,
    order: &[NodeId],
    halves: &[Halves],
) -> Array2<f64> {
    let n = tree.leaf_count();
    let mut costs = Array2::from_elem((n, n), f64::INFINITY);
    costs.diag_mut().fill(0.0);

    let mut heights = vec![0_usize; tree.node_count()];
    let mut levels: Vec<Vec<NodeId>> = Vec::new();
    for &id in order {
        let Some((left, right)) = tree.children(id) else {
            continue;
        };
        let height_of = |child: NodeId| heights.get(child.index()).copied().unwrap_or(0);
        let height = 1 + height_of(left).max(height_of(right));
        if let Some(slot) = heights.get_mut(id.index()) {
            *slot = height;
        }
        if levels.len() < height {
            levels.resize_with(height, Vec::new);
        }
        if let Some(level) = levels.get_mut(height - 1) {
            level.push(id);
        }
    }

    for (depth, level) in levels.iter().enumerate() {
        let blocks: Vec<Vec<(usize, usize, f64)>> = level
            .par_iter()
            .filter_map(|&id| {
                let [a, b] = tree.node(id)?.as_internal()?.children();
                Some(cross_costs(
                    &costs,
                    distances,
                    halves.get(a.index())?,
                    halves.get(b.index())?,
                ))
            })
            .collect();
        for (l, r, value) in blocks.into_iter().flatten() {
            if let Some(cell) = costs.get_mut((l, r)) {
                *cell = value;
            }
            if let Some(cell) = costs.get_mut((r, l)) {
                *cell = value;
            }
        }
        debug!(
            "filled cost tables for {} subtrees at height {}",
            level.len(),
            depth + 1
        );
    }
    costs
}

/// Reorder `tree` to the cheapest arrangement reachable by flipping children
pub fn order_optimally(tree: &mut Dendrogram, distances: &DistanceMatrix) {
    let Some(root) = tree.root() else {
        return;
    };
    let order = tree.post_order();
    let mut halves = vec![Halves::default(); tree.node_count()];
    for &id in &order {
        if let (Some(node), Some(slot)) = (tree.node(id), halves.get_mut(id.index())) {
            *slot = Halves::of(tree, node);
        }
    }
    let Some(root_halves) = halves.get(root.index()) else {
        return;
    };
    if root_halves.second.is_empty() {
        return;
    }

    let costs = endpoint_costs(tree, distances, &order, &halves);

    let mut start = None;
    for &l in &root_halves.first {
        for &r in &root_halves.second {
            let value = cost(&costs, l, r);
            if start.is_none_or(|(_, _, best)| value < best) {
                start = Some((l, r, value));
            }
        }
    }
    let Some((first_row, last_row, total)) = start else {
        return;
    };
    debug!("optimal arrangement runs from row {first_row} to row {last_row} at cost {total}");

    let mut stack = vec![(root, first_row, last_row)];
    while let Some((id, l, r)) = stack.pop() {
        let Some([a, b]) = tree
            .node(id)
            .and_then(Node::as_internal)
            .map(Internal::children)
        else {
            continue;
        };
        let (Some(own), Some(a_halves), Some(b_halves)) = (
            halves.get(id.index()),
            halves.get(a.index()),
            halves.get(b.index()),
        ) else {
            continue;
        };

        let starts_in_first = own.contains_in_first(l);
        let (left, right, left_halves, right_halves) = if starts_in_first {
            (a, b, a_halves, b_halves)
        } else {
            (b, a, b_halves, a_halves)
        };
        let (_, left_ends) = left_halves.partners(left_halves.contains_in_first(l));
        let (_, right_starts) = right_halves.partners(right_halves.contains_in_first(r));

        let mut split = None;
        for &m in left_ends {
            let head = cost(&costs, l, m);
            for &k in right_starts {
                let value = head + distances.between(m, k) + cost(&costs, k, r);
                if split.is_none_or(|(_, _, best)| value < best) {
                    split = Some((m, k, value));
                }
            }
        }
        let Some((m, k, _)) = split else {
            continue;
        };

        tree.set_swapped(id, !starts_in_first);
        stack.push((right, k, r));
        stack.push((left, l, m));
    }

    tree.refresh_boundaries();
}
