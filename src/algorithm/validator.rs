//! Structural integrity check for a built or reordered tree
//!
//! A failure here means tree construction or reordering is defective. The
//! caller aborts the run; nothing is repaired.

use crate::io::error::{Result, structural_corruption};
use crate::tree::{Dendrogram, Node};
use bitvec::prelude::*;
use log::debug;

/// Node counts confirmed by a successful validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeSummary {
    /// Leaves reachable from the root
    pub leaves: usize,
    /// Internal nodes reachable from the root
    pub internals: usize,
}

/// Walks a tree and confirms it is a well-formed acyclic binary tree
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Verify the tree's structural invariants
    ///
    /// Checks, starting from the root:
    /// - No node is reached twice (no cycles, no node shared by two parents)
    /// - Every referenced node exists and every leaf row is within range
    /// - Exactly `leaf_count` leaves and `leaf_count - 1` internal nodes
    /// - Every cached boundary leaf and size agrees with the node's children
    ///
    /// # Errors
    ///
    /// Returns a structural corruption error describing the first violation found
    pub fn check(tree: &Dendrogram) -> Result<TreeSummary> {
        let expected_leaves = tree.leaf_count();
        let Some(root) = tree.root() else {
            if expected_leaves == 0 {
                return Ok(TreeSummary {
                    leaves: 0,
                    internals: 0,
                });
            }
            return Err(structural_corruption(&format!(
                "tree over {expected_leaves} rows has no root"
            )));
        };

        let mut visited = bitvec![0; tree.node_count()];
        let mut rows_seen = bitvec![0; expected_leaves];
        let mut internal_nodes = Vec::new();
        let mut leaves = 0;
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(node) = tree.node(id) else {
                return Err(structural_corruption(&format!(
                    "node {id} is referenced but not in the arena"
                )));
            };
            if visited.get(id.index()).as_deref() == Some(&true) {
                return Err(structural_corruption(&format!(
                    "node {id} is reachable more than once (cycle or shared child)"
                )));
            }
            visited.set(id.index(), true);

            match node {
                Node::Leaf { row } => {
                    match rows_seen.get(*row).as_deref() {
                        None => {
                            return Err(structural_corruption(&format!(
                                "leaf {id} refers to row {row} of {expected_leaves}"
                            )));
                        }
                        Some(true) => {
                            return Err(structural_corruption(&format!(
                                "row {row} appears under more than one leaf"
                            )));
                        }
                        Some(false) => {}
                    }
                    rows_seen.set(*row, true);
                    leaves += 1;
                }
                Node::Internal(internal) => {
                    internal_nodes.push(id);
                    stack.push(internal.right());
                    stack.push(internal.left());
                }
            }
        }

        let internals = internal_nodes.len();
        if leaves != expected_leaves || internals + 1 != expected_leaves {
            return Err(structural_corruption(&format!(
                "found {leaves} leaves and {internals} internal nodes for {expected_leaves} rows"
            )));
        }

        for id in internal_nodes {
            let Some(internal) = tree.node(id).and_then(Node::as_internal) else {
                continue;
            };
            let children = (tree.node(internal.left()), tree.node(internal.right()));
            let (Some(left), Some(right)) = children else {
                continue;
            };
            let cached = (internal.leftmost(), internal.rightmost());
            let actual = (left.leftmost(), right.rightmost());
            if cached != actual {
                return Err(structural_corruption(&format!(
                    "node {id} caches boundaries {cached:?} but its children give {actual:?}"
                )));
            }
            if internal.size() != left.size() + right.size() {
                return Err(structural_corruption(&format!(
                    "node {id} records {} leaves but its children hold {}",
                    internal.size(),
                    left.size() + right.size()
                )));
            }
        }

        debug!("validated tree with {leaves} leaves and {internals} internal nodes");
        Ok(TreeSummary { leaves, internals })
    }
}
