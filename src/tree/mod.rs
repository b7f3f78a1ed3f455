//! Clustering tree data structures
//!
//! This module contains the arena representation of the dendrogram:
//! - Node identifiers and leaf/internal node variants
//! - The tree arena with orientation and traversal operations

/// Tree arena with install-once merges and iterative traversals
pub mod dendrogram;
/// Node identifiers and node variants
pub mod node;

pub use dendrogram::Dendrogram;
pub use node::{Internal, Node, NodeId};
