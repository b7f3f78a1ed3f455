//! Arena node types for the clustering tree

use ndarray::Array1;
use std::fmt;

/// Stable index of a node inside a [`Dendrogram`](crate::tree::Dendrogram) arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap an arena index
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index of this node
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Merge point joining two clusters
///
/// Children are stored in the order they were merged. Reordering never
/// touches them; it only flips `swapped`, which decides which child is
/// currently placed on the left, and refreshes the cached boundary leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Internal {
    children: [NodeId; 2],
    swapped: bool,
    merge_distance: f64,
    representative: Array1<f64>,
    size: usize,
    leftmost: usize,
    rightmost: usize,
}

impl Internal {
    /// Create an internal node in its unswapped orientation
    ///
    /// `boundaries` holds the (leftmost, rightmost) original row indices
    /// reachable under that orientation.
    pub const fn new(
        children: [NodeId; 2],
        merge_distance: f64,
        representative: Array1<f64>,
        size: usize,
        boundaries: (usize, usize),
    ) -> Self {
        Self {
            children,
            swapped: false,
            merge_distance,
            representative,
            size,
            leftmost: boundaries.0,
            rightmost: boundaries.1,
        }
    }

    /// Children in merge order, independent of orientation
    pub const fn children(&self) -> [NodeId; 2] {
        self.children
    }

    /// Child currently placed on the left
    pub const fn left(&self) -> NodeId {
        if self.swapped {
            self.children[1]
        } else {
            self.children[0]
        }
    }

    /// Child currently placed on the right
    pub const fn right(&self) -> NodeId {
        if self.swapped {
            self.children[0]
        } else {
            self.children[1]
        }
    }

    /// Whether the children are placed opposite to merge order
    pub const fn is_swapped(&self) -> bool {
        self.swapped
    }

    /// Dissimilarity at which the two children were joined
    pub const fn merge_distance(&self) -> f64 {
        self.merge_distance
    }

    /// Size-weighted centroid of every row under this node
    pub const fn representative(&self) -> &Array1<f64> {
        &self.representative
    }

    /// Number of leaves under this node
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Row index of the leftmost leaf under the current orientation
    pub const fn leftmost(&self) -> usize {
        self.leftmost
    }

    /// Row index of the rightmost leaf under the current orientation
    pub const fn rightmost(&self) -> usize {
        self.rightmost
    }

    pub(crate) const fn reorient(&mut self, swapped: bool, boundaries: (usize, usize)) {
        self.swapped = swapped;
        self.leftmost = boundaries.0;
        self.rightmost = boundaries.1;
    }
}

/// Tree node: either an original row or a merge of two subtrees
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Original dataset row
    Leaf {
        /// Index of the row in the dataset snapshot
        row: usize,
    },
    /// Merge of two clusters
    Internal(Internal),
}

impl Node {
    /// Create a leaf for a dataset row
    pub const fn leaf(row: usize) -> Self {
        Self::Leaf { row }
    }

    /// Whether this node is a leaf
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Access internal node data, if any
    pub const fn as_internal(&self) -> Option<&Internal> {
        match self {
            Self::Internal(internal) => Some(internal),
            Self::Leaf { .. } => None,
        }
    }

    /// Row index of the leftmost leaf under this node
    pub const fn leftmost(&self) -> usize {
        match self {
            Self::Leaf { row } => *row,
            Self::Internal(internal) => internal.leftmost,
        }
    }

    /// Row index of the rightmost leaf under this node
    pub const fn rightmost(&self) -> usize {
        match self {
            Self::Leaf { row } => *row,
            Self::Internal(internal) => internal.rightmost,
        }
    }

    /// Number of leaves under this node
    pub const fn size(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Internal(internal) => internal.size,
        }
    }

    /// (left, right) children under the current orientation
    pub const fn children(&self) -> Option<(NodeId, NodeId)> {
        match self {
            Self::Leaf { .. } => None,
            Self::Internal(internal) => Some((internal.left(), internal.right())),
        }
    }
}
