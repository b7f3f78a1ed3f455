//! Arena-backed binary clustering tree
//!
//! Nodes live in a flat vector addressed by [`NodeId`]. Leaves occupy the
//! first `leaf_count` slots so that leaf `i` is row `i`; every merge appends
//! one internal node. [`Dendrogram::merge`] refuses to install a node that
//! already has a parent, which makes shared subtrees and cycles impossible
//! for trees grown through it. Traversals are iterative and skip nodes they
//! have already seen, so they terminate even on hand-assembled broken trees.

use crate::io::error::{Result, structural_corruption};
use crate::tree::node::{Internal, Node, NodeId};
use bitvec::prelude::*;
use ndarray::Array1;

/// Binary hierarchical clustering tree over dataset rows
#[derive(Debug, Clone, Default)]
pub struct Dendrogram {
    nodes: Vec<Node>,
    parents: Vec<Option<NodeId>>,
    root: Option<NodeId>,
    leaf_count: usize,
}

impl Dendrogram {
    /// Tree with no nodes, the state after `clear()` or for an empty dataset
    pub const fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            parents: Vec::new(),
            root: None,
            leaf_count: 0,
        }
    }

    /// Allocate one leaf per row with no merges yet
    ///
    /// A single leaf is already a complete tree and becomes the root.
    pub fn with_leaves(leaf_count: usize) -> Self {
        let nodes = (0..leaf_count).map(Node::leaf).collect();
        let root = (leaf_count == 1).then_some(NodeId::new(0));
        Self {
            nodes,
            parents: vec![None; leaf_count],
            root,
            leaf_count,
        }
    }

    /// Assemble a tree from arena contents without checking invariants
    ///
    /// Intended for inspecting externally produced trees; run the
    /// [`Validator`](crate::algorithm::validator::Validator) before trusting
    /// the result.
    pub fn from_raw_parts(nodes: Vec<Node>, root: Option<NodeId>, leaf_count: usize) -> Self {
        let mut parents = vec![None; nodes.len()];
        for (index, node) in nodes.iter().enumerate() {
            if let Some(internal) = node.as_internal() {
                for child in internal.children() {
                    if let Some(parent) = parents.get_mut(child.index()) {
                        *parent = Some(NodeId::new(index));
                    }
                }
            }
        }
        Self {
            nodes,
            parents,
            root,
            leaf_count,
        }
    }

    /// Join two parentless subtrees under a new internal node
    ///
    /// `first` becomes the left child and `second` the right child; the new
    /// node's boundary leaves are `first`'s leftmost and `second`'s rightmost.
    /// The new node becomes the root.
    ///
    /// # Errors
    ///
    /// Returns a structural corruption error if:
    /// - Either id is not in the arena
    /// - Both ids are the same node
    /// - Either node has already been installed under a parent
    pub fn merge(
        &mut self,
        first: NodeId,
        second: NodeId,
        merge_distance: f64,
        representative: Array1<f64>,
    ) -> Result<NodeId> {
        if first == second {
            return Err(structural_corruption(&format!("cannot merge node {first} with itself")));
        }
        for id in [first, second] {
            match self.parents.get(id.index()) {
                None => {
                    return Err(structural_corruption(&format!("node {id} is not in the arena")));
                }
                Some(Some(parent)) => {
                    return Err(structural_corruption(&format!(
                        "node {id} already has parent {parent}"
                    )));
                }
                Some(None) => {}
            }
        }

        let (Some(left), Some(right)) = (self.node(first), self.node(second)) else {
            return Err(structural_corruption(&"merge children vanished from arena"));
        };
        let size = left.size() + right.size();
        let boundaries = (left.leftmost(), right.rightmost());

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::Internal(Internal::new(
            [first, second],
            merge_distance,
            representative,
            size,
            boundaries,
        )));
        self.parents.push(None);
        for child in [first, second] {
            if let Some(parent) = self.parents.get_mut(child.index()) {
                *parent = Some(id);
            }
        }
        self.root = Some(id);
        Ok(id)
    }

    /// Root node, `None` for an empty tree
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of dataset rows the tree was built over
    pub const fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of nodes in the arena
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// All arena nodes in allocation order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Parent recorded for a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    /// (left, right) children under the current orientation
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.node(id).and_then(Node::children)
    }

    /// Nodes reachable from the root, every child before its parent
    pub fn post_order(&self) -> Vec<NodeId> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        let mut seen = bitvec![0; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !mark(&mut seen, id) {
                continue;
            }
            stack.push((id, true));
            if let Some((left, right)) = self.children(id) {
                stack.push((right, false));
                stack.push((left, false));
            }
        }
        order
    }

    /// Row indices of the leaves in left-to-right order
    pub fn leaf_order(&self) -> Vec<usize> {
        self.root
            .map_or_else(Vec::new, |root| self.leaves_under(root))
    }

    /// Row indices of the leaves under `id` in left-to-right order
    pub fn leaves_under(&self, id: NodeId) -> Vec<usize> {
        let mut seen = bitvec![0; self.nodes.len()];
        let mut rows = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if !mark(&mut seen, current) {
                continue;
            }
            match self.node(current) {
                Some(Node::Leaf { row }) => rows.push(*row),
                Some(Node::Internal(internal)) => {
                    stack.push(internal.right());
                    stack.push(internal.left());
                }
                None => {}
            }
        }
        rows
    }

    /// Place an internal node's children in or against merge order
    ///
    /// The node's boundary cache is recomputed from its children's caches,
    /// so children must be finalized first. Leaves and unknown ids are left
    /// untouched.
    pub fn set_swapped(&mut self, id: NodeId, swapped: bool) {
        let Some(children) = self
            .node(id)
            .and_then(Node::as_internal)
            .map(Internal::children)
        else {
            return;
        };
        let (left, right) = if swapped {
            (children[1], children[0])
        } else {
            (children[0], children[1])
        };
        let leftmost = self.node(left).map(Node::leftmost);
        let rightmost = self.node(right).map(Node::rightmost);

        if let (Some(leftmost), Some(rightmost), Some(Node::Internal(internal))) =
            (leftmost, rightmost, self.nodes.get_mut(id.index()))
        {
            internal.reorient(swapped, (leftmost, rightmost));
        }
    }

    /// Flip an internal node's children relative to their current placement
    pub fn flip(&mut self, id: NodeId) {
        if let Some(swapped) = self
            .node(id)
            .and_then(Node::as_internal)
            .map(Internal::is_swapped)
        {
            self.set_swapped(id, !swapped);
        }
    }

    /// Recompute every boundary cache bottom-up from the current orientation
    pub fn refresh_boundaries(&mut self) {
        for id in self.post_order() {
            if let Some(swapped) = self
                .node(id)
                .and_then(Node::as_internal)
                .map(Internal::is_swapped)
            {
                self.set_swapped(id, swapped);
            }
        }
    }

    /// Snapshot of every node's orientation, indexed by arena position
    pub fn orientation(&self) -> Vec<bool> {
        self.nodes
            .iter()
            .map(|node| node.as_internal().is_some_and(Internal::is_swapped))
            .collect()
    }

    /// Reapply an orientation snapshot taken with [`Self::orientation`]
    pub fn restore_orientation(&mut self, snapshot: &[bool]) {
        for (index, &swapped) in snapshot.iter().enumerate() {
            if let Some(Node::Internal(internal)) = self.nodes.get_mut(index) {
                let boundaries = (internal.leftmost(), internal.rightmost());
                internal.reorient(swapped, boundaries);
            }
        }
        self.refresh_boundaries();
    }

    /// Discard every node
    pub fn clear(&mut self) {
        *self = Self::empty();
    }
}

// Marks `id` as seen; false when it was already marked or is out of range
fn mark(seen: &mut BitVec, id: NodeId) -> bool {
    let unseen = seen.get(id.index()).as_deref() == Some(&false);
    if unseen {
        seen.set(id.index(), true);
    }
    unseen
}
