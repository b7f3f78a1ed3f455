//! Tests for structural validation of built and corrupted trees

#[cfg(test)]
mod tests {
    use leaforder::AlgorithmError;
    use leaforder::algorithm::validator::{TreeSummary, Validator};
    use leaforder::tree::{Dendrogram, Internal, Node, NodeId};
    use ndarray::Array1;

    fn id(index: usize) -> NodeId {
        NodeId::new(index)
    }

    fn internal(children: [usize; 2], size: usize, boundaries: (usize, usize)) -> Node {
        Node::Internal(Internal::new(
            [id(children[0]), id(children[1])],
            0.0,
            Array1::zeros(1),
            size,
            boundaries,
        ))
    }

    fn is_corrupt(tree: &Dendrogram) -> bool {
        matches!(
            Validator::check(tree),
            Err(AlgorithmError::StructuralCorruption { .. })
        )
    }

    // Tests a well-formed tree reports its node counts
    // Verified by counting the root twice
    #[test]
    fn test_valid_tree() {
        let mut tree = Dendrogram::with_leaves(3);
        let zero = || Array1::zeros(1);
        let pair = tree.merge(id(0), id(1), 1.0, zero()).expect("parentless");
        tree.merge(pair, id(2), 2.0, zero()).expect("parentless");
        tree.flip(pair);
        tree.refresh_boundaries();

        assert_eq!(
            Validator::check(&tree).expect("valid tree"),
            TreeSummary {
                leaves: 3,
                internals: 2,
            }
        );
    }

    // Tests empty and single-leaf trees are valid
    // Verified by requiring a root for every tree
    #[test]
    fn test_trivial_trees_are_valid() {
        assert!(Validator::check(&Dendrogram::empty()).is_ok());
        assert_eq!(
            Validator::check(&Dendrogram::with_leaves(1)).expect("single leaf"),
            TreeSummary {
                leaves: 1,
                internals: 0,
            }
        );
        assert!(is_corrupt(&Dendrogram::with_leaves(2)));
    }

    // Tests a node reached through two parents is rejected
    // Verified by removing the visited check
    #[test]
    fn test_shared_child() {
        let nodes = vec![
            Node::leaf(0),
            Node::leaf(1),
            internal([0, 1], 2, (0, 1)),
            internal([2, 2], 4, (0, 1)),
        ];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(nodes, Some(id(3)), 2)));
    }

    // Tests a cycle back to an ancestor is rejected
    // Verified by removing the visited check
    #[test]
    fn test_cycle() {
        let nodes = vec![Node::leaf(0), Node::leaf(1), internal([0, 2], 2, (0, 0))];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(nodes, Some(id(2)), 2)));
    }

    // Tests dangling references and bad leaf rows
    // Verified by skipping the row range check
    #[test]
    fn test_missing_nodes_and_rows() {
        let dangling = vec![Node::leaf(0), internal([0, 7], 2, (0, 0))];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(dangling, Some(id(1)), 2)));

        let out_of_range = vec![Node::leaf(0), Node::leaf(5), internal([0, 1], 2, (0, 5))];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(out_of_range, Some(id(2)), 2)));

        let duplicated = vec![Node::leaf(0), Node::leaf(0), internal([0, 1], 2, (0, 0))];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(duplicated, Some(id(2)), 2)));
    }

    // Tests unreachable leaves make the counts disagree
    // Verified by counting arena leaves instead of reachable ones
    #[test]
    fn test_unreachable_leaf() {
        let nodes = vec![
            Node::leaf(0),
            Node::leaf(1),
            Node::leaf(2),
            internal([0, 1], 2, (0, 1)),
        ];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(nodes, Some(id(3)), 3)));
    }

    // Tests stale boundary caches and sizes are rejected
    // Verified by skipping the boundary comparison
    #[test]
    fn test_stale_caches() {
        let stale_boundary = vec![Node::leaf(0), Node::leaf(1), internal([0, 1], 2, (1, 0))];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(stale_boundary, Some(id(2)), 2)));

        let stale_size = vec![Node::leaf(0), Node::leaf(1), internal([0, 1], 3, (0, 1))];
        assert!(is_corrupt(&Dendrogram::from_raw_parts(stale_size, Some(id(2)), 2)));
    }
}
