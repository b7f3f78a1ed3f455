//! Tests for row metrics and the pairwise distance table

#[cfg(test)]
mod tests {
    use leaforder::AlgorithmError;
    use leaforder::algorithm::distance::{DistanceMatrix, Metric};
    use leaforder::dataset::RowVector;
    use ndarray::array;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // Tests each metric on a known pair
    // Verified by omitting the square root for Euclidean
    #[test]
    fn test_metrics() {
        let a = RowVector::new(vec![0, 0]);
        let b = RowVector::new(vec![3, 4]);

        assert!(close(Metric::Euclidean.between(&a, &b), 5.0));
        assert!(close(Metric::SquaredEuclidean.between(&a, &b), 25.0));
        assert!(close(Metric::Manhattan.between(&a, &b), 7.0));
        assert!(close(Metric::Euclidean.distance([1.5_f64], [1.5_f64]), 0.0));
    }

    // Tests the computed table is symmetric with a zero diagonal
    // Verified by filling only the upper triangle
    #[test]
    fn test_compute_symmetric() {
        let rows: Vec<RowVector> = [0, 10, 5, 7]
            .iter()
            .map(|&value| RowVector::new(vec![value]))
            .collect();
        let distances = DistanceMatrix::compute(&rows, Metric::Euclidean).expect("equal widths");

        assert_eq!(distances.len(), 4);
        for i in 0..4 {
            assert_eq!(distances.get(i, i), Some(0.0));
            for j in 0..4 {
                assert_eq!(distances.get(i, j), distances.get(j, i));
            }
        }
        assert_eq!(distances.get(0, 1), Some(10.0));
        assert_eq!(distances.get(1, 2), Some(5.0));
        assert_eq!(distances.get(3, 0), Some(7.0));
        assert_eq!(distances.get(4, 0), None);
        assert!(distances.between(0, 4).is_infinite());
    }

    // Tests rows of different widths are rejected
    // Verified by zipping mismatched rows silently
    #[test]
    fn test_compute_rejects_mismatched_rows() {
        let rows = vec![RowVector::new(vec![1, 2]), RowVector::new(vec![1])];
        assert!(matches!(
            DistanceMatrix::compute(&rows, Metric::Manhattan),
            Err(AlgorithmError::InvalidInput(_))
        ));
        assert!(DistanceMatrix::compute(&[], Metric::Manhattan)
            .expect("empty input")
            .is_empty());
    }

    // Tests validation of precomputed tables
    // Verified by skipping the symmetry check
    #[test]
    fn test_from_array_validation() {
        assert!(DistanceMatrix::from_array(array![[0.0, 1.0], [1.0, 0.0]]).is_ok());
        assert!(DistanceMatrix::from_array(array![[0.0, 1.0], [2.0, 0.0]]).is_err());
        assert!(DistanceMatrix::from_array(array![[1.0, 1.0], [1.0, 0.0]]).is_err());
        assert!(DistanceMatrix::from_array(array![[0.0, -1.0], [-1.0, 0.0]]).is_err());
        assert!(DistanceMatrix::from_array(array![[0.0, f64::NAN], [f64::NAN, 0.0]]).is_err());
        assert!(DistanceMatrix::from_array(array![[0.0, 1.0, 2.0], [1.0, 0.0, 3.0]]).is_err());
    }

    // Tests metric names used in logs
    // Verified by swapping two display names
    #[test]
    fn test_metric_display() {
        assert_eq!(Metric::default(), Metric::Euclidean);
        assert_eq!(Metric::SquaredEuclidean.to_string(), "squared-euclidean");
        assert_eq!(Metric::Manhattan.to_string(), "manhattan");
    }
}
