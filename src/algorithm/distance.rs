//! Pairwise row dissimilarity
//!
//! Every cell depends only on its two input rows, so the upper triangle is
//! computed row by row across the rayon pool and mirrored afterwards.

use crate::dataset::RowVector;
use crate::dataset::raster::common_width;
use crate::io::error::{Result, invalid_parameter};
use clap::ValueEnum;
use ndarray::Array2;
use num_traits::ToPrimitive;
use rayon::prelude::*;
use std::fmt;

/// Dissimilarity between two equal-length sample vectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Metric {
    /// Square root of the summed squared differences
    #[default]
    Euclidean,
    /// Summed squared differences
    SquaredEuclidean,
    /// Summed absolute differences
    Manhattan,
}

impl Metric {
    /// Distance between two sample sequences
    ///
    /// Extra trailing components of the longer sequence are ignored; callers
    /// check lengths at the dataset boundary.
    pub fn distance<A, B>(
        self,
        a: impl IntoIterator<Item = A>,
        b: impl IntoIterator<Item = B>,
    ) -> f64
    where
        A: ToPrimitive,
        B: ToPrimitive,
    {
        let differences = a
            .into_iter()
            .zip(b)
            .map(|(x, y)| x.to_f64().unwrap_or(0.0) - y.to_f64().unwrap_or(0.0));
        match self {
            Self::Euclidean => differences.map(|d| d * d).sum::<f64>().sqrt(),
            Self::SquaredEuclidean => differences.map(|d| d * d).sum(),
            Self::Manhattan => differences.map(f64::abs).sum(),
        }
    }

    /// Distance between two dataset rows
    pub fn between(self, a: &RowVector, b: &RowVector) -> f64 {
        self.distance(a.samples().iter().copied(), b.samples().iter().copied())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Euclidean => "euclidean",
            Self::SquaredEuclidean => "squared-euclidean",
            Self::Manhattan => "manhattan",
        };
        f.write_str(name)
    }
}

/// Symmetric table of row-to-row distances with a zero diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances between `rows`
    ///
    /// # Errors
    ///
    /// Returns an error if any two rows differ in length
    pub fn compute(rows: &[RowVector], metric: Metric) -> Result<Self> {
        common_width(rows)?;
        let n = rows.len();

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let Some(a) = rows.get(i) else {
                    return Vec::new();
                };
                rows.get(i + 1..)
                    .unwrap_or(&[])
                    .iter()
                    .map(|b| metric.between(a, b))
                    .collect()
            })
            .collect();

        let mut values = Array2::zeros((n, n));
        for (i, distances) in upper.iter().enumerate() {
            for (offset, &d) in distances.iter().enumerate() {
                let j = i + 1 + offset;
                if let Some(cell) = values.get_mut((i, j)) {
                    *cell = d;
                }
                if let Some(cell) = values.get_mut((j, i)) {
                    *cell = d;
                }
            }
        }

        Ok(Self { values })
    }

    /// Wrap a precomputed table
    ///
    /// # Errors
    ///
    /// Returns an error if the table is not square, not symmetric, has a
    /// nonzero diagonal, or holds negative or non-finite values
    pub fn from_array(values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != cols {
            return Err(invalid_parameter(
                "distances",
                &format!("{rows}x{cols}"),
                &"distance table must be square",
            ));
        }
        for ((i, j), &d) in values.indexed_iter() {
            if !d.is_finite() || d < 0.0 {
                return Err(invalid_parameter(
                    "distances",
                    &d,
                    &format!("entry ({i}, {j}) must be finite and non-negative"),
                ));
            }
            if i == j && d != 0.0 {
                return Err(invalid_parameter(
                    "distances",
                    &d,
                    &format!("diagonal entry ({i}, {i}) must be zero"),
                ));
            }
            let asymmetric = values.get((j, i)).is_none_or(|&m| (m - d).abs() > 0.0);
            if asymmetric {
                return Err(invalid_parameter(
                    "distances",
                    &d,
                    &format!("entry ({i}, {j}) differs from ({j}, {i})"),
                ));
            }
        }
        Ok(Self { values })
    }

    /// Number of rows covered
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    /// Whether the table covers no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distance between rows `i` and `j`, `None` when out of range
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    /// Distance between rows `i` and `j`, infinite when out of range
    pub fn between(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).unwrap_or(f64::INFINITY)
    }

    /// Underlying table
    pub const fn as_array(&self) -> &Array2<f64> {
        &self.values
    }
}
