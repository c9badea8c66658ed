use crate::matrix::GenotypeMatrix;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use ndarray::ArrayView1;
use rayon::prelude::*;

/// Mean squared genotype difference over the positions both samples have called.
///
/// Returns `None` when no position is known in both samples.
///
/// # Panics
///
/// Panics if a genotype vector and its mask, or the two samples' vectors, differ in length.
pub fn pair_distance(
    genotypes1: ArrayView1<'_, i8>,
    known1: ArrayView1<'_, bool>,
    genotypes2: ArrayView1<'_, i8>,
    known2: ArrayView1<'_, bool>,
) -> Option<f64> {
    assert_eq!(genotypes1.len(), known1.len(), "genotype and mask lengths differ");
    assert_eq!(genotypes2.len(), known2.len(), "genotype and mask lengths differ");
    assert_eq!(genotypes1.len(), genotypes2.len(), "genotype vector lengths differ");

    let weights = (&known1 & &known2).mapv(i64::from);
    let denom = weights.sum();
    if denom == 0 {
        return None;
    }
    let diff = (&genotypes1 - &genotypes2).mapv(i64::from) * &weights;
    let sum_sq = diff.dot(&diff);
    Some(sum_sq as f64 / denom as f64)
}

pub struct DistanceTable {
    // Sorted lexically
    samples: Vec<String>,
    distances: Vec<Option<f64>>, // Flat (n x n) row-major
}

impl DistanceTable {
    pub fn compute(matrix: &GenotypeMatrix) -> Self {
        let (order, pairs) = Self::plan(matrix);
        let pb = pair_progress(pairs.len());
        let values = pairs
            .iter()
            .map(|&(i, j)| {
                let d = Self::distance_between(matrix, order[i], order[j]);
                pb.inc(1);
                d
            })
            .collect();
        pb.abandon();
        Self::assemble(matrix, order, &pairs, values)
    }

    pub fn compute_parallel(matrix: &GenotypeMatrix) -> Self {
        let (order, pairs) = Self::plan(matrix);
        let pb = pair_progress(pairs.len());
        let values = pairs
            .par_iter()
            .map(|&(i, j)| {
                let d = Self::distance_between(matrix, order[i], order[j]);
                pb.inc(1);
                d
            })
            .collect();
        pb.abandon();
        Self::assemble(matrix, order, &pairs, values)
    }

    // Matrix row of each sorted sample, and every (i, j) with i <= j over sorted positions.
    fn plan(matrix: &GenotypeMatrix) -> (Vec<usize>, Vec<(usize, usize)>) {
        let samples = matrix.samples();
        let order: Vec<usize> = (0..samples.len())
            .sorted_by(|&a, &b| samples[a].cmp(&samples[b]))
            .collect();
        let n = order.len();
        let pairs = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();
        (order, pairs)
    }

    fn distance_between(matrix: &GenotypeMatrix, row1: usize, row2: usize) -> Option<f64> {
        pair_distance(
            matrix.genotypes(row1),
            matrix.known(row1),
            matrix.genotypes(row2),
            matrix.known(row2),
        )
    }

    fn assemble(
        matrix: &GenotypeMatrix,
        order: Vec<usize>,
        pairs: &[(usize, usize)],
        values: Vec<Option<f64>>,
    ) -> Self {
        let n = order.len();
        let samples: Vec<String> = order
            .into_iter()
            .map(|row| matrix.samples()[row].clone())
            .collect();
        let mut distances = vec![None; n * n];
        for (&(i, j), d) in pairs.iter().zip(values) {
            distances[n * i + j] = d;
            distances[n * j + i] = d;
        }
        Self { samples, distances }
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.distances[self.n_samples() * i + j]
    }

    /// Every ordered pair, including self pairs, in lexical order of (sample1, sample2).
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, Option<f64>)> + '_ {
        let n = self.n_samples();
        (0..n)
            .cartesian_product(0..n)
            .map(move |(i, j)| (self.samples[i].as_str(), self.samples[j].as_str(), self.get(i, j)))
    }
}

fn pair_progress(n_pairs: usize) -> ProgressBar {
    let pb = ProgressBar::new(n_pairs as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:30} {pos}/{len} pairs").unwrap(),
    );
    pb
}
