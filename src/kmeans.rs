//! Lloyd's algorithm over colour points.
//!
//! Initial centroids are `k` distinct input points drawn without replacement
//! from a seeded generator, so a run is fully determined by its points and
//! seed. A centroid that loses all of its points keeps its previous value.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::extract::{Centroid, ColorPoint};

pub const DEFAULT_K: usize = 8;
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Label held by a point before its first assignment pass.
const UNASSIGNED: usize = usize::MAX;

/// Parameters of one clustering run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Number of centroids. Must be in `1..=points.len()`.
    pub k: usize,
    /// Upper bound on assignment/update passes.
    pub max_iterations: usize,
    /// Seed for choosing the initial centroids.
    pub seed: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: 0,
        }
    }
}

impl ClusterConfig {
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Result of a clustering run.
#[derive(Clone, Debug, PartialEq)]
pub struct Clustering {
    centroids: Vec<Centroid>,
    assignments: Vec<usize>,
    iterations: usize,
    converged: bool,
}

impl Clustering {
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    /// Centroid index of every point, in point order.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Number of assignment passes that were executed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// True when the last pass changed no assignment.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn into_parts(self) -> (Vec<Centroid>, Vec<usize>) {
        (self.centroids, self.assignments)
    }

    /// Number of points assigned to each centroid.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.centroids.len()];
        for &label in &self.assignments {
            sizes[label] += 1;
        }
        sizes
    }

    /// Sum of squared distances from each point to its assigned centroid.
    /// `points` must be the set this clustering was computed from.
    pub fn inertia(&self, points: &[ColorPoint]) -> f64 {
        points
            .iter()
            .zip(&self.assignments)
            .map(|(p, &label)| p.distance_sq(&self.centroids[label]))
            .sum()
    }
}

/// Run Lloyd's algorithm with a generator seeded from `config.seed`.
pub fn cluster(points: &[ColorPoint], config: &ClusterConfig) -> Result<Clustering> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    cluster_with_rng(points, config.k, config.max_iterations, &mut rng)
}

/// Run Lloyd's algorithm, drawing the initial centroids from `rng`.
pub fn cluster_with_rng<R: Rng + ?Sized>(
    points: &[ColorPoint],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Clustering> {
    if points.is_empty() {
        return Err(Error::InvalidArgument("cannot cluster an empty point set".to_string()));
    }
    if k == 0 {
        return Err(Error::InvalidArgument("k must be at least 1".to_string()));
    }
    if k > points.len() {
        return Err(Error::InvalidArgument(format!(
            "k ({k}) cannot exceed number of points ({})",
            points.len()
        )));
    }

    let mut centroids: Vec<Centroid> = index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i])
        .collect();

    let mut assignments = vec![UNASSIGNED; points.len()];
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..max_iterations {
        iterations = iter + 1;
        let changed = assign(points, &centroids, &mut assignments);
        update(points, &assignments, &mut centroids);
        debug!("iteration {iterations}: {changed} assignments changed");
        if changed == 0 {
            converged = true;
            break;
        }
    }

    // No pass ran: label every point against the initial centroids.
    if iterations == 0 {
        assign(points, &centroids, &mut assignments);
    }

    info!(
        "clustered {} points into {k} groups in {iterations} iterations (converged: {converged})",
        points.len()
    );

    Ok(Clustering {
        centroids,
        assignments,
        iterations,
        converged,
    })
}

/// Index of the closest centroid. Exact ties go to the lowest index.
#[inline(always)]
pub fn nearest_centroid(point: &ColorPoint, centroids: &[Centroid]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, c) in centroids.iter().enumerate() {
        let d = point.distance_sq(c);
        if d < best_dist {
            best_dist = d;
            best_idx = idx;
        }
    }
    best_idx
}

/// One assignment pass against fixed centroids.
pub fn assign_points(points: &[ColorPoint], centroids: &[Centroid]) -> Result<Vec<usize>> {
    if centroids.is_empty() {
        return Err(Error::InvalidArgument("centroid set is empty".to_string()));
    }
    Ok(points.iter().map(|p| nearest_centroid(p, centroids)).collect())
}

/// Relabel every point in place; returns how many labels changed.
fn assign(points: &[ColorPoint], centroids: &[Centroid], assignments: &mut [usize]) -> usize {
    let mut changed = 0;
    for (p, label) in points.iter().zip(assignments.iter_mut()) {
        let nearest = nearest_centroid(p, centroids);
        if nearest != *label {
            *label = nearest;
            changed += 1;
        }
    }
    changed
}

/// Move every centroid to the mean of its points. Empty clusters stay put.
fn update(points: &[ColorPoint], assignments: &[usize], centroids: &mut [Centroid]) {
    let mut sums = vec![[0.0f64; 3]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (p, &label) in points.iter().zip(assignments) {
        let c = p.channels();
        let sum = &mut sums[label];
        sum[0] += c[0];
        sum[1] += c[1];
        sum[2] += c[2];
        counts[label] += 1;
    }

    for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
        if count == 0 {
            continue;
        }
        let n = count as f64;
        *centroid = ColorPoint::new(sum[0] / n, sum[1] / n, sum[2] / n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn p(r: f64, g: f64, b: f64) -> ColorPoint {
        ColorPoint::new(r, g, b)
    }

    #[test]
    fn rejects_invalid_arguments() {
        let points = vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)];
        let cfg = ClusterConfig::default().with_max_iterations(5);

        assert!(matches!(cluster(&[], &cfg.with_k(1)), Err(Error::InvalidArgument(_))));
        assert!(matches!(cluster(&points, &cfg.with_k(0)), Err(Error::InvalidArgument(_))));
        assert!(matches!(cluster(&points, &cfg.with_k(3)), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn single_cluster_is_the_mean() {
        let points = vec![
            p(0.1, 0.2, 0.3),
            p(0.5, 0.5, 0.5),
            p(0.9, 0.0, 0.6),
            p(0.2, 0.7, 0.1),
        ];
        let result = cluster(&points, &ClusterConfig::default().with_k(1).with_seed(7)).unwrap();
        let [r, g, b] = result.centroids()[0].channels();
        assert_approx_eq!(r, 0.425);
        assert_approx_eq!(g, 0.35);
        assert_approx_eq!(b, 0.375);
        assert!(result.converged());
        assert_eq!(result.cluster_sizes(), vec![4]);
    }

    #[test]
    fn zero_iterations_returns_an_input_point() {
        let points = vec![p(0.1, 0.2, 0.3), p(0.4, 0.5, 0.6), p(0.7, 0.8, 0.9)];
        let cfg = ClusterConfig::default().with_k(1).with_max_iterations(0).with_seed(3);
        let result = cluster(&points, &cfg).unwrap();
        assert_eq!(result.iterations(), 0);
        assert!(!result.converged());
        assert!(points.contains(&result.centroids()[0]));
        assert_eq!(result.assignments(), &[0, 0, 0]);
    }

    #[test]
    fn initial_centroids_are_distinct_points() {
        let points: Vec<ColorPoint> = (0..10).map(|i| p(i as f64 / 10.0, 0.0, 0.0)).collect();
        let cfg = ClusterConfig::default().with_k(10).with_max_iterations(0).with_seed(11);
        let result = cluster(&points, &cfg).unwrap();
        let mut seen: Vec<f64> = result.centroids().iter().map(|c| c.channels()[0]).collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        seen.dedup();
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let centroids = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        assert_eq!(nearest_centroid(&p(0.5, 0.0, 0.0), &centroids), 0);
        let same = vec![p(0.3, 0.3, 0.3), p(0.3, 0.3, 0.3)];
        assert_eq!(nearest_centroid(&p(0.0, 0.0, 0.0), &same), 0);
    }

    #[test]
    fn empty_cluster_keeps_its_centroid() {
        let points = vec![p(0.0, 0.0, 0.0), p(0.2, 0.0, 0.0)];
        let mut centroids = vec![p(0.1, 0.0, 0.0), p(0.9, 0.9, 0.9)];
        let mut labels = vec![UNASSIGNED; 2];
        assert_eq!(assign(&points, &centroids, &mut labels), 2);
        update(&points, &labels, &mut centroids);
        assert_eq!(labels, vec![0, 0]);
        assert_approx_eq!(centroids[0].channels()[0], 0.1);
        assert_eq!(centroids[1], p(0.9, 0.9, 0.9));
    }

    #[test]
    fn assign_points_needs_centroids() {
        assert!(assign_points(&[p(0.0, 0.0, 0.0)], &[]).is_err());
    }

    #[test]
    fn inertia_of_exact_fit_is_zero() {
        let points = vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0)];
        let result = cluster(&points, &ClusterConfig::default().with_k(2)).unwrap();
        assert_eq!(result.inertia(&points), 0.0);
    }
}
