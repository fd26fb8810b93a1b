//! Dominant color extraction
//!
//! Reduces a sticker region to one representative device color by k-means
//! clustering of its pixels:
//! - Centers initialized uniformly inside the per-channel bounding box
//! - Each attempt refines until the iteration cap or until no center moves
//!   more than epsilon
//! - The attempt with the lowest compactness wins
//!
//! With a single cluster this is an iteratively refined mean. Results are
//! deterministic only when a seed is configured.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::trace;

use super::conversion::Bgr;
use crate::config::ClusteringConfig;
use crate::constants::clustering;
use crate::frame::Region;
use crate::{Result, ScanError};

/// Outcome of one k-means run
#[derive(Debug, Clone)]
pub struct ClusterResult {
    /// Cluster centers in device color space
    pub centers: Vec<Bgr>,
    /// Cluster index per input point
    pub labels: Vec<usize>,
    /// Sum of squared distances from each point to its center
    pub compactness: f64,
}

impl ClusterResult {
    /// Number of points assigned to each cluster
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centers.len()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }

    /// Center of the most populated cluster; ties go to the lower index
    pub fn dominant(&self) -> Option<Bgr> {
        let sizes = self.cluster_sizes();
        let mut best: Option<(usize, usize)> = None;
        for (index, &size) in sizes.iter().enumerate() {
            if best.map_or(true, |(_, best_size)| size > best_size) {
                best = Some((index, size));
            }
        }
        best.map(|(index, _)| self.centers[index])
    }
}

/// k-means based dominant color extractor
#[derive(Debug, Clone)]
pub struct DominantColorExtractor {
    clusters: usize,
    max_iterations: usize,
    epsilon: f64,
    attempts: usize,
    seed: Option<u64>,
}

impl Default for DominantColorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DominantColorExtractor {
    /// Create an extractor with one cluster, 10 iterations, epsilon 1.0, 10 attempts
    pub fn new() -> Self {
        Self {
            clusters: clustering::CLUSTERS,
            max_iterations: clustering::MAX_ITERATIONS,
            epsilon: clustering::EPSILON,
            attempts: clustering::ATTEMPTS,
            seed: None,
        }
    }

    /// Create an extractor with custom parameters
    pub fn with_params(clusters: usize, max_iterations: usize, epsilon: f64, attempts: usize) -> Self {
        Self {
            clusters: clusters.max(1),
            max_iterations: max_iterations.max(1),
            epsilon,
            attempts: attempts.max(1),
            seed: None,
        }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        let extractor = Self::with_params(
            config.clusters,
            config.max_iterations,
            config.epsilon,
            config.attempts,
        );
        match config.seed {
            Some(seed) => extractor.with_seed(seed),
            None => extractor,
        }
    }

    /// Fix the random initialization so results are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Extract the dominant color of a pixel region
    ///
    /// # Errors
    ///
    /// Returns `ScanError::EmptyRegion` if the region has no pixels. Upstream
    /// geometry should never produce one, so this is treated as a defect.
    pub fn dominant_color(&self, region: &Region) -> Result<Bgr> {
        self.cluster(&region.pixels)
            .and_then(|result| result.dominant())
            .ok_or(ScanError::EmptyRegion {
                x: region.rect.x,
                y: region.rect.y,
                width: region.rect.width,
                height: region.rect.height,
            })
    }

    /// Run k-means over a set of colors, keeping the most compact attempt
    ///
    /// Returns `None` for an empty input.
    pub fn cluster(&self, pixels: &[Bgr]) -> Option<ClusterResult> {
        if pixels.is_empty() {
            return None;
        }

        let points: Vec<[f64; 3]> = pixels.iter().map(|p| p.to_array()).collect();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let mut best: Option<ClusterResult> = None;
        for attempt in 0..self.attempts {
            let result = self.run_attempt(&points, &mut rng);
            trace!(attempt, compactness = result.compactness, "k-means attempt finished");
            if best
                .as_ref()
                .map_or(true, |current| result.compactness < current.compactness)
            {
                best = Some(result);
            }
        }
        best
    }

    fn run_attempt(&self, points: &[[f64; 3]], rng: &mut StdRng) -> ClusterResult {
        let (low, high) = channel_bounds(points);
        let mut centers: Vec<[f64; 3]> = (0..self.clusters)
            .map(|_| std::array::from_fn(|d| rng.random_range(low[d]..=high[d])))
            .collect();
        let mut labels = vec![0; points.len()];
        let epsilon_sq = self.epsilon * self.epsilon;

        for _ in 0..self.max_iterations {
            assign(points, &centers, &mut labels);

            let mut sums = vec![[0.0; 3]; self.clusters];
            let mut counts = vec![0usize; self.clusters];
            for (point, &label) in points.iter().zip(&labels) {
                for d in 0..3 {
                    sums[label][d] += point[d];
                }
                counts[label] += 1;
            }

            let mut max_shift_sq: f64 = 0.0;
            for (k, center) in centers.iter_mut().enumerate() {
                let updated = if counts[k] == 0 {
                    // Empty cluster: restart it on a random point
                    points[rng.random_range(0..points.len())]
                } else {
                    let n = counts[k] as f64;
                    [sums[k][0] / n, sums[k][1] / n, sums[k][2] / n]
                };
                max_shift_sq = max_shift_sq.max(distance_sq(center, &updated));
                *center = updated;
            }

            if max_shift_sq <= epsilon_sq {
                break;
            }
        }

        let compactness = assign(points, &centers, &mut labels);
        ClusterResult {
            centers: centers.into_iter().map(Bgr::from_array).collect(),
            labels,
            compactness,
        }
    }
}

/// Assign each point to its nearest center; returns the compactness
fn assign(points: &[[f64; 3]], centers: &[[f64; 3]], labels: &mut [usize]) -> f64 {
    let mut compactness = 0.0;
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (k, center) in centers.iter().enumerate() {
            let dist = distance_sq(point, center);
            if dist < best_dist {
                best = k;
                best_dist = dist;
            }
        }
        *label = best;
        compactness += best_dist;
    }
    compactness
}

fn channel_bounds(points: &[[f64; 3]]) -> ([f64; 3], [f64; 3]) {
    let mut low = [f64::INFINITY; 3];
    let mut high = [f64::NEG_INFINITY; 3];
    for point in points {
        for d in 0..3 {
            low[d] = low[d].min(point[d]);
            high[d] = high[d].max(point[d]);
        }
    }
    (low, high)
}

fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    (0..3).map(|d| (a[d] - b[d]).powi(2)).sum()
}
