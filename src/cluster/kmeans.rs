// src/cluster/kmeans.rs

//! Lloyd's k-means with k-means++ initialization.
//!
//! Deterministic for a given seed: all initializations draw from one seeded
//! `StdRng`, and the best (lowest inertia) fit is kept.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub(crate) struct KMeansFit {
    /// Point index -> cluster index.
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances from each point to its centroid.
    pub inertia: f64,
}

/// Fit k clusters to `points`. Requires `1 <= k <= points.len()` and at least
/// one dimension; callers uphold this.
pub(crate) fn fit(
    points: &[Vec<f64>],
    k: usize,
    n_init: usize,
    max_iter: usize,
    seed: u64,
) -> KMeansFit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<KMeansFit> = None;

    for _ in 0..n_init {
        let candidate = lloyd(points, k, max_iter, &mut rng);
        let better = match &best {
            Some(current) => candidate.inertia < current.inertia,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    best.expect("n_init >= 1")
}

fn lloyd(points: &[Vec<f64>], k: usize, max_iter: usize, rng: &mut StdRng) -> KMeansFit {
    let mut centroids = plus_plus_init(points, k, rng);
    let mut assignments = assign(points, &centroids);

    for _ in 0..max_iter {
        let new_centroids = recompute_centroids(points, &assignments, k, &centroids);
        let new_assignments = assign(points, &new_centroids);
        let converged = new_assignments == assignments;
        centroids = new_centroids;
        assignments = new_assignments;
        if converged {
            break;
        }
    }

    let inertia = points
        .iter()
        .zip(assignments.iter())
        .map(|(p, &a)| distance_squared(p, &centroids[a]))
        .sum();

    KMeansFit {
        assignments,
        centroids,
        inertia,
    }
}

/// k-means++ seeding: first centroid uniform, each further centroid drawn
/// with probability proportional to squared distance from the nearest chosen
/// centroid.
fn plus_plus_init(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    let mut min_distances: Vec<f64> = points
        .iter()
        .map(|p| distance_squared(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_distances.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.r#gen::<f64>() * total;
            let mut chosen = n - 1;
            for (i, &d) in min_distances.iter().enumerate() {
                target -= d;
                if target <= 0.0 {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // All points coincide with chosen centroids; any point works.
            rng.gen_range(0..n)
        };

        centroids.push(points[next].clone());
        for (i, p) in points.iter().enumerate() {
            let d = distance_squared(p, centroids.last().expect("just pushed"));
            if d < min_distances[i] {
                min_distances[i] = d;
            }
        }
    }

    centroids
}

fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|p| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (idx, c) in centroids.iter().enumerate() {
                let d = distance_squared(p, c);
                if d < best_dist {
                    best = idx;
                    best_dist = d;
                }
            }
            best
        })
        .collect()
}

/// New centroids as the mean of assigned points. A cluster that lost all its
/// members keeps its previous centroid.
fn recompute_centroids(
    points: &[Vec<f64>],
    assignments: &[usize],
    k: usize,
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dim = points.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in points.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for (d, &value) in point.iter().enumerate() {
            sums[cluster][d] += value;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(idx, (mut sum, count))| {
            if count > 0 {
                for value in sum.iter_mut() {
                    *value /= count as f64;
                }
                sum
            } else {
                previous[idx].clone()
            }
        })
        .collect()
}

#[inline]
fn distance_squared(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
