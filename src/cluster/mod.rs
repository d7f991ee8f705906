// src/cluster/mod.rs

//! Clustering of student readiness vectors.
//!
//! - [`kmeans`] is a seeded, multi-initialization Lloyd's k-means.
//! - [`interventions`] ranks concepts by estimated intervention impact and
//!   renders the templated per-cluster suggestions.

pub mod interventions;
pub(crate) mod kmeans;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::graph::ConceptId;
use crate::pipeline::stats::mean;

pub use interventions::{InterventionRanking, rank_interventions};

/// Fixed seed for reproducible clustering runs.
const KMEANS_SEED: u64 = 42;
/// Number of random initializations; the lowest-inertia fit wins.
const KMEANS_N_INIT: usize = 10;
const KMEANS_MAX_ITER: usize = 300;
/// Weakest concepts reported per cluster.
const TOP_WEAK_PER_CLUSTER: usize = 3;

/// One cluster of students with similar readiness profiles.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub label: String,
    /// concept -> centroid readiness mean.
    pub centroid: BTreeMap<ConceptId, f64>,
    pub student_count: usize,
    /// The 3 lowest-centroid concepts, ties broken by concept order.
    pub top_weak_concepts: Vec<ConceptId>,
    pub suggested_interventions: Vec<String>,
}

/// Clusters plus the student -> cluster-label assignment, both fully
/// regenerated each run.
#[derive(Debug, Clone, Serialize)]
pub struct ClusteringOutput {
    pub clusters: Vec<Cluster>,
    pub assignments: BTreeMap<String, String>,
}

/// Run k-means over student readiness vectors.
///
/// With fewer than 2 students no partitioning algorithm is invoked: everyone
/// lands in a single cluster whose centroid is the column-wise mean (and the
/// degenerate cluster carries no suggested interventions). Otherwise the
/// actual cluster count is `min(k, n_students)` and the run is deterministic
/// (fixed seed, multiple initializations, best inertia kept).
pub fn run_clustering(
    final_matrix: &[Vec<f64>],
    concepts: &[ConceptId],
    students: &[String],
    k: usize,
) -> ClusteringOutput {
    let n_students = students.len();
    let actual_k = k.min(n_students);

    if actual_k < 2 {
        let centroid_vec: Vec<f64> = (0..concepts.len())
            .map(|c_idx| {
                let column: Vec<f64> = final_matrix.iter().map(|row| row[c_idx]).collect();
                mean(&column)
            })
            .collect();
        let label = cluster_label(0);
        debug!(students = n_students, "too few students to cluster; single cluster");
        return ClusteringOutput {
            clusters: vec![Cluster {
                label: label.clone(),
                centroid: centroid_map(&centroid_vec, concepts),
                student_count: n_students,
                top_weak_concepts: top_weak_concepts(&centroid_vec, concepts),
                suggested_interventions: Vec::new(),
            }],
            assignments: students.iter().map(|s| (s.clone(), label.clone())).collect(),
        };
    }

    info!(students = n_students, k = actual_k, "clustering readiness vectors");

    let fit = kmeans::fit(
        final_matrix,
        actual_k,
        KMEANS_N_INIT,
        KMEANS_MAX_ITER,
        KMEANS_SEED,
    );

    let mut clusters = Vec::with_capacity(actual_k);
    let mut assignments = BTreeMap::new();

    for cluster_idx in 0..actual_k {
        let label = cluster_label(cluster_idx);
        let centroid = &fit.centroids[cluster_idx];
        let weak = top_weak_concepts(centroid, concepts);

        clusters.push(Cluster {
            label: label.clone(),
            centroid: centroid_map(centroid, concepts),
            student_count: fit
                .assignments
                .iter()
                .filter(|&&a| a == cluster_idx)
                .count(),
            suggested_interventions: interventions::suggest_interventions(&weak),
            top_weak_concepts: weak,
        });

        for (student, &assigned) in students.iter().zip(fit.assignments.iter()) {
            if assigned == cluster_idx {
                assignments.insert(student.clone(), label.clone());
            }
        }
    }

    ClusteringOutput {
        clusters,
        assignments,
    }
}

fn cluster_label(idx: usize) -> String {
    format!("Cluster {idx}")
}

fn centroid_map(centroid: &[f64], concepts: &[ConceptId]) -> BTreeMap<ConceptId, f64> {
    concepts
        .iter()
        .zip(centroid.iter())
        .map(|(c, &v)| (c.clone(), v))
        .collect()
}

/// The N lowest-centroid concepts, ascending, ties broken by concept order.
fn top_weak_concepts(centroid: &[f64], concepts: &[ConceptId]) -> Vec<ConceptId> {
    let mut order: Vec<usize> = (0..concepts.len()).collect();
    // sort_by is stable, so equal centroid values keep concept ordering.
    order.sort_by(|&a, &b| centroid[a].total_cmp(&centroid[b]));
    order
        .into_iter()
        .take(TOP_WEAK_PER_CLUSTER)
        .map(|i| concepts[i].clone())
        .collect()
}
