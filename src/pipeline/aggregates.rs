// src/pipeline/aggregates.rs

use serde::Serialize;

use crate::pipeline::stats::{mean, median, population_std};

/// Class-wide statistics of final readiness for one concept.
#[derive(Debug, Clone, Serialize)]
pub struct ClassAggregate {
    pub concept_id: String,
    pub mean_readiness: f64,
    pub median_readiness: f64,
    pub std_readiness: f64,
    /// Students strictly below the configured threshold.
    pub below_threshold_count: usize,
}

/// Aggregate final readiness per concept across all students.
pub fn compute_class_aggregates(
    final_matrix: &[Vec<f64>],
    concepts: &[String],
    threshold: f64,
) -> Vec<ClassAggregate> {
    concepts
        .iter()
        .enumerate()
        .map(|(c_idx, concept)| {
            let values: Vec<f64> = final_matrix.iter().map(|row| row[c_idx]).collect();
            ClassAggregate {
                concept_id: concept.clone(),
                mean_readiness: mean(&values),
                median_readiness: median(&values),
                std_readiness: population_std(&values),
                below_threshold_count: values.iter().filter(|&&v| v < threshold).count(),
            }
        })
        .collect()
}
