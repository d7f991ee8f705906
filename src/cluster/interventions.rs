// src/cluster/interventions.rs

use serde::Serialize;

use crate::graph::{ConceptGraph, ConceptId};
use crate::pipeline::stats::mean;

/// One concept's entry in the impact-ranked intervention list.
#[derive(Debug, Clone, Serialize)]
pub struct InterventionRanking {
    pub concept_id: ConceptId,
    pub students_affected: usize,
    pub downstream_concepts: usize,
    pub current_readiness: f64,
    pub impact: f64,
    pub rationale: String,
    pub suggested_format: String,
}

/// Rank every concept by estimated intervention impact, descending:
///
/// `impact = students_below * max(downstream_count, 1) * (1 - mean_readiness)`
///
/// Concepts with zero students below the threshold are excluded entirely.
pub fn rank_interventions(
    final_matrix: &[Vec<f64>],
    concepts: &[ConceptId],
    graph: &ConceptGraph,
    threshold: f64,
) -> Vec<InterventionRanking> {
    let mut ranked: Vec<InterventionRanking> = concepts
        .iter()
        .enumerate()
        .filter_map(|(c_idx, concept)| {
            let values: Vec<f64> = final_matrix.iter().map(|row| row[c_idx]).collect();
            let students_below = values.iter().filter(|&&v| v < threshold).count();
            if students_below == 0 {
                return None;
            }

            let current_readiness = mean(&values);
            let downstream_count = graph
                .index_of(concept)
                .map(|idx| {
                    graph
                        .children_of(idx)
                        .iter()
                        .filter(|(_, w)| *w > 0.0)
                        .count()
                })
                .unwrap_or(0);
            let impact =
                students_below as f64 * downstream_count.max(1) as f64 * (1.0 - current_readiness);

            Some(InterventionRanking {
                concept_id: concept.clone(),
                students_affected: students_below,
                downstream_concepts: downstream_count,
                current_readiness,
                impact,
                rationale: format!(
                    "{students_below} students below threshold; \
                     {downstream_count} downstream concepts may be affected"
                ),
                suggested_format: "Review session, practice problems, office hours focus"
                    .to_string(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.impact.total_cmp(&a.impact));
    ranked
}

/// Deterministic templated recommendation per weak concept. No ML.
pub(crate) fn suggest_interventions(weak_concepts: &[ConceptId]) -> Vec<String> {
    weak_concepts
        .iter()
        .map(|concept| {
            format!(
                "Review session recommended for '{concept}': \
                 consider targeted practice problems and office hours focus."
            )
        })
        .collect()
}
