// src/pipeline/stages.rs

//! The four numeric stages, each a pure function over matrices aligned with
//! the graph's node order (columns) and the sorted student list (rows).
//!
//! Direct readiness is `Option<f64>`: `None` means "inferred only" (no
//! tagged question was attempted) and must never be conflated with 0.0 in
//! stored results. Wherever an absent value feeds later arithmetic it is
//! substituted with 0.0 (worst case), see [`effective`].

use crate::graph::ConceptGraph;
use crate::pipeline::{
    BOOST_CAP, BOOST_VALIDATION_FACTOR, MaxScores, PipelineParams, QuestionConceptMap, ScoreTable,
};

/// Absent direct readiness counts as 0.0 in intermediate arithmetic.
#[inline]
pub(crate) fn effective(direct: Option<f64>) -> f64 {
    direct.unwrap_or(0.0)
}

/// Stage 1: DirectReadiness(s, c) = SUM(w_q * score/max) / SUM(w_q) over the
/// questions tagged to `c` that student `s` attempted.
///
/// A zero max-score normalizes to 0.0; a question with no recorded max
/// defaults to 1.0. Concepts with no tagged questions, and students who
/// attempted none of them, stay `None`.
pub fn compute_direct_readiness(
    scores: &ScoreTable,
    max_scores: &MaxScores,
    question_concept_map: &QuestionConceptMap,
    concepts: &[String],
    students: &[String],
) -> Vec<Vec<Option<f64>>> {
    let mut direct = vec![vec![None; concepts.len()]; students.len()];

    for (c_idx, concept) in concepts.iter().enumerate() {
        let Some(tagged) = question_concept_map.get(concept) else {
            continue;
        };
        if tagged.is_empty() {
            continue;
        }

        for (s_idx, student) in students.iter().enumerate() {
            let Some(student_scores) = scores.get(student) else {
                continue;
            };

            let mut weighted_sum = 0.0;
            let mut weight_sum = 0.0;

            for tag in tagged {
                if let Some(&score) = student_scores.get(&tag.question_id) {
                    let max = max_scores.get(&tag.question_id).copied().unwrap_or(1.0);
                    let normalized = if max > 0.0 { score / max } else { 0.0 };
                    weighted_sum += tag.weight * normalized;
                    weight_sum += tag.weight;
                }
            }

            if weight_sum > 0.0 {
                direct[s_idx][c_idx] = Some(weighted_sum / weight_sum);
            }
        }
    }

    direct
}

/// Stage 2: PrerequisitePenalty(s, c) = SUM over parents p of
/// edge_weight(p, c) * max(0, threshold - effective_direct(s, p)).
///
/// Only immediate parents contribute; there is no deep traversal, and the sum
/// is intentionally unnormalized: a concept with many weak parents can
/// accumulate penalty well above 1 before the final clamp absorbs it.
pub fn compute_prerequisite_penalty(
    direct: &[Vec<Option<f64>>],
    graph: &ConceptGraph,
    threshold: f64,
) -> Vec<Vec<f64>> {
    let n_concepts = graph.len();
    let mut penalty = vec![vec![0.0; n_concepts]; direct.len()];

    for c_idx in 0..n_concepts {
        for &(p_idx, edge_weight) in graph.parents_of(c_idx) {
            if edge_weight <= 0.0 {
                continue;
            }
            for (s_idx, row) in direct.iter().enumerate() {
                let gap = (threshold - effective(row[p_idx])).max(0.0);
                penalty[s_idx][c_idx] += edge_weight * gap;
            }
        }
    }

    penalty
}

/// Stage 3: DownstreamBoost(s, p) = min(0.2, SUM over children d of
/// edge_weight(p, d) * 0.4 * effective_direct(s, d)).
///
/// The cap is a hard ceiling applied after summation.
pub fn compute_downstream_boost(
    direct: &[Vec<Option<f64>>],
    graph: &ConceptGraph,
) -> Vec<Vec<f64>> {
    let n_concepts = graph.len();
    let mut boost = vec![vec![0.0; n_concepts]; direct.len()];

    for p_idx in 0..n_concepts {
        for &(d_idx, edge_weight) in graph.children_of(p_idx) {
            if edge_weight <= 0.0 {
                continue;
            }
            let validation_weight = edge_weight * BOOST_VALIDATION_FACTOR;
            for (s_idx, row) in direct.iter().enumerate() {
                boost[s_idx][p_idx] += validation_weight * effective(row[d_idx]);
            }
        }
    }

    for row in &mut boost {
        for value in row.iter_mut() {
            *value = value.min(BOOST_CAP);
        }
    }

    boost
}

/// Stage 4: FinalReadiness = clamp([0, 1], alpha * effective_direct -
/// beta * penalty + gamma * boost).
pub fn compute_final_readiness(
    direct: &[Vec<Option<f64>>],
    penalty: &[Vec<f64>],
    boost: &[Vec<f64>],
    params: &PipelineParams,
) -> Vec<Vec<f64>> {
    direct
        .iter()
        .enumerate()
        .map(|(s_idx, row)| {
            row.iter()
                .enumerate()
                .map(|(c_idx, &d)| {
                    let raw = params.alpha * effective(d) - params.beta * penalty[s_idx][c_idx]
                        + params.gamma * boost[s_idx][c_idx];
                    raw.clamp(0.0, 1.0)
                })
                .collect()
        })
        .collect()
}
