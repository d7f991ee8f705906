// src/pipeline/confidence.rs

//! Confidence estimation: the ordinal minimum of three per-concept factors.
//!
//! - F1, tagged-question count: >= 3 high, == 2 medium, <= 1 low.
//! - F2, total max-score points across tagged questions: >= 10 high,
//!   5..10 medium, < 5 low.
//! - F3, population variance of the per-concept student-mean direct readiness
//!   across the concept and its direct neighbors (parents and children):
//!   < 0.15 high, <= 0.30 medium, > 0.30 low. No neighbors -> variance 0.
//!
//! F3 deliberately averages over students *first* and takes the variance over
//! concepts *second*; the other order gives a different number.

use crate::graph::ConceptGraph;
use crate::pipeline::stats::{mean, population_variance};
use crate::pipeline::{MaxScores, QuestionConceptMap};
use crate::types::Confidence;

pub fn confidence_for_concept(
    concept: &str,
    c_idx: usize,
    question_concept_map: &QuestionConceptMap,
    max_scores: &MaxScores,
    direct: &[Vec<Option<f64>>],
    graph: &ConceptGraph,
) -> Confidence {
    let tagged = question_concept_map
        .get(concept)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let f1 = match tagged.len() {
        n if n >= 3 => Confidence::High,
        2 => Confidence::Medium,
        _ => Confidence::Low,
    };

    let total_points: f64 = tagged
        .iter()
        .map(|tag| max_scores.get(&tag.question_id).copied().unwrap_or(1.0))
        .sum();
    let f2 = if total_points >= 10.0 {
        Confidence::High
    } else if total_points >= 5.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let variance = neighborhood_variance(c_idx, direct, graph);
    let f3 = if variance < 0.15 {
        Confidence::High
    } else if variance <= 0.30 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    f1.min(f2).min(f3)
}

/// Variance of mean direct readiness across a concept and its graph neighbors.
///
/// Concepts with no valid (non-absent) values are skipped; fewer than two
/// usable means, or an isolated concept, yield variance 0.
fn neighborhood_variance(c_idx: usize, direct: &[Vec<Option<f64>>], graph: &ConceptGraph) -> f64 {
    let mut related: Vec<usize> = vec![c_idx];
    for &(p_idx, _) in graph.parents_of(c_idx) {
        if !related.contains(&p_idx) {
            related.push(p_idx);
        }
    }
    for &(d_idx, _) in graph.children_of(c_idx) {
        if !related.contains(&d_idx) {
            related.push(d_idx);
        }
    }

    if related.len() < 2 {
        return 0.0;
    }

    let mut means = Vec::with_capacity(related.len());
    for idx in related {
        let values: Vec<f64> = direct.iter().filter_map(|row| row[idx]).collect();
        if !values.is_empty() {
            means.push(mean(&values));
        }
    }

    if means.len() > 1 {
        population_variance(&means)
    } else {
        0.0
    }
}
