// src/pipeline/runner.rs

//! Pipeline orchestration: one invocation produces the complete result bundle
//! (per-pair records, class aggregates, the final matrix) for the caller to
//! install atomically.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{ReadinessError, Result};
use crate::graph::{ConceptGraph, ConceptId};
use crate::pipeline::aggregates::{ClassAggregate, compute_class_aggregates};
use crate::pipeline::confidence::confidence_for_concept;
use crate::pipeline::stages::{
    compute_direct_readiness, compute_downstream_boost, compute_final_readiness,
    compute_prerequisite_penalty,
};
use crate::pipeline::trace::{ExplanationTrace, build_explanation_trace};
use crate::pipeline::{MaxScores, PipelineParams, QuestionConceptMap, ScoreTable};
use crate::types::Confidence;

/// One (student, concept) readiness result.
///
/// `direct_readiness` is `None` when the concept is "inferred only" for this
/// student: no tagged question was attempted.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessRecord {
    pub student_id: String,
    pub concept_id: ConceptId,
    pub direct_readiness: Option<f64>,
    pub prerequisite_penalty: f64,
    pub downstream_boost: f64,
    pub final_readiness: f64,
    pub confidence: Confidence,
    pub explanation_trace: ExplanationTrace,
}

/// Everything one pipeline run produces, as a single cohesive bundle.
///
/// A new run fully supersedes the previous run's results for an exam; the
/// caller persists the bundle replace-all-or-nothing.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub results: Vec<ReadinessRecord>,
    pub class_aggregates: Vec<ClassAggregate>,
    /// Concept ids in graph order; final_matrix columns align with this.
    pub concepts: Vec<ConceptId>,
    /// Student ids in sorted order; final_matrix rows align with this.
    pub students: Vec<String>,
    pub final_matrix: Vec<Vec<f64>>,
    /// The graph the run actually used (the isolated-node fallback when the
    /// input graph was empty).
    pub graph: ConceptGraph,
}

/// Run the full readiness computation pipeline.
///
/// Fails with [`ReadinessError::InputError`] when there are no score rows or
/// no question-concept mapping; sparse data within those inputs never fails.
/// An empty graph falls back to one isolated node per mapped concept.
pub fn run_readiness_pipeline(
    scores: &ScoreTable,
    max_scores: &MaxScores,
    question_concept_map: &QuestionConceptMap,
    graph: &ConceptGraph,
    params: &PipelineParams,
) -> Result<PipelineOutput> {
    // Students with at least one score anywhere; ScoreTable is a BTreeMap so
    // the order is already sorted.
    let students: Vec<String> = scores
        .iter()
        .filter(|(_, qs)| !qs.is_empty())
        .map(|(s, _)| s.clone())
        .collect();

    if students.is_empty() {
        return Err(ReadinessError::InputError(
            "no score rows; upload scores before computing".to_string(),
        ));
    }
    if question_concept_map.is_empty() {
        return Err(ReadinessError::InputError(
            "no question-concept mapping; upload a mapping before computing".to_string(),
        ));
    }

    let graph = if graph.is_empty() {
        debug!("no concept graph defined; falling back to isolated nodes from the mapping");
        ConceptGraph::from_isolated_concepts(question_concept_map.keys().cloned())
    } else {
        graph.clone()
    };
    let concepts = graph.concept_ids();

    info!(
        students = students.len(),
        concepts = concepts.len(),
        edges = graph.edge_count(),
        "running readiness pipeline"
    );

    let direct = compute_direct_readiness(
        scores,
        max_scores,
        question_concept_map,
        &concepts,
        &students,
    );
    let penalty = compute_prerequisite_penalty(&direct, &graph, params.threshold);
    let boost = compute_downstream_boost(&direct, &graph);
    let final_matrix = compute_final_readiness(&direct, &penalty, &boost, params);

    // Confidence is per concept, independent of student.
    let confidences: Vec<Confidence> = concepts
        .iter()
        .enumerate()
        .map(|(c_idx, concept)| {
            confidence_for_concept(
                concept,
                c_idx,
                question_concept_map,
                max_scores,
                &direct,
                &graph,
            )
        })
        .collect();

    let mut results = Vec::with_capacity(students.len() * concepts.len());
    for (s_idx, student) in students.iter().enumerate() {
        for (c_idx, concept) in concepts.iter().enumerate() {
            let trace = build_explanation_trace(
                student,
                concept,
                c_idx,
                s_idx,
                direct[s_idx][c_idx],
                penalty[s_idx][c_idx],
                boost[s_idx][c_idx],
                final_matrix[s_idx][c_idx],
                confidences[c_idx],
                &direct,
                &graph,
                params,
            );
            results.push(ReadinessRecord {
                student_id: student.clone(),
                concept_id: concept.clone(),
                direct_readiness: direct[s_idx][c_idx],
                prerequisite_penalty: penalty[s_idx][c_idx],
                downstream_boost: boost[s_idx][c_idx],
                final_readiness: final_matrix[s_idx][c_idx],
                confidence: confidences[c_idx],
                explanation_trace: trace,
            });
        }
    }

    let class_aggregates = compute_class_aggregates(&final_matrix, &concepts, params.threshold);

    Ok(PipelineOutput {
        results,
        class_aggregates,
        concepts,
        students,
        final_matrix,
        graph,
    })
}
