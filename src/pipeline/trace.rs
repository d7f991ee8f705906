// src/pipeline/trace.rs

//! Structured explanation traces: the auditable breakdown of how one
//! (student, concept) readiness value came to be.

use serde::Serialize;

use crate::graph::ConceptGraph;
use crate::pipeline::stages::effective;
use crate::pipeline::{BOOST_VALIDATION_FACTOR, PipelineParams};
use crate::types::Confidence;

/// One parent's contribution to the prerequisite penalty. Only parents with a
/// positive readiness gap are itemized.
#[derive(Debug, Clone, Serialize)]
pub struct PenaltyContribution {
    pub concept_id: String,
    pub readiness: f64,
    pub edge_weight: f64,
    pub penalty_contribution: f64,
}

/// One child's contribution to the downstream boost. Every positive-weight
/// child is itemized regardless of contribution size.
#[derive(Debug, Clone, Serialize)]
pub struct BoostContribution {
    pub concept_id: String,
    pub readiness: f64,
    pub validation_weight: f64,
    pub boost_contribution: f64,
}

/// The weighted formula components at the configured stage weights.
#[derive(Debug, Clone, Serialize)]
pub struct FormulaBreakdown {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub direct_component: f64,
    pub penalty_component: f64,
    pub boost_component: f64,
    pub final_readiness: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplanationTrace {
    pub concept_id: String,
    pub student_id: String,
    pub direct_readiness: Option<f64>,
    pub confidence: Confidence,
    pub upstream_penalties: Vec<PenaltyContribution>,
    pub downstream_boosts: Vec<BoostContribution>,
    pub formula: FormulaBreakdown,
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn build_explanation_trace(
    student: &str,
    concept: &str,
    c_idx: usize,
    s_idx: usize,
    direct_value: Option<f64>,
    penalty: f64,
    boost: f64,
    final_readiness: f64,
    confidence: Confidence,
    direct: &[Vec<Option<f64>>],
    graph: &ConceptGraph,
    params: &PipelineParams,
) -> ExplanationTrace {
    let mut upstream_penalties = Vec::new();
    for &(p_idx, edge_weight) in graph.parents_of(c_idx) {
        if edge_weight <= 0.0 {
            continue;
        }
        let readiness = effective(direct[s_idx][p_idx]);
        let gap = (params.threshold - readiness).max(0.0);
        if gap > 0.0 {
            upstream_penalties.push(PenaltyContribution {
                concept_id: graph.id_of(p_idx).to_string(),
                readiness,
                edge_weight,
                penalty_contribution: edge_weight * gap,
            });
        }
    }

    let mut downstream_boosts = Vec::new();
    for &(d_idx, edge_weight) in graph.children_of(c_idx) {
        if edge_weight <= 0.0 {
            continue;
        }
        let readiness = effective(direct[s_idx][d_idx]);
        let validation_weight = edge_weight * BOOST_VALIDATION_FACTOR;
        downstream_boosts.push(BoostContribution {
            concept_id: graph.id_of(d_idx).to_string(),
            readiness,
            validation_weight,
            boost_contribution: validation_weight * readiness,
        });
    }

    ExplanationTrace {
        concept_id: concept.to_string(),
        student_id: student.to_string(),
        direct_readiness: direct_value,
        confidence,
        upstream_penalties,
        downstream_boosts,
        formula: FormulaBreakdown {
            alpha: params.alpha,
            beta: params.beta,
            gamma: params.gamma,
            direct_component: params.alpha * effective(direct_value),
            penalty_component: params.beta * penalty,
            boost_component: params.gamma * boost,
            final_readiness,
        },
    }
}
