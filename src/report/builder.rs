// src/report/builder.rs

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::graph::{ConceptGraph, ConceptId, GraphEdge, topological_order};
use crate::pipeline::ReadinessRecord;
use crate::types::{Confidence, NodeColor};

/// Study-plan membership cutoff: concepts at or above this readiness are
/// considered mastered and left out.
const MASTERY_CUTOFF: f64 = 0.7;
/// Below this direct readiness the study-plan reason is "low direct
/// performance".
const LOW_DIRECT_CUTOFF: f64 = 0.6;
/// Above this penalty the study-plan reason is "weakness in prerequisites".
const PENALTY_REASON_CUTOFF: f64 = 0.1;

const GREEN_CUTOFF: f64 = 0.7;
const YELLOW_CUTOFF: f64 = 0.4;

const TOP_WEAK_COUNT: usize = 5;

/// A concept node colored by the student's final readiness.
#[derive(Debug, Clone, Serialize)]
pub struct ColoredNode {
    pub id: ConceptId,
    pub label: String,
    pub readiness: Option<f64>,
    pub color: NodeColor,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ColoredGraph {
    pub nodes: Vec<ColoredNode>,
    pub edges: Vec<GraphEdge>,
}

/// One row of the per-concept readiness summary.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessSummary {
    pub concept_id: ConceptId,
    pub concept_label: String,
    pub direct_readiness: Option<f64>,
    pub final_readiness: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeakConcept {
    pub concept_id: ConceptId,
    pub concept_label: String,
    pub readiness: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyPlanEntry {
    pub concept_id: ConceptId,
    pub concept_label: String,
    pub readiness: f64,
    pub confidence: Confidence,
    /// Single-sentence reason, chosen by priority.
    pub reason: String,
    /// Free-text breakdown of the numeric components actually present.
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentReport {
    pub student_id: String,
    pub exam_id: String,
    pub concept_graph: ColoredGraph,
    pub readiness: Vec<ReadinessSummary>,
    pub top_weak_concepts: Vec<WeakConcept>,
    pub study_plan: Vec<StudyPlanEntry>,
}

/// Build a student's report from one exam's readiness results.
///
/// `results` may span many students; only this student's records are used.
/// A student with zero results gets an empty report (empty graph, empty
/// lists) rather than an error. The study plan follows the graph's
/// topological order, so the graph must be a DAG.
pub fn build_student_report(
    student_id: &str,
    exam_id: &str,
    graph: &ConceptGraph,
    results: &[ReadinessRecord],
) -> Result<StudentReport> {
    let student_results: Vec<&ReadinessRecord> = results
        .iter()
        .filter(|r| r.student_id == student_id)
        .collect();

    if student_results.is_empty() {
        debug!(student_id, "no readiness results; returning empty report");
        return Ok(StudentReport {
            student_id: student_id.to_string(),
            exam_id: exam_id.to_string(),
            concept_graph: ColoredGraph::default(),
            readiness: Vec::new(),
            top_weak_concepts: Vec::new(),
            study_plan: Vec::new(),
        });
    }

    let readiness_map: HashMap<&str, &ReadinessRecord> = student_results
        .iter()
        .map(|r| (r.concept_id.as_str(), *r))
        .collect();

    let concept_graph = build_personal_graph(graph, &readiness_map);

    let readiness = student_results
        .iter()
        .map(|r| ReadinessSummary {
            concept_id: r.concept_id.clone(),
            concept_label: label_of(graph, &r.concept_id),
            direct_readiness: r.direct_readiness,
            final_readiness: r.final_readiness,
            confidence: r.confidence,
        })
        .collect();

    // Stable sort keeps input order for ties.
    let mut by_readiness = student_results.clone();
    by_readiness.sort_by(|a, b| a.final_readiness.total_cmp(&b.final_readiness));
    let top_weak_concepts = by_readiness
        .iter()
        .take(TOP_WEAK_COUNT)
        .map(|r| WeakConcept {
            concept_id: r.concept_id.clone(),
            concept_label: label_of(graph, &r.concept_id),
            readiness: r.final_readiness,
            confidence: r.confidence,
        })
        .collect();

    let study_plan = build_study_plan(graph, &readiness_map)?;

    Ok(StudentReport {
        student_id: student_id.to_string(),
        exam_id: exam_id.to_string(),
        concept_graph,
        readiness,
        top_weak_concepts,
        study_plan,
    })
}

fn build_personal_graph(
    graph: &ConceptGraph,
    readiness_map: &HashMap<&str, &ReadinessRecord>,
) -> ColoredGraph {
    let data = graph.to_data();
    let nodes = data
        .nodes
        .iter()
        .map(|node| {
            let (readiness, color) = match readiness_map.get(node.id.as_str()) {
                Some(r) => (Some(r.final_readiness), color_for(r.final_readiness)),
                None => (None, NodeColor::Gray),
            };
            ColoredNode {
                id: node.id.clone(),
                label: node.label.clone(),
                readiness,
                color,
            }
        })
        .collect();

    ColoredGraph {
        nodes,
        edges: data.edges,
    }
}

fn color_for(final_readiness: f64) -> NodeColor {
    if final_readiness > GREEN_CUTOFF {
        NodeColor::Green
    } else if final_readiness >= YELLOW_CUTOFF {
        NodeColor::Yellow
    } else {
        NodeColor::Red
    }
}

/// Study plan: concepts below the mastery cutoff, prerequisites first.
fn build_study_plan(
    graph: &ConceptGraph,
    readiness_map: &HashMap<&str, &ReadinessRecord>,
) -> Result<Vec<StudyPlanEntry>> {
    let topo = topological_order(graph)?;
    let mut plan = Vec::new();

    for concept_id in topo {
        let Some(record) = readiness_map.get(concept_id.as_str()) else {
            continue;
        };
        if record.final_readiness >= MASTERY_CUTOFF {
            continue;
        }

        let reason = match record.direct_readiness {
            Some(direct) if direct < LOW_DIRECT_CUTOFF => {
                "Low direct performance on exam questions"
            }
            _ if record.prerequisite_penalty > PENALTY_REASON_CUTOFF => {
                "Weakness in prerequisite concepts"
            }
            _ => "Below mastery threshold",
        };

        let mut explanation = format!(
            "Your readiness for this concept is {:.2}. ",
            record.final_readiness
        );
        if let Some(direct) = record.direct_readiness {
            let _ = write!(explanation, "Direct performance: {direct:.2}. ");
        }
        if record.prerequisite_penalty > 0.0 {
            let _ = write!(
                explanation,
                "Prerequisite penalty: -{:.2}. ",
                record.prerequisite_penalty
            );
        }
        if record.downstream_boost > 0.0 {
            let _ = write!(
                explanation,
                "Downstream boost: +{:.2}. ",
                record.downstream_boost
            );
        }

        plan.push(StudyPlanEntry {
            concept_label: label_of(graph, &concept_id),
            concept_id,
            readiness: record.final_readiness,
            confidence: record.confidence,
            reason: reason.to_string(),
            explanation: explanation.trim_end().to_string(),
        });
    }

    Ok(plan)
}

fn label_of(graph: &ConceptGraph, concept_id: &str) -> String {
    graph
        .label_of(concept_id)
        .unwrap_or(concept_id)
        .to_string()
}
