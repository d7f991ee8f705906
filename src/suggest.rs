// src/suggest.rs

//! Placeholder interfaces for LLM-assisted suggestion features.
//!
//! These are stubs only: the shapes are stable so callers can integrate now,
//! but no real inference happens here.
//!
//! TODO: back these with an actual LLM provider once one is wired in.

use serde::Serialize;

/// A suggested concept tag for a question.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptTagSuggestion {
    pub concept_id: String,
    pub confidence: f64,
    pub reason: String,
}

/// A suggested prerequisite edge between two concepts.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeSuggestion {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub rationale: String,
}

/// Suggest concept tags for a question's text. Stub: always empty.
pub fn suggest_concept_tags(_question_text: &str) -> Vec<ConceptTagSuggestion> {
    Vec::new()
}

/// Suggest prerequisite edges between concepts. Stub: always empty.
pub fn suggest_prerequisite_edges(_concepts: &[String]) -> Vec<EdgeSuggestion> {
    Vec::new()
}

/// Intervention suggestions for a cluster's weak concepts. Stub: falls back
/// to the deterministic text template.
pub fn generate_cluster_interventions(weak_concepts: &[String]) -> Vec<String> {
    weak_concepts
        .iter()
        .map(|concept| {
            format!(
                "Review session recommended for '{concept}': \
                 consider practice problems and targeted exercises."
            )
        })
        .collect()
}
