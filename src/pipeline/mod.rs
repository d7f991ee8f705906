// src/pipeline/mod.rs

//! The readiness inference engine.
//!
//! Four numeric stages over a concept DAG, run once per compute invocation
//! over a full snapshot of scores:
//!
//! 1. [`stages::compute_direct_readiness`]: weighted average of normalized
//!    question scores per (student, concept); absent when nothing is tagged
//!    or attempted.
//! 2. [`stages::compute_prerequisite_penalty`]: upstream weakness, one edge
//!    deep, weighted by dependency strength.
//! 3. [`stages::compute_downstream_boost`]: validation from children, capped
//!    at [`BOOST_CAP`].
//! 4. [`stages::compute_final_readiness`]: clamp([0,1], alpha * direct -
//!    beta * penalty + gamma * boost).
//!
//! [`runner::run_readiness_pipeline`] orchestrates the stages plus confidence
//! estimation, explanation traces, and class aggregates into one output
//! bundle.

pub mod aggregates;
pub mod confidence;
pub mod runner;
pub mod stages;
pub(crate) mod stats;
pub mod trace;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use aggregates::ClassAggregate;
pub use confidence::confidence_for_concept;
pub use runner::{PipelineOutput, ReadinessRecord, run_readiness_pipeline};
pub use trace::{BoostContribution, ExplanationTrace, FormulaBreakdown, PenaltyContribution};

/// Fraction of an edge's weight that a strong child contributes back to its
/// parent in Stage 3.
pub const BOOST_VALIDATION_FACTOR: f64 = 0.4;

/// Hard ceiling on the downstream boost, applied after summation.
pub const BOOST_CAP: f64 = 0.2;

/// Sparse score storage: student -> question -> raw score.
pub type ScoreTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Per-question maximum score. Questions missing here default to 1.0.
pub type MaxScores = BTreeMap<String, f64>;

/// A question tagged to a concept, with the tag's weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionTag {
    pub question_id: String,
    pub weight: f64,
}

impl QuestionTag {
    pub fn new(question_id: impl Into<String>, weight: f64) -> Self {
        Self {
            question_id: question_id.into(),
            weight,
        }
    }
}

/// concept -> tagged questions. A concept may have zero tags ("inferred only").
pub type QuestionConceptMap = BTreeMap<String, Vec<QuestionTag>>;

/// Tunable stage weights and the readiness cutoff.
///
/// The core accepts any reals here; range enforcement (alpha/beta/gamma in
/// [0, 5], threshold in [0, 1]) belongs to the caller layer, see
/// [`crate::config`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub threshold: f64,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 0.3,
            gamma: 0.2,
            threshold: 0.6,
        }
    }
}
