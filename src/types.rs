// src/types.rs

use serde::{Deserialize, Serialize};

/// Qualitative reliability of a concept's readiness estimate.
///
/// Ordering matters: the pipeline combines factors by taking the ordinal
/// minimum, so `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Node color in a student's personal concept graph.
///
/// - `Green`: final readiness > 0.7
/// - `Yellow`: final readiness in [0.4, 0.7]
/// - `Red`: final readiness < 0.4
/// - `Gray`: the student has no readiness result for the concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeColor {
    Green,
    Yellow,
    Red,
    Gray,
}
