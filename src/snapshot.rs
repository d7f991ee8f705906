// src/snapshot.rs

//! Exam snapshot: the plain-data input bundle for one compute invocation.
//!
//! The service layer that owns persistence assembles this; the CLI reads the
//! same shape from a JSON file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;
use crate::graph::GraphData;
use crate::pipeline::{MaxScores, QuestionConceptMap, ScoreTable};

/// One exam's full input snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct ExamSnapshot {
    #[serde(default)]
    pub exam_id: String,

    /// The concept dependency graph. May be empty, in which case the pipeline
    /// falls back to isolated nodes from the mapping.
    #[serde(default)]
    pub graph: GraphData,

    /// student -> question -> raw score.
    pub scores: ScoreTable,

    /// question -> maximum score.
    #[serde(default)]
    pub max_scores: MaxScores,

    /// concept -> tagged questions with weights.
    pub question_concept_map: QuestionConceptMap,
}

/// Read an [`ExamSnapshot`] from a JSON file.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<ExamSnapshot> {
    let contents = fs::read_to_string(path.as_ref())?;
    let snapshot: ExamSnapshot = serde_json::from_str(&contents)?;
    Ok(snapshot)
}
