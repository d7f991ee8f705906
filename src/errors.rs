// src/errors.rs

//! Crate-wide error taxonomy and `Result` alias.
//!
//! Structural graph problems are *accumulated* as [`ValidationIssue`] values
//! inside result structs (`GraphValidation`, `PatchOutcome`) so a caller can
//! report every problem at once; only wholesale failures (malformed input,
//! missing prerequisite data, a cycle where a DAG is required) surface as
//! [`ReadinessError`].

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Cycle detected in concept graph: {0}")]
    CycleError(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One structural problem found while validating a graph or applying a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Index of the offending edge in the input, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Field or patch operation the problem belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            row: None,
            field: None,
            message: message.into(),
        }
    }

    pub fn for_field(field: &str, message: impl Into<String>) -> Self {
        Self {
            row: None,
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    pub fn for_edge(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            field: Some(field.to_string()),
            message: message.into(),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ReadinessError>;
