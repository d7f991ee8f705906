// src/config/model.rs

use serde::Deserialize;

use crate::pipeline::PipelineParams;

/// Top-level configuration as read from a TOML file:
///
/// ```toml
/// [parameters]
/// alpha = 1.0
/// beta = 0.3
/// gamma = 0.2
/// threshold = 0.6
///
/// [clustering]
/// k = 4
/// ```
///
/// All sections are optional and have the documented defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawParamsFile {
    /// Stage weights and readiness cutoff from `[parameters]`.
    #[serde(default)]
    pub parameters: ParametersSection,

    /// Clustering controls from `[clustering]`.
    #[serde(default)]
    pub clustering: ClusteringSection,
}

/// `[parameters]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ParametersSection {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_alpha() -> f64 {
    1.0
}

fn default_beta() -> f64 {
    0.3
}

fn default_gamma() -> f64 {
    0.2
}

fn default_threshold() -> f64 {
    0.6
}

impl Default for ParametersSection {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
            threshold: default_threshold(),
        }
    }
}

/// `[clustering]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringSection {
    /// Desired cluster count; collapses to the student count when smaller.
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    4
}

impl Default for ClusteringSection {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

/// A validated configuration. Construct via
/// `ParamsFile::try_from(RawParamsFile)` or [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct ParamsFile {
    pub parameters: ParametersSection,
    pub clustering: ClusteringSection,
}

impl ParamsFile {
    pub(crate) fn new_unchecked(
        parameters: ParametersSection,
        clustering: ClusteringSection,
    ) -> Self {
        Self {
            parameters,
            clustering,
        }
    }

    /// The pipeline-facing parameter bundle.
    pub fn pipeline_params(&self) -> PipelineParams {
        PipelineParams {
            alpha: self.parameters.alpha,
            beta: self.parameters.beta,
            gamma: self.parameters.gamma,
            threshold: self.parameters.threshold,
        }
    }
}

impl Default for ParamsFile {
    fn default() -> Self {
        Self {
            parameters: ParametersSection::default(),
            clustering: ClusteringSection::default(),
        }
    }
}
