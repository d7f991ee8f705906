// src/config/mod.rs

//! Parameter configuration: TOML model, loading, and validation.
//!
//! The core pipeline accepts any real-valued parameters; this layer is where
//! the caller-facing bounds live (alpha/beta/gamma in [0, 5], threshold in
//! [0, 1], k >= 1).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ClusteringSection, ParamsFile, ParametersSection, RawParamsFile};
