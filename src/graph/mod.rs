// src/graph/mod.rs

//! Concept dependency graph: versioned DAG of concepts with weighted
//! prerequisite edges.
//!
//! - [`model`] holds the JSON wire shape ([`GraphData`]) and the validated,
//!   versioned in-memory value ([`ConceptGraph`]).
//! - [`validate`] accumulates structural problems and detects cycles.
//! - [`topo`] provides topological ordering and DFS cycle extraction.
//! - [`patch`] applies atomic all-or-nothing graph patches.

pub mod model;
pub mod patch;
pub mod topo;
pub mod validate;

pub use model::{ConceptGraph, ConceptId, GraphData, GraphEdge, GraphNode};
pub use patch::{EdgeRef, GraphPatch, PatchOutcome, apply_patch};
pub use topo::{find_cycle, is_dag, topological_order};
pub use validate::{GraphValidation, validate_graph};
