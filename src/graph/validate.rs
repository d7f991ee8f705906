// src/graph/validate.rs

use std::collections::HashSet;

use serde::Serialize;

use crate::errors::ValidationIssue;
use crate::graph::model::{ConceptGraph, ConceptId, GraphData};
use crate::graph::topo::find_cycle;

/// Outcome of validating a graph in wire form.
///
/// `errors` carries every structural problem found in one pass; `cycle` is a
/// concrete cycle path (first id repeated at the end) when structure is fine
/// but the graph is not a DAG.
#[derive(Debug, Clone, Serialize)]
pub struct GraphValidation {
    pub ok: bool,
    pub errors: Vec<ValidationIssue>,
    pub cycle: Option<Vec<ConceptId>>,
}

/// Validate a concept dependency graph.
///
/// Checks, in order:
/// 1. every edge endpoint references a defined node,
/// 2. every edge weight lies in [0, 1],
/// 3. acyclicity, but only if 1 and 2 passed, since cycle detection is
///    meaningless on a structurally broken graph.
pub fn validate_graph(data: &GraphData) -> GraphValidation {
    let errors = collect_structural_issues(data);
    if !errors.is_empty() {
        return GraphValidation {
            ok: false,
            errors,
            cycle: None,
        };
    }

    let graph = ConceptGraph::build_unchecked(data, 1);
    if let Some(cycle) = find_cycle(&graph) {
        let message = format!("Graph contains a cycle: {}", cycle.join(" -> "));
        return GraphValidation {
            ok: false,
            errors: vec![ValidationIssue::new(message)],
            cycle: Some(cycle),
        };
    }

    GraphValidation {
        ok: true,
        errors: Vec::new(),
        cycle: None,
    }
}

/// Referential-integrity and weight-range checks, accumulated (not fail-fast).
pub(crate) fn collect_structural_issues(data: &GraphData) -> Vec<ValidationIssue> {
    let node_ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut issues = Vec::new();

    for (row, edge) in data.edges.iter().enumerate() {
        if !node_ids.contains(edge.source.as_str()) {
            issues.push(ValidationIssue::for_edge(
                row,
                "source",
                format!("Edge source '{}' is not a defined node", edge.source),
            ));
        }
        if !node_ids.contains(edge.target.as_str()) {
            issues.push(ValidationIssue::for_edge(
                row,
                "target",
                format!("Edge target '{}' is not a defined node", edge.target),
            ));
        }
        if !(0.0..=1.0).contains(&edge.weight) {
            issues.push(ValidationIssue::for_edge(
                row,
                "weight",
                format!("Edge weight must be in [0, 1], got {}", edge.weight),
            ));
        }
    }

    issues
}
