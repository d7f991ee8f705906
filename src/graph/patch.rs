// src/graph/patch.rs

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::ValidationIssue;
use crate::graph::model::{ConceptGraph, ConceptId, GraphData, GraphEdge, GraphNode};
use crate::graph::topo::find_cycle;

/// An unweighted reference to a directed edge, used for removals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EdgeRef {
    pub source: ConceptId,
    pub target: ConceptId,
}

/// A batch of graph mutations, applied in the fixed order:
/// add_nodes, remove_nodes, add_edges, remove_edges.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphPatch {
    #[serde(default)]
    pub add_nodes: Vec<GraphNode>,
    #[serde(default)]
    pub remove_nodes: Vec<ConceptId>,
    #[serde(default)]
    pub add_edges: Vec<GraphEdge>,
    #[serde(default)]
    pub remove_edges: Vec<EdgeRef>,
}

/// Result of [`apply_patch`].
///
/// Either the patch committed (`is_dag` true, `graph` at version + 1, no
/// errors) or it was rejected wholesale and `graph` is the original value
/// unchanged.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub graph: ConceptGraph,
    pub is_dag: bool,
    pub cycle: Option<Vec<ConceptId>>,
    pub errors: Vec<ValidationIssue>,
}

/// Apply a patch to a working copy of `graph`, all-or-nothing.
///
/// Per-operation errors (duplicate add, remove of a nonexistent node or edge,
/// edge to an undefined node, out-of-range weight) are collected rather than
/// raised; if *any* occurred the original graph is returned unchanged. A
/// structurally clean result is then checked for acyclicity and rejected with
/// one concrete cycle path if it cycles. Removing a node silently drops its
/// incident edges.
pub fn apply_patch(graph: &ConceptGraph, patch: &GraphPatch) -> PatchOutcome {
    let mut errors: Vec<ValidationIssue> = Vec::new();
    let mut working = graph.to_data();

    for node in &patch.add_nodes {
        if working.nodes.iter().any(|n| n.id == node.id) {
            errors.push(ValidationIssue::for_field(
                "add_nodes",
                format!("Node '{}' already exists", node.id),
            ));
        } else {
            working.nodes.push(node.clone());
        }
    }

    for node_id in &patch.remove_nodes {
        if let Some(pos) = working.nodes.iter().position(|n| &n.id == node_id) {
            working.nodes.remove(pos);
            working
                .edges
                .retain(|e| &e.source != node_id && &e.target != node_id);
        } else {
            errors.push(ValidationIssue::for_field(
                "remove_nodes",
                format!("Node '{}' does not exist", node_id),
            ));
        }
    }

    for edge in &patch.add_edges {
        if !working.nodes.iter().any(|n| n.id == edge.source) {
            errors.push(ValidationIssue::for_field(
                "add_edges",
                format!("Source node '{}' does not exist", edge.source),
            ));
            continue;
        }
        if !working.nodes.iter().any(|n| n.id == edge.target) {
            errors.push(ValidationIssue::for_field(
                "add_edges",
                format!("Target node '{}' does not exist", edge.target),
            ));
            continue;
        }
        if !(0.0..=1.0).contains(&edge.weight) {
            errors.push(ValidationIssue::for_field(
                "add_edges",
                format!("Edge weight must be in [0, 1], got {}", edge.weight),
            ));
            continue;
        }
        upsert_edge(&mut working, edge);
    }

    for edge in &patch.remove_edges {
        if let Some(pos) = working
            .edges
            .iter()
            .position(|e| e.source == edge.source && e.target == edge.target)
        {
            working.edges.remove(pos);
        } else {
            errors.push(ValidationIssue::for_field(
                "remove_edges",
                format!("Edge ({} -> {}) does not exist", edge.source, edge.target),
            ));
        }
    }

    if !errors.is_empty() {
        warn!(
            version = graph.version(),
            error_count = errors.len(),
            "graph patch rejected: structural errors"
        );
        return PatchOutcome {
            graph: graph.clone(),
            is_dag: false,
            cycle: None,
            errors,
        };
    }

    let candidate = ConceptGraph::build_unchecked(&working, graph.version() + 1);

    if let Some(cycle) = find_cycle(&candidate) {
        warn!(
            version = graph.version(),
            cycle = %cycle.join(" -> "),
            "graph patch rejected: would create a cycle"
        );
        errors.push(ValidationIssue::new(format!(
            "Patch would create a cycle: {}",
            cycle.join(" -> ")
        )));
        return PatchOutcome {
            graph: graph.clone(),
            is_dag: false,
            cycle: Some(cycle),
            errors,
        };
    }

    debug!(
        old_version = graph.version(),
        new_version = candidate.version(),
        nodes = candidate.len(),
        edges = candidate.edge_count(),
        "graph patch committed"
    );

    PatchOutcome {
        graph: candidate,
        is_dag: true,
        cycle: None,
        errors: Vec::new(),
    }
}

/// At most one directed edge per ordered pair: re-adding overwrites the weight.
fn upsert_edge(data: &mut GraphData, edge: &GraphEdge) {
    match data
        .edges
        .iter_mut()
        .find(|e| e.source == edge.source && e.target == edge.target)
    {
        Some(existing) => existing.weight = edge.weight,
        None => data.edges.push(edge.clone()),
    }
}
