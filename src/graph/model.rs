// src/graph/model.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ReadinessError, Result};
use crate::graph::validate::collect_structural_issues;

pub type ConceptId = String;

/// A concept node as carried on the wire.
///
/// `label` defaults to the node id when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: ConceptId,
    #[serde(default)]
    pub label: String,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A weighted prerequisite edge: `source` must be mastered before `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: ConceptId,
    pub target: ConceptId,
    #[serde(default = "default_edge_weight")]
    pub weight: f64,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
        }
    }
}

pub(crate) fn default_edge_weight() -> f64 {
    0.5
}

/// The graph JSON shape consumed and produced by this crate:
/// `{"nodes":[{"id","label"}...],"edges":[{"source","target","weight"}...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// Internal node storage: label plus adjacency in both directions.
#[derive(Debug, Clone)]
struct ConceptNode {
    id: ConceptId,
    label: String,
    /// (parent index, edge weight) for every incoming prerequisite edge.
    parents: Vec<(usize, f64)>,
    /// (child index, edge weight) for every outgoing edge.
    children: Vec<(usize, f64)>,
}

/// A validated, versioned snapshot of the concept dependency graph.
///
/// The value is immutable once built: patching produces a *new* graph at
/// version + 1 (see [`crate::graph::patch::apply_patch`]), so concurrent
/// readers never observe a half-patched graph. `build` enforces referential
/// integrity and weight ranges but not acyclicity; acyclicity is the patch /
/// validation layer's concern.
///
/// Node order is insertion order from the source [`GraphData`]; all matrix
/// indices across the pipeline align with it.
#[derive(Debug, Clone)]
pub struct ConceptGraph {
    version: u32,
    nodes: Vec<ConceptNode>,
    index: HashMap<ConceptId, usize>,
}

impl ConceptGraph {
    /// Build a graph from wire data at version 1.
    ///
    /// Fails with [`ReadinessError::SchemaError`] if any edge references an
    /// undefined node or carries a weight outside [0, 1]. Duplicate node ids
    /// collapse to the first occurrence; a duplicate directed edge overwrites
    /// the earlier weight (at most one edge per ordered pair).
    pub fn build(data: &GraphData) -> Result<Self> {
        let issues = collect_structural_issues(data);
        if !issues.is_empty() {
            let joined = issues
                .iter()
                .map(|i| i.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ReadinessError::SchemaError(joined));
        }
        Ok(Self::build_unchecked(data, 1))
    }

    /// Build without structural validation. Callers must have run
    /// [`collect_structural_issues`] on `data` first.
    pub(crate) fn build_unchecked(data: &GraphData, version: u32) -> Self {
        let mut nodes: Vec<ConceptNode> = Vec::with_capacity(data.nodes.len());
        let mut index: HashMap<ConceptId, usize> = HashMap::with_capacity(data.nodes.len());

        for node in &data.nodes {
            if index.contains_key(&node.id) {
                continue;
            }
            let label = if node.label.is_empty() {
                node.id.clone()
            } else {
                node.label.clone()
            };
            index.insert(node.id.clone(), nodes.len());
            nodes.push(ConceptNode {
                id: node.id.clone(),
                label,
                parents: Vec::new(),
                children: Vec::new(),
            });
        }

        for edge in &data.edges {
            let s = index[&edge.source];
            let t = index[&edge.target];
            match nodes[s].children.iter_mut().find(|(c, _)| *c == t) {
                Some(existing) => existing.1 = edge.weight,
                None => nodes[s].children.push((t, edge.weight)),
            }
            match nodes[t].parents.iter_mut().find(|(p, _)| *p == s) {
                Some(existing) => existing.1 = edge.weight,
                None => nodes[t].parents.push((s, edge.weight)),
            }
        }

        Self {
            version,
            nodes,
            index,
        }
    }

    /// A graph consisting only of isolated nodes, one per concept id.
    ///
    /// Used as the pipeline fallback when no graph has been defined for an
    /// exam; labels default to the ids.
    pub fn from_isolated_concepts(ids: impl IntoIterator<Item = ConceptId>) -> Self {
        let nodes = ids
            .into_iter()
            .map(|id| GraphNode {
                label: id.clone(),
                id,
            })
            .collect();
        Self::build_unchecked(
            &GraphData {
                nodes,
                edges: Vec::new(),
            },
            1,
        )
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn id_of(&self, idx: usize) -> &str {
        &self.nodes[idx].id
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.index.get(id).map(|&i| self.nodes[i].label.as_str())
    }

    /// Concept ids in graph (insertion) order.
    pub fn concept_ids(&self) -> Vec<ConceptId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Incoming prerequisite edges of the node at `idx`: (parent index, weight).
    pub fn parents_of(&self, idx: usize) -> &[(usize, f64)] {
        &self.nodes[idx].parents
    }

    /// Outgoing edges of the node at `idx`: (child index, weight).
    pub fn children_of(&self, idx: usize) -> &[(usize, f64)] {
        &self.nodes[idx].children
    }

    pub fn edge_weight(&self, source: &str, target: &str) -> Option<f64> {
        let s = self.index_of(source)?;
        let t = self.index_of(target)?;
        self.nodes[s]
            .children
            .iter()
            .find(|(c, _)| *c == t)
            .map(|(_, w)| *w)
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// Convert back to the wire shape. Round-trips with [`ConceptGraph::build`]
    /// modulo node/edge ordering and defaulted labels.
    pub fn to_data(&self) -> GraphData {
        let nodes = self
            .nodes
            .iter()
            .map(|n| GraphNode {
                id: n.id.clone(),
                label: n.label.clone(),
            })
            .collect();
        let mut edges = Vec::with_capacity(self.edge_count());
        for node in &self.nodes {
            for &(child, weight) in &node.children {
                edges.push(GraphEdge {
                    source: node.id.clone(),
                    target: self.nodes[child].id.clone(),
                    weight,
                });
            }
        }
        GraphData { nodes, edges }
    }
}
