// src/graph/topo.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{ReadinessError, Result};
use crate::graph::model::{ConceptGraph, ConceptId};

/// Return concept ids in a topological order (prerequisites first).
///
/// Fails with [`ReadinessError::CycleError`] carrying one concrete cycle path
/// if the graph is not acyclic; callers are expected to validate first.
pub fn topological_order(graph: &ConceptGraph) -> Result<Vec<ConceptId>> {
    match toposort(&petgraph_view(graph), None) {
        Ok(order) => Ok(order
            .into_iter()
            .map(|idx| graph.id_of(idx).to_string())
            .collect()),
        Err(_) => {
            let cycle = find_cycle(graph).unwrap_or_default();
            Err(ReadinessError::CycleError(cycle.join(" -> ")))
        }
    }
}

/// Whether the graph contains no directed cycle.
pub fn is_dag(graph: &ConceptGraph) -> bool {
    toposort(&petgraph_view(graph), None).is_ok()
}

/// Find one directed cycle by depth-first search.
///
/// Returns the cycle as an ordered id sequence with the first id repeated at
/// the end (e.g. `[A, B, A]`), or `None` if the graph is acyclic. Any single
/// cycle is acceptable, not necessarily the shortest.
pub fn find_cycle(graph: &ConceptGraph) -> Option<Vec<ConceptId>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Gray,
        Black,
    }

    let n = graph.len();
    let mut marks = vec![Mark::White; n];
    let mut stack: Vec<usize> = Vec::new();

    fn dfs(
        graph: &ConceptGraph,
        node: usize,
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        marks[node] = Mark::Gray;
        stack.push(node);

        for &(child, _) in graph.children_of(node) {
            match marks[child] {
                Mark::Gray => {
                    // Back edge: the cycle is the stack suffix from `child`.
                    let start = stack.iter().position(|&v| v == child).unwrap_or(0);
                    let mut cycle: Vec<usize> = stack[start..].to_vec();
                    cycle.push(child);
                    return Some(cycle);
                }
                Mark::White => {
                    if let Some(cycle) = dfs(graph, child, marks, stack) {
                        return Some(cycle);
                    }
                }
                Mark::Black => {}
            }
        }

        stack.pop();
        marks[node] = Mark::Black;
        None
    }

    for start in 0..n {
        if marks[start] == Mark::White {
            if let Some(cycle) = dfs(graph, start, &mut marks, &mut stack) {
                return Some(
                    cycle
                        .into_iter()
                        .map(|idx| graph.id_of(idx).to_string())
                        .collect(),
                );
            }
        }
    }

    None
}

fn petgraph_view(graph: &ConceptGraph) -> DiGraphMap<usize, ()> {
    let mut view: DiGraphMap<usize, ()> = DiGraphMap::new();
    for idx in 0..graph.len() {
        view.add_node(idx);
    }
    for idx in 0..graph.len() {
        for &(child, _) in graph.children_of(idx) {
            view.add_edge(idx, child, ());
        }
    }
    view
}
