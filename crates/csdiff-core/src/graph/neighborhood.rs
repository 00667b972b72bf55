/// Radius-bounded neighborhood extraction around a focus concept.
///
/// [`extract_neighborhood`] walks the [`CombinedGraph`] depth-first from the
/// focus, following edges in either direction and accumulating
/// [edge weight](crate::graph::CombinedEdge::weight). The focus has depth 1;
/// a vertex is included when the walk reaches it with an accumulated depth no
/// greater than the radius.
///
/// # Depth Assignment
///
/// Depth is path-dependent and the last assignment wins. An edge with one
/// reached endpoint assigns the other one, whatever the edge's direction. An
/// edge whose endpoints were both reached re-assigns its target from its
/// source, which can lower or raise the target's depth; the focus keeps
/// depth 1. Edge stacking order is fixed (target, source, relation, side) so
/// results are deterministic for a given graph.
///
/// Because later assignments can raise a depth, a larger radius may drop a
/// vertex that a smaller one reached.
use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::graph::combined::{CombinedEdge, CombinedGraph, CombinedVertex};

/// Outcome of a neighborhood request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Neighborhood {
    /// The focus exists; carries the extracted subgraph.
    Found(Subgraph),
    /// The focus code is not a vertex of the combined graph.
    NotFound {
        /// The requested code.
        focus: String,
    },
}

impl Neighborhood {
    /// Returns the subgraph, or `None` if the focus was not found.
    pub fn into_subgraph(self) -> Option<Subgraph> {
        match self {
            Neighborhood::Found(sub) => Some(sub),
            Neighborhood::NotFound { .. } => None,
        }
    }
}

/// Vertices and edges reached from a focus within a radius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subgraph {
    pub focus: String,
    /// Effective radius after clamping.
    pub radius: u32,
    /// Reached vertices, sorted by code.
    pub vertices: Vec<CombinedVertex>,
    /// Traversed edges with both endpoints reached, sorted.
    pub edges: Vec<CombinedEdge>,
    /// Final depth of each reached vertex.
    pub depths: BTreeMap<String, u32>,
}

impl Subgraph {
    /// Returns `true` if `code` was reached.
    pub fn contains(&self, code: &str) -> bool {
        self.depths.contains_key(code)
    }

    /// Final depth of `code`, if it was reached.
    pub fn depth(&self, code: &str) -> Option<u32> {
        self.depths.get(code).copied()
    }
}

/// Extracts the neighborhood of `focus` in `graph` within `radius`.
///
/// A radius of 0 is treated as 1 (the focus alone plus any changed
/// relationships touching it). Returns [`Neighborhood::NotFound`] when the
/// focus is not a vertex of `graph`.
pub fn extract_neighborhood(graph: &CombinedGraph, focus: &str, radius: u32) -> Neighborhood {
    let Some(focus_idx) = graph.node_index(focus) else {
        tracing::debug!(focus, "focus concept not in combined graph");
        return Neighborhood::NotFound {
            focus: focus.to_owned(),
        };
    };
    let radius = radius.max(1);

    let mut depths: HashMap<NodeIndex, u32> = HashMap::new();
    let mut visited_edges: HashSet<EdgeIndex> = HashSet::new();
    let mut stack: Vec<EdgeIndex> = Vec::new();

    depths.insert(focus_idx, 1);
    stack.extend(sorted_edges(graph, graph.incident_edges(focus_idx)));

    let g = graph.graph();
    let mut iteration = 0usize;
    while let Some(edge_idx) = stack.pop() {
        if !visited_edges.insert(edge_idx) {
            continue;
        }
        let (Some((source, target)), Some(edge)) =
            (g.edge_endpoints(edge_idx), g.edge_weight(edge_idx))
        else {
            continue;
        };

        iteration += 1;
        tracing::debug!(
            iteration,
            edge = %edge,
            stack = stack.len(),
            reached = depths.len(),
            "neighborhood step"
        );

        let (anchor_depth, reached) = match (depths.get(&source), depths.get(&target)) {
            (Some(&depth), None) => (depth, target),
            (None, Some(&depth)) => (depth, source),
            (Some(&depth), Some(_)) if target != focus_idx => (depth, target),
            (Some(_), Some(_)) | (None, None) => continue,
        };

        let candidate = anchor_depth + edge.weight;
        if candidate <= radius {
            depths.insert(reached, candidate);
            let next = graph
                .incident_edges(reached)
                .into_iter()
                .filter(|e| !visited_edges.contains(e))
                .filter(|e| {
                    g.edge_weight(*e)
                        .is_some_and(|w| candidate + w.weight <= radius)
                })
                .collect();
            stack.extend(sorted_edges(graph, next));
        }
    }

    let mut vertices: Vec<CombinedVertex> = depths
        .keys()
        .filter_map(|idx| g.node_weight(*idx))
        .cloned()
        .collect();
    vertices.sort_by(|a, b| a.code.cmp(&b.code));

    let mut edges: Vec<CombinedEdge> = visited_edges
        .iter()
        .filter(|e| {
            g.edge_endpoints(**e)
                .is_some_and(|(s, t)| depths.contains_key(&s) && depths.contains_key(&t))
        })
        .filter_map(|e| g.edge_weight(*e))
        .cloned()
        .collect();
    edges.sort();

    let depths: BTreeMap<String, u32> = depths
        .iter()
        .filter_map(|(idx, d)| g.node_weight(*idx).map(|v| (v.code.clone(), *d)))
        .collect();

    tracing::info!(
        focus,
        radius,
        iterations = iteration,
        vertices = vertices.len(),
        edges = edges.len(),
        "extracted neighborhood"
    );

    Neighborhood::Found(Subgraph {
        focus: focus.to_owned(),
        radius,
        vertices,
        edges,
        depths,
    })
}

/// Orders edges for pushing so that the smallest traversal key is popped last.
fn sorted_edges(graph: &CombinedGraph, mut edges: Vec<EdgeIndex>) -> Vec<EdgeIndex> {
    let g = graph.graph();
    edges.sort_by(|a, b| {
        let ka = g.edge_weight(*a).map(CombinedEdge::traversal_key);
        let kb = g.edge_weight(*b).map(CombinedEdge::traversal_key);
        ka.cmp(&kb)
    });
    edges
}
