/// Side-tagged union of two concept graphs.
///
/// [`build_combined_graph`] merges the left and right [`ConceptGraph`]s into
/// one [`CombinedGraph`]. Vertices are tagged with the side(s) that define
/// the code; edges keep the side of the document that made the claim and are
/// never merged across sides.
///
/// # Edge Weight
///
/// Every [`CombinedEdge`] carries a traversal weight used by
/// [`crate::graph::neighborhood`]:
///
/// - `0` when only its own document claims `(from, to, relation)`; these are
///   the changed relationships and are free to traverse.
/// - `1` when the other document claims the identical relation too.
use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::graph::neighborhood::{Neighborhood, extract_neighborhood};
use crate::graph::{ConceptEdge, ConceptGraph, Side};
use crate::render;

/// Where a combined vertex is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphSide {
    Left,
    Right,
    Both,
}

impl GraphSide {
    pub fn as_str(self) -> &'static str {
        match self {
            GraphSide::Left => "left",
            GraphSide::Right => "right",
            GraphSide::Both => "both",
        }
    }
}

impl From<Side> for GraphSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => GraphSide::Left,
            Side::Right => GraphSide::Right,
        }
    }
}

/// A concept code in the combined graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedVertex {
    pub code: String,
    /// Display text in the left document, if the code is defined there.
    pub display_left: Option<String>,
    /// Display text in the right document, if the code is defined there.
    pub display_right: Option<String>,
    pub side: GraphSide,
}

impl CombinedVertex {
    /// Text describing the vertex for presentation.
    ///
    /// One-sided vertices return that side's display. A vertex in both
    /// documents returns the shared display, or `"<left> vs. <right>"` when
    /// the two differ.
    pub fn label(&self) -> Option<String> {
        match self.side {
            GraphSide::Left => self.display_left.clone(),
            GraphSide::Right => self.display_right.clone(),
            GraphSide::Both if self.display_left == self.display_right => {
                self.display_right.clone()
            }
            GraphSide::Both => Some(format!(
                "{} vs. {}",
                self.display_left.as_deref().unwrap_or(render::NULL),
                self.display_right.as_deref().unwrap_or(render::NULL)
            )),
        }
    }
}

/// A relation claim copied from one of the source graphs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CombinedEdge {
    pub from: String,
    pub to: String,
    pub relation: String,
    /// Document that made the claim.
    pub side: Side,
    /// Traversal weight: 1 if both documents make the claim, 0 otherwise.
    pub weight: u32,
}

impl CombinedEdge {
    /// Returns `true` if the other document makes the identical claim.
    pub fn is_shared(&self) -> bool {
        self.weight == 1
    }

    /// Deterministic stacking order for traversal: target, source, relation,
    /// side.
    pub(crate) fn traversal_key(&self) -> (&str, &str, &str, Side) {
        (&self.to, &self.from, &self.relation, self.side)
    }
}

impl std::fmt::Display for CombinedEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' -> '{}' [{}] ({})",
            self.from, self.to, self.relation, self.side
        )
    }
}

/// The union of a left and right [`ConceptGraph`].
///
/// Immutable once built. Construct with [`build_combined_graph`].
#[derive(Debug, Clone, Default)]
pub struct CombinedGraph {
    graph: StableDiGraph<CombinedVertex, CombinedEdge>,
    code_to_index: HashMap<String, NodeIndex>,
}

impl CombinedGraph {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up the [`NodeIndex`] of a code.
    pub fn node_index(&self, code: &str) -> Option<NodeIndex> {
        self.code_to_index.get(code).copied()
    }

    /// Returns the vertex for `code`, if any.
    pub fn vertex(&self, code: &str) -> Option<&CombinedVertex> {
        self.node_index(code)
            .and_then(|idx| self.graph.node_weight(idx))
    }

    /// All vertices: left codes in document order, then right-only codes.
    pub fn vertices(&self) -> impl Iterator<Item = &CombinedVertex> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
    }

    /// All edges: left claims first, then right claims.
    pub fn edges(&self) -> impl Iterator<Item = &CombinedEdge> {
        self.graph
            .edge_indices()
            .filter_map(|idx| self.graph.edge_weight(idx))
    }

    /// The underlying [`StableDiGraph`].
    pub fn graph(&self) -> &StableDiGraph<CombinedVertex, CombinedEdge> {
        &self.graph
    }

    /// Edges touching `node` in either direction.
    pub(crate) fn incident_edges(&self, node: NodeIndex) -> Vec<EdgeIndex> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .chain(self.graph.edges_directed(node, Direction::Incoming))
            .map(|e| e.id())
            .collect()
    }

    /// Edges whose claim is made by one document only, in graph order.
    pub fn affected_edges(&self) -> Vec<&CombinedEdge> {
        self.edges().filter(|e| !e.is_shared()).collect()
    }

    /// Vertices touched by a change, sorted by code.
    ///
    /// A vertex is affected when only one document defines it, or when it is
    /// an endpoint of an [affected edge](Self::affected_edges).
    pub fn affected_vertices(&self) -> Vec<&CombinedVertex> {
        let mut affected: BTreeMap<&str, &CombinedVertex> = self
            .vertices()
            .filter(|v| v.side != GraphSide::Both)
            .map(|v| (v.code.as_str(), v))
            .collect();
        for edge in self.affected_edges() {
            for code in [&edge.from, &edge.to] {
                if let Some(v) = self.vertex(code) {
                    affected.insert(v.code.as_str(), v);
                }
            }
        }
        affected.into_values().collect()
    }

    /// Extracts the neighborhood of `focus` within `radius`.
    ///
    /// See [`extract_neighborhood`].
    pub fn subgraph(&self, focus: &str, radius: u32) -> Neighborhood {
        extract_neighborhood(self, focus, radius)
    }
}

/// Builds the [`CombinedGraph`] of two concept graphs.
///
/// Self-loops in either source graph are dropped.
pub fn build_combined_graph(left: &ConceptGraph, right: &ConceptGraph) -> CombinedGraph {
    let mut graph: StableDiGraph<CombinedVertex, CombinedEdge> = StableDiGraph::new();
    let mut code_to_index: HashMap<String, NodeIndex> = HashMap::new();

    for concept in left.concepts() {
        let in_right = right.concept(&concept.code);
        let vertex = CombinedVertex {
            code: concept.code.clone(),
            display_left: concept.display.clone(),
            display_right: in_right.and_then(|c| c.display.clone()),
            side: if in_right.is_some() {
                GraphSide::Both
            } else {
                GraphSide::Left
            },
        };
        let idx = graph.add_node(vertex);
        code_to_index.insert(concept.code.clone(), idx);
    }
    for concept in right.concepts().filter(|c| !left.contains(&c.code)) {
        let vertex = CombinedVertex {
            code: concept.code.clone(),
            display_left: None,
            display_right: concept.display.clone(),
            side: GraphSide::Right,
        };
        let idx = graph.add_node(vertex);
        code_to_index.insert(concept.code.clone(), idx);
    }

    let left_claims: HashSet<&ConceptEdge> = left.edges().collect();
    let right_claims: HashSet<&ConceptEdge> = right.edges().collect();

    for (source, other_claims) in [(left, &right_claims), (right, &left_claims)] {
        for edge in source.edges() {
            if edge.from == edge.to {
                tracing::debug!(side = %source.side(), edge = ?edge, "dropping self-loop");
                continue;
            }
            let (Some(&from), Some(&to)) =
                (code_to_index.get(&edge.from), code_to_index.get(&edge.to))
            else {
                continue;
            };
            let weight = u32::from(other_claims.contains(edge));
            graph.add_edge(
                from,
                to,
                CombinedEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    relation: edge.relation.clone(),
                    side: source.side(),
                    weight,
                },
            );
        }
    }

    let combined = CombinedGraph {
        graph,
        code_to_index,
    };
    tracing::info!(
        vertices = combined.vertex_count(),
        edges = combined.edge_count(),
        affected_edges = combined.affected_edges().len(),
        "built combined graph"
    );
    combined
}
