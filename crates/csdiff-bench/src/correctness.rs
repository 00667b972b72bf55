//! Post-operation invariant checkers for correctness validation.

use std::collections::{BTreeSet, HashSet};

use csdiff_core::{
    CodeSystem, CodeSystemDiff, CombinedGraph, ConceptDefinition, ConceptGraph, GraphSide,
    Neighborhood, Side,
};

/// Counts concepts at every nesting level.
pub fn count_concepts(concepts: &[ConceptDefinition]) -> usize {
    concepts
        .iter()
        .map(|c| 1 + count_concepts(&c.concept))
        .sum()
}

/// Verifies that every concept of `doc` became exactly one graph node.
pub fn check_graph_invariants(doc: &CodeSystem, graph: &ConceptGraph) -> Result<(), String> {
    let expected = count_concepts(&doc.concept);
    if graph.node_count() != expected {
        return Err(format!(
            "node count mismatch: graph={}, document={expected}",
            graph.node_count()
        ));
    }
    for edge in graph.edges() {
        if !graph.contains(&edge.from) || !graph.contains(&edge.to) {
            return Err(format!("edge {} -> {} has a missing endpoint", edge.from, edge.to));
        }
    }
    Ok(())
}

/// Verifies that every code lands in exactly one diff bucket per side.
pub fn check_diff_partition(
    left: &ConceptGraph,
    right: &ConceptGraph,
    diff: &CodeSystemDiff,
) -> Result<(), String> {
    for (graph, only) in [(left, &diff.only_in_left), (right, &diff.only_in_right)] {
        let only: HashSet<&str> = only.iter().map(String::as_str).collect();
        let mut seen = 0;
        for concept in graph.concepts() {
            let in_both = diff.concepts.contains_key(&concept.code);
            let one_sided = only.contains(concept.code.as_str());
            if in_both == one_sided {
                return Err(format!(
                    "{} code {} is in {} buckets",
                    graph.side(),
                    concept.code,
                    if in_both { 2 } else { 0 }
                ));
            }
            seen += 1;
        }
        if seen != diff.concepts.len() + only.len() {
            return Err(format!("{} buckets hold unknown codes", graph.side()));
        }
    }
    Ok(())
}

/// Verifies vertex tags, edge copies and edge weights of a combined graph.
pub fn check_combined_invariants(
    left: &ConceptGraph,
    right: &ConceptGraph,
    combined: &CombinedGraph,
) -> Result<(), String> {
    let union: BTreeSet<&str> = left
        .concepts()
        .chain(right.concepts())
        .map(|c| c.code.as_str())
        .collect();
    if combined.vertex_count() != union.len() {
        return Err(format!(
            "vertex count mismatch: combined={}, union={}",
            combined.vertex_count(),
            union.len()
        ));
    }
    for vertex in combined.vertices() {
        let expected = match (left.contains(&vertex.code), right.contains(&vertex.code)) {
            (true, true) => GraphSide::Both,
            (true, false) => GraphSide::Left,
            (false, true) => GraphSide::Right,
            (false, false) => return Err(format!("vertex {} is in neither graph", vertex.code)),
        };
        if vertex.side != expected {
            return Err(format!("vertex {} tagged {:?}", vertex.code, vertex.side));
        }
    }

    let source_edges = left
        .edges()
        .chain(right.edges())
        .filter(|e| e.from != e.to)
        .count();
    if combined.edge_count() != source_edges {
        return Err(format!(
            "edge count mismatch: combined={}, sources={source_edges}",
            combined.edge_count()
        ));
    }

    let claims = |graph: &ConceptGraph| -> HashSet<(String, String, String)> {
        graph
            .edges()
            .map(|e| (e.from.clone(), e.to.clone(), e.relation.clone()))
            .collect()
    };
    let left_claims = claims(left);
    let right_claims = claims(right);
    for edge in combined.edges() {
        let other = match edge.side {
            Side::Left => &right_claims,
            Side::Right => &left_claims,
        };
        let key = (edge.from.clone(), edge.to.clone(), edge.relation.clone());
        let shared = other.contains(&key);
        if shared != edge.is_shared() {
            return Err(format!("edge {edge} has weight {}", edge.weight));
        }
    }
    Ok(())
}

/// Verifies a neighborhood extracted around `focus`.
///
/// The focus is at depth 1, every depth is within the radius, and every
/// edge connects two reached vertices.
pub fn check_neighborhood(
    combined: &CombinedGraph,
    focus: &str,
    radius: u32,
) -> Result<BTreeSet<String>, String> {
    let sub = match combined.subgraph(focus, radius) {
        Neighborhood::Found(sub) => sub,
        Neighborhood::NotFound { focus } => return Err(format!("focus {focus} not found")),
    };
    if sub.depth(focus) != Some(1) {
        return Err(format!("focus depth is {:?}", sub.depth(focus)));
    }
    if sub.vertices.len() != sub.depths.len() {
        return Err("vertex and depth counts differ".to_owned());
    }
    if let Some((code, depth)) = sub.depths.iter().find(|(_, d)| **d > sub.radius) {
        return Err(format!("{code} at depth {depth} beyond radius {}", sub.radius));
    }
    for edge in &sub.edges {
        if !sub.contains(&edge.from) || !sub.contains(&edge.to) {
            return Err(format!("edge {edge} leaves the neighborhood"));
        }
    }
    Ok(sub.depths.into_keys().collect())
}
