/// Concept graph construction from a [`CodeSystem`] using `petgraph`.
///
/// Each document becomes one [`ConceptGraph`]: a `StableDiGraph` whose nodes
/// are [`Concept`]s and whose edges are [`ConceptEdge`]s, plus a
/// `code -> NodeIndex` index for O(1) lookup.
///
/// # Two-Pass Construction
///
/// [`build_concept_graph`] runs two passes over the document:
/// 1. **Concept pass** flattens nested concept lists, inserts one node per
///    concept, attaches simple properties and designations, and queues one
///    pending edge per relational property (and per nesting level). Fails on
///    duplicate codes and on properties that cannot be classified.
/// 2. **Edge pass** resolves the queued endpoints and inserts the edges.
///    Fails if a relational property names a code that is not a concept in
///    the same document.
///
/// # Hierarchy Normalization
///
/// `child` properties and nested concepts are both rewritten into a
/// `parent` edge running from the child to the parent, so hierarchy has a
/// single edge shape throughout the crate.
///
/// # Combined Graph and Neighborhoods
///
/// See [`combined`] for the side-tagged union of two concept graphs and
/// [`neighborhood`] for bounded extraction around a focus concept.
pub mod combined;
pub mod neighborhood;

pub use combined::{CombinedEdge, CombinedGraph, CombinedVertex, GraphSide, build_combined_graph};
pub use neighborhood::{Neighborhood, Subgraph, extract_neighborhood};

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::Serialize;
use thiserror::Error;

use crate::document::{CodeSystem, ConceptDefinition};
use crate::properties::{CHILD, PARENT, PropertyClass, PropertyRegistry, PropertyType};
use crate::render;

// ---------------------------------------------------------------------------
// Weight types
// ---------------------------------------------------------------------------

/// Which of the two compared documents something came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Returns the lowercase name of the side.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Returns the other side.
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-relational property value attached to a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEntry {
    /// Property code.
    pub code: String,
    /// Type from the document's property catalogue.
    pub property_type: PropertyType,
    /// Value rendered as a string for literal comparison.
    pub value: String,
}

/// A designation attached to a concept, keyed by language and use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignationEntry {
    /// Language tag, if any.
    pub language: Option<String>,
    /// Rendered use coding, if any.
    pub use_coding: Option<String>,
    /// Designation text.
    pub value: String,
}

/// Node weight: one concept with its literal data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept {
    /// Code, unique within its graph.
    pub code: String,
    pub display: Option<String>,
    pub definition: Option<String>,
    /// Designations in document order.
    pub designations: Vec<DesignationEntry>,
    /// Simple properties in document order.
    pub properties: Vec<PropertyEntry>,
}

/// Edge weight: a directed relation claim between two concepts.
///
/// Equality and hashing cover all three fields, so two documents making the
/// same claim produce equal edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConceptEdge {
    /// Code of the source concept.
    pub from: String,
    /// Code of the target concept.
    pub to: String,
    /// Relation (property) code. Hierarchy is always [`PARENT`].
    pub relation: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Data errors that abort construction of a [`ConceptGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphBuildError {
    /// Two concepts share the same code.
    #[error("duplicate concept code: {0:?}")]
    DuplicateCode(String),

    /// A relational property carries no value from which a code can be read.
    #[error("concept {concept:?}: relational property {property:?} has no resolvable code")]
    UnresolvableTarget {
        /// Code of the concept carrying the property.
        concept: String,
        /// The property code.
        property: String,
    },

    /// A relational property names a code that is not a concept in the document.
    #[error("concept {concept:?}: property {property:?} references unknown concept {target:?}")]
    DanglingTarget {
        /// Code of the concept carrying the property.
        concept: String,
        /// The property code.
        property: String,
        /// The code that could not be resolved.
        target: String,
    },

    /// A property code is in neither the simple nor the relational catalogue.
    #[error("concept {concept:?}: property {property:?} is not declared")]
    UnknownProperty {
        /// Code of the concept carrying the property.
        concept: String,
        /// The undeclared property code.
        property: String,
    },

    /// A simple property carries no value.
    #[error("concept {concept:?}: property {property:?} has no value")]
    MissingValue {
        /// Code of the concept carrying the property.
        concept: String,
        /// The property code.
        property: String,
    },
}

// ---------------------------------------------------------------------------
// ConceptGraph
// ---------------------------------------------------------------------------

/// A directed concept multigraph built from one [`CodeSystem`].
///
/// Immutable once built. Node iteration order is document order (concepts
/// before their nested children), since no node is ever removed from the
/// underlying [`StableDiGraph`].
///
/// Construct with [`build_concept_graph`].
#[derive(Debug, Clone)]
pub struct ConceptGraph {
    side: Side,
    graph: StableDiGraph<Concept, ConceptEdge>,
    code_to_index: HashMap<String, NodeIndex>,
    registry: PropertyRegistry,
}

impl ConceptGraph {
    /// The side this graph was built for.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of concepts.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of relation edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Looks up the [`NodeIndex`] of a concept code.
    pub fn node_index(&self, code: &str) -> Option<NodeIndex> {
        self.code_to_index.get(code).copied()
    }

    /// Returns `true` if a concept with `code` exists.
    pub fn contains(&self, code: &str) -> bool {
        self.code_to_index.contains_key(code)
    }

    /// Returns the concept with `code`, if any.
    pub fn concept(&self, code: &str) -> Option<&Concept> {
        self.node_index(code)
            .and_then(|idx| self.graph.node_weight(idx))
    }

    /// All concepts in document order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
    }

    /// All relation edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &ConceptEdge> {
        self.graph
            .edge_indices()
            .filter_map(|idx| self.graph.edge_weight(idx))
    }

    /// The property catalogues of the source document.
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// The underlying [`StableDiGraph`].
    pub fn graph(&self) -> &StableDiGraph<Concept, ConceptEdge> {
        &self.graph
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// An edge queued during the concept pass, resolved in the edge pass.
struct PendingEdge {
    /// Concept whose property (or nesting) produced the edge.
    origin: String,
    /// Property code as written, for error reporting.
    property: String,
    edge: ConceptEdge,
}

/// Constructs a [`ConceptGraph`] from a parsed [`CodeSystem`].
///
/// Construction is O(C + P) where C is the number of concepts (at any
/// nesting depth) and P the number of concept properties.
///
/// # Errors
///
/// - [`GraphBuildError::DuplicateCode`] if two concepts share a code.
/// - [`GraphBuildError::UnresolvableTarget`] if a relational property has no
///   code-bearing value.
/// - [`GraphBuildError::UnknownProperty`] if a property is in neither
///   catalogue.
/// - [`GraphBuildError::MissingValue`] if a simple property has no value.
/// - [`GraphBuildError::DanglingTarget`] if a relational property names a
///   code that is not a concept of the document.
pub fn build_concept_graph(cs: &CodeSystem, side: Side) -> Result<ConceptGraph, GraphBuildError> {
    let registry = PropertyRegistry::from_code_system(cs);

    let mut graph: StableDiGraph<Concept, ConceptEdge> = StableDiGraph::new();
    let mut code_to_index: HashMap<String, NodeIndex> = HashMap::new();
    let mut pending: Vec<PendingEdge> = Vec::new();

    // Pass 1: concepts, depth-first in document order.
    let mut stack: Vec<(&ConceptDefinition, Option<&str>)> =
        cs.concept.iter().rev().map(|c| (c, None)).collect();
    while let Some((def, enclosing)) = stack.pop() {
        if code_to_index.contains_key(&def.code) {
            return Err(GraphBuildError::DuplicateCode(def.code.clone()));
        }

        let mut properties = Vec::new();
        for prop in &def.property {
            match registry.classify(&def.code, prop)? {
                PropertyClass::Simple(entry) => properties.push(entry),
                PropertyClass::Relational { relation, target } => {
                    pending.push(relation_edge(&def.code, relation, target));
                }
            }
        }

        if let Some(parent) = enclosing {
            pending.push(PendingEdge {
                origin: def.code.clone(),
                property: PARENT.to_owned(),
                edge: ConceptEdge {
                    from: def.code.clone(),
                    to: parent.to_owned(),
                    relation: PARENT.to_owned(),
                },
            });
        }

        let concept = Concept {
            code: def.code.clone(),
            display: def.display.clone(),
            definition: def.definition.clone(),
            designations: def
                .designation
                .iter()
                .map(|d| DesignationEntry {
                    language: d.language.clone(),
                    use_coding: d.use_coding.as_ref().map(render::coding),
                    value: d.value.clone(),
                })
                .collect(),
            properties,
        };
        let idx = graph.add_node(concept);
        code_to_index.insert(def.code.clone(), idx);

        stack.extend(def.concept.iter().rev().map(|c| (c, Some(def.code.as_str()))));
    }

    // Pass 2: edges.
    for p in pending {
        let (Some(&from), Some(&to)) = (
            code_to_index.get(&p.edge.from),
            code_to_index.get(&p.edge.to),
        ) else {
            let target = if code_to_index.contains_key(&p.edge.from) {
                p.edge.to
            } else {
                p.edge.from
            };
            return Err(GraphBuildError::DanglingTarget {
                concept: p.origin,
                property: p.property,
                target,
            });
        };
        graph.add_edge(from, to, p.edge);
    }

    tracing::info!(
        side = %side,
        concepts = graph.node_count(),
        edges = graph.edge_count(),
        "built concept graph"
    );

    Ok(ConceptGraph {
        side,
        graph,
        code_to_index,
        registry,
    })
}

/// Builds the pending edge for a relational property on `code`.
///
/// A `child` claim is inverted into a `parent` edge from the named child.
fn relation_edge(code: &str, relation: String, target: String) -> PendingEdge {
    let edge = if relation == CHILD {
        ConceptEdge {
            from: target,
            to: code.to_owned(),
            relation: PARENT.to_owned(),
        }
    } else {
        ConceptEdge {
            from: code.to_owned(),
            to: target,
            relation: relation.clone(),
        }
    };
    PendingEdge {
        origin: code.to_owned(),
        property: relation,
        edge,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
