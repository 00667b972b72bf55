/// A loaded pair of CodeSystem versions with everything derived from them.
///
/// [`DiffSession::new`] runs the whole pipeline once:
///
/// 1. build a [`ConceptGraph`] per document,
/// 2. diff the pair into a [`CodeSystemDiff`],
/// 3. union the graphs into a [`CombinedGraph`],
/// 4. intern every relation and property code.
///
/// The results are cached for the lifetime of the session. Loading a new
/// pair means building a new session. Neighborhoods are computed on demand
/// per request.
use thiserror::Error;

use crate::config::DiffConfig;
use crate::diff::{CodeSystemDiff, ConceptDiffError, diff_code_systems_with_config};
use crate::document::CodeSystem;
use crate::graph::{
    CombinedGraph, ConceptGraph, GraphBuildError, Neighborhood, Side, build_combined_graph,
    build_concept_graph,
};
use crate::interner::{CodeInterner, Symbol};

/// Errors that prevent a session from being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// One document could not be turned into a concept graph.
    #[error("{side} document: {source}")]
    Graph {
        side: Side,
        #[source]
        source: GraphBuildError,
    },
    /// A matched concept pair could not be compared.
    #[error(transparent)]
    Diff(#[from] ConceptDiffError),
}

/// Cached results for one left/right document pair.
#[derive(Debug, Clone)]
pub struct DiffSession {
    config: DiffConfig,
    left: ConceptGraph,
    right: ConceptGraph,
    diff: CodeSystemDiff,
    combined: CombinedGraph,
    interner: CodeInterner,
}

impl DiffSession {
    /// Builds graphs, diff and combined graph for a document pair.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Graph`] if either document is malformed; the left
    ///   document is checked first.
    /// - [`SessionError::Diff`] if a concept pair cannot be compared.
    pub fn new(
        left_doc: &CodeSystem,
        right_doc: &CodeSystem,
        config: DiffConfig,
    ) -> Result<Self, SessionError> {
        let left = build_concept_graph(left_doc, Side::Left).map_err(|source| {
            SessionError::Graph {
                side: Side::Left,
                source,
            }
        })?;
        let right = build_concept_graph(right_doc, Side::Right).map_err(|source| {
            SessionError::Graph {
                side: Side::Right,
                source,
            }
        })?;
        let diff = diff_code_systems_with_config(left_doc, right_doc, &left, &right, &config)?;
        let combined = build_combined_graph(&left, &right);

        let mut interner = CodeInterner::new();
        for edge in combined.edges() {
            interner.intern(&edge.relation);
        }
        for graph in [&left, &right] {
            for (code, _) in graph.registry().simple_properties() {
                interner.intern(code);
            }
        }

        Ok(Self {
            config,
            left,
            right,
            diff,
            combined,
            interner,
        })
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// The concept graph of one side.
    pub fn graph(&self, side: Side) -> &ConceptGraph {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn diff(&self) -> &CodeSystemDiff {
        &self.diff
    }

    pub fn combined(&self) -> &CombinedGraph {
        &self.combined
    }

    pub fn interner(&self) -> &CodeInterner {
        &self.interner
    }

    /// Interned id of a relation or property code seen in this session.
    pub fn symbol(&self, code: &str) -> Option<Symbol> {
        self.interner.get(code)
    }

    /// Extracts the neighborhood of `focus`.
    ///
    /// `radius` falls back to the configured default and is clamped to the
    /// configured maximum.
    pub fn neighborhood(&self, focus: &str, radius: Option<u32>) -> Neighborhood {
        self.combined
            .subgraph(focus, self.config.effective_radius(radius))
    }
}
