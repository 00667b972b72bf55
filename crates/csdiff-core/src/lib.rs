#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod diff;
pub mod document;
pub mod graph;
pub mod interner;
pub mod properties;
pub mod render;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{DEFAULT_MAX_RADIUS, DEFAULT_RADIUS, DiffConfig};
pub use diff::{
    CodeSystemDiff, ComparisonResult, ConceptDiff, ConceptDiffError, DesignationKey, DiffSummary,
    Explanation, KeyedListDiffKind, KeyedListDiffResult, MetadataComparison, MetadataDetail,
    MetadataItem, ScalarComparison, UnknownMetadataItem, compare_scalar, diff_code_systems,
    diff_code_systems_with_config, diff_concept, diff_metadata, keyed_list_diff,
};
pub use document::{
    CodeSystem, CodeableConcept, Coding, ConceptDefinition, ConceptProperty, ContactDetail,
    ContactPoint, Designation, Identifier, PropertyDefinition, PropertyValue, UsageContext,
};
pub use graph::{
    CombinedEdge, CombinedGraph, CombinedVertex, Concept, ConceptEdge, ConceptGraph,
    DesignationEntry, GraphBuildError, GraphSide, Neighborhood, PropertyEntry, Side, Subgraph,
    build_combined_graph, build_concept_graph, extract_neighborhood,
};
pub use interner::{CodeInterner, Symbol};
pub use properties::{PropertyClass, PropertyRegistry, PropertyType};
pub use session::{DiffSession, SessionError};

/// Returns the current version of the csdiff-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "version should have 3 parts: {v}");
        for part in parts {
            part.parse::<u32>().expect("each part should be a number");
        }
    }
}
