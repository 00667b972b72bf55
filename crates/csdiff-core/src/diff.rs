/// Structural diff of two CodeSystem versions.
///
/// The left document is the baseline ("before"); the right document is the
/// target ("after").
///
/// # Layers
///
/// - [`keyed`]: the generic keyed-list comparison every list-valued field
///   goes through.
/// - [`compare`]: the absent/present/equal policy for single values.
/// - [`metadata`]: the fixed, ordered list of document-level items.
/// - [`concept`]: one matched concept pair (display, definition, properties,
///   designations).
/// - [`engine`]: the whole document, partitioning codes into matched,
///   left-only and right-only buckets.
///
/// All comparisons are literal: values are compared as rendered strings with
/// no normalization.
pub mod compare;
pub mod concept;
pub mod engine;
pub mod keyed;
pub mod metadata;

pub use compare::{ComparisonResult, Explanation, ScalarComparison, compare_scalar};
pub use concept::{ConceptDiff, ConceptDiffError, DesignationKey, diff_concept};
pub use engine::{CodeSystemDiff, DiffSummary, diff_code_systems, diff_code_systems_with_config};
pub use keyed::{KeyedListDiffKind, KeyedListDiffResult, keyed_list_diff};
pub use metadata::{
    MetadataComparison, MetadataDetail, MetadataItem, UnknownMetadataItem, diff_metadata,
};
