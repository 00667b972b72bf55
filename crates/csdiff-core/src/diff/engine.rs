use std::collections::BTreeMap;

use serde::Serialize;

use super::concept::{ConceptDiff, ConceptDiffError, diff_concept};
use super::metadata::{MetadataComparison, diff_metadata};
use crate::config::DiffConfig;
use crate::document::CodeSystem;
use crate::graph::ConceptGraph;

/// Complete comparison of two CodeSystem versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSystemDiff {
    /// One entry per metadata item, in fixed item order.
    pub metadata: Vec<MetadataComparison>,
    /// Concepts defined on both sides, by code.
    pub concepts: BTreeMap<String, ConceptDiff>,
    /// Codes defined only in the left document, in document order.
    pub only_in_left: Vec<String>,
    /// Codes defined only in the right document, in document order.
    pub only_in_right: Vec<String>,
}

/// Counts summarizing a [`CodeSystemDiff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiffSummary {
    /// Metadata items that differ.
    pub metadata_different: usize,
    /// Differing metadata items not flagged as expected to differ.
    pub metadata_unexpected: usize,
    pub concepts_identical: usize,
    pub concepts_different: usize,
    pub only_in_left: usize,
    pub only_in_right: usize,
}

impl CodeSystemDiff {
    /// Returns a summary of the diff.
    pub fn summary(&self) -> DiffSummary {
        let different: Vec<&MetadataComparison> =
            self.metadata.iter().filter(|m| !m.is_identical()).collect();
        let concepts_different = self
            .concepts
            .values()
            .filter(|c| !c.is_identical())
            .count();
        DiffSummary {
            metadata_different: different.len(),
            metadata_unexpected: different.iter().filter(|m| !m.expect_differences).count(),
            concepts_identical: self.concepts.len() - concepts_different,
            concepts_different,
            only_in_left: self.only_in_left.len(),
            only_in_right: self.only_in_right.len(),
        }
    }

    /// Returns `true` if metadata and concepts are identical and no code is
    /// one-sided.
    pub fn is_identical(&self) -> bool {
        self.only_in_left.is_empty()
            && self.only_in_right.is_empty()
            && self.metadata.iter().all(MetadataComparison::is_identical)
            && self.concepts.values().all(ConceptDiff::is_identical)
    }

    /// Concepts on both sides that changed.
    pub fn changed_concepts(&self) -> impl Iterator<Item = &ConceptDiff> {
        self.concepts.values().filter(|c| !c.is_identical())
    }
}

/// Compares two documents and their concept graphs with the default
/// [`DiffConfig`].
///
/// # Errors
///
/// See [`diff_code_systems_with_config`].
pub fn diff_code_systems(
    left_doc: &CodeSystem,
    right_doc: &CodeSystem,
    left: &ConceptGraph,
    right: &ConceptGraph,
) -> Result<CodeSystemDiff, ConceptDiffError> {
    diff_code_systems_with_config(left_doc, right_doc, left, right, &DiffConfig::default())
}

/// Compares two documents and their concept graphs.
///
/// `left` and `right` must be the graphs built from `left_doc` and
/// `right_doc`. Every code ends up in exactly one of
/// [`CodeSystemDiff::concepts`], [`CodeSystemDiff::only_in_left`] and
/// [`CodeSystemDiff::only_in_right`].
///
/// # Errors
///
/// Returns [`ConceptDiffError`] if a matched concept pair cannot be compared.
pub fn diff_code_systems_with_config(
    left_doc: &CodeSystem,
    right_doc: &CodeSystem,
    left: &ConceptGraph,
    right: &ConceptGraph,
    config: &DiffConfig,
) -> Result<CodeSystemDiff, ConceptDiffError> {
    let mut concepts = BTreeMap::new();
    let mut only_in_left = Vec::new();

    for left_concept in left.concepts() {
        let Some(right_concept) = right.concept(&left_concept.code) else {
            only_in_left.push(left_concept.code.clone());
            continue;
        };
        let diff = diff_concept(
            left_concept,
            right_concept,
            left.registry(),
            right.registry(),
        )?;
        concepts.insert(left_concept.code.clone(), diff);
    }

    let only_in_right: Vec<String> = right
        .concepts()
        .filter(|c| !concepts.contains_key(&c.code))
        .map(|c| c.code.clone())
        .collect();

    let result = CodeSystemDiff {
        metadata: diff_metadata(left_doc, right_doc, &config.expected_differences),
        concepts,
        only_in_left,
        only_in_right,
    };

    let summary = result.summary();
    tracing::info!(
        metadata_different = summary.metadata_different,
        concepts_identical = summary.concepts_identical,
        concepts_different = summary.concepts_different,
        only_in_left = summary.only_in_left,
        only_in_right = summary.only_in_right,
        "diffed code systems"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::collections::BTreeSet;

    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::diff::compare::{ComparisonResult, Explanation};
    use crate::diff::keyed::KeyedListDiffKind;
    use crate::diff::metadata::MetadataItem;
    use crate::graph::{Side, build_concept_graph};
    use crate::test_helpers::code_system;

    fn run(left: serde_json::Value, right: serde_json::Value) -> CodeSystemDiff {
        let l = code_system(left);
        let r = code_system(right);
        let lg = build_concept_graph(&l, Side::Left).expect("left builds");
        let rg = build_concept_graph(&r, Side::Right).expect("right builds");
        diff_code_systems(&l, &r, &lg, &rg).expect("diffs")
    }

    #[test]
    fn empty_documents_compare_as_identical() {
        let d = run(json!({}), json!({}));
        assert!(d.is_identical());
        assert!(d.concepts.is_empty());
        assert_eq!(d.metadata.len(), MetadataItem::ALL.len());
        assert_eq!(d.summary(), DiffSummary::default());
    }

    #[test]
    fn identical_concept_lists_only_report_metadata() {
        let doc = json!({
            "version": "1",
            "concept": [
                { "code": "a", "display": "Alpha" },
                { "code": "b", "display": "Beta" }
            ]
        });
        let mut newer = doc.clone();
        newer["version"] = json!("2");
        let d = run(doc, newer);

        assert!(d.only_in_left.is_empty());
        assert!(d.only_in_right.is_empty());
        assert!(d.concepts.values().all(ConceptDiff::is_identical));
        let different: Vec<MetadataItem> = d
            .metadata
            .iter()
            .filter(|m| !m.is_identical())
            .map(|m| m.item)
            .collect();
        assert_eq!(different, vec![MetadataItem::Version]);
        assert_eq!(d.summary().metadata_unexpected, 0);
    }

    #[test]
    fn codes_partition_into_three_buckets() {
        let d = run(
            json!({ "concept": [{ "code": "a" }, { "code": "b" }, { "code": "c" }] }),
            json!({ "concept": [{ "code": "d" }, { "code": "b" }, { "code": "e" }] }),
        );
        assert_eq!(d.only_in_left, vec!["a".to_owned(), "c".to_owned()]);
        assert_eq!(d.only_in_right, vec!["d".to_owned(), "e".to_owned()]);
        assert_eq!(d.concepts.keys().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn display_change_is_the_only_concept_difference() {
        let d = run(
            json!({ "concept": [{ "code": "x", "display": "Old" }] }),
            json!({ "concept": [{ "code": "x", "display": "New" }] }),
        );
        let x = d.concepts.get("x").expect("x compared");
        assert_eq!(x.display.result, ComparisonResult::Different);
        assert_eq!(x.display.explanation, Some(Explanation::ValueDifferent));
        assert!(x.definition.is_identical());
        assert!(x.properties.is_empty());
        assert!(x.designations.is_empty());
        assert_eq!(d.changed_concepts().count(), 1);
    }

    #[test]
    fn added_property_is_key_only_in_right() {
        let d = run(
            json!({ "concept": [{ "code": "x" }] }),
            json!({ "concept": [{ "code": "x", "property": [{ "code": "inactive", "valueBoolean": true }] }] }),
        );
        let x = d.concepts.get("x").expect("x compared");
        assert_eq!(x.properties.len(), 1);
        assert_eq!(x.properties[0].kind, KeyedListDiffKind::KeyOnlyInRight);
        assert_eq!(x.properties[0].right, Some(vec!["true".to_owned()]));
        assert_eq!(d.summary().concepts_different, 1);
    }

    #[test]
    fn expected_differences_follow_config() {
        let l = code_system(json!({ "title": "A" }));
        let r = code_system(json!({ "title": "B" }));
        let lg = build_concept_graph(&l, Side::Left).expect("builds");
        let rg = build_concept_graph(&r, Side::Right).expect("builds");
        let config = DiffConfig {
            expected_differences: BTreeSet::from([MetadataItem::Title]),
            ..DiffConfig::default()
        };
        let d = diff_code_systems_with_config(&l, &r, &lg, &rg, &config).expect("diffs");
        let title = d
            .metadata
            .iter()
            .find(|m| m.item == MetadataItem::Title)
            .expect("title compared");
        assert!(title.expect_differences);
        assert_eq!(title.result, ComparisonResult::Different);
        assert_eq!(d.summary().metadata_unexpected, 0);
    }

    fn code_lists() -> impl Strategy<Value = (BTreeSet<u8>, BTreeSet<u8>)> {
        (
            prop::collection::btree_set(0u8..40, 0..20),
            prop::collection::btree_set(0u8..40, 0..20),
        )
    }

    fn flat_doc(codes: &BTreeSet<u8>) -> serde_json::Value {
        let concepts: Vec<serde_json::Value> = codes
            .iter()
            .map(|c| json!({ "code": format!("c{c}") }))
            .collect();
        json!({ "concept": concepts })
    }

    proptest! {
        #[test]
        fn every_code_lands_in_exactly_one_bucket((left, right) in code_lists()) {
            let d = run(flat_doc(&left), flat_doc(&right));

            let mut seen: Vec<&String> = d
                .concepts
                .keys()
                .chain(&d.only_in_left)
                .chain(&d.only_in_right)
                .collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), total);

            let union: BTreeSet<&u8> = left.union(&right).collect();
            prop_assert_eq!(total, union.len());
            prop_assert_eq!(d.concepts.len(), left.intersection(&right).count());
        }
    }
}
