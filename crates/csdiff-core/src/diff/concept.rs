use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::compare::{ScalarComparison, compare_scalar};
use super::keyed::{KeyedListDiffResult, keyed_list_diff};
use crate::graph::{Concept, DesignationEntry, PropertyEntry};
use crate::properties::{PropertyRegistry, PropertyType};

/// Errors raised while comparing a concept pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConceptDiffError {
    /// A property on either concept is not a simple property of either
    /// document.
    #[error("concept {concept:?}: property {property:?} has no known type")]
    UnknownPropertyType {
        /// Code of the concept being compared.
        concept: String,
        /// The property code.
        property: String,
    },
}

/// Key under which designations are matched: language and use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DesignationKey {
    pub language: Option<String>,
    pub use_coding: Option<String>,
}

impl std::fmt::Display for DesignationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let language = self.language.as_deref().unwrap_or("-");
        match &self.use_coding {
            Some(use_coding) => write!(f, "{language} ({use_coding})"),
            None => f.write_str(language),
        }
    }
}

/// Differences between two versions of one concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptDiff {
    pub code: String,
    pub display: ScalarComparison,
    pub definition: ScalarComparison,
    /// One result per property code on either side.
    pub properties: Vec<KeyedListDiffResult<String, String>>,
    /// Declared type of every property code in `properties`.
    pub property_types: BTreeMap<String, PropertyType>,
    /// One result per designation key on either side.
    pub designations: Vec<KeyedListDiffResult<DesignationKey, String>>,
}

impl ConceptDiff {
    /// Returns `true` if nothing about the concept changed.
    pub fn is_identical(&self) -> bool {
        self.display.is_identical()
            && self.definition.is_identical()
            && self.properties.iter().all(KeyedListDiffResult::is_identical)
            && self.designations.iter().all(KeyedListDiffResult::is_identical)
    }
}

/// Compares two versions of the same concept.
///
/// Property types are looked up in the left registry first, then the right.
///
/// # Errors
///
/// Returns [`ConceptDiffError::UnknownPropertyType`] if a property code is a
/// simple property of neither document.
pub fn diff_concept(
    left: &Concept,
    right: &Concept,
    left_registry: &PropertyRegistry,
    right_registry: &PropertyRegistry,
) -> Result<ConceptDiff, ConceptDiffError> {
    let mut property_types = BTreeMap::new();
    for prop in left.properties.iter().chain(&right.properties) {
        if property_types.contains_key(&prop.code) {
            continue;
        }
        let ty = left_registry
            .simple_type(&prop.code)
            .or_else(|| right_registry.simple_type(&prop.code))
            .ok_or_else(|| ConceptDiffError::UnknownPropertyType {
                concept: left.code.clone(),
                property: prop.code.clone(),
            })?;
        property_types.insert(prop.code.clone(), ty);
    }

    let properties = keyed_list_diff(
        &left.properties,
        &right.properties,
        |p: &PropertyEntry| p.code.clone(),
        |p: &PropertyEntry| p.value.clone(),
    );
    let designations = keyed_list_diff(
        &left.designations,
        &right.designations,
        |d: &DesignationEntry| DesignationKey {
            language: d.language.clone(),
            use_coding: d.use_coding.clone(),
        },
        |d: &DesignationEntry| d.value.clone(),
    );

    Ok(ConceptDiff {
        code: left.code.clone(),
        display: compare_scalar(left.display.as_deref(), right.display.as_deref()),
        definition: compare_scalar(left.definition.as_deref(), right.definition.as_deref()),
        properties,
        property_types,
        designations,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::diff::compare::{ComparisonResult, Explanation};
    use crate::diff::keyed::KeyedListDiffKind;
    use crate::document::CodeSystem;

    fn concept(code: &str) -> Concept {
        Concept {
            code: code.to_owned(),
            display: None,
            definition: None,
            designations: Vec::new(),
            properties: Vec::new(),
        }
    }

    fn prop(code: &str, ty: PropertyType, value: &str) -> PropertyEntry {
        PropertyEntry {
            code: code.to_owned(),
            property_type: ty,
            value: value.to_owned(),
        }
    }

    fn implicit() -> PropertyRegistry {
        PropertyRegistry::from_code_system(&CodeSystem::default())
    }

    #[test]
    fn identical_concepts_are_identical() {
        let mut a = concept("a");
        a.display = Some("Alpha".to_owned());
        a.properties.push(prop("inactive", PropertyType::Boolean, "false"));
        let d = diff_concept(&a, &a.clone(), &implicit(), &implicit()).expect("diffs");
        assert!(d.is_identical());
        assert_eq!(d.property_types.get("inactive"), Some(&PropertyType::Boolean));
    }

    #[test]
    fn display_change_is_reported() {
        let mut l = concept("a");
        l.display = Some("Alpha".to_owned());
        let mut r = concept("a");
        r.display = Some("ALPHA".to_owned());
        let d = diff_concept(&l, &r, &implicit(), &implicit()).expect("diffs");
        assert!(!d.is_identical());
        assert_eq!(d.display.result, ComparisonResult::Different);
        assert_eq!(d.display.explanation, Some(Explanation::ValueDifferent));
        assert_eq!(d.definition.explanation, Some(Explanation::BothAbsent));
    }

    #[test]
    fn added_property_is_key_only_in_right() {
        let l = concept("a");
        let mut r = concept("a");
        r.properties.push(prop("deprecated", PropertyType::DateTime, "2024-01-01"));
        let d = diff_concept(&l, &r, &implicit(), &implicit()).expect("diffs");
        assert_eq!(d.properties.len(), 1);
        assert_eq!(d.properties[0].kind, KeyedListDiffKind::KeyOnlyInRight);
        assert_eq!(d.properties[0].key, "deprecated");
    }

    #[test]
    fn property_type_falls_back_to_right_registry() {
        let right_registry = PropertyRegistry::from_code_system(&CodeSystem {
            property: vec![crate::document::PropertyDefinition {
                code: "rank".to_owned(),
                uri: None,
                description: None,
                property_type: PropertyType::Integer,
            }],
            ..CodeSystem::default()
        });
        let l = concept("a");
        let mut r = concept("a");
        r.properties.push(prop("rank", PropertyType::Integer, "3"));
        let d = diff_concept(&l, &r, &implicit(), &right_registry).expect("diffs");
        assert_eq!(d.property_types.get("rank"), Some(&PropertyType::Integer));
    }

    #[test]
    fn property_unknown_to_both_registries_is_an_error() {
        let mut l = concept("a");
        l.properties.push(prop("colour", PropertyType::String, "red"));
        let err = diff_concept(&l, &concept("a"), &implicit(), &implicit()).expect_err("fails");
        assert_eq!(
            err,
            ConceptDiffError::UnknownPropertyType {
                concept: "a".to_owned(),
                property: "colour".to_owned(),
            }
        );
    }

    #[test]
    fn designations_match_on_language_and_use() {
        let designation = |language: &str, value: &str| DesignationEntry {
            language: Some(language.to_owned()),
            use_coding: None,
            value: value.to_owned(),
        };
        let mut l = concept("a");
        l.designations = vec![designation("de", "Alpha"), designation("fr", "Alpha")];
        let mut r = concept("a");
        r.designations = vec![designation("de", "Alfa"), designation("fr", "Alpha")];

        let d = diff_concept(&l, &r, &implicit(), &implicit()).expect("diffs");
        let kinds: Vec<(String, KeyedListDiffKind)> = d
            .designations
            .iter()
            .map(|r| (r.key.to_string(), r.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("de".to_owned(), KeyedListDiffKind::ValueDifferent),
                ("fr".to_owned(), KeyedListDiffKind::Identical),
            ]
        );
    }
}
