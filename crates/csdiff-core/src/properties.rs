/// Property catalogues and the relational/simple classification.
///
/// Every CodeSystem declares the properties its concepts may carry. On top of
/// the declared ones, a few properties are always understood:
///
/// - simple: `inactive` (boolean), `deprecated` (dateTime),
///   `notSelectable` (boolean);
/// - relational: `parent` and `child`.
///
/// [`PropertyRegistry`] merges the declared and implicit catalogues once per
/// document. [`PropertyRegistry::classify`] then turns each concept property
/// into a closed [`PropertyClass`] so graph construction never has to
/// branch on property-code strings again.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::document::{CodeSystem, ConceptProperty};
use crate::graph::{GraphBuildError, PropertyEntry};

/// Relation code for hierarchy edges (`child -> parent`).
pub const PARENT: &str = "parent";
/// Relation code that is normalized into an inverted [`PARENT`] edge.
pub const CHILD: &str = "child";

/// Simple properties every document understands without declaring them.
pub const IMPLICIT_SIMPLE: [(&str, PropertyType); 3] = [
    ("inactive", PropertyType::Boolean),
    ("deprecated", PropertyType::DateTime),
    ("notSelectable", PropertyType::Boolean),
];

/// Relational properties every document understands without declaring them.
pub const IMPLICIT_RELATIONAL: [&str; 2] = [PARENT, CHILD];

/// Declared type of a concept property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "code")]
    Code,
    #[serde(rename = "Coding")]
    Coding,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "dateTime")]
    DateTime,
    #[serde(rename = "decimal")]
    Decimal,
}

impl PropertyType {
    /// Returns the wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Code => "code",
            PropertyType::Coding => "Coding",
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Boolean => "boolean",
            PropertyType::DateTime => "dateTime",
            PropertyType::Decimal => "decimal",
        }
    }

    /// Whether a declared property of this type links concepts together.
    pub fn is_relational(self) -> bool {
        matches!(self, PropertyType::Code)
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one concept property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyClass {
    /// The property links its concept to `target`.
    ///
    /// `relation` is the property code as written; hierarchy normalization
    /// happens in the graph builder.
    Relational {
        /// Property code.
        relation: String,
        /// Code of the referenced concept.
        target: String,
    },
    /// A literal annotation kept on the concept.
    Simple(PropertyEntry),
}

/// Simple and relational property catalogues for one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyRegistry {
    simple: BTreeMap<String, PropertyType>,
    relational: BTreeSet<String>,
}

impl PropertyRegistry {
    /// Builds the registry from a document's declared properties plus the
    /// implicit ones.
    ///
    /// `parent` and `child` stay relational even if a document declares them
    /// with a literal type. A declared simple property may override the type
    /// of an implicit simple one.
    pub fn from_code_system(cs: &CodeSystem) -> Self {
        let mut registry = Self::default();
        for (code, ty) in IMPLICIT_SIMPLE {
            registry.simple.insert(code.to_owned(), ty);
        }
        for code in IMPLICIT_RELATIONAL {
            registry.relational.insert(code.to_owned());
        }
        for decl in &cs.property {
            if registry.relational.contains(&decl.code) {
                continue;
            }
            if decl.property_type.is_relational() {
                registry.simple.remove(&decl.code);
                registry.relational.insert(decl.code.clone());
            } else {
                registry.simple.insert(decl.code.clone(), decl.property_type);
            }
        }
        registry
    }

    /// Returns `true` if `code` names a relational property.
    pub fn is_relational(&self, code: &str) -> bool {
        self.relational.contains(code)
    }

    /// Returns the declared type of a simple property, if `code` is one.
    pub fn simple_type(&self, code: &str) -> Option<PropertyType> {
        self.simple.get(code).copied()
    }

    /// Returns `true` if `code` is known to either catalogue.
    pub fn knows(&self, code: &str) -> bool {
        self.is_relational(code) || self.simple.contains_key(code)
    }

    /// Simple property codes with their types, in code order.
    pub fn simple_properties(&self) -> impl Iterator<Item = (&str, PropertyType)> {
        self.simple.iter().map(|(code, ty)| (code.as_str(), *ty))
    }

    /// Relational property codes, in code order.
    pub fn relational_properties(&self) -> impl Iterator<Item = &str> {
        self.relational.iter().map(String::as_str)
    }

    /// Classifies a property carried by the concept `concept_code`.
    ///
    /// # Errors
    ///
    /// - [`GraphBuildError::UnresolvableTarget`] if a relational property
    ///   carries no code-bearing value.
    /// - [`GraphBuildError::MissingValue`] if a simple property carries no
    ///   value at all.
    /// - [`GraphBuildError::UnknownProperty`] if the code is in neither
    ///   catalogue.
    pub fn classify(
        &self,
        concept_code: &str,
        property: &ConceptProperty,
    ) -> Result<PropertyClass, GraphBuildError> {
        if self.is_relational(&property.code) {
            let target = property
                .value()
                .and_then(|v| v.target_code().map(str::to_owned))
                .ok_or_else(|| GraphBuildError::UnresolvableTarget {
                    concept: concept_code.to_owned(),
                    property: property.code.clone(),
                })?;
            return Ok(PropertyClass::Relational {
                relation: property.code.clone(),
                target,
            });
        }

        let Some(property_type) = self.simple_type(&property.code) else {
            return Err(GraphBuildError::UnknownProperty {
                concept: concept_code.to_owned(),
                property: property.code.clone(),
            });
        };
        let value = property
            .value()
            .ok_or_else(|| GraphBuildError::MissingValue {
                concept: concept_code.to_owned(),
                property: property.code.clone(),
            })?;
        Ok(PropertyClass::Simple(PropertyEntry {
            code: property.code.clone(),
            property_type,
            value: value.render(),
        }))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::document::{Coding, PropertyDefinition};

    fn decl(code: &str, ty: PropertyType) -> PropertyDefinition {
        PropertyDefinition {
            code: code.to_owned(),
            uri: None,
            description: None,
            property_type: ty,
        }
    }

    fn registry(decls: Vec<PropertyDefinition>) -> PropertyRegistry {
        PropertyRegistry::from_code_system(&CodeSystem {
            property: decls,
            ..CodeSystem::default()
        })
    }

    #[test]
    fn implicit_properties_are_always_present() {
        let r = registry(vec![]);
        assert!(r.is_relational(PARENT));
        assert!(r.is_relational(CHILD));
        assert_eq!(r.simple_type("inactive"), Some(PropertyType::Boolean));
        assert_eq!(r.simple_type("deprecated"), Some(PropertyType::DateTime));
        assert_eq!(r.simple_type("notSelectable"), Some(PropertyType::Boolean));
        assert!(!r.knows("status"));
    }

    #[test]
    fn declared_code_properties_are_relational() {
        let r = registry(vec![
            decl("partOf", PropertyType::Code),
            decl("status", PropertyType::String),
            decl("mapsTo", PropertyType::Coding),
        ]);
        assert!(r.is_relational("partOf"));
        assert_eq!(r.simple_type("status"), Some(PropertyType::String));
        assert_eq!(r.simple_type("mapsTo"), Some(PropertyType::Coding));
        assert!(!r.is_relational("mapsTo"));
    }

    #[test]
    fn parent_stays_relational_when_declared_as_string() {
        let r = registry(vec![decl(PARENT, PropertyType::String)]);
        assert!(r.is_relational(PARENT));
        assert_eq!(r.simple_type(PARENT), None);
    }

    #[test]
    fn classify_relational_code_value() {
        let r = registry(vec![]);
        let prop = ConceptProperty {
            code: PARENT.to_owned(),
            value_code: Some("root".to_owned()),
            ..ConceptProperty::default()
        };
        assert_eq!(
            r.classify("leaf", &prop).expect("classifies"),
            PropertyClass::Relational {
                relation: PARENT.to_owned(),
                target: "root".to_owned(),
            }
        );
    }

    #[test]
    fn classify_relational_coding_value_uses_its_code() {
        let r = registry(vec![]);
        let prop = ConceptProperty {
            code: CHILD.to_owned(),
            value_coding: Some(Coding {
                code: Some("leaf".to_owned()),
                ..Coding::default()
            }),
            ..ConceptProperty::default()
        };
        let class = r.classify("root", &prop).expect("classifies");
        assert!(matches!(class, PropertyClass::Relational { target, .. } if target == "leaf"));
    }

    #[test]
    fn relational_with_literal_value_is_unresolvable() {
        let r = registry(vec![]);
        let prop = ConceptProperty {
            code: PARENT.to_owned(),
            value_string: Some("root".to_owned()),
            ..ConceptProperty::default()
        };
        let err = r.classify("leaf", &prop).expect_err("must fail");
        assert_eq!(
            err,
            GraphBuildError::UnresolvableTarget {
                concept: "leaf".to_owned(),
                property: PARENT.to_owned(),
            }
        );
    }

    #[test]
    fn undeclared_property_is_unknown() {
        let r = registry(vec![]);
        let prop = ConceptProperty {
            code: "colour".to_owned(),
            value_string: Some("red".to_owned()),
            ..ConceptProperty::default()
        };
        let err = r.classify("a", &prop).expect_err("must fail");
        assert!(matches!(err, GraphBuildError::UnknownProperty { .. }));
    }

    #[test]
    fn simple_property_keeps_catalogue_type_and_rendered_value() {
        let r = registry(vec![]);
        let prop = ConceptProperty {
            code: "inactive".to_owned(),
            value_boolean: Some(true),
            ..ConceptProperty::default()
        };
        let class = r.classify("a", &prop).expect("classifies");
        assert_eq!(
            class,
            PropertyClass::Simple(PropertyEntry {
                code: "inactive".to_owned(),
                property_type: PropertyType::Boolean,
                value: "true".to_owned(),
            })
        );
    }

    #[test]
    fn simple_property_without_value_is_rejected() {
        let r = registry(vec![]);
        let prop = ConceptProperty {
            code: "deprecated".to_owned(),
            ..ConceptProperty::default()
        };
        let err = r.classify("a", &prop).expect_err("must fail");
        assert!(matches!(err, GraphBuildError::MissingValue { .. }));
    }
}
