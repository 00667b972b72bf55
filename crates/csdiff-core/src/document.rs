/// In-memory representation of a CodeSystem document.
///
/// These types mirror the JSON layout of a CodeSystem resource closely
/// enough that a loader can deserialize straight into them with
/// [`serde_json::from_str`]. The core never performs that I/O itself; it only
/// consumes already-parsed [`CodeSystem`] values.
///
/// Every optional scalar is an `Option` and every repeating element is a
/// `Vec` that defaults to empty, so a minimal document is `{}`.
/// Unknown JSON keys are ignored rather than rejected.
use serde::{Deserialize, Serialize};

use crate::properties::PropertyType;

// ---------------------------------------------------------------------------
// CodeSystem
// ---------------------------------------------------------------------------

/// A versioned controlled vocabulary: document metadata plus a concept list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystem {
    /// Logical resource id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Canonical URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Business version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Computer-friendly name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-friendly title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publication status (`draft`, `active`, `retired`, `unknown`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Whether the document is for testing purposes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<bool>,
    /// Last-changed date, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Name of the publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Natural language description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Additional business identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    /// Contact details for the publisher.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contact: Vec<ContactDetail>,
    /// Contexts the content is intended to support.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_context: Vec<UsageContext>,
    /// Intended jurisdictions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jurisdiction: Vec<CodeableConcept>,
    /// Declared concept properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<PropertyDefinition>,
    /// Top-level concepts; each may nest further concepts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<ConceptDefinition>,
}

/// Declaration of a property that concepts in the document may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    /// Property code referenced by [`ConceptProperty::code`].
    pub code: String,
    /// Formal URI identifying the property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Why the property is defined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared value type.
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

// ---------------------------------------------------------------------------
// Concepts
// ---------------------------------------------------------------------------

/// One concept entry, possibly with nested child concepts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDefinition {
    /// Code identifying the concept within the document.
    pub code: String,
    /// Default display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Formal definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Alternate representations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub designation: Vec<Designation>,
    /// Property values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property: Vec<ConceptProperty>,
    /// Child concepts, each implicitly a `parent` of this one's children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concept: Vec<ConceptDefinition>,
}

/// Alternate text for a concept under a language and use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Designation {
    /// Language tag of the designation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Use context of the designation.
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_coding: Option<Coding>,
    /// The text value.
    pub value: String,
}

/// A property value attached to one concept.
///
/// Exactly one `value*` field is expected to be present. [`ConceptProperty::value`]
/// returns the first populated one in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptProperty {
    /// Property code, matching a [`PropertyDefinition::code`] or an implicit property.
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_coding: Option<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_integer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_decimal: Option<serde_json::Number>,
}

/// The typed value carried by a [`ConceptProperty`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue<'a> {
    Code(&'a str),
    Coding(&'a Coding),
    String(&'a str),
    Integer(i64),
    Boolean(bool),
    DateTime(&'a str),
    Decimal(&'a serde_json::Number),
}

impl ConceptProperty {
    /// Returns the populated value, or `None` when no `value*` field is set.
    pub fn value(&self) -> Option<PropertyValue<'_>> {
        if let Some(code) = &self.value_code {
            return Some(PropertyValue::Code(code));
        }
        if let Some(coding) = &self.value_coding {
            return Some(PropertyValue::Coding(coding));
        }
        if let Some(s) = &self.value_string {
            return Some(PropertyValue::String(s));
        }
        if let Some(i) = self.value_integer {
            return Some(PropertyValue::Integer(i));
        }
        if let Some(b) = self.value_boolean {
            return Some(PropertyValue::Boolean(b));
        }
        if let Some(dt) = &self.value_date_time {
            return Some(PropertyValue::DateTime(dt));
        }
        self.value_decimal.as_ref().map(PropertyValue::Decimal)
    }
}

impl PropertyValue<'_> {
    /// Returns the concept code this value points at, if it can point at one.
    ///
    /// `Code` values are the code itself; `Coding` values yield their `code`
    /// element. Every other value type is a literal.
    pub fn target_code(&self) -> Option<&str> {
        match self {
            PropertyValue::Code(code) => Some(*code),
            PropertyValue::Coding(coding) => coding.code.as_deref(),
            PropertyValue::String(_)
            | PropertyValue::Integer(_)
            | PropertyValue::Boolean(_)
            | PropertyValue::DateTime(_)
            | PropertyValue::Decimal(_) => None,
        }
    }

    /// Renders the value as the string used for literal comparison.
    pub fn render(&self) -> String {
        match self {
            PropertyValue::Code(s) | PropertyValue::String(s) | PropertyValue::DateTime(s) => {
                (*s).to_owned()
            }
            PropertyValue::Coding(coding) => crate::render::coding(coding),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Boolean(b) => b.to_string(),
            PropertyValue::Decimal(n) => n.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared data types
// ---------------------------------------------------------------------------

/// A reference to a code defined by a terminology system.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A set of codings plus free text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A business identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// `usual`, `official`, `temp`, `secondary` or `old`.
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A named contact with telecom details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
}

/// A phone number, email address or similar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// A measured amount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A low/high pair of quantities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Quantity>,
}

/// A reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A context the document is intended for, with one typed value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageContext {
    pub code: Coding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_reference: Option<Reference>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn empty_object_deserializes_to_default() {
        let cs: CodeSystem = serde_json::from_str("{}").expect("parses");
        assert_eq!(cs, CodeSystem::default());
    }

    #[test]
    fn nested_concepts_and_typed_property_values_parse() {
        let cs: CodeSystem = serde_json::from_value(serde_json::json!({
            "id": "cs",
            "property": [{ "code": "rank", "type": "integer" }],
            "concept": [{
                "code": "a",
                "display": "Alpha",
                "property": [{ "code": "rank", "valueInteger": 3 }],
                "designation": [{ "language": "de", "use": { "code": "syn" }, "value": "Alpha-de" }],
                "concept": [{ "code": "b" }]
            }]
        }))
        .expect("parses");

        assert_eq!(cs.property[0].property_type, PropertyType::Integer);
        let a = &cs.concept[0];
        assert_eq!(a.concept[0].code, "b");
        assert_eq!(a.property[0].value(), Some(PropertyValue::Integer(3)));
        assert_eq!(
            a.designation[0]
                .use_coding
                .as_ref()
                .and_then(|c| c.code.as_deref()),
            Some("syn")
        );
    }

    #[test]
    fn property_without_value_yields_none() {
        let prop = ConceptProperty {
            code: "inactive".to_owned(),
            ..ConceptProperty::default()
        };
        assert_eq!(prop.value(), None);
    }

    #[test]
    fn only_code_and_coding_values_have_targets() {
        let coding = Coding {
            code: Some("x".to_owned()),
            ..Coding::default()
        };
        assert_eq!(PropertyValue::Code("y").target_code(), Some("y"));
        assert_eq!(PropertyValue::Coding(&coding).target_code(), Some("x"));
        assert_eq!(PropertyValue::String("y").target_code(), None);
        assert_eq!(PropertyValue::Boolean(true).target_code(), None);
    }

    #[test]
    fn rendered_values_are_literal() {
        assert_eq!(PropertyValue::Boolean(false).render(), "false");
        assert_eq!(PropertyValue::Integer(-4).render(), "-4");
        assert_eq!(PropertyValue::DateTime("2024-01-01").render(), "2024-01-01");
    }
}
