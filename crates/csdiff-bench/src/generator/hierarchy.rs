//! Left-version construction: a forest of concepts with properties,
//! designations and `related` cross-links.

use csdiff_core::{
    CodeSystem, Coding, ConceptDefinition, ConceptProperty, Designation, PropertyDefinition,
    PropertyType,
};
use rand::Rng;
use rand::rngs::StdRng;

use super::GeneratorConfig;

/// String property carrying a colour-like hex value.
pub const HEX_PROPERTY: &str = "hex";
/// Integer property carrying the generation index.
pub const RANK_PROPERTY: &str = "rank";
/// Code property linking a concept to an earlier one.
pub const RELATED_PROPERTY: &str = "related";

const SNOMED: &str = "http://snomed.info/sct";

/// Code of the `i`-th generated concept.
pub fn concept_code(i: usize) -> String {
    format!("c{i:06}")
}

/// Builds the left version.
///
/// Concept `i` past the first `branching_factor` roots is nested under
/// concept `(i - roots) / branching_factor`, so every parent precedes its
/// children and the depth grows logarithmically. `related` links always point
/// at an earlier concept.
pub fn build_code_system(config: &GeneratorConfig, rng: &mut StdRng) -> CodeSystem {
    let n = config.num_concepts;
    let fanout = config.branching_factor.max(1);
    let roots = fanout.min(n);

    let mut slots: Vec<Option<ConceptDefinition>> =
        (0..n).map(|i| Some(build_concept(i, config, rng))).collect();

    // Children are attached in reverse so every node is complete before it
    // moves into its parent.
    for i in (roots..n).rev() {
        let parent = (i - roots) / fanout;
        if let Some(mut child) = slots[i].take() {
            child.concept.reverse();
            if let Some(p) = slots[parent].as_mut() {
                p.concept.push(child);
            }
        }
    }
    let concept = slots
        .into_iter()
        .take(roots)
        .flatten()
        .map(|mut root| {
            root.concept.reverse();
            root
        })
        .collect();

    CodeSystem {
        id: Some("generated-1".to_owned()),
        url: Some("http://example.org/fhir/CodeSystem/generated".to_owned()),
        version: Some("1.0.0".to_owned()),
        name: Some("Generated".to_owned()),
        title: Some("Generated benchmark terminology".to_owned()),
        status: Some("active".to_owned()),
        experimental: Some(true),
        date: Some("2026-01-01".to_owned()),
        publisher: Some("csdiff-bench".to_owned()),
        property: vec![
            property(HEX_PROPERTY, PropertyType::String),
            property(RANK_PROPERTY, PropertyType::Integer),
            property(RELATED_PROPERTY, PropertyType::Code),
        ],
        concept,
        ..CodeSystem::default()
    }
}

fn property(code: &str, property_type: PropertyType) -> PropertyDefinition {
    PropertyDefinition {
        code: code.to_owned(),
        uri: None,
        description: None,
        property_type,
    }
}

fn build_concept(i: usize, config: &GeneratorConfig, rng: &mut StdRng) -> ConceptDefinition {
    let mut property = vec![
        ConceptProperty {
            code: HEX_PROPERTY.to_owned(),
            value_string: Some(format!("#{:06x}", rng.gen_range(0..0x0100_0000_u32))),
            ..ConceptProperty::default()
        },
        ConceptProperty {
            code: RANK_PROPERTY.to_owned(),
            value_integer: i64::try_from(i).ok(),
            ..ConceptProperty::default()
        },
    ];
    if i > 0 && rng.gen_bool(config.relation_density.clamp(0.0, 1.0)) {
        property.push(ConceptProperty {
            code: RELATED_PROPERTY.to_owned(),
            value_code: Some(concept_code(rng.gen_range(0..i))),
            ..ConceptProperty::default()
        });
    }

    let mut designation = Vec::new();
    if rng.gen_bool(config.designation_density.clamp(0.0, 1.0)) {
        designation.push(Designation {
            language: Some("en".to_owned()),
            use_coding: Some(Coding {
                system: Some(SNOMED.to_owned()),
                code: Some("900000000000013009".to_owned()),
                display: Some("Synonym".to_owned()),
                ..Coding::default()
            }),
            value: format!("Synonym of concept {i}"),
        });
    }

    ConceptDefinition {
        code: concept_code(i),
        display: Some(format!("Concept {i}")),
        definition: (i % 3 == 0).then(|| format!("Definition of concept {i}")),
        designation,
        property,
        concept: Vec::new(),
    }
}
