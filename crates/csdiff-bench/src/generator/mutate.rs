//! Right-version derivation: edits, removals and additions applied to a
//! copy of the left version.

use std::collections::HashSet;

use csdiff_core::{CodeSystem, ConceptDefinition, ConceptProperty};
use rand::Rng;
use rand::rngs::StdRng;

use super::GeneratorConfig;
use super::hierarchy::{HEX_PROPERTY, RELATED_PROPERTY};

struct Mutation<'a> {
    change: f64,
    removal: f64,
    addition: f64,
    rng: &'a mut StdRng,
    /// Targets of `related` links; never removed so the right version
    /// stays loadable.
    referenced: HashSet<String>,
    added: usize,
}

/// Derives the right version from `left`.
///
/// Only leaf concepts that no `related` link points at are removed. New
/// concepts are appended as leaves with codes `n000000`, `n000001`, ...
pub fn next_version(left: &CodeSystem, config: &GeneratorConfig, rng: &mut StdRng) -> CodeSystem {
    let mut right = left.clone();
    right.id = Some("generated-2".to_owned());
    right.version = Some("2.0.0".to_owned());
    right.date = Some("2026-06-01".to_owned());

    let mut referenced = HashSet::new();
    collect_related_targets(&left.concept, &mut referenced);

    let mut mutation = Mutation {
        change: config.change_rate.clamp(0.0, 1.0),
        removal: config.removal_rate.clamp(0.0, 1.0),
        addition: config.addition_rate.clamp(0.0, 1.0),
        rng,
        referenced,
        added: 0,
    };
    mutate_concepts(&mut right.concept, &mut mutation);
    right
}

fn collect_related_targets(concepts: &[ConceptDefinition], out: &mut HashSet<String>) {
    for concept in concepts {
        for property in &concept.property {
            if property.code == RELATED_PROPERTY {
                if let Some(target) = &property.value_code {
                    out.insert(target.clone());
                }
            }
        }
        collect_related_targets(&concept.concept, out);
    }
}

fn mutate_concepts(concepts: &mut Vec<ConceptDefinition>, m: &mut Mutation<'_>) {
    concepts.retain(|c| {
        let removable = c.concept.is_empty() && !m.referenced.contains(&c.code);
        !(removable && m.rng.gen_bool(m.removal))
    });

    for concept in concepts.iter_mut() {
        if m.rng.gen_bool(m.change) {
            edit(concept, m.rng);
        }
        mutate_concepts(&mut concept.concept, m);
        if m.rng.gen_bool(m.addition) {
            concept.concept.push(ConceptDefinition {
                code: format!("n{:06}", m.added),
                display: Some(format!("Added concept {}", m.added)),
                property: vec![ConceptProperty {
                    code: HEX_PROPERTY.to_owned(),
                    value_string: Some("#000000".to_owned()),
                    ..ConceptProperty::default()
                }],
                ..ConceptDefinition::default()
            });
            m.added += 1;
        }
    }
}

fn edit(concept: &mut ConceptDefinition, rng: &mut StdRng) {
    let hex = concept
        .property
        .iter_mut()
        .find(|p| p.code == HEX_PROPERTY);
    match hex {
        Some(hex) if rng.gen_bool(0.5) => {
            hex.value_string = Some(format!("#{:06x}", rng.gen_range(0..0x0100_0000_u32)));
        }
        Some(_) | None => {
            let display = concept.display.take().unwrap_or_default();
            concept.display = Some(format!("{display} (revised)"));
        }
    }
}
