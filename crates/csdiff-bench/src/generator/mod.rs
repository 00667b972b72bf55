//! CodeSystem version-pair generator.
//!
//! Produces a left [`CodeSystem`] with a nested concept hierarchy, a few
//! declared properties and cross-links, then derives a right version from it
//! by editing, removing and adding concepts.

pub mod hierarchy;
pub mod mutate;

use csdiff_core::CodeSystem;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Configuration for the version-pair generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of concepts in the left version.
    pub num_concepts: usize,
    /// Children per concept in the hierarchy; also the number of roots.
    pub branching_factor: usize,
    /// Probability that a concept carries a `related` link to an earlier one.
    pub relation_density: f64,
    /// Probability that a concept carries a designation.
    pub designation_density: f64,
    /// Probability that a concept's display or property value changes.
    pub change_rate: f64,
    /// Probability that an unreferenced leaf concept is dropped.
    pub removal_rate: f64,
    /// Probability that a concept gains a new child.
    pub addition_rate: f64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// ~200 concepts
    Small,
    /// ~2,000 concepts
    Medium,
    /// ~10,000 concepts
    Large,
    /// ~50,000 concepts
    XLarge,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        let (num_concepts, branching_factor) = match self {
            SizeTier::Small => (200, 4),
            SizeTier::Medium => (2_000, 6),
            SizeTier::Large => (10_000, 8),
            SizeTier::XLarge => (50_000, 10),
        };
        GeneratorConfig {
            seed,
            num_concepts,
            branching_factor,
            relation_density: 0.2,
            designation_density: 0.5,
            change_rate: 0.05,
            removal_rate: 0.02,
            addition_rate: 0.02,
        }
    }
}

/// Generates a left/right version pair from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`.
pub fn generate_pair(config: &GeneratorConfig) -> (CodeSystem, CodeSystem) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let left = hierarchy::build_code_system(config, &mut rng);
    let right = mutate::next_version(&left, config, &mut rng);
    (left, right)
}
