use std::collections::BTreeSet;

use crate::diff::MetadataItem;

/// Radius used when a neighborhood request does not specify one.
pub const DEFAULT_RADIUS: u32 = 2;

/// Largest radius a neighborhood request is allowed.
pub const DEFAULT_MAX_RADIUS: u32 = 16;

/// Configuration for a diff session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    /// Metadata items flagged as expected to differ between versions.
    ///
    /// Default: `{Id, Version}`.
    pub expected_differences: BTreeSet<MetadataItem>,

    /// Radius for neighborhood requests that do not carry one.
    ///
    /// Default: [`DEFAULT_RADIUS`].
    pub default_radius: u32,

    /// Upper bound applied to every neighborhood radius.
    ///
    /// Default: [`DEFAULT_MAX_RADIUS`].
    pub max_radius: u32,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            expected_differences: MetadataItem::default_expected_differences(),
            default_radius: DEFAULT_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
        }
    }
}

impl DiffConfig {
    /// Resolves a requested radius: the default when absent, then clamped to
    /// `1..=max_radius`.
    pub fn effective_radius(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_radius)
            .clamp(1, self.max_radius.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_expects_id_and_version_to_differ() {
        let config = DiffConfig::default();
        assert!(config.expected_differences.contains(&MetadataItem::Id));
        assert!(config.expected_differences.contains(&MetadataItem::Version));
        assert_eq!(config.expected_differences.len(), 2);
    }

    #[test]
    fn effective_radius_defaults_and_clamps() {
        let config = DiffConfig::default();
        assert_eq!(config.effective_radius(None), DEFAULT_RADIUS);
        assert_eq!(config.effective_radius(Some(0)), 1);
        assert_eq!(config.effective_radius(Some(5)), 5);
        assert_eq!(config.effective_radius(Some(1000)), DEFAULT_MAX_RADIUS);
    }

    #[test]
    fn zero_max_radius_still_allows_radius_one() {
        let config = DiffConfig {
            max_radius: 0,
            ..DiffConfig::default()
        };
        assert_eq!(config.effective_radius(Some(3)), 1);
    }
}
