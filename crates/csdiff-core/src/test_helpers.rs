//! Shared test helper functions for constructing test fixtures.
//!
//! This module is compiled only in test builds. Fixture documents are written
//! as `serde_json::json!` literals in the same camelCase layout a loader
//! would read from disk, then deserialized into a [`CodeSystem`].
#![allow(clippy::expect_used)]

use crate::document::CodeSystem;

/// Deserializes a [`CodeSystem`] from a JSON value, panicking on invalid input.
pub fn code_system(value: serde_json::Value) -> CodeSystem {
    serde_json::from_value(value).expect("valid CodeSystem fixture")
}
