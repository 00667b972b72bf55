//! CodeSystem version-pair generator and benchmark utilities for csdiff.
//!
//! This crate provides deterministic generation of realistic CodeSystem
//! version pairs for benchmarking and invariant testing of `csdiff-core`.

pub mod correctness;
pub mod generator;

pub use generator::{GeneratorConfig, SizeTier, generate_pair};
