//! Common test utilities for consolidation tests
//!
//! Fixture builders for small tag/document graphs, a store wrapper that
//! injects failures, and invariant checks shared across test files.
#![allow(dead_code)]

pub mod flaky;
pub mod graph_builder;

pub use flaky::FlakyStore;
pub use graph_builder::{assert_mirrored, associations_touching, GraphBuilder};
