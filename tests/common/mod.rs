//! Common test utilities for trialgraph integration tests
//!
//! Provides a canned in-memory `StudySource` and builders for raw
//! registry records.

pub mod fixtures;

pub use fixtures::{study, CannedSource};
