//! tracemeta Test Harness - Fixtures and end-to-end validation
//!
//! This crate provides:
//! - Test logging setup
//! - Metadata hierarchy fixtures over the memory engine
//! - End-to-end integration scenarios

pub mod logging;
pub mod fixtures;
pub mod integration;

pub use logging::*;
pub use fixtures::*;
pub use integration::*;
