//! # Configuration
//!
//! Process configuration for the workload builder binaries.

mod builder;

pub use builder::{BuilderConfig, OutputFormat};
