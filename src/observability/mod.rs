//! # Observability
//!
//! - `logging`: tracing subscriber setup

pub mod logging;
