//! # Prelude
//!
//! Re-exports commonly used types for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use keystone_workloads::prelude::*;
//! ```
//!
//! This brings into scope:
//! - CRD types (`KeystoneAPI`, `KeystoneAPISpec`, `TlsSpec`)
//! - The three workload builders and their input types
//! - Config types

// CRD types
pub use crate::crd::*;

// Workload builders
pub use crate::workload::{
    bootstrap_job, build_all, db_sync_job, trust_flush_cron_job, EndpointClass, EndpointMap,
    KeystoneWorkloads, Metadata, WorkloadError,
};

// Config types
pub use crate::config::{BuilderConfig, OutputFormat};
