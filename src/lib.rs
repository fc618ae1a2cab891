//! Keystone Workloads Library
//!
//! Builds the Kubernetes workloads the Keystone operator runs for a
//! `KeystoneAPI` resource: the bootstrap and db-sync jobs and the trust flush
//! cron job. Tests are included in the module files and under `tests/`.
//!
//! ## Quick Start
//!
//! ```rust
//! use keystone_workloads::prelude::*;
//! ```

pub mod config;
pub mod constants;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod render;
pub mod workload;
