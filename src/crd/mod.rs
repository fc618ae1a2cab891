//! # Custom Resource Definitions
//!
//! CRD types read by the workload builders.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `KeystoneAPI` specification and default values
//! - `tls.rs` - TLS secret configuration

mod spec;
mod tls;

// Re-export all public types
pub use spec::{
    default_admin_password_selector, default_admin_project, default_admin_user, default_region,
    default_trust_flush_schedule, KeystoneAPI, KeystoneAPISpec, KeystoneDebug, PasswordSelector,
};
pub use tls::TlsSpec;
