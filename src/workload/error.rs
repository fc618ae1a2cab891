//! # Errors
//!
//! Invariant violations detected in a generated workload.
//!
//! None of these can be caused by user input. The assemblers treat any of them
//! as a bug and panic rather than hand back an inconsistent object.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkloadError {
    #[error("container '{container}' mounts '{mount}' but the pod has no such volume")]
    DanglingMount { container: String, mount: String },

    #[error("volume '{name}' is declared more than once")]
    DuplicateVolume { name: String },

    #[error("container '{container}' does not carry the restricted security context")]
    PostureRelaxed { container: String },

    #[error("pod does not carry the restricted security context")]
    PodPostureRelaxed,
}
