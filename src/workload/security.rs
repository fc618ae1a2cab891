//! # Security Posture
//!
//! Hardening applied to every generated pod and container: non-root, runtime
//! default seccomp profile, no privilege escalation, all capabilities dropped.
//!
//! The posture takes no input. No task kind or resource field can change it.

use k8s_openapi::api::core::v1::{
    Capabilities, Container, PodSecurityContext, PodSpec, SeccompProfile, SecurityContext,
};

use crate::constants::{DROP_ALL_CAPABILITIES, SECCOMP_RUNTIME_DEFAULT};
use crate::workload::WorkloadError;

/// Pod and container security contexts
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityPosture {
    pub pod: PodSecurityContext,
    pub container: SecurityContext,
}

impl SecurityPosture {
    /// The only posture workloads are generated with
    pub fn restricted() -> Self {
        Self {
            pod: PodSecurityContext {
                run_as_non_root: Some(true),
                seccomp_profile: Some(SeccompProfile {
                    type_: SECCOMP_RUNTIME_DEFAULT.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            container: SecurityContext {
                allow_privilege_escalation: Some(false),
                capabilities: Some(Capabilities {
                    drop: Some(vec![DROP_ALL_CAPABILITIES.to_string()]),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }
}

fn check_container(container: &Container, expected: &SecurityContext) -> Result<(), WorkloadError> {
    if container.security_context.as_ref() == Some(expected) {
        Ok(())
    } else {
        Err(WorkloadError::PostureRelaxed {
            container: container.name.clone(),
        })
    }
}

/// Check that the pod and all of its containers carry the restricted posture
pub fn check_posture(pod: &PodSpec) -> Result<(), WorkloadError> {
    let posture = SecurityPosture::restricted();
    if pod.security_context.as_ref() != Some(&posture.pod) {
        return Err(WorkloadError::PodPostureRelaxed);
    }
    pod.init_containers
        .iter()
        .flatten()
        .chain(&pod.containers)
        .try_for_each(|c| check_container(c, &posture.container))
}
