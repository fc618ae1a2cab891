//! # Workloads
//!
//! Builders for the Kubernetes objects the operator submits for a
//! `KeystoneAPI` resource.
//!
//! Every builder is a pure function of its arguments: no I/O, no shared state,
//! no caching. The same inputs always produce the same object, so the caller
//! can re-apply the result on every reconcile without drift.
//!
//! ## Module Structure
//!
//! - `volumes.rs` - Mount catalog (volumes and container mounts)
//! - `env.rs` - Ordered environment builder and endpoint variables
//! - `command.rs` - Entrypoint and arguments per task
//! - `security.rs` - Restricted security posture
//! - `template.rs` - Shared pod template builder and invariant checks
//! - `bootstrap.rs`, `db_sync.rs`, `cronjob.rs` - The three workloads

pub mod bootstrap;
pub mod command;
pub mod cronjob;
pub mod db_sync;
pub mod env;
mod error;
pub mod security;
pub mod template;
pub mod volumes;

use k8s_openapi::api::batch::v1::{CronJob, Job};

pub use bootstrap::bootstrap_job;
pub use command::{select_command, TaskCommand, TaskKind};
pub use cronjob::trust_flush_cron_job;
pub use db_sync::db_sync_job;
pub use env::{EndpointClass, EndpointMap, EnvBuilder};
pub use error::WorkloadError;
pub use security::SecurityPosture;
pub use template::{validate_pod_spec, Metadata, WorkloadTemplate};
pub use volumes::{mounts_for, MountKind, WorkloadMounts};

use crate::crd::KeystoneAPI;

/// All workloads generated for one `KeystoneAPI` resource
#[derive(Debug, Clone, PartialEq)]
pub struct KeystoneWorkloads {
    pub bootstrap: Job,
    pub db_sync: Job,
    pub trust_flush: CronJob,
}

/// Build every workload for `keystone`
pub fn build_all(
    keystone: &KeystoneAPI,
    labels: &Metadata,
    annotations: &Metadata,
    endpoints: &EndpointMap,
) -> KeystoneWorkloads {
    KeystoneWorkloads {
        bootstrap: bootstrap_job(keystone, labels, annotations, endpoints),
        db_sync: db_sync_job(keystone, labels, annotations),
        trust_flush: trust_flush_cron_job(keystone, labels, annotations),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use k8s_openapi::api::batch::v1::{CronJob, Job};
    use k8s_openapi::api::core::v1::PodSpec;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    use crate::crd::{KeystoneAPI, KeystoneAPISpec};

    pub fn keystone() -> KeystoneAPI {
        let spec: KeystoneAPISpec = serde_json::from_value(serde_json::json!({
            "containerImage": "keystone:latest",
            "secret": "osp-secret",
        }))
        .expect("minimal spec deserializes");
        KeystoneAPI {
            metadata: ObjectMeta {
                name: Some("keystone".to_string()),
                namespace: Some("openstack".to_string()),
                ..Default::default()
            },
            spec,
        }
    }

    pub fn job_pod(job: &Job) -> &PodSpec {
        job.spec
            .as_ref()
            .and_then(|s| s.template.spec.as_ref())
            .expect("job has a pod spec")
    }

    pub fn cron_pod(cron: &CronJob) -> &PodSpec {
        cron.spec
            .as_ref()
            .and_then(|s| s.job_template.spec.as_ref())
            .and_then(|s| s.template.spec.as_ref())
            .expect("cron job has a pod spec")
    }
}
