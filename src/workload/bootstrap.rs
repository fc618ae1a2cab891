//! # Bootstrap Job
//!
//! Runs `keystone-manage bootstrap` to create the admin user, project, role,
//! service and the endpoints exposed so far.

use k8s_openapi::api::batch::v1::{Job, JobSpec};

use crate::constants::BOOTSTRAP_JOB_NAME;
use crate::crd::KeystoneAPI;
use crate::workload::command::TaskKind;
use crate::workload::env::{bootstrap_env, EndpointMap};
use crate::workload::template::{Metadata, WorkloadTemplate};
use crate::workload::volumes::MountKind;

/// Build the `keystone-bootstrap` job
///
/// `endpoints` may be empty. Endpoint classes missing from the map get no
/// URL variable at all.
pub fn bootstrap_job(
    keystone: &KeystoneAPI,
    labels: &Metadata,
    annotations: &Metadata,
    endpoints: &EndpointMap,
) -> Job {
    let template = WorkloadTemplate::new(
        keystone,
        BOOTSTRAP_JOB_NAME,
        TaskKind::Bootstrap,
        labels,
        annotations,
    )
    .mounts(MountKind::Main)
    .env(bootstrap_env(keystone, endpoints));

    Job {
        metadata: template.object_meta(),
        spec: Some(JobSpec {
            template: template.pod_template(),
            ..Default::default()
        }),
        ..Default::default()
    }
}
