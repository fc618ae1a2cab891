//! # DB Sync Job
//!
//! Runs the schema migration (`keystone-manage db_sync`).

use k8s_openapi::api::batch::v1::{Job, JobSpec};

use crate::constants::DB_SYNC_JOB_NAME;
use crate::crd::KeystoneAPI;
use crate::workload::command::TaskKind;
use crate::workload::template::{Metadata, WorkloadTemplate};
use crate::workload::volumes::MountKind;

/// Build the `keystone-db-sync` job
///
/// The migration needs no fernet or credential keys and no environment;
/// database credentials come from the merged configuration. With
/// `spec.debug.dbSync` set the container sleeps instead of migrating.
pub fn db_sync_job(keystone: &KeystoneAPI, labels: &Metadata, annotations: &Metadata) -> Job {
    let template = WorkloadTemplate::new(
        keystone,
        DB_SYNC_JOB_NAME,
        TaskKind::DbSync,
        labels,
        annotations,
    )
    .mounts(MountKind::Schema)
    .debug(keystone.spec.debug.db_sync);

    Job {
        metadata: template.object_meta(),
        spec: Some(JobSpec {
            template: template.pod_template(),
            ..Default::default()
        }),
        ..Default::default()
    }
}
