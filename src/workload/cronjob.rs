//! # Trust Flush CronJob
//!
//! Periodically purges expired and soft-deleted trusts with
//! `keystone-manage trust_flush`.
//!
//! Runs never overlap: the flush is not safe to run concurrently, so a late
//! run is skipped rather than started alongside the previous one. Failed runs
//! are not restarted in place; the next schedule tick starts a fresh run.

use k8s_openapi::api::batch::v1::{CronJob, CronJobSpec, JobSpec, JobTemplateSpec};

use crate::constants::{CONCURRENCY_POLICY_FORBID, CRON_JOB_NAME, RESTART_POLICY_NEVER};
use crate::crd::KeystoneAPI;
use crate::workload::command::TaskKind;
use crate::workload::template::{Metadata, WorkloadTemplate};
use crate::workload::volumes::MountKind;

/// Build the `keystone-cron` cron job
pub fn trust_flush_cron_job(
    keystone: &KeystoneAPI,
    labels: &Metadata,
    annotations: &Metadata,
) -> CronJob {
    let template = WorkloadTemplate::new(
        keystone,
        CRON_JOB_NAME,
        TaskKind::TrustFlush,
        labels,
        annotations,
    )
    .mounts(MountKind::Main)
    .restart_policy(RESTART_POLICY_NEVER)
    .node_selector(keystone.node_selector());

    CronJob {
        metadata: template.object_meta(),
        spec: Some(CronJobSpec {
            schedule: keystone.spec.trust_flush_schedule.clone(),
            suspend: Some(keystone.spec.trust_flush_suspend),
            concurrency_policy: Some(CONCURRENCY_POLICY_FORBID.to_string()),
            job_template: JobTemplateSpec {
                metadata: Some(template.template_meta()),
                spec: Some(JobSpec {
                    parallelism: Some(1),
                    completions: Some(1),
                    template: template.pod_template(),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
