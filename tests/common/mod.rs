//! Common test fixtures for the workload integration tests
//!
//! Builds `KeystoneAPI` resources from YAML so the fixtures exercise the
//! same deserialization path as real manifests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::PodSpec;
use keystone_workloads::crd::{KeystoneAPI, TlsSpec};

pub const MINIMAL_MANIFEST: &str = r"
apiVersion: keystone.openstack.org/v1beta1
kind: KeystoneAPI
metadata:
  name: keystone
  namespace: openstack
spec:
  containerImage: quay.io/podified-antelope-centos9/openstack-keystone:current-podified
  secret: osp-secret
";

pub fn keystone() -> KeystoneAPI {
    serde_yaml::from_str(MINIMAL_MANIFEST).expect("minimal manifest should deserialize")
}

pub fn keystone_with_tls(server: Option<&str>, ca: Option<&str>) -> KeystoneAPI {
    let mut api = keystone();
    api.spec.tls = Some(TlsSpec {
        secret_name: server.map(str::to_string),
        ca_secret_name: ca.map(str::to_string),
    });
    api
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

/// Every container of the pod, init containers first
pub fn all_containers(pod: &PodSpec) -> Vec<&k8s_openapi::api::core::v1::Container> {
    pod.init_containers
        .iter()
        .flatten()
        .chain(&pod.containers)
        .collect()
}
