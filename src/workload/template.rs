//! # Pod Template
//!
//! The one pod template builder shared by every workload.
//!
//! Assemblers only choose the task, mount set, environment and restart
//! policy. Naming, service account, init container, metadata propagation and
//! the security posture are decided here so they cannot drift between
//! workloads.

use std::collections::{BTreeMap, BTreeSet};

use k8s_openapi::api::core::v1::{Container, EnvVar, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::debug;

use crate::constants::{INIT_CONTAINER_NAME, RESTART_POLICY_ON_FAILURE};
use crate::crd::KeystoneAPI;
use crate::workload::command::{select_command, TaskKind};
use crate::workload::security::{check_posture, SecurityPosture};
use crate::workload::volumes::{mounts_for, MountKind};
use crate::workload::WorkloadError;

/// Labels or annotations copied verbatim onto generated objects
pub type Metadata = BTreeMap<String, String>;

/// Parameters of one workload's pod
#[derive(Debug, Clone)]
pub struct WorkloadTemplate<'a> {
    keystone: &'a KeystoneAPI,
    name: &'static str,
    task: TaskKind,
    mount_kind: MountKind,
    env: Vec<EnvVar>,
    debug: bool,
    restart_policy: &'static str,
    node_selector: Option<BTreeMap<String, String>>,
    labels: &'a Metadata,
    annotations: &'a Metadata,
}

impl<'a> WorkloadTemplate<'a> {
    pub fn new(
        keystone: &'a KeystoneAPI,
        name: &'static str,
        task: TaskKind,
        labels: &'a Metadata,
        annotations: &'a Metadata,
    ) -> Self {
        Self {
            keystone,
            name,
            task,
            mount_kind: MountKind::Main,
            env: Vec::new(),
            debug: false,
            restart_policy: RESTART_POLICY_ON_FAILURE,
            node_selector: None,
            labels,
            annotations,
        }
    }

    #[must_use]
    pub fn mounts(mut self, kind: MountKind) -> Self {
        self.mount_kind = kind;
        self
    }

    #[must_use]
    pub fn env(mut self, env: Vec<EnvVar>) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn restart_policy(mut self, policy: &'static str) -> Self {
        self.restart_policy = policy;
        self
    }

    #[must_use]
    pub fn node_selector(mut self, selector: Option<&BTreeMap<String, String>>) -> Self {
        self.node_selector = selector.cloned();
        self
    }

    /// Metadata of the generated object: name, namespace, labels and annotations
    pub fn object_meta(&self) -> ObjectMeta {
        ObjectMeta {
            name: Some(self.name.to_string()),
            namespace: self.keystone.resource_namespace().map(str::to_string),
            ..self.template_meta()
        }
    }

    /// Metadata of nested templates: labels and annotations only
    pub fn template_meta(&self) -> ObjectMeta {
        ObjectMeta {
            labels: non_empty(self.labels),
            annotations: non_empty(self.annotations),
            ..Default::default()
        }
    }

    fn container(&self, name: &str, task: TaskKind, kind: MountKind, env: Vec<EnvVar>) -> Container {
        let command = select_command(task, self.debug);
        let mounts = mounts_for(kind, self.keystone);
        Container {
            name: name.to_string(),
            image: Some(self.keystone.spec.container_image.clone()),
            command: Some(command.entrypoint),
            args: Some(command.args),
            env: (!env.is_empty()).then_some(env),
            volume_mounts: Some(mounts.volume_mounts),
            security_context: Some(SecurityPosture::restricted().container),
            ..Default::default()
        }
    }

    /// Build the pod template
    ///
    /// # Panics
    ///
    /// Panics if the generated pod violates a builder invariant (a mount
    /// without a volume, or a container without the restricted posture).
    /// This can only happen through a bug in this module.
    pub fn pod_template(&self) -> PodTemplateSpec {
        let volumes = mounts_for(self.mount_kind, self.keystone).volumes;
        let init = self.container(
            INIT_CONTAINER_NAME,
            TaskKind::ConfigInit,
            MountKind::Init,
            Vec::new(),
        );
        let main = self.container(self.name, self.task, self.mount_kind, self.env.clone());

        let pod = PodSpec {
            restart_policy: Some(self.restart_policy.to_string()),
            service_account_name: Some(self.keystone.rbac_resource_name()),
            security_context: Some(SecurityPosture::restricted().pod),
            volumes: Some(volumes),
            init_containers: Some(vec![init]),
            containers: vec![main],
            node_selector: self.node_selector.clone(),
            ..Default::default()
        };

        if let Err(e) = validate_pod_spec(&pod) {
            panic!("generated invalid pod for '{}': {e}", self.name);
        }
        debug!(
            workload = self.name,
            task = ?self.task,
            volumes = pod.volumes.as_ref().map_or(0, Vec::len),
            "built pod template"
        );

        PodTemplateSpec {
            metadata: Some(self.template_meta()),
            spec: Some(pod),
        }
    }
}

fn non_empty(map: &Metadata) -> Option<Metadata> {
    (!map.is_empty()).then(|| map.clone())
}

/// Check the invariants every generated pod must hold
///
/// - volume names are unique
/// - every container mount names a volume of the pod
/// - the pod and every container carry the restricted security posture
pub fn validate_pod_spec(pod: &PodSpec) -> Result<(), WorkloadError> {
    let mut volume_names = BTreeSet::new();
    for volume in pod.volumes.iter().flatten() {
        if !volume_names.insert(volume.name.as_str()) {
            return Err(WorkloadError::DuplicateVolume {
                name: volume.name.clone(),
            });
        }
    }

    for container in pod.init_containers.iter().flatten().chain(&pod.containers) {
        if let Some(mount) = container
            .volume_mounts
            .iter()
            .flatten()
            .find(|m| !volume_names.contains(m.name.as_str()))
        {
            return Err(WorkloadError::DanglingMount {
                container: container.name.clone(),
                mount: mount.name.clone(),
            });
        }
    }

    check_posture(pod)
}
