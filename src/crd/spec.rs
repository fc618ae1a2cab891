//! # KeystoneAPI Spec
//!
//! Main CRD specification types and default values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ADMIN_PASSWORD_SELECTOR, DEFAULT_ADMIN_PROJECT, DEFAULT_ADMIN_USER, DEFAULT_REGION,
    DEFAULT_TRUST_FLUSH_SCHEDULE, SERVICE_NAME,
};

/// KeystoneAPI Custom Resource Definition
///
/// Desired state of a Keystone identity service. The workload builders read
/// this resource to produce the bootstrap, db-sync and trust-flush workloads.
///
/// # Example
///
/// ```yaml
/// apiVersion: keystone.openstack.org/v1beta1
/// kind: KeystoneAPI
/// metadata:
///   name: keystone
///   namespace: openstack
/// spec:
///   containerImage: quay.io/podified-antelope-centos9/openstack-keystone:current-podified
///   secret: osp-secret
///   tls:
///     secretName: keystone-internal-svc
///     caSecretName: combined-ca-bundle
///   trustFlushSchedule: "1 * * * *"
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "KeystoneAPI",
    group = "keystone.openstack.org",
    version = "v1beta1",
    namespaced,
    shortname = "keystoneapi",
    printcolumn = r#"{"name":"Image", "type":"string", "jsonPath":".spec.containerImage"}, {"name":"Schedule", "type":"string", "jsonPath":".spec.trustFlushSchedule"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KeystoneAPISpec {
    /// Keystone container image used by every generated workload
    pub container_image: String,
    /// Name of the admin user created by `keystone-manage bootstrap`
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
    /// Name of the admin project created by `keystone-manage bootstrap`
    #[serde(default = "default_admin_project")]
    pub admin_project: String,
    /// Region the bootstrap endpoints are registered in
    #[serde(default = "default_region")]
    pub region: String,
    /// Name of the secret holding the service credentials
    pub secret: String,
    /// Keys inside `secret` used for each credential
    #[serde(default)]
    pub password_selectors: PasswordSelector,
    /// TLS material mounted into the workloads (optional)
    #[serde(default)]
    pub tls: Option<crate::crd::TlsSpec>,
    /// Cron schedule of the trust flush job
    /// Default: "1 * * * *" (every hour at minute 1)
    #[serde(default = "default_trust_flush_schedule")]
    pub trust_flush_schedule: String,
    /// Suspend the trust flush cron job
    /// Default: false
    #[serde(default)]
    pub trust_flush_suspend: bool,
    /// Node selector applied to the trust flush pods (optional)
    #[serde(default)]
    pub node_selector: Option<BTreeMap<String, String>>,
    /// Per-task debug switches
    #[serde(default)]
    pub debug: KeystoneDebug,
}

/// Secret keys for the credentials held in `spec.secret`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordSelector {
    /// Key holding the admin password
    /// Default: "AdminPassword"
    #[serde(default = "default_admin_password_selector")]
    pub admin: String,
}

impl Default for PasswordSelector {
    fn default() -> Self {
        Self {
            admin: default_admin_password_selector(),
        }
    }
}

/// Debug switches
///
/// A task with debug enabled starts a sleeping placeholder instead of its
/// management command so an operator can attach to the pod.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeystoneDebug {
    /// Replace `keystone-manage db_sync` with `sleep infinity`
    #[serde(default)]
    pub db_sync: bool,
}

impl KeystoneAPI {
    /// Name of the resource, empty if unset
    pub fn resource_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Namespace of the resource, if set
    pub fn resource_namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    /// Name of the role-bound service account the workloads run as
    pub fn rbac_resource_name(&self) -> String {
        format!("{SERVICE_NAME}-{}", self.resource_name())
    }

    /// Node selector, if configured with at least one entry
    pub fn node_selector(&self) -> Option<&BTreeMap<String, String>> {
        self.spec
            .node_selector
            .as_ref()
            .filter(|selector| !selector.is_empty())
    }
}

/// Default value for the admin user
pub fn default_admin_user() -> String {
    DEFAULT_ADMIN_USER.to_string()
}

/// Default value for the admin project
pub fn default_admin_project() -> String {
    DEFAULT_ADMIN_PROJECT.to_string()
}

/// Default value for the region
pub fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Default value for the admin password key
pub fn default_admin_password_selector() -> String {
    DEFAULT_ADMIN_PASSWORD_SELECTOR.to_string()
}

/// Default value for the trust flush schedule
pub fn default_trust_flush_schedule() -> String {
    DEFAULT_TRUST_FLUSH_SCHEDULE.to_string()
}
