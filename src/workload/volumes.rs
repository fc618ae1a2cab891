//! # Mount Catalog
//!
//! Maps the config maps, secrets and scratch space a workload needs onto
//! volumes and container mount points.
//!
//! Entries are emitted in a fixed order: the fixed entries first, then the
//! conditional ones. Reconciliation compares generated pods field by field, so
//! the order must never depend on input iteration order.

use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, EmptyDirVolumeSource, KeyToPath, SecretVolumeSource, Volume,
    VolumeMount,
};
use tracing::debug;

use crate::constants::{
    CONFIG_DATA_MERGED_MOUNT_PATH, CONFIG_DATA_MERGED_VOLUME, CONFIG_DATA_MOUNT_PATH,
    CONFIG_DATA_VOLUME, CONFIG_DEFAULT_MODE, CREDENTIAL_KEYS_MOUNT_PATH, CREDENTIAL_KEYS_VOLUME,
    CREDENTIAL_KEY_ITEMS, FERNET_KEYS_MOUNT_PATH, FERNET_KEYS_VOLUME, FERNET_KEY_ITEMS,
    SCRIPTS_DEFAULT_MODE, SCRIPTS_MOUNT_PATH, SCRIPTS_VOLUME, SECRET_DEFAULT_MODE, SERVICE_NAME,
    TLS_CA_SECRET_MOUNT_PATH, TLS_CA_SECRET_VOLUME, TLS_SECRET_MOUNT_PATH, TLS_SECRET_VOLUME,
};
use crate::crd::KeystoneAPI;

/// Which subset of the catalog a container receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    /// Config merge init container: scripts and configuration only
    Init,
    /// Schema migration: configuration and TLS, no fernet or credential keys
    Schema,
    /// Keystone management tasks: configuration, key repositories and TLS
    Main,
}

impl MountKind {
    fn includes_key_material(self) -> bool {
        matches!(self, MountKind::Main)
    }

    fn includes_tls(self) -> bool {
        matches!(self, MountKind::Schema | MountKind::Main)
    }
}

/// Source backing a mount entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountSource {
    ConfigMap { name: String },
    Secret {
        name: String,
        items: Vec<(&'static str, &'static str)>,
    },
    EmptyDir,
}

/// One catalog entry: a named source and where it is mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub name: &'static str,
    pub source: MountSource,
    pub mount_path: &'static str,
    pub read_only: bool,
    pub sub_path: Option<String>,
    pub default_mode: Option<i32>,
}

impl MountEntry {
    fn config_map(
        name: &'static str,
        config_map: String,
        mount_path: &'static str,
        default_mode: i32,
    ) -> Self {
        Self {
            name,
            source: MountSource::ConfigMap { name: config_map },
            mount_path,
            read_only: true,
            sub_path: None,
            default_mode: Some(default_mode),
        }
    }

    fn secret(name: &'static str, secret: &str, mount_path: &'static str) -> Self {
        Self {
            name,
            source: MountSource::Secret {
                name: secret.to_string(),
                items: Vec::new(),
            },
            mount_path,
            read_only: true,
            sub_path: None,
            default_mode: Some(SECRET_DEFAULT_MODE),
        }
    }

    fn key_repository(
        name: &'static str,
        items: &[(&'static str, &'static str)],
        mount_path: &'static str,
    ) -> Self {
        Self {
            source: MountSource::Secret {
                name: SERVICE_NAME.to_string(),
                items: items.to_vec(),
            },
            ..Self::secret(name, SERVICE_NAME, mount_path)
        }
    }

    fn scratch(name: &'static str, mount_path: &'static str) -> Self {
        Self {
            name,
            source: MountSource::EmptyDir,
            mount_path,
            read_only: false,
            sub_path: None,
            default_mode: None,
        }
    }

    /// Pod-level volume for this entry
    pub fn to_volume(&self) -> Volume {
        let mut volume = Volume {
            name: self.name.to_string(),
            ..Default::default()
        };
        match &self.source {
            MountSource::ConfigMap { name } => {
                volume.config_map = Some(ConfigMapVolumeSource {
                    name: name.clone(),
                    default_mode: self.default_mode,
                    ..Default::default()
                });
            }
            MountSource::Secret { name, items } => {
                volume.secret = Some(SecretVolumeSource {
                    secret_name: Some(name.clone()),
                    default_mode: self.default_mode,
                    items: (!items.is_empty()).then(|| {
                        items
                            .iter()
                            .map(|(key, path)| KeyToPath {
                                key: (*key).to_string(),
                                path: (*path).to_string(),
                                ..Default::default()
                            })
                            .collect()
                    }),
                    ..Default::default()
                });
            }
            MountSource::EmptyDir => {
                volume.empty_dir = Some(EmptyDirVolumeSource::default());
            }
        }
        volume
    }

    /// Container-level mount for this entry
    pub fn to_volume_mount(&self) -> VolumeMount {
        VolumeMount {
            name: self.name.to_string(),
            mount_path: self.mount_path.to_string(),
            read_only: Some(self.read_only),
            sub_path: self.sub_path.clone(),
            ..Default::default()
        }
    }
}

/// Volumes and mounts produced for one container, in matching order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadMounts {
    pub volumes: Vec<Volume>,
    pub volume_mounts: Vec<VolumeMount>,
}

/// Catalog entries that apply to `kind` for this resource
pub fn catalog(kind: MountKind, keystone: &KeystoneAPI) -> Vec<MountEntry> {
    let name = keystone.resource_name();

    let mut entries = vec![
        MountEntry::config_map(
            SCRIPTS_VOLUME,
            format!("{name}-scripts"),
            SCRIPTS_MOUNT_PATH,
            SCRIPTS_DEFAULT_MODE,
        ),
        MountEntry::config_map(
            CONFIG_DATA_VOLUME,
            format!("{name}-config-data"),
            CONFIG_DATA_MOUNT_PATH,
            CONFIG_DEFAULT_MODE,
        ),
        MountEntry::scratch(CONFIG_DATA_MERGED_VOLUME, CONFIG_DATA_MERGED_MOUNT_PATH),
    ];

    if kind.includes_key_material() {
        entries.push(MountEntry::key_repository(
            FERNET_KEYS_VOLUME,
            &FERNET_KEY_ITEMS,
            FERNET_KEYS_MOUNT_PATH,
        ));
        entries.push(MountEntry::key_repository(
            CREDENTIAL_KEYS_VOLUME,
            &CREDENTIAL_KEY_ITEMS,
            CREDENTIAL_KEYS_MOUNT_PATH,
        ));
    }

    if kind.includes_tls() {
        if let Some(tls) = keystone.spec.tls.as_ref() {
            if let Some(secret) = tls.server_secret() {
                debug!(secret, "mounting TLS server secret");
                entries.push(MountEntry::secret(
                    TLS_SECRET_VOLUME,
                    secret,
                    TLS_SECRET_MOUNT_PATH,
                ));
            }
            if let Some(secret) = tls.ca_secret() {
                debug!(secret, "mounting TLS CA secret");
                entries.push(MountEntry::secret(
                    TLS_CA_SECRET_VOLUME,
                    secret,
                    TLS_CA_SECRET_MOUNT_PATH,
                ));
            }
        }
    }

    entries
}

/// Build the volumes and container mounts for `kind`
pub fn mounts_for(kind: MountKind, keystone: &KeystoneAPI) -> WorkloadMounts {
    let entries = catalog(kind, keystone);
    WorkloadMounts {
        volumes: entries.iter().map(MountEntry::to_volume).collect(),
        volume_mounts: entries.iter().map(MountEntry::to_volume_mount).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::TlsSpec;
    use crate::workload::test_support::keystone;

    fn names(mounts: &WorkloadMounts) -> Vec<&str> {
        mounts.volume_mounts.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_init_mounts_are_fixed_entries_only() {
        let mut api = keystone();
        api.spec.tls = Some(TlsSpec {
            secret_name: Some("keystone-tls".to_string()),
            ca_secret_name: Some("ca-bundle".to_string()),
        });
        let mounts = mounts_for(MountKind::Init, &api);
        assert_eq!(
            names(&mounts),
            vec!["scripts", "config-data", "config-data-merged"]
        );
    }

    #[test]
    fn test_main_mounts_order_without_tls() {
        let mounts = mounts_for(MountKind::Main, &keystone());
        assert_eq!(
            names(&mounts),
            vec![
                "scripts",
                "config-data",
                "config-data-merged",
                "fernet-keys",
                "credential-keys"
            ]
        );
        let volume_names: Vec<&str> = mounts.volumes.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(volume_names, names(&mounts));
    }

    #[test]
    fn test_schema_mounts_exclude_key_material() {
        let mut api = keystone();
        api.spec.tls = Some(TlsSpec {
            secret_name: Some("keystone-tls".to_string()),
            ca_secret_name: None,
        });
        let mounts = mounts_for(MountKind::Schema, &api);
        assert_eq!(
            names(&mounts),
            vec!["scripts", "config-data", "config-data-merged", "tls-secret"]
        );
    }

    #[test]
    fn test_fixed_paths() {
        let mounts = mounts_for(MountKind::Main, &keystone());
        let paths: Vec<(&str, &str, Option<bool>)> = mounts
            .volume_mounts
            .iter()
            .map(|m| (m.name.as_str(), m.mount_path.as_str(), m.read_only))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("scripts", "/usr/local/bin/container-scripts", Some(true)),
                ("config-data", "/var/lib/config-data/default", Some(true)),
                ("config-data-merged", "/var/lib/config-data/merged", Some(false)),
                ("fernet-keys", "/var/lib/fernet-keys", Some(true)),
                ("credential-keys", "/var/lib/credential-keys", Some(true)),
            ]
        );
    }

    #[test]
    fn test_config_maps_are_named_after_resource() {
        let mounts = mounts_for(MountKind::Init, &keystone());
        let scripts = mounts.volumes[0].config_map.as_ref().unwrap();
        assert_eq!(scripts.name, "keystone-scripts");
        assert_eq!(scripts.default_mode, Some(0o755));
        let config = mounts.volumes[1].config_map.as_ref().unwrap();
        assert_eq!(config.name, "keystone-config-data");
        assert_eq!(config.default_mode, Some(0o640));
        assert!(mounts.volumes[2].empty_dir.is_some());
    }

    #[test]
    fn test_key_repositories_project_items() {
        let mounts = mounts_for(MountKind::Main, &keystone());
        let fernet = mounts.volumes[3].secret.as_ref().unwrap();
        assert_eq!(fernet.secret_name.as_deref(), Some("keystone"));
        assert_eq!(fernet.default_mode, Some(0o440));
        let items: Vec<(&str, &str)> = fernet
            .items
            .as_ref()
            .unwrap()
            .iter()
            .map(|i| (i.key.as_str(), i.path.as_str()))
            .collect();
        assert_eq!(items, vec![("FernetKeys0", "0"), ("FernetKeys1", "1")]);

        let credential = mounts.volumes[4].secret.as_ref().unwrap();
        let items: Vec<&str> = credential
            .items
            .as_ref()
            .unwrap()
            .iter()
            .map(|i| i.key.as_str())
            .collect();
        assert_eq!(items, vec!["CredentialKeys0", "CredentialKeys1"]);
    }

    #[test]
    fn test_tls_entries_follow_key_material() {
        let mut api = keystone();
        api.spec.tls = Some(TlsSpec {
            secret_name: Some("keystone-tls".to_string()),
            ca_secret_name: Some("ca-bundle".to_string()),
        });
        let mounts = mounts_for(MountKind::Main, &api);
        assert_eq!(&names(&mounts)[5..], &["tls-secret", "tlsca-secret"]);

        let tls = mounts.volumes[5].secret.as_ref().unwrap();
        assert_eq!(tls.secret_name.as_deref(), Some("keystone-tls"));
        assert!(tls.items.is_none());
        let ca = mounts.volumes[6].secret.as_ref().unwrap();
        assert_eq!(ca.secret_name.as_deref(), Some("ca-bundle"));
        assert_eq!(mounts.volume_mounts[6].mount_path, "/var/lib/config-data/tls/ca");
    }

    #[test]
    fn test_empty_tls_names_are_not_mounted() {
        let mut api = keystone();
        api.spec.tls = Some(TlsSpec {
            secret_name: Some(String::new()),
            ca_secret_name: Some(String::new()),
        });
        assert_eq!(
            mounts_for(MountKind::Main, &api),
            mounts_for(MountKind::Main, &keystone())
        );
    }
}
