//! # Rendering
//!
//! Turns a `KeystoneAPI` manifest plus command-line inputs into serialized
//! workload manifests. Used by the `keystone-workloads` binary.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::OutputFormat;
use crate::constants::DEFAULT_NAMESPACE;
use crate::crd::KeystoneAPI;
use crate::workload::{
    bootstrap_job, db_sync_job, trust_flush_cron_job, EndpointClass, EndpointMap, Metadata,
};

/// Which workloads to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WorkloadSelection {
    Bootstrap,
    DbSync,
    Cron,
    All,
}

/// Inputs normally supplied by the reconcile loop
#[derive(Debug, Clone, Default)]
pub struct RenderInputs {
    pub labels: Metadata,
    pub annotations: Metadata,
    pub endpoints: EndpointMap,
}

/// Parse a `key=value` argument
pub fn parse_key_value(arg: &str) -> Result<(String, String)> {
    let Some((key, value)) = arg.split_once('=') else {
        bail!("expected key=value, got '{arg}'");
    };
    if key.is_empty() {
        bail!("empty key in '{arg}'");
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse an `class=url` endpoint argument
pub fn parse_endpoint(arg: &str) -> Result<(String, String)> {
    let (class, url) = parse_key_value(arg)?;
    let class: EndpointClass = class.parse().map_err(anyhow::Error::msg)?;
    Ok((class.as_str().to_string(), url))
}

/// Load a `KeystoneAPI` from YAML
///
/// A manifest without namespace is placed in `default`, as `kubectl` would.
pub fn load_keystone(yaml: &str) -> Result<KeystoneAPI> {
    let mut keystone: KeystoneAPI =
        serde_yaml::from_str(yaml).context("Failed to parse KeystoneAPI manifest")?;
    if keystone.metadata.name.as_deref().unwrap_or_default().is_empty() {
        bail!("KeystoneAPI manifest has no metadata.name");
    }
    if keystone.metadata.namespace.is_none() {
        debug!("manifest has no namespace, using '{}'", DEFAULT_NAMESPACE);
        keystone.metadata.namespace = Some(DEFAULT_NAMESPACE.to_string());
    }
    Ok(keystone)
}

/// Serialized manifests in selection order
pub fn render(
    keystone: &KeystoneAPI,
    inputs: &RenderInputs,
    selection: WorkloadSelection,
    format: OutputFormat,
) -> Result<String> {
    let mut documents: Vec<serde_json::Value> = Vec::new();
    let wants = |s: WorkloadSelection| selection == s || selection == WorkloadSelection::All;

    if wants(WorkloadSelection::Bootstrap) {
        documents.push(to_value(&bootstrap_job(
            keystone,
            &inputs.labels,
            &inputs.annotations,
            &inputs.endpoints,
        ))?);
    }
    if wants(WorkloadSelection::DbSync) {
        documents.push(to_value(&db_sync_job(
            keystone,
            &inputs.labels,
            &inputs.annotations,
        ))?);
    }
    if wants(WorkloadSelection::Cron) {
        documents.push(to_value(&trust_flush_cron_job(
            keystone,
            &inputs.labels,
            &inputs.annotations,
        ))?);
    }

    info!(
        keystone = keystone.resource_name(),
        count = documents.len(),
        "rendered workloads"
    );

    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&documents).context("Failed to serialize workloads")
        }
        OutputFormat::Yaml => {
            let mut out = String::new();
            for document in &documents {
                out.push_str("---\n");
                out.push_str(
                    &serde_yaml::to_string(document).context("Failed to serialize workloads")?,
                );
            }
            Ok(out)
        }
    }
}

fn to_value<T: Serialize>(object: &T) -> Result<serde_json::Value> {
    serde_json::to_value(object).context("Failed to serialize workload")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r"
apiVersion: keystone.openstack.org/v1beta1
kind: KeystoneAPI
metadata:
  name: keystone
spec:
  containerImage: keystone:latest
  secret: osp-secret
";

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("app=keystone").unwrap(),
            ("app".to_string(), "keystone".to_string())
        );
        assert_eq!(
            parse_key_value("url=https://x/?a=b").unwrap(),
            ("url".to_string(), "https://x/?a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_parse_endpoint_rejects_unknown_class() {
        assert_eq!(
            parse_endpoint("public=https://x").unwrap(),
            ("public".to_string(), "https://x".to_string())
        );
        assert!(parse_endpoint("external=https://x").is_err());
    }

    #[test]
    fn test_load_keystone_defaults_namespace() {
        let keystone = load_keystone(MANIFEST).unwrap();
        assert_eq!(keystone.resource_namespace(), Some("default"));
    }

    #[test]
    fn test_load_keystone_requires_name() {
        let manifest = MANIFEST.replace("  name: keystone\n", "  namespace: openstack\n");
        assert!(load_keystone(&manifest).is_err());
    }

    #[test]
    fn test_render_all_yaml() {
        let keystone = load_keystone(MANIFEST).unwrap();
        let out = render(
            &keystone,
            &RenderInputs::default(),
            WorkloadSelection::All,
            OutputFormat::Yaml,
        )
        .unwrap();
        assert_eq!(out.matches("---\n").count(), 3);
        assert!(out.contains("name: keystone-bootstrap"));
        assert!(out.contains("name: keystone-db-sync"));
        assert!(out.contains("kind: CronJob"));
    }

    #[test]
    fn test_render_single_json() {
        let keystone = load_keystone(MANIFEST).unwrap();
        let out = render(
            &keystone,
            &RenderInputs::default(),
            WorkloadSelection::DbSync,
            OutputFormat::Json,
        )
        .unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["kind"], "Job");
        assert_eq!(parsed[0]["metadata"]["name"], "keystone-db-sync");
    }
}
