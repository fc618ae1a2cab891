//! # TLS Configuration
//!
//! Secrets holding the server certificate and CA bundle.

use serde::{Deserialize, Serialize};

/// TLS configuration
///
/// Both fields are optional. An empty string is treated the same as an
/// absent field: the corresponding secret is not mounted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsSpec {
    /// Secret holding the server certificate and key
    #[serde(default)]
    pub secret_name: Option<String>,
    /// Secret holding the CA bundle
    #[serde(default)]
    pub ca_secret_name: Option<String>,
}

impl TlsSpec {
    /// Server certificate secret name, if configured
    pub fn server_secret(&self) -> Option<&str> {
        non_empty(self.secret_name.as_deref())
    }

    /// CA bundle secret name, if configured
    pub fn ca_secret(&self) -> Option<&str> {
        non_empty(self.ca_secret_name.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
