//! # Environment Composer
//!
//! Ordered environment builder for the workload containers.
//!
//! Secret-sourced variables come first and can never be shadowed by a literal
//! of the same name. Literal variables keep the order they were added in.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, SecretKeySelector};
use tracing::{debug, warn};

use crate::constants::{
    ENV_BOOTSTRAP_ADMIN_URL, ENV_BOOTSTRAP_INTERNAL_URL, ENV_BOOTSTRAP_PASSWORD,
    ENV_BOOTSTRAP_PROJECT_NAME, ENV_BOOTSTRAP_PUBLIC_URL, ENV_BOOTSTRAP_REGION_ID,
    ENV_BOOTSTRAP_SERVICE_NAME, ENV_BOOTSTRAP_USERNAME, SERVICE_NAME,
};
use crate::crd::KeystoneAPI;

/// Class of an exposed Keystone endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EndpointClass {
    Admin,
    Internal,
    Public,
}

impl EndpointClass {
    /// All classes, in the order their variables are emitted
    pub const ALL: [EndpointClass; 3] = [
        EndpointClass::Admin,
        EndpointClass::Internal,
        EndpointClass::Public,
    ];

    /// Key used for this class in the endpoint map
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointClass::Admin => "admin",
            EndpointClass::Internal => "internal",
            EndpointClass::Public => "public",
        }
    }

    /// Bootstrap variable carrying the URL of this class
    #[must_use]
    pub fn env_var(&self) -> &'static str {
        match self {
            EndpointClass::Admin => ENV_BOOTSTRAP_ADMIN_URL,
            EndpointClass::Internal => ENV_BOOTSTRAP_INTERNAL_URL,
            EndpointClass::Public => ENV_BOOTSTRAP_PUBLIC_URL,
        }
    }
}

impl std::str::FromStr for EndpointClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EndpointClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| format!("unknown endpoint class '{s}' (expected admin, internal or public)"))
    }
}

/// Exposed endpoint URLs keyed by class name (`admin`, `internal`, `public`)
pub type EndpointMap = BTreeMap<String, String>;

/// Ordered environment builder
#[derive(Debug, Clone, Default)]
pub struct EnvBuilder {
    secret_refs: Vec<EnvVar>,
    literals: Vec<EnvVar>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable resolved from `secret`/`key` by the kubelet
    ///
    /// The value is never read by the builder.
    #[must_use]
    pub fn secret_ref(mut self, name: &str, secret: &str, key: &str) -> Self {
        let var = EnvVar {
            name: name.to_string(),
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: secret.to_string(),
                    key: key.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        match self.secret_refs.iter_mut().find(|e| e.name == name) {
            Some(existing) => *existing = var,
            None => self.secret_refs.push(var),
        }
        self.literals.retain(|e| e.name != name);
        self
    }

    /// Add a literal variable
    ///
    /// Dropped if a secret-sourced variable of the same name exists. Replaces
    /// the value of an earlier literal of the same name in place.
    #[must_use]
    pub fn literal(mut self, name: &str, value: &str) -> Self {
        if self.secret_refs.iter().any(|e| e.name == name) {
            warn!(name, "literal variable would shadow a secret reference, keeping the secret");
            return self;
        }
        let var = EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        };
        match self.literals.iter_mut().find(|e| e.name == name) {
            Some(existing) => *existing = var,
            None => self.literals.push(var),
        }
        self
    }

    /// Add one URL variable per endpoint class present in `endpoints`
    ///
    /// Classes are visited in [`EndpointClass::ALL`] order regardless of the
    /// map's own order. Absent classes are omitted entirely.
    #[must_use]
    pub fn endpoints(mut self, endpoints: &EndpointMap) -> Self {
        for class in EndpointClass::ALL {
            match endpoints.get(class.as_str()) {
                Some(url) => self = self.literal(class.env_var(), url),
                None => debug!(endpoint = class.as_str(), "endpoint not exposed, omitting"),
            }
        }
        for key in endpoints.keys() {
            if key.parse::<EndpointClass>().is_err() {
                debug!(endpoint = key.as_str(), "ignoring unknown endpoint class");
            }
        }
        self
    }

    pub fn build(self) -> Vec<EnvVar> {
        let mut env = self.secret_refs;
        env.extend(self.literals);
        env
    }
}

/// Environment of the bootstrap container
///
/// Admin password (secret reference), the four bootstrap literals and one URL
/// per exposed endpoint.
pub fn bootstrap_env(keystone: &KeystoneAPI, endpoints: &EndpointMap) -> Vec<EnvVar> {
    let spec = &keystone.spec;
    EnvBuilder::new()
        .secret_ref(
            ENV_BOOTSTRAP_PASSWORD,
            &spec.secret,
            &spec.password_selectors.admin,
        )
        .literal(ENV_BOOTSTRAP_USERNAME, &spec.admin_user)
        .literal(ENV_BOOTSTRAP_PROJECT_NAME, &spec.admin_project)
        .literal(ENV_BOOTSTRAP_SERVICE_NAME, SERVICE_NAME)
        .literal(ENV_BOOTSTRAP_REGION_ID, &spec.region)
        .endpoints(endpoints)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::test_support::keystone;

    fn names(env: &[EnvVar]) -> Vec<&str> {
        env.iter().map(|e| e.name.as_str()).collect()
    }

    fn value<'a>(env: &'a [EnvVar], name: &str) -> Option<&'a str> {
        env.iter()
            .find(|e| e.name == name)
            .and_then(|e| e.value.as_deref())
    }

    #[test]
    fn test_bootstrap_env_without_endpoints() {
        let env = bootstrap_env(&keystone(), &EndpointMap::new());
        assert_eq!(
            names(&env),
            vec![
                "OS_BOOTSTRAP_PASSWORD",
                "OS_BOOTSTRAP_USERNAME",
                "OS_BOOTSTRAP_PROJECT_NAME",
                "OS_BOOTSTRAP_SERVICE_NAME",
                "OS_BOOTSTRAP_REGION_ID",
            ]
        );
        assert_eq!(value(&env, "OS_BOOTSTRAP_USERNAME"), Some("admin"));
        assert_eq!(value(&env, "OS_BOOTSTRAP_PROJECT_NAME"), Some("admin"));
        assert_eq!(value(&env, "OS_BOOTSTRAP_SERVICE_NAME"), Some("keystone"));
        assert_eq!(value(&env, "OS_BOOTSTRAP_REGION_ID"), Some("regionOne"));
    }

    #[test]
    fn test_password_is_secret_reference() {
        let env = bootstrap_env(&keystone(), &EndpointMap::new());
        let password = &env[0];
        assert_eq!(password.name, "OS_BOOTSTRAP_PASSWORD");
        assert!(password.value.is_none());
        let selector = password
            .value_from
            .as_ref()
            .and_then(|v| v.secret_key_ref.as_ref())
            .unwrap();
        assert_eq!(selector.name, "osp-secret");
        assert_eq!(selector.key, "AdminPassword");
    }

    #[test]
    fn test_only_present_endpoints_are_added() {
        let endpoints = EndpointMap::from([("public".to_string(), "https://x".to_string())]);
        let env = bootstrap_env(&keystone(), &endpoints);
        assert_eq!(env.len(), 6);
        assert_eq!(value(&env, "OS_BOOTSTRAP_PUBLIC_URL"), Some("https://x"));
        assert!(value(&env, "OS_BOOTSTRAP_ADMIN_URL").is_none());
        assert!(value(&env, "OS_BOOTSTRAP_INTERNAL_URL").is_none());
    }

    #[test]
    fn test_endpoint_variables_follow_class_order() {
        let endpoints = EndpointMap::from([
            ("public".to_string(), "https://public".to_string()),
            ("admin".to_string(), "https://admin".to_string()),
            ("internal".to_string(), "https://internal".to_string()),
            ("bogus".to_string(), "https://bogus".to_string()),
        ]);
        let env = bootstrap_env(&keystone(), &endpoints);
        assert_eq!(
            &names(&env)[5..],
            &[
                "OS_BOOTSTRAP_ADMIN_URL",
                "OS_BOOTSTRAP_INTERNAL_URL",
                "OS_BOOTSTRAP_PUBLIC_URL"
            ]
        );
    }

    #[test]
    fn test_empty_endpoint_url_is_still_present() {
        let endpoints = EndpointMap::from([("admin".to_string(), String::new())]);
        let env = bootstrap_env(&keystone(), &endpoints);
        assert_eq!(value(&env, "OS_BOOTSTRAP_ADMIN_URL"), Some(""));
    }

    #[test]
    fn test_literal_cannot_shadow_secret() {
        let env = EnvBuilder::new()
            .secret_ref("OS_BOOTSTRAP_PASSWORD", "osp-secret", "AdminPassword")
            .literal("OS_BOOTSTRAP_PASSWORD", "plaintext")
            .build();
        assert_eq!(env.len(), 1);
        assert!(env[0].value.is_none());
        assert!(env[0].value_from.is_some());
    }

    #[test]
    fn test_secret_added_after_literal_wins() {
        let env = EnvBuilder::new()
            .literal("TOKEN", "plaintext")
            .literal("OTHER", "value")
            .secret_ref("TOKEN", "creds", "token")
            .build();
        assert_eq!(names(&env), vec!["TOKEN", "OTHER"]);
        assert!(env[0].value.is_none());
    }

    #[test]
    fn test_duplicate_literal_replaces_in_place() {
        let env = EnvBuilder::new()
            .literal("A", "1")
            .literal("B", "2")
            .literal("A", "3")
            .build();
        assert_eq!(names(&env), vec!["A", "B"]);
        assert_eq!(value(&env, "A"), Some("3"));
    }

    #[test]
    fn test_endpoint_class_parse() {
        assert_eq!("admin".parse::<EndpointClass>(), Ok(EndpointClass::Admin));
        assert_eq!("public".parse::<EndpointClass>(), Ok(EndpointClass::Public));
        assert!("Admin".parse::<EndpointClass>().is_err());
    }
}
