//! # Constants
//!
//! Shared names, paths and commands used by every workload builder.
//!
//! Object names, volume names, mount paths and environment variable names are
//! consumed by existing deployments and container images and must not change.

/// Service name, used as the prefix of every generated object name
pub const SERVICE_NAME: &str = "keystone";

/// Bootstrap job name
pub const BOOTSTRAP_JOB_NAME: &str = "keystone-bootstrap";

/// Schema migration job name
pub const DB_SYNC_JOB_NAME: &str = "keystone-db-sync";

/// Trust flush cron job name
pub const CRON_JOB_NAME: &str = "keystone-cron";

/// Name of the config merge init container
pub const INIT_CONTAINER_NAME: &str = "init";

// Volume names

pub const SCRIPTS_VOLUME: &str = "scripts";
pub const CONFIG_DATA_VOLUME: &str = "config-data";
pub const CONFIG_DATA_MERGED_VOLUME: &str = "config-data-merged";
pub const FERNET_KEYS_VOLUME: &str = "fernet-keys";
pub const CREDENTIAL_KEYS_VOLUME: &str = "credential-keys";
pub const TLS_SECRET_VOLUME: &str = "tls-secret";
pub const TLS_CA_SECRET_VOLUME: &str = "tlsca-secret";

// Mount paths

pub const SCRIPTS_MOUNT_PATH: &str = "/usr/local/bin/container-scripts";
pub const CONFIG_DATA_MOUNT_PATH: &str = "/var/lib/config-data/default";
pub const CONFIG_DATA_MERGED_MOUNT_PATH: &str = "/var/lib/config-data/merged";
pub const FERNET_KEYS_MOUNT_PATH: &str = "/var/lib/fernet-keys";
pub const CREDENTIAL_KEYS_MOUNT_PATH: &str = "/var/lib/credential-keys";
pub const TLS_SECRET_MOUNT_PATH: &str = "/var/lib/config-data/tls/certs";
pub const TLS_CA_SECRET_MOUNT_PATH: &str = "/var/lib/config-data/tls/ca";

// Volume access modes

/// Scripts must be executable by the container user
pub const SCRIPTS_DEFAULT_MODE: i32 = 0o755;
/// Default configuration files
pub const CONFIG_DEFAULT_MODE: i32 = 0o640;
/// Key material and certificates
pub const SECRET_DEFAULT_MODE: i32 = 0o440;

/// Keys inside the `keystone` secret holding the fernet key repository
pub const FERNET_KEY_ITEMS: [(&str, &str); 2] = [("FernetKeys0", "0"), ("FernetKeys1", "1")];

/// Keys inside the `keystone` secret holding the credential key repository
pub const CREDENTIAL_KEY_ITEMS: [(&str, &str); 2] =
    [("CredentialKeys0", "0"), ("CredentialKeys1", "1")];

// Environment variables

pub const ENV_BOOTSTRAP_USERNAME: &str = "OS_BOOTSTRAP_USERNAME";
pub const ENV_BOOTSTRAP_PROJECT_NAME: &str = "OS_BOOTSTRAP_PROJECT_NAME";
pub const ENV_BOOTSTRAP_SERVICE_NAME: &str = "OS_BOOTSTRAP_SERVICE_NAME";
pub const ENV_BOOTSTRAP_REGION_ID: &str = "OS_BOOTSTRAP_REGION_ID";
pub const ENV_BOOTSTRAP_PASSWORD: &str = "OS_BOOTSTRAP_PASSWORD";
pub const ENV_BOOTSTRAP_ADMIN_URL: &str = "OS_BOOTSTRAP_ADMIN_URL";
pub const ENV_BOOTSTRAP_INTERNAL_URL: &str = "OS_BOOTSTRAP_INTERNAL_URL";
pub const ENV_BOOTSTRAP_PUBLIC_URL: &str = "OS_BOOTSTRAP_PUBLIC_URL";

// Commands

/// Single-child process supervisor wrapping every task command
pub const TASK_ENTRYPOINT: [&str; 3] = ["dumb-init", "--single-child", "--"];

pub const KEYSTONE_MANAGE: &str = "/usr/bin/keystone-manage";

/// Placeholder command used when a task is started in debug mode
pub const DEBUG_SLEEP_COMMAND: [&str; 2] = ["/bin/sleep", "infinity"];

pub const INIT_ENTRYPOINT: [&str; 2] = ["/bin/bash", "-c"];
pub const INIT_SCRIPT: &str = "/usr/local/bin/container-scripts/init.sh";

// Pod settings

pub const RESTART_POLICY_ON_FAILURE: &str = "OnFailure";
pub const RESTART_POLICY_NEVER: &str = "Never";
pub const CONCURRENCY_POLICY_FORBID: &str = "Forbid";
pub const SECCOMP_RUNTIME_DEFAULT: &str = "RuntimeDefault";
pub const DROP_ALL_CAPABILITIES: &str = "ALL";

// CRD defaults

pub const DEFAULT_ADMIN_USER: &str = "admin";
pub const DEFAULT_ADMIN_PROJECT: &str = "admin";
pub const DEFAULT_REGION: &str = "regionOne";
pub const DEFAULT_ADMIN_PASSWORD_SELECTOR: &str = "AdminPassword";
pub const DEFAULT_TRUST_FLUSH_SCHEDULE: &str = "1 * * * *";

// Runtime configuration defaults

pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_FORMAT: &str = "text";
pub const DEFAULT_NAMESPACE: &str = "default";
