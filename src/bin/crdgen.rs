//! # CRD Generator
//!
//! Generates the `KeystoneAPI` CustomResourceDefinition YAML from the Rust
//! type definitions.
//!
//! ## Usage
//!
//! ```bash
//! # Generate CRD YAML
//! cargo run --bin crdgen > config/crd/keystoneapi.yaml
//!
//! # Generate and apply directly
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use kube::core::CustomResourceExt;

use keystone_workloads::crd::KeystoneAPI;

fn main() {
    let crd = KeystoneAPI::crd();

    match serde_yaml::to_string(&crd) {
        Ok(yaml) => {
            print!("{yaml}");
        }
        Err(e) => {
            eprintln!("Failed to serialize CRD to YAML: {e}");
            std::process::exit(1);
        }
    }
}
