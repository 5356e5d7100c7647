//! Small data fixtures shared across the integration suites.

use aton_client::contract::ServiceInstance;
use serde_json::{json, Value};

/// Registry search hit pointing at one versioned endpoint.
pub fn registry_instance(name: &str, version: &str, endpoint_uri: &str) -> ServiceInstance {
    ServiceInstance {
        name: name.to_string(),
        version: version.to_string(),
        endpoint_uri: endpoint_uri.to_string(),
    }
}

/// JSON dataset document with one member per given kind.
pub fn dataset_document(kinds: &[&str]) -> String {
    let members: Vec<Value> = kinds
        .iter()
        .enumerate()
        .map(|(index, kind)| {
            json!({
                "kind": kind,
                "idCode": format!("urn:mrn:grad:aton:test:{index}"),
            })
        })
        .collect();

    json!({ "members": members }).to_string()
}
