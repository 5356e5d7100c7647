//! Factory handing out pre-registered clients keyed by endpoint URI.

use aton_client::contract::{ClientError, ServiceClient, ServiceClientFactory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// `ServiceClientFactory` whose connections are configured up front.
///
/// Connecting to an endpoint with no registered client fails with
/// `ClientError::Transport`, mirroring an unreachable host.
#[derive(Default)]
pub struct MockClientFactory {
    clients: HashMap<String, Arc<dyn ServiceClient>>,
    connections: Mutex<Vec<String>>,
}

impl MockClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(mut self, endpoint_uri: &str, client: Arc<dyn ServiceClient>) -> Self {
        self.clients.insert(endpoint_uri.to_string(), client);
        self
    }

    /// Endpoint URIs connected to so far, in call order.
    pub fn connections(&self) -> Vec<String> {
        self.connections.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceClientFactory for MockClientFactory {
    async fn connect(&self, endpoint_uri: &str) -> Result<Arc<dyn ServiceClient>, ClientError> {
        self.connections
            .lock()
            .unwrap()
            .push(endpoint_uri.to_string());
        self.clients
            .get(endpoint_uri)
            .cloned()
            .ok_or_else(|| ClientError::Transport(format!("no route to {endpoint_uri}")))
    }
}
