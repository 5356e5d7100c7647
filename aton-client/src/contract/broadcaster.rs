//! Local fan-out capability for decoded records and lifecycle notifications.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Publishes payloads to local observers on a named topic.
///
/// Delivery ordering matches publish call order per topic; nothing is
/// guaranteed across topics. The transport behind this trait (web sockets,
/// message bus) is out of scope for the core.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn publish(&self, topic: &str, payload: Value, headers: &HashMap<String, String>);
}
