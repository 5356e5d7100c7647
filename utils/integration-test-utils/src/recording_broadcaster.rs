//! `Broadcaster` that records every publish for later assertions.

use aton_client::contract::Broadcaster;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// One message captured by a [`RecordingBroadcaster`].
#[derive(Clone, Debug, PartialEq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Value,
    pub headers: HashMap<String, String>,
}

/// Broadcaster backend that buffers messages instead of delivering them.
#[derive(Default)]
pub struct RecordingBroadcaster {
    published: Mutex<Vec<PublishedMessage>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages published so far, in publish order.
    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn publish(&self, topic: &str, payload: Value, headers: &HashMap<String, String>) {
        self.published.lock().unwrap().push(PublishedMessage {
            topic: topic.to_string(),
            payload,
            headers: headers.clone(),
        });
    }
}
