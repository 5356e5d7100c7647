//! Programmable in-memory `ServiceClient` with a recorded call log.

use aton_client::contract::{
    Acknowledgement, ClientError, PageRequest, RemovalResponse, SearchFilter, ServiceClient,
    ServiceInstance, SubscriptionRequest, SubscriptionResponse,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Calls observed by one [`MockServiceClient`].
#[derive(Default)]
pub struct MockCallLog {
    searches: Mutex<Vec<SearchFilter>>,
    subscribes: Mutex<Vec<SubscriptionRequest>>,
    removals: Mutex<Vec<Uuid>>,
    acknowledgements: Mutex<Vec<Acknowledgement>>,
}

impl MockCallLog {
    pub fn searches(&self) -> Vec<SearchFilter> {
        self.searches.lock().unwrap().clone()
    }

    pub fn subscribes(&self) -> Vec<SubscriptionRequest> {
        self.subscribes.lock().unwrap().clone()
    }

    pub fn removals(&self) -> Vec<Uuid> {
        self.removals.lock().unwrap().clone()
    }

    pub fn acknowledgements(&self) -> Vec<Acknowledgement> {
        self.acknowledgements.lock().unwrap().clone()
    }
}

/// Mock remote endpoint with programmable responses.
///
/// Defaults answer every call successfully: searches return the configured
/// instances, subscribe assigns a fresh identifier per call, removals and
/// acknowledgements succeed. Queued subscribe results are consumed in call
/// order before the default kicks back in.
pub struct MockServiceClient {
    instances: Vec<ServiceInstance>,
    subscribe_results: Mutex<VecDeque<Result<SubscriptionResponse, ClientError>>>,
    remove_result: Result<RemovalResponse, ClientError>,
    ack_result: Result<(), ClientError>,
    calls: Arc<MockCallLog>,
}

impl Default for MockServiceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServiceClient {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            subscribe_results: Mutex::new(VecDeque::new()),
            remove_result: Ok(RemovalResponse {
                message: "Subscription removed".to_string(),
            }),
            ack_result: Ok(()),
            calls: Arc::new(MockCallLog::default()),
        }
    }

    pub fn with_instances(mut self, instances: Vec<ServiceInstance>) -> Self {
        self.instances = instances;
        self
    }

    /// Queues the result of the next unqueued subscribe call. Chain to
    /// script a sequence of calls.
    pub fn with_subscribe_result(
        self,
        result: Result<SubscriptionResponse, ClientError>,
    ) -> Self {
        self.subscribe_results.lock().unwrap().push_back(result);
        self
    }

    pub fn with_remove_result(mut self, result: Result<RemovalResponse, ClientError>) -> Self {
        self.remove_result = result;
        self
    }

    pub fn with_ack_result(mut self, result: Result<(), ClientError>) -> Self {
        self.ack_result = result;
        self
    }

    pub fn calls(&self) -> Arc<MockCallLog> {
        self.calls.clone()
    }
}

#[async_trait]
impl ServiceClient for MockServiceClient {
    async fn search_service(
        &self,
        filter: &SearchFilter,
        _page: Option<PageRequest>,
    ) -> Result<Vec<ServiceInstance>, ClientError> {
        self.calls.searches.lock().unwrap().push(filter.clone());
        Ok(self.instances.clone())
    }

    async fn subscribe(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionResponse, ClientError> {
        self.calls.subscribes.lock().unwrap().push(request.clone());
        match self.subscribe_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(SubscriptionResponse {
                subscription_identifier: Uuid::new_v4(),
                message: "Subscription successfully created".to_string(),
            }),
        }
    }

    async fn remove_subscription(
        &self,
        subscription_identifier: Uuid,
    ) -> Result<RemovalResponse, ClientError> {
        self.calls
            .removals
            .lock()
            .unwrap()
            .push(subscription_identifier);
        self.remove_result.clone()
    }

    async fn acknowledge(&self, acknowledgement: &Acknowledgement) -> Result<(), ClientError> {
        self.calls
            .acknowledgements
            .lock()
            .unwrap()
            .push(acknowledgement.clone());
        self.ack_result.clone()
    }
}
