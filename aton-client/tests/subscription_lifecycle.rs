/********************************************************************************
 * Copyright (c) 2026 Contributors to the AtoN Service Client project
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use async_trait::async_trait;
use aton_client::config::ClientConfig;
use aton_client::contract::{
    Acknowledgement, ClientError, InMemorySubscriptionStore, PageRequest, RemovalResponse,
    SearchFilter, ServiceClient, ServiceInstance, SubscriptionRequest, SubscriptionResponse,
    SubscriptionStore,
};
use aton_client::{
    CreateSubscriptionError, DiscoveryResolver, RemoveSubscriptionError, SubscriptionLifecycleEvent,
    SubscriptionManager,
};
use integration_test_utils::{
    init_logging, registry_instance, MockClientFactory, MockServiceClient, RecordingBroadcaster,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const REGISTRY_ENDPOINT: &str = "https://registry.example.org/api/secom";
const SERVICE_MRN: &str = "urn:mrn:grad:service:instance:niord-aton";
const SERVICE_ENDPOINT: &str = "https://aton.example.org/api/secom";

fn config() -> ClientConfig {
    ClientConfig {
        registry_endpoint: Some(REGISTRY_ENDPOINT.to_string()),
        ..Default::default()
    }
}

struct Harness {
    manager: SubscriptionManager,
    service: Arc<MockServiceClient>,
    store: Arc<InMemorySubscriptionStore>,
    broadcaster: Arc<RecordingBroadcaster>,
}

/// Wires a manager against a registry answering for one service instance and
/// the given mock serving as that instance's endpoint.
fn harness(service: MockServiceClient) -> Harness {
    init_logging();

    let registry = MockServiceClient::new().with_instances(vec![registry_instance(
        SERVICE_MRN,
        "0.0.2",
        SERVICE_ENDPOINT,
    )]);
    let service = Arc::new(service);
    let factory = MockClientFactory::new()
        .with_client(REGISTRY_ENDPOINT, Arc::new(registry))
        .with_client(SERVICE_ENDPOINT, service.clone());

    let config = config();
    let resolver = Arc::new(DiscoveryResolver::new(&config, Arc::new(factory)));
    let store = Arc::new(InMemorySubscriptionStore::new());
    let broadcaster = Arc::new(RecordingBroadcaster::new());
    let manager = SubscriptionManager::new(
        &config,
        resolver,
        store.clone() as Arc<dyn SubscriptionStore>,
        broadcaster.clone(),
    );

    Harness {
        manager,
        service,
        store,
        broadcaster,
    }
}

fn subscription_response(subscription_identifier: Uuid) -> SubscriptionResponse {
    SubscriptionResponse {
        subscription_identifier,
        message: "Subscription successfully created".to_string(),
    }
}

#[tokio::test]
async fn create_subscribes_remotely_and_stores_one_record() {
    let assigned = Uuid::new_v4();
    let harness = harness(
        MockServiceClient::new().with_subscribe_result(Ok(subscription_response(assigned))),
    );

    let response = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("create should succeed");

    assert_eq!(response.subscription_identifier, assigned);

    let active = harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .expect("a record should be active");
    assert_eq!(active.owner_mrn, SERVICE_MRN);
    assert_eq!(active.subscription_identifier, assigned);
    assert_eq!(harness.service.calls().subscribes().len(), 1);
}

#[tokio::test]
async fn create_supersedes_by_removing_the_prior_subscription_remotely() {
    let harness = harness(MockServiceClient::new());

    let first = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("first create should succeed");

    let second = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("second create should succeed");

    // The prior identifier was removed remotely before the new one replaced
    // the stored record.
    let calls = harness.service.calls();
    assert_eq!(calls.removals(), vec![first.subscription_identifier]);

    let records = harness
        .store
        .find_all()
        .await
        .expect("store should be readable");
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].subscription_identifier,
        second.subscription_identifier
    );
}

#[tokio::test]
async fn create_continues_when_supersede_teardown_fails() {
    let harness = harness(MockServiceClient::new().with_remove_result(Err(
        ClientError::Transport("connection reset".to_string()),
    )));

    harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("first create should succeed");

    let second = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("teardown failure should not block the new subscription");

    let active = harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .expect("a record should be active");
    assert_eq!(
        active.subscription_identifier,
        second.subscription_identifier
    );
}

#[tokio::test]
async fn failed_replacement_subscribe_clears_the_superseded_record() {
    let first_identifier = Uuid::new_v4();
    let harness = harness(
        MockServiceClient::new()
            .with_subscribe_result(Ok(subscription_response(first_identifier)))
            .with_subscribe_result(Err(ClientError::Transport(
                "connection reset".to_string(),
            ))),
    );

    harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("first create should succeed");

    let result = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await;

    assert!(matches!(result, Err(CreateSubscriptionError::Remote(_))));
    // The teardown removed the first subscription remotely, so its record
    // must not survive as an acknowledgement target.
    assert_eq!(harness.service.calls().removals(), vec![first_identifier]);
    assert!(harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .is_none());
}

#[tokio::test]
async fn create_maps_remote_not_found_to_subscription_unsupported() {
    let harness = harness(MockServiceClient::new().with_subscribe_result(Err(
        ClientError::NotFound("no subscription interface".to_string()),
    )));

    let result = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await;

    assert!(matches!(
        result,
        Err(CreateSubscriptionError::SubscriptionUnsupported { mrn }) if mrn == SERVICE_MRN
    ));
    assert!(harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .is_none());
}

#[tokio::test]
async fn concurrent_creates_leave_exactly_one_record() {
    let harness = harness(MockServiceClient::new());
    let manager = Arc::new(harness.manager);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move {
            manager
                .create(SERVICE_MRN, &SubscriptionRequest::default())
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("task should not panic")
            .expect("create should succeed");
    }

    let records = harness
        .store
        .find_all()
        .await
        .expect("store should be readable");
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn remove_clears_the_record_and_unsubscribes_remotely() {
    let harness = harness(MockServiceClient::new());

    let created = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("create should succeed");

    harness
        .manager
        .remove(SERVICE_MRN)
        .await
        .expect("remove should succeed");

    assert!(harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .is_none());
    // One supersede check plus the explicit removal.
    assert!(harness
        .service
        .calls()
        .removals()
        .contains(&created.subscription_identifier));
}

#[tokio::test]
async fn remove_without_active_subscription_fails_locally() {
    let harness = harness(MockServiceClient::new());

    let result = harness.manager.remove(SERVICE_MRN).await;

    assert!(matches!(
        result,
        Err(RemoveSubscriptionError::NoActiveSubscription)
    ));
    assert_eq!(
        result.expect_err("must be an error").to_string(),
        "no active subscription to remove"
    );
    // Nothing was sent remotely.
    assert!(harness.service.calls().removals().is_empty());
}

#[tokio::test]
async fn remove_keeps_the_record_when_the_remote_call_fails() {
    let harness = harness(MockServiceClient::new().with_remove_result(Err(
        ClientError::Transport("connection reset".to_string()),
    )));

    harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("create should succeed");

    let result = harness.manager.remove(SERVICE_MRN).await;

    assert!(matches!(result, Err(RemoveSubscriptionError::Remote(_))));
    assert!(harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .is_some());
}

struct StalledSubscribeClient;

#[async_trait]
impl ServiceClient for StalledSubscribeClient {
    async fn search_service(
        &self,
        _filter: &SearchFilter,
        _page: Option<PageRequest>,
    ) -> Result<Vec<ServiceInstance>, ClientError> {
        Ok(Vec::new())
    }

    async fn subscribe(
        &self,
        _request: &SubscriptionRequest,
    ) -> Result<SubscriptionResponse, ClientError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(subscription_response(Uuid::new_v4()))
    }

    async fn remove_subscription(
        &self,
        _subscription_identifier: Uuid,
    ) -> Result<RemovalResponse, ClientError> {
        unimplemented!("not exercised by the timeout scenario")
    }

    async fn acknowledge(&self, _acknowledgement: &Acknowledgement) -> Result<(), ClientError> {
        unimplemented!("not exercised by the timeout scenario")
    }
}

#[tokio::test]
async fn timed_out_subscribe_persists_nothing() {
    init_logging();

    let registry = MockServiceClient::new().with_instances(vec![registry_instance(
        SERVICE_MRN,
        "0.0.2",
        SERVICE_ENDPOINT,
    )]);
    let factory = MockClientFactory::new()
        .with_client(REGISTRY_ENDPOINT, Arc::new(registry))
        .with_client(SERVICE_ENDPOINT, Arc::new(StalledSubscribeClient));

    let config = ClientConfig {
        registry_endpoint: Some(REGISTRY_ENDPOINT.to_string()),
        call_timeout_secs: 0,
        ..Default::default()
    };
    let resolver = Arc::new(DiscoveryResolver::new(&config, Arc::new(factory)));
    let manager = SubscriptionManager::new(
        &config,
        resolver,
        Arc::new(InMemorySubscriptionStore::new()),
        Arc::new(RecordingBroadcaster::new()),
    );

    let result = manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await;

    assert!(matches!(
        result,
        Err(CreateSubscriptionError::Remote(ClientError::TimedOut))
    ));
    assert!(manager
        .active()
        .await
        .expect("store should be readable")
        .is_none());
}

#[tokio::test]
async fn remote_removal_notification_clears_the_matching_record() {
    let harness = harness(MockServiceClient::new());

    let created = harness
        .manager
        .create(SERVICE_MRN, &SubscriptionRequest::default())
        .await
        .expect("create should succeed");

    harness
        .manager
        .reconcile(
            SubscriptionLifecycleEvent::Removed,
            created.subscription_identifier,
        )
        .await;

    assert!(harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .is_none());

    let published = harness.broadcaster.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, "aton/subscription/removed");
    assert_eq!(
        published[0].payload,
        serde_json::Value::String(created.subscription_identifier.to_string())
    );
}

#[tokio::test]
async fn remote_removal_notification_is_idempotent() {
    let harness = harness(MockServiceClient::new());
    let unknown = Uuid::new_v4();

    harness
        .manager
        .reconcile(SubscriptionLifecycleEvent::Removed, unknown)
        .await;
    harness
        .manager
        .reconcile(SubscriptionLifecycleEvent::Removed, unknown)
        .await;

    // No local record existed; observers are still notified each time.
    assert_eq!(harness.broadcaster.published().len(), 2);
}

#[tokio::test]
async fn remote_creation_notification_changes_no_local_state() {
    let harness = harness(MockServiceClient::new());

    harness
        .manager
        .reconcile(SubscriptionLifecycleEvent::Created, Uuid::new_v4())
        .await;

    assert!(harness
        .manager
        .active()
        .await
        .expect("store should be readable")
        .is_none());

    let published = harness.broadcaster.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, "aton/subscription/created");
}
