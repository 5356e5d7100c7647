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

//! # aton-client
//!
//! `aton-client` is a client/adapter for a SECOM-style maritime data-exchange
//! protocol: it resolves service endpoints from a registry, maintains a single
//! push subscription against a remote Aids-to-Navigation ("AtoN") provider,
//! and ingests signed dataset uploads pushed by that provider, redistributing
//! the decoded records to local observers.
//!
//! The wire client, certificate cryptography, persistence backend, and local
//! fan-out transport are consumed as capability traits (see [`contract`]);
//! this crate owns the orchestration between them.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use aton_client::config::ClientConfig;
//! use aton_client::contract::{InMemorySubscriptionStore, SubscriptionRequest};
//! use aton_client::{DiscoveryResolver, SubscriptionManager};
//! use integration_test_utils::{MockClientFactory, MockServiceClient, RecordingBroadcaster};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let registry = MockServiceClient::new().with_instances(vec![
//!     integration_test_utils::registry_instance(
//!         "aton-service",
//!         "0.0.2",
//!         "https://aton.example.org/api/secom",
//!     ),
//! ]);
//! let service = MockServiceClient::new();
//!
//! let factory = MockClientFactory::new()
//!     .with_client("https://registry.example.org", Arc::new(registry))
//!     .with_client("https://aton.example.org/api/secom", Arc::new(service));
//!
//! let config = ClientConfig {
//!     registry_endpoint: Some("https://registry.example.org".to_string()),
//!     ..Default::default()
//! };
//!
//! let resolver = Arc::new(DiscoveryResolver::new(&config, Arc::new(factory)));
//! let store = Arc::new(InMemorySubscriptionStore::new());
//! let broadcaster = Arc::new(RecordingBroadcaster::new());
//! let manager = SubscriptionManager::new(&config, resolver, store, broadcaster);
//!
//! let response = manager
//!     .create("urn:mrn:mcp:service:aton", &SubscriptionRequest::default())
//!     .await
//!     .unwrap();
//! assert!(manager.active().await.unwrap().is_some());
//!
//! manager
//!     .reconcile(
//!         aton_client::SubscriptionLifecycleEvent::Removed,
//!         response.subscription_identifier,
//!     )
//!     .await;
//! assert!(manager.active().await.unwrap().is_none());
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - [`contract`]: capability traits and model types for external collaborators
//! - [`discovery`]: MRN-to-client resolution against the service registry
//! - [`subscription`]: singleton subscription slot and remote reconciliation
//! - [`ingestion`]: signed upload decode, classification, fan-out, acknowledgement
//! - [`topics`]: stable external topic and header names on the broadcast channel
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events. Library code emits
//! events/spans and does not unconditionally initialize a global subscriber.
//! Binaries and tests are responsible for one-time `tracing_subscriber`
//! initialization at process boundaries.

pub mod config;
pub mod contract;
pub mod topics;

mod error;
pub use error::ErrorKind;

pub mod discovery;
pub use discovery::{DiscoveryResolver, ResolveError, SearchError};

pub mod subscription;
pub use subscription::{
    CreateSubscriptionError, RemoveSubscriptionError, SubscriptionLifecycleEvent,
    SubscriptionManager,
};

pub mod ingestion;
pub use ingestion::{
    AckRequest, IngestionPipeline, SignerIdentity, UploadEnvelope, UploadResult, UploadResultCode,
};

#[doc(hidden)]
pub mod observability;
