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

//! Protocol-client capability: search, subscribe, unsubscribe, acknowledge
//! against one remote endpoint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// One versioned service endpoint returned by a registry search.
///
/// Multiple instances may share the same logical service identifier; only the
/// highest-versioned one matters for resolution.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ServiceInstance {
    pub name: String,
    pub version: String,
    pub endpoint_uri: String,
}

/// Registry search criteria. Unset fields do not constrain the search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchFilter {
    pub instance_mrn: Option<String>,
    pub keyword: Option<String>,
}

impl SearchFilter {
    /// Filter matching exactly one service instance identifier.
    pub fn for_instance_mrn(mrn: &str) -> Self {
        Self {
            instance_mrn: Some(mrn.to_string()),
            ..Default::default()
        }
    }

    /// Free-text keyword filter.
    pub fn for_keyword(keyword: &str) -> Self {
        Self {
            keyword: Some(keyword.to_string()),
            ..Default::default()
        }
    }
}

/// Zero-based page request. `None` at call sites means one unbounded query.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// Parameters for a subscribe call against a remote provider.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SubscriptionRequest {
    pub data_product_type: Option<String>,
    pub product_version: Option<String>,
    pub data_reference: Option<Uuid>,
    /// WKT geometry constraining the subscription's area of interest.
    pub geometry: Option<String>,
    pub subscription_period_start: Option<DateTime<Utc>>,
    pub subscription_period_end: Option<DateTime<Utc>>,
}

/// Remote response to a successful subscribe call.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubscriptionResponse {
    /// Identifier assigned by the remote counterparty.
    pub subscription_identifier: Uuid,
    pub message: String,
}

/// Remote response to a successful unsubscribe call.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RemovalResponse {
    pub message: String,
}

/// Kind of receipt confirmation sent back to the origin of a push.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AckType {
    Delivered,
    Opened,
}

/// Receipt confirmation for one pushed envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct Acknowledgement {
    /// Transaction identifier of the envelope being acknowledged.
    pub transaction_identifier: Uuid,
    pub ack_type: AckType,
    pub created_at: DateTime<Utc>,
}

/// Collaborator-side failure family for protocol-client calls.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClientError {
    /// The remote counterparty has no matching resource.
    NotFound(String),
    /// Transport, TLS, or endpoint-construction failure.
    Transport(String),
    /// The call did not complete within the configured bound.
    TimedOut,
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::NotFound(detail) => write!(f, "remote resource not found: {detail}"),
            ClientError::Transport(detail) => write!(f, "transport failure: {detail}"),
            ClientError::TimedOut => write!(f, "call did not complete within the configured bound"),
        }
    }
}

impl Error for ClientError {}

/// Client bound to one remote SECOM endpoint.
///
/// Implementations are used for one logical operation per resolved instance
/// and are not assumed safe for concurrent reuse.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Registry search. `page: None` retrieves the full result set in one
    /// unbounded query.
    async fn search_service(
        &self,
        filter: &SearchFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<ServiceInstance>, ClientError>;

    /// Creates a push subscription on the remote provider. Fails with
    /// [`ClientError::NotFound`] when the endpoint has no subscription
    /// support.
    async fn subscribe(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionResponse, ClientError>;

    /// Removes a previously created subscription. Fails with
    /// [`ClientError::NotFound`] when the identifier is unknown remotely.
    async fn remove_subscription(
        &self,
        subscription_identifier: Uuid,
    ) -> Result<RemovalResponse, ClientError>;

    /// Best-effort receipt confirmation for one pushed envelope.
    async fn acknowledge(&self, acknowledgement: &Acknowledgement) -> Result<(), ClientError>;
}

impl std::fmt::Debug for dyn ServiceClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ServiceClient")
    }
}

/// Constructs clients bound to concrete endpoint URIs.
///
/// Owns URI validation and TLS setup; failures surface as
/// [`ClientError::Transport`].
#[async_trait]
pub trait ServiceClientFactory: Send + Sync {
    async fn connect(&self, endpoint_uri: &str) -> Result<Arc<dyn ServiceClient>, ClientError>;
}

/// Applies the configured call timeout to one remote operation.
///
/// A timed-out call is terminal for the operation; callers must not apply
/// partial state changes after it.
pub async fn bounded_call<T, F>(limit: Duration, call: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::TimedOut),
    }
}
