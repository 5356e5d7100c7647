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

//! Static-file registry provider: a `ServiceClientFactory` whose clients
//! answer searches from a JSON catalog on disk and keep subscription state
//! in memory. Intended for local development and integration testing, not
//! for talking to a live registry.

use aton_client::contract::{
    Acknowledgement, ClientError, PageRequest, RemovalResponse, SearchFilter, ServiceClient,
    ServiceClientFactory, ServiceInstance, SubscriptionRequest, SubscriptionResponse,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, canonicalize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};
use uuid::Uuid;

/// Factory reading service instances from one JSON catalog file.
///
/// Every client it hands out shares the same set of issued subscription
/// identifiers, so a subscription created through one endpoint can be
/// removed through another, and removing an unknown identifier fails with
/// [`ClientError::NotFound`] exactly like a live counterparty would.
pub struct StaticFileRegistry {
    catalog_file: String,
    issued: Arc<Mutex<HashSet<Uuid>>>,
}

impl StaticFileRegistry {
    pub fn new(catalog_file: String) -> Self {
        StaticFileRegistry {
            catalog_file,
            issued: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

#[async_trait]
impl ServiceClientFactory for StaticFileRegistry {
    async fn connect(&self, endpoint_uri: &str) -> Result<Arc<dyn ServiceClient>, ClientError> {
        debug!("connect to static endpoint: {endpoint_uri}");
        Ok(Arc::new(StaticFileClient {
            catalog_file: self.catalog_file.clone(),
            issued: self.issued.clone(),
        }))
    }
}

struct StaticFileClient {
    catalog_file: String,
    issued: Arc<Mutex<HashSet<Uuid>>>,
}

impl StaticFileClient {
    /// Reads and parses the catalog on every call so edits to the file are
    /// picked up without restarting.
    fn read_catalog(&self) -> Result<Vec<ServiceInstance>, ClientError> {
        let catalog_file = PathBuf::from(self.catalog_file.clone());
        debug!("catalog_file: {catalog_file:?}");

        let catalog_file = canonicalize(catalog_file).map_err(|e| {
            ClientError::Transport(format!("static catalog file not found: {e:?}"))
        })?;

        let data = fs::read_to_string(catalog_file)
            .map_err(|e| ClientError::Transport(format!("unable to read catalog: {e:?}")))?;

        let root: Value = serde_json::from_str(&data)
            .map_err(|e| ClientError::Transport(format!("unable to parse catalog: {e:?}")))?;

        let entries = root
            .get("instances")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ClientError::Transport("catalog has no \"instances\" array".to_string())
            })?;

        let mut instances = Vec::new();
        for entry in entries {
            match serde_json::from_value::<ServiceInstance>(entry.clone()) {
                Ok(instance) => {
                    debug!("catalog instance: {instance:?}");
                    instances.push(instance);
                }
                Err(e) => {
                    error!("skipping malformed catalog entry '{entry}': {e}");
                }
            }
        }

        Ok(instances)
    }
}

fn matches(filter: &SearchFilter, instance: &ServiceInstance) -> bool {
    if let Some(mrn) = &filter.instance_mrn {
        if &instance.name != mrn {
            return false;
        }
    }
    if let Some(keyword) = &filter.keyword {
        if !instance
            .name
            .to_lowercase()
            .contains(&keyword.to_lowercase())
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl ServiceClient for StaticFileClient {
    async fn search_service(
        &self,
        filter: &SearchFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<ServiceInstance>, ClientError> {
        debug!("search_service filter: {filter:?}, page: {page:?}");

        let mut hits: Vec<ServiceInstance> = self
            .read_catalog()?
            .into_iter()
            .filter(|instance| matches(filter, instance))
            .collect();

        if let Some(page) = page {
            let start = (page.page as usize).saturating_mul(page.page_size as usize);
            hits = hits
                .into_iter()
                .skip(start)
                .take(page.page_size as usize)
                .collect();
        }

        Ok(hits)
    }

    async fn subscribe(
        &self,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionResponse, ClientError> {
        let subscription_identifier = Uuid::new_v4();
        debug!("subscribe request: {request:?}, issued: {subscription_identifier}");

        self.issued.lock().await.insert(subscription_identifier);

        Ok(SubscriptionResponse {
            subscription_identifier,
            message: "Subscription successfully created".to_string(),
        })
    }

    async fn remove_subscription(
        &self,
        subscription_identifier: Uuid,
    ) -> Result<RemovalResponse, ClientError> {
        debug!("remove_subscription: {subscription_identifier}");

        if !self.issued.lock().await.remove(&subscription_identifier) {
            return Err(ClientError::NotFound(format!(
                "no subscription with identifier {subscription_identifier}"
            )));
        }

        Ok(RemovalResponse {
            message: "Subscription removed".to_string(),
        })
    }

    async fn acknowledge(&self, acknowledgement: &Acknowledgement) -> Result<(), ClientError> {
        debug!("acknowledge: {acknowledgement:?}");
        Ok(())
    }
}
