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

//! Durable record of the at-most-one active subscription.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::Mutex;
use uuid::Uuid;

/// The persistent subscription record.
///
/// At most one record exists system-wide at any time. Records are replaced,
/// never mutated in place.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubscriptionRecord {
    /// Local record key.
    pub id: Uuid,
    /// MRN of the remote service this subscription was created against.
    pub owner_mrn: String,
    /// Identifier assigned by the remote counterparty.
    pub subscription_identifier: Uuid,
}

impl SubscriptionRecord {
    pub fn new(owner_mrn: &str, subscription_identifier: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_mrn: owner_mrn.to_string(),
            subscription_identifier,
        }
    }
}

/// Backend failure reported by a subscription store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Backend(detail) => write!(f, "subscription store failure: {detail}"),
        }
    }
}

impl Error for StoreError {}

/// CRUD over the logical subscription record, by identifier or owner MRN.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// All stored records in insertion order.
    async fn find_all(&self) -> Result<Vec<SubscriptionRecord>, StoreError>;

    async fn find_by_owner_mrn(
        &self,
        owner_mrn: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError>;

    async fn save(&self, record: SubscriptionRecord) -> Result<(), StoreError>;

    /// Deleting an absent record is a no-op, not an error.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Default single-slot store keeping records in process memory.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    records: Mutex<Vec<SubscriptionRecord>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn find_all(&self) -> Result<Vec<SubscriptionRecord>, StoreError> {
        Ok(self.records.lock().await.clone())
    }

    async fn find_by_owner_mrn(
        &self,
        owner_mrn: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|record| record.owner_mrn == owner_mrn)
            .cloned())
    }

    async fn save(&self, record: SubscriptionRecord) -> Result<(), StoreError> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.records.lock().await.retain(|record| record.id != id);
        Ok(())
    }
}
