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

//! Owner of the singleton subscription slot.
//!
//! States are `NONE` (no stored record) and `ACTIVE` (one stored record);
//! there is no pending state. Creation, removal, and remote reconciliation
//! serialize on one mutex guarding the slot's read-modify-write sequence.

use crate::config::ClientConfig;
use crate::contract::{
    bounded_call, Broadcaster, ClientError, RemovalResponse, StoreError, SubscriptionRecord,
    SubscriptionRequest, SubscriptionResponse, SubscriptionStore,
};
use crate::discovery::{DiscoveryResolver, ResolveError};
use crate::error::ErrorKind;
use crate::observability::events;
use crate::topics;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

const COMPONENT: &str = "subscription_manager";

/// Lifecycle notification pushed by the remote counterparty.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubscriptionLifecycleEvent {
    Created,
    Removed,
}

impl SubscriptionLifecycleEvent {
    /// Broadcast topic disambiguated by event type.
    pub fn topic(&self) -> &'static str {
        match self {
            SubscriptionLifecycleEvent::Created => topics::SUBSCRIPTION_CREATED,
            SubscriptionLifecycleEvent::Removed => topics::SUBSCRIPTION_REMOVED,
        }
    }
}

/// Failures for subscription creation.
#[derive(Debug)]
pub enum CreateSubscriptionError {
    Resolve(ResolveError),
    /// The remote counterparty has no subscription endpoint bound to the MRN.
    SubscriptionUnsupported { mrn: String },
    Remote(ClientError),
    Store(StoreError),
}

impl CreateSubscriptionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CreateSubscriptionError::Resolve(err) => err.kind(),
            CreateSubscriptionError::SubscriptionUnsupported { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CreateSubscriptionError::Resolve(err) => err.code(),
            CreateSubscriptionError::SubscriptionUnsupported { .. } => "subscription_unsupported",
            CreateSubscriptionError::Remote(_) => "remote_subscribe_failed",
            CreateSubscriptionError::Store(_) => "store_failed",
        }
    }
}

impl Display for CreateSubscriptionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateSubscriptionError::Resolve(err) => write!(f, "{err}"),
            CreateSubscriptionError::SubscriptionUnsupported { mrn } => {
                write!(f, "service {mrn} has no subscription endpoint")
            }
            CreateSubscriptionError::Remote(err) => write!(f, "remote subscribe failed: {err}"),
            CreateSubscriptionError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CreateSubscriptionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CreateSubscriptionError::Resolve(err) => Some(err),
            CreateSubscriptionError::Remote(err) => Some(err),
            CreateSubscriptionError::Store(err) => Some(err),
            CreateSubscriptionError::SubscriptionUnsupported { .. } => None,
        }
    }
}

/// Failures for subscription removal.
#[derive(Debug)]
pub enum RemoveSubscriptionError {
    /// Local precondition: removal requires a stored subscription record.
    NoActiveSubscription,
    Resolve(ResolveError),
    /// The remote counterparty does not recognize the stored identifier.
    UnknownToRemote { subscription_identifier: Uuid },
    Remote(ClientError),
    Store(StoreError),
}

impl RemoveSubscriptionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoveSubscriptionError::Resolve(err) => err.kind(),
            RemoveSubscriptionError::UnknownToRemote { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RemoveSubscriptionError::NoActiveSubscription => "no_active_subscription",
            RemoveSubscriptionError::Resolve(err) => err.code(),
            RemoveSubscriptionError::UnknownToRemote { .. } => "subscription_unknown_to_remote",
            RemoveSubscriptionError::Remote(_) => "remote_unsubscribe_failed",
            RemoveSubscriptionError::Store(_) => "store_failed",
        }
    }
}

impl Display for RemoveSubscriptionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoveSubscriptionError::NoActiveSubscription => {
                write!(f, "no active subscription to remove")
            }
            RemoveSubscriptionError::Resolve(err) => write!(f, "{err}"),
            RemoveSubscriptionError::UnknownToRemote {
                subscription_identifier,
            } => write!(
                f,
                "remote counterparty does not recognize subscription {subscription_identifier}"
            ),
            RemoveSubscriptionError::Remote(err) => write!(f, "remote unsubscribe failed: {err}"),
            RemoveSubscriptionError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RemoveSubscriptionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RemoveSubscriptionError::Resolve(err) => Some(err),
            RemoveSubscriptionError::Remote(err) => Some(err),
            RemoveSubscriptionError::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Owns the subscription state machine over the external store.
///
/// The slot mutex is the only shared mutable state in the core; every public
/// operation takes it for the full read-modify-write sequence so that a
/// supersede teardown completes before the new record is persisted and a
/// remote notification cannot interleave with a local create/remove.
pub struct SubscriptionManager {
    resolver: Arc<DiscoveryResolver>,
    store: Arc<dyn SubscriptionStore>,
    broadcaster: Arc<dyn Broadcaster>,
    call_timeout: Duration,
    slot: Mutex<()>,
}

impl SubscriptionManager {
    pub fn new(
        config: &ClientConfig,
        resolver: Arc<DiscoveryResolver>,
        store: Arc<dyn SubscriptionStore>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            resolver,
            store,
            broadcaster,
            call_timeout: config.call_timeout(),
            slot: Mutex::new(()),
        }
    }

    /// The sole stored subscription record, if any. When the store misbehaves
    /// and holds several, the first by insertion order is returned.
    pub async fn active(&self) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self.store.find_all().await?.into_iter().next())
    }

    /// Creates a subscription against `mrn`, superseding any active one.
    ///
    /// An existing subscription is torn down remotely first. Successful
    /// teardown clears the local record immediately, so a later subscribe
    /// failure cannot leave a remotely-removed identifier stored. Teardown
    /// failure is logged and the flow continues (best-effort cleanup, not a
    /// hard precondition). On success the new record replaces any prior one
    /// and the remote response is returned verbatim.
    pub async fn create(
        &self,
        mrn: &str,
        request: &SubscriptionRequest,
    ) -> Result<SubscriptionResponse, CreateSubscriptionError> {
        let _slot = self.slot.lock().await;

        debug!(
            event = events::SUBSCRIPTION_CREATE_START,
            component = COMPONENT,
            mrn,
            "creating subscription"
        );

        let mut existing = self
            .store
            .find_all()
            .await
            .map_err(CreateSubscriptionError::Store)?
            .into_iter()
            .next();

        if let Some(record) = &existing {
            match self.remove_remote(&record.owner_mrn, record).await {
                Ok(_) => {
                    // The remote side no longer recognizes the identifier;
                    // the record must stop being an acknowledgement target
                    // even if the subscribe below fails.
                    self.store
                        .delete(record.id)
                        .await
                        .map_err(CreateSubscriptionError::Store)?;
                    existing = None;
                }
                Err(err) => {
                    warn!(
                        event = events::SUBSCRIPTION_SUPERSEDE_TEARDOWN_FAILED,
                        component = COMPONENT,
                        mrn = record.owner_mrn,
                        subscription_id = %record.subscription_identifier,
                        err = %err,
                        "failed to tear down superseded subscription, continuing"
                    );
                }
            }
        }

        let client = self
            .resolver
            .resolve(mrn)
            .await
            .map_err(CreateSubscriptionError::Resolve)?;

        let response = bounded_call(self.call_timeout, client.subscribe(request))
            .await
            .map_err(|err| match err {
                ClientError::NotFound(_) => CreateSubscriptionError::SubscriptionUnsupported {
                    mrn: mrn.to_string(),
                },
                other => {
                    warn!(
                        event = events::SUBSCRIPTION_CREATE_FAILED,
                        component = COMPONENT,
                        mrn,
                        err = %other,
                        "remote subscribe failed"
                    );
                    CreateSubscriptionError::Remote(other)
                }
            })?;

        // Replacement, never in-place mutation: drop the old record before
        // persisting the new one.
        if let Some(existing) = existing {
            self.store
                .delete(existing.id)
                .await
                .map_err(CreateSubscriptionError::Store)?;
        }
        self.store
            .save(SubscriptionRecord::new(mrn, response.subscription_identifier))
            .await
            .map_err(CreateSubscriptionError::Store)?;

        info!(
            event = events::SUBSCRIPTION_CREATE_OK,
            component = COMPONENT,
            mrn,
            subscription_id = %response.subscription_identifier,
            "subscription created"
        );

        Ok(response)
    }

    /// Removes the active subscription via the service bound to `mrn`.
    pub async fn remove(&self, mrn: &str) -> Result<RemovalResponse, RemoveSubscriptionError> {
        let _slot = self.slot.lock().await;

        let record = self
            .store
            .find_all()
            .await
            .map_err(RemoveSubscriptionError::Store)?
            .into_iter()
            .next()
            .ok_or(RemoveSubscriptionError::NoActiveSubscription)?;

        let response = match self.remove_remote(mrn, &record).await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    event = events::SUBSCRIPTION_REMOVE_FAILED,
                    component = COMPONENT,
                    mrn,
                    subscription_id = %record.subscription_identifier,
                    err = %err,
                    "subscription removal failed"
                );
                return Err(err);
            }
        };

        self.store
            .delete(record.id)
            .await
            .map_err(RemoveSubscriptionError::Store)?;

        info!(
            event = events::SUBSCRIPTION_REMOVE_OK,
            component = COMPONENT,
            mrn,
            subscription_id = %record.subscription_identifier,
            "subscription removed"
        );

        Ok(response)
    }

    /// Resolves a client for `mrn` and removes `record` remotely. Callers
    /// hold the slot lock.
    async fn remove_remote(
        &self,
        mrn: &str,
        record: &SubscriptionRecord,
    ) -> Result<RemovalResponse, RemoveSubscriptionError> {
        let client = self
            .resolver
            .resolve(mrn)
            .await
            .map_err(RemoveSubscriptionError::Resolve)?;

        bounded_call(
            self.call_timeout,
            client.remove_subscription(record.subscription_identifier),
        )
        .await
        .map_err(|err| match err {
            ClientError::NotFound(_) => RemoveSubscriptionError::UnknownToRemote {
                subscription_identifier: record.subscription_identifier,
            },
            other => RemoveSubscriptionError::Remote(other),
        })
    }

    /// Reconciles the stored slot against a remote lifecycle notification.
    ///
    /// `Removed` deletes the matching local record if present; deleting an
    /// absent record is a no-op, not an error. `Created` changes no local
    /// state. Both event types are forwarded to local observers on an
    /// event-specific topic.
    pub async fn reconcile(
        &self,
        event: SubscriptionLifecycleEvent,
        subscription_identifier: Uuid,
    ) {
        {
            let _slot = self.slot.lock().await;

            match event {
                SubscriptionLifecycleEvent::Removed => {
                    self.reconcile_removed(subscription_identifier).await;
                }
                SubscriptionLifecycleEvent::Created => {
                    // Informational only: local state is established solely by
                    // the create path.
                    debug!(
                        event = events::SUBSCRIPTION_REMOTE_CREATED,
                        component = COMPONENT,
                        subscription_id = %subscription_identifier,
                        "remote reports subscription created"
                    );
                }
            }
        }

        self.broadcaster
            .publish(
                event.topic(),
                Value::String(subscription_identifier.to_string()),
                &HashMap::new(),
            )
            .await;

        debug!(
            event = events::SUBSCRIPTION_NOTIFY_PUBLISHED,
            component = COMPONENT,
            topic = event.topic(),
            subscription_id = %subscription_identifier,
            "lifecycle notification forwarded to observers"
        );
    }

    async fn reconcile_removed(&self, subscription_identifier: Uuid) {
        let records = match self.store.find_all().await {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    event = events::SUBSCRIPTION_REMOTE_REMOVED_NOOP,
                    component = COMPONENT,
                    subscription_id = %subscription_identifier,
                    err = %err,
                    "unable to read store during reconciliation"
                );
                return;
            }
        };

        let matching = records
            .into_iter()
            .find(|record| record.subscription_identifier == subscription_identifier);

        match matching {
            Some(record) => {
                if let Err(err) = self.store.delete(record.id).await {
                    warn!(
                        event = events::SUBSCRIPTION_REMOTE_REMOVED_NOOP,
                        component = COMPONENT,
                        subscription_id = %subscription_identifier,
                        err = %err,
                        "unable to delete record during reconciliation"
                    );
                } else {
                    info!(
                        event = events::SUBSCRIPTION_REMOTE_REMOVED,
                        component = COMPONENT,
                        mrn = record.owner_mrn,
                        subscription_id = %subscription_identifier,
                        "remote removed subscription, local record cleared"
                    );
                }
            }
            None => {
                debug!(
                    event = events::SUBSCRIPTION_REMOTE_REMOVED_NOOP,
                    component = COMPONENT,
                    subscription_id = %subscription_identifier,
                    "no local record matches removed subscription"
                );
            }
        }
    }
}
