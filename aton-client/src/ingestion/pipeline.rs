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

//! End-to-end processing of one pushed upload envelope.
//!
//! A linear pipeline with no state across envelopes: decode, derive signer
//! headers, classify and fan out each record, then optionally acknowledge.
//! Concurrent ingestion of multiple envelopes is safe and expected.

use crate::config::ClientConfig;
use crate::contract::{
    bounded_call, Acknowledgement, AckType, Broadcaster, CertificateIntrospector, DatasetDecoder,
    SubscriptionStore,
};
use crate::discovery::DiscoveryResolver;
use crate::ingestion::classification;
use crate::ingestion::envelope::{AckRequest, SignerIdentity, UploadEnvelope, UploadResult};
use crate::observability::{events, fields};
use crate::topics;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const COMPONENT: &str = "ingestion_pipeline";

/// Processes pushed upload envelopes independently of one another.
pub struct IngestionPipeline {
    decoder: Arc<dyn DatasetDecoder>,
    broadcaster: Arc<dyn Broadcaster>,
    certificates: Arc<dyn CertificateIntrospector>,
    resolver: Arc<DiscoveryResolver>,
    store: Arc<dyn SubscriptionStore>,
    call_timeout: Duration,
}

impl IngestionPipeline {
    pub fn new(
        config: &ClientConfig,
        decoder: Arc<dyn DatasetDecoder>,
        broadcaster: Arc<dyn Broadcaster>,
        certificates: Arc<dyn CertificateIntrospector>,
        resolver: Arc<DiscoveryResolver>,
        store: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            decoder,
            broadcaster,
            certificates,
            resolver,
            store,
            call_timeout: config.call_timeout(),
        }
    }

    /// Ingests one envelope: decode, classify, fan out, acknowledge.
    ///
    /// Decode failures are returned in-band as a schema-validation result
    /// with nothing broadcast and no acknowledgement attempted. The
    /// acknowledgement step is fire-and-forget: its failures never affect
    /// the returned result.
    pub async fn ingest(&self, envelope: UploadEnvelope) -> UploadResult {
        let transaction_identifier = envelope.transaction_identifier;

        let document = match String::from_utf8(envelope.raw_payload) {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    event = events::UPLOAD_DECODE_FAILED,
                    component = COMPONENT,
                    transaction_id = %transaction_identifier,
                    err = %err,
                    "upload payload is not valid UTF-8"
                );
                return UploadResult::schema_validation_error(format!(
                    "upload payload is not valid UTF-8: {err}"
                ));
            }
        };

        let records = match self.decoder.decode(&document) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    event = events::UPLOAD_DECODE_FAILED,
                    component = COMPONENT,
                    transaction_id = %transaction_identifier,
                    err = %err,
                    "upload payload failed schema decoding"
                );
                return UploadResult::schema_validation_error(err.to_string());
            }
        };

        let batch_headers = self.batch_headers(
            envelope.data_product_type.as_deref(),
            envelope.signature_public_certificate_pem.as_deref(),
            transaction_identifier,
        );

        let record_count = records.len();
        for record in records {
            let mut headers = batch_headers.clone();
            headers.insert(
                topics::headers::TYPE_TAG.to_string(),
                classification::type_tag(&record.kind).to_string(),
            );
            self.broadcaster
                .publish(topics::SUBSCRIPTION_UPDATE, record.payload, &headers)
                .await;
        }

        debug!(
            event = events::UPLOAD_RECORDS_PUBLISHED,
            component = COMPONENT,
            transaction_id = %transaction_identifier,
            topic = topics::SUBSCRIPTION_UPDATE,
            records = record_count,
            "published decoded records to observers"
        );

        if envelope.ack_requested != AckRequest::None {
            self.acknowledge_delivery(transaction_identifier).await;
        }

        UploadResult::success()
    }

    /// Headers shared by every record of one envelope, computed once.
    fn batch_headers(
        &self,
        data_product_type: Option<&str>,
        certificate_pem: Option<&str>,
        transaction_identifier: Uuid,
    ) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        if let Some(data_product_type) = data_product_type {
            headers.insert(
                topics::headers::DATA_PRODUCT_TYPE.to_string(),
                data_product_type.to_string(),
            );
        }

        // Absence of a certificate is not an error; the headers are simply
        // omitted. The same holds when extraction fails.
        if let Some(pem) = certificate_pem {
            match SignerIdentity::from_certificate(self.certificates.as_ref(), pem) {
                Ok(identity) => {
                    headers.insert(topics::headers::SIGNED_BY.to_string(), identity.signed_by);
                    headers.insert(topics::headers::ISSUED_BY.to_string(), identity.issued_by);
                }
                Err(err) => {
                    warn!(
                        event = events::UPLOAD_SIGNER_EXTRACT_FAILED,
                        component = COMPONENT,
                        transaction_id = %transaction_identifier,
                        err = %err,
                        "unable to extract signer identity, omitting signer headers"
                    );
                }
            }
        }

        headers
    }

    /// Fire-and-forget `DELIVERED` acknowledgement back to the counterparty
    /// the active subscription was created against. Resolved once per
    /// envelope; every failure is logged and swallowed.
    async fn acknowledge_delivery(&self, transaction_identifier: Uuid) {
        let target = match self.store.find_all().await {
            Ok(records) => records.into_iter().next(),
            Err(err) => {
                warn!(
                    event = events::UPLOAD_ACK_FAILED,
                    component = COMPONENT,
                    transaction_id = %transaction_identifier,
                    err = %err,
                    "unable to read subscription store for acknowledgement target"
                );
                return;
            }
        };

        let Some(record) = target else {
            debug!(
                event = events::UPLOAD_ACK_SKIPPED,
                component = COMPONENT,
                transaction_id = %transaction_identifier,
                reason = fields::REASON_NO_ACTIVE_SUBSCRIPTION,
                "acknowledgement requested but no subscription is active"
            );
            return;
        };

        let client = match self.resolver.resolve(&record.owner_mrn).await {
            Ok(client) => client,
            Err(err) => {
                warn!(
                    event = events::UPLOAD_ACK_FAILED,
                    component = COMPONENT,
                    transaction_id = %transaction_identifier,
                    mrn = record.owner_mrn,
                    err = %err,
                    "unable to resolve acknowledgement target"
                );
                return;
            }
        };

        let acknowledgement = Acknowledgement {
            transaction_identifier,
            ack_type: AckType::Delivered,
            created_at: Utc::now(),
        };

        match bounded_call(self.call_timeout, client.acknowledge(&acknowledgement)).await {
            Ok(()) => {
                debug!(
                    event = events::UPLOAD_ACK_SENT,
                    component = COMPONENT,
                    transaction_id = %transaction_identifier,
                    mrn = record.owner_mrn,
                    "delivery acknowledged"
                );
            }
            Err(err) => {
                warn!(
                    event = events::UPLOAD_ACK_FAILED,
                    component = COMPONENT,
                    transaction_id = %transaction_identifier,
                    mrn = record.owner_mrn,
                    err = %err,
                    "acknowledgement failed, not retried"
                );
            }
        }
    }
}
