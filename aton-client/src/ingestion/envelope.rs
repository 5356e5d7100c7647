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

//! Upload envelope model: one inbound push and its in-band result.

use crate::contract::{CertificateError, CertificateIntrospector};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement preference declared by the pushing counterparty.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckRequest {
    #[default]
    None,
    Delivered,
    DeliveredAndConsumed,
}

/// One inbound dataset push.
///
/// Constructed from the inbound request, consumed once by the pipeline, then
/// discarded; never persisted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UploadEnvelope {
    pub transaction_identifier: Uuid,
    pub data_product_type: Option<String>,
    #[serde(default)]
    pub ack_requested: AckRequest,
    pub raw_payload: Vec<u8>,
    /// PEM public certificate from the envelope's signature metadata.
    pub signature_public_certificate_pem: Option<String>,
}

/// Signer metadata derived from the envelope's embedded certificate.
///
/// Purely derived data; recomputed per envelope, never persisted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignerIdentity {
    pub signed_by: String,
    pub issued_by: String,
}

impl SignerIdentity {
    /// Extracts signer and issuer identities from one PEM certificate.
    pub fn from_certificate(
        certificates: &dyn CertificateIntrospector,
        pem: &str,
    ) -> Result<Self, CertificateError> {
        Ok(Self {
            signed_by: certificates.extract_subject_id(pem)?,
            issued_by: certificates.extract_issuer_id(pem)?,
        })
    }
}

/// Error code carried in-band in an [`UploadResult`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UploadResultCode {
    SchemaValidationError,
}

impl UploadResultCode {
    pub fn code(&self) -> &'static str {
        match self {
            UploadResultCode::SchemaValidationError => "schema_validation_error",
        }
    }
}

/// Response to the pushing counterparty for one ingested envelope.
///
/// Decode failures are reported here rather than as faults; the HTTP
/// exchange with the pusher is not aborted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UploadResult {
    code: Option<UploadResultCode>,
    message: Option<String>,
}

impl UploadResult {
    pub(crate) fn success() -> Self {
        Self {
            code: None,
            message: None,
        }
    }

    pub(crate) fn schema_validation_error(message: String) -> Self {
        Self {
            code: Some(UploadResultCode::SchemaValidationError),
            message: Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.is_none()
    }

    pub fn code(&self) -> Option<UploadResultCode> {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
