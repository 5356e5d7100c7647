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

//! Dataset content decoding capability and the JSON container decoder.

use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One member extracted from a decoded dataset document.
///
/// Owned exclusively by the pipeline invocation that produced it; handed to
/// the broadcaster by value and not retained afterward.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedRecord {
    /// Structural kind of the member, used for classification.
    pub kind: String,
    /// Member content as published to observers.
    pub payload: Value,
}

/// Failure to decode a dataset document against the expected content schema.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    Malformed(String),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Malformed(detail) => write!(f, "malformed dataset document: {detail}"),
        }
    }
}

impl Error for DecodeError {}

/// Decodes one dataset document into its member records.
///
/// The dataset grammar is a black box to the core; implementations bind one
/// configured content format.
pub trait DatasetDecoder: Send + Sync {
    fn decode(&self, document: &str) -> Result<Vec<DecodedRecord>, DecodeError>;
}

/// Decoder for the JSON dataset container used by the static-file tooling:
/// `{"members": [{"kind": "BuoyLateral", ...}, ...]}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDatasetDecoder;

impl JsonDatasetDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetDecoder for JsonDatasetDecoder {
    fn decode(&self, document: &str) -> Result<Vec<DecodedRecord>, DecodeError> {
        let root: Value = serde_json::from_str(document)
            .map_err(|err| DecodeError::Malformed(format!("invalid JSON: {err}")))?;

        let members = root
            .get("members")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                DecodeError::Malformed("document has no \"members\" array".to_string())
            })?;

        let mut records = Vec::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            let kind = member
                .get("kind")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    DecodeError::Malformed(format!("member {index} has no string \"kind\""))
                })?;

            records.push(DecodedRecord {
                kind: kind.to_string(),
                payload: member.clone(),
            });
        }

        Ok(records)
    }
}
