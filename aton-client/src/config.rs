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

//! Core client configuration shared by resolver, manager, and pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_data_product_type() -> String {
    "S125".to_string()
}

fn default_call_timeout_secs() -> u64 {
    15
}

/// Configuration for the core client components.
///
/// `registry_endpoint` is the discovery/registry base URI; resolution fails
/// with a validation error when it is absent. All remote calls are bounded by
/// `call_timeout_secs`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub registry_endpoint: Option<String>,
    #[serde(default = "default_data_product_type")]
    pub data_product_type: String,
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl ClientConfig {
    /// Upper bound applied to every discovery, subscribe, unsubscribe, and
    /// acknowledge call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            registry_endpoint: None,
            data_product_type: default_data_product_type(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}
