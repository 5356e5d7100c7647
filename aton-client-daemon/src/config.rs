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

use aton_client::config::ClientConfig;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) aton_client: ClientConfig,
    pub(crate) registry: RegistryConfig,
    pub(crate) subscription: SubscriptionConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub(crate) mode: RegistryProviderMode,
    /// Catalog file backing the static-file provider. Ignored in live mode.
    pub(crate) file_path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistryProviderMode {
    #[default]
    StaticFile,
    LiveSecom,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionConfig {
    /// Identifier of the service instance to subscribe to at startup.
    pub(crate) service_mrn: String,
}
