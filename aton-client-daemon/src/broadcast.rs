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

//! Broadcaster backend writing every published message to the log.
//!
//! Stands in for a web-socket or message-bus fan-out until one is wired up.

use async_trait::async_trait;
use aton_client::contract::Broadcaster;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

pub(crate) struct LogBroadcaster;

#[async_trait]
impl Broadcaster for LogBroadcaster {
    async fn publish(&self, topic: &str, payload: Value, headers: &HashMap<String, String>) {
        info!(topic, ?headers, %payload, "broadcast");
    }
}
