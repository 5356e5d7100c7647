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

//! Shared mock collaborators and helpers for `aton-client` integration tests
//! and doctests.

mod mock_service_client;
pub use mock_service_client::{MockCallLog, MockServiceClient};

mod mock_client_factory;
pub use mock_client_factory::MockClientFactory;

mod recording_broadcaster;
pub use recording_broadcaster::{PublishedMessage, RecordingBroadcaster};

mod certificates;
pub use certificates::{FixedCertificateIntrospector, RejectingCertificateIntrospector};

mod fixtures;
pub use fixtures::{dataset_document, registry_instance};

/// One-time tracing initialization for test binaries. Safe to call from
/// multiple tests; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
