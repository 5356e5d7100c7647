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

mod broadcast;
mod config;

use crate::broadcast::LogBroadcaster;
use crate::config::{Config, RegistryProviderMode};
use aton_client::contract::{InMemorySubscriptionStore, SubscriptionRequest};
use aton_client::{DiscoveryResolver, SubscriptionManager};
use clap::Parser;
use registry_static_file::StaticFileRegistry;
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::sync::Arc;
use std::thread;
use tracing::info;

#[derive(Parser)]
#[command()]
struct DaemonArgs {
    #[arg(short, long, value_name = "FILE")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    info!("Started aton-client-daemon");

    let args = DaemonArgs::parse();
    let mut file =
        File::open(args.config).map_err(|e| format!("Config file not found: {e:?}"))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| format!("Unable to read config file: {e:?}"))?;

    let config: Config =
        json5::from_str(&contents).map_err(|e| format!("Unable to parse config file: {e:?}"))?;

    let registry = match config.registry.mode {
        RegistryProviderMode::StaticFile => {
            Arc::new(StaticFileRegistry::new(config.registry.file_path.clone()))
        }
        RegistryProviderMode::LiveSecom => {
            return Err(
                "Live SECOM registry support is not wired up yet; use static_file mode".into(),
            );
        }
    };

    let resolver = Arc::new(DiscoveryResolver::new(&config.aton_client, registry));
    let store = Arc::new(InMemorySubscriptionStore::new());
    let broadcaster = Arc::new(LogBroadcaster);
    let manager = SubscriptionManager::new(&config.aton_client, resolver, store, broadcaster);

    let request = SubscriptionRequest {
        data_product_type: Some(config.aton_client.data_product_type.clone()),
        ..Default::default()
    };
    let response = manager
        .create(&config.subscription.service_mrn, &request)
        .await
        .map_err(|e| format!("Unable to create startup subscription: {e}"))?;

    info!(
        subscription_identifier = %response.subscription_identifier,
        "subscribed to {}",
        config.subscription.service_mrn
    );

    thread::park();

    Ok(())
}
