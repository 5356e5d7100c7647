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

//! Resolves a service MRN to a client bound to the best matching endpoint.

use crate::config::ClientConfig;
use crate::contract::{
    bounded_call, ClientError, PageRequest, SearchFilter, ServiceClient, ServiceClientFactory,
    ServiceInstance,
};
use crate::discovery::version_order;
use crate::error::ErrorKind;
use crate::observability::events;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const COMPONENT: &str = "discovery_resolver";

/// Failures for MRN resolution.
#[derive(Debug)]
pub enum ResolveError {
    BlankInstanceMrn,
    RegistryUnconfigured,
    Registry(ClientError),
    NoInstanceFound { mrn: String },
    ClientConstruction { endpoint_uri: String, source: ClientError },
}

impl ResolveError {
    /// Caller-visible failure family.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::NoInstanceFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Validation,
        }
    }

    /// Stable identifying code.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::BlankInstanceMrn => "blank_instance_mrn",
            ResolveError::RegistryUnconfigured => "registry_unconfigured",
            ResolveError::Registry(_) => "registry_search_failed",
            ResolveError::NoInstanceFound { .. } => "no_instance_found",
            ResolveError::ClientConstruction { .. } => "client_construction_failed",
        }
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::BlankInstanceMrn => {
                write!(f, "service instance MRN must not be blank")
            }
            ResolveError::RegistryUnconfigured => {
                write!(f, "no connection to service registry")
            }
            ResolveError::Registry(err) => write!(f, "registry search failed: {err}"),
            ResolveError::NoInstanceFound { mrn } => {
                write!(f, "no service instance found for MRN {mrn}")
            }
            ResolveError::ClientConstruction { endpoint_uri, source } => write!(
                f,
                "unable to construct service client for endpoint {endpoint_uri}: {source}"
            ),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolveError::Registry(err) => Some(err),
            ResolveError::ClientConstruction { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failures for registry keyword search.
#[derive(Debug)]
pub enum SearchError {
    RegistryUnconfigured,
    Registry(ClientError),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    pub fn code(&self) -> &'static str {
        match self {
            SearchError::RegistryUnconfigured => "registry_unconfigured",
            SearchError::Registry(_) => "registry_search_failed",
        }
    }
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::RegistryUnconfigured => write!(f, "no connection to service registry"),
            SearchError::Registry(err) => write!(f, "registry search failed: {err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SearchError::Registry(err) => Some(err),
            SearchError::RegistryUnconfigured => None,
        }
    }
}

/// Internal registry-access failure, mapped into the public error enums at
/// each operation boundary.
enum RegistryAccessError {
    Unconfigured,
    Construction { endpoint_uri: String, source: ClientError },
}

impl From<RegistryAccessError> for ResolveError {
    fn from(err: RegistryAccessError) -> Self {
        match err {
            RegistryAccessError::Unconfigured => ResolveError::RegistryUnconfigured,
            RegistryAccessError::Construction { endpoint_uri, source } => {
                ResolveError::ClientConstruction { endpoint_uri, source }
            }
        }
    }
}

impl From<RegistryAccessError> for SearchError {
    fn from(err: RegistryAccessError) -> Self {
        match err {
            RegistryAccessError::Unconfigured => SearchError::RegistryUnconfigured,
            RegistryAccessError::Construction { source, .. } => SearchError::Registry(source),
        }
    }
}

/// Maps a service MRN to a bound [`ServiceClient`] via the configured
/// registry. No caching: every call re-resolves against the registry.
pub struct DiscoveryResolver {
    registry_endpoint: Option<String>,
    factory: Arc<dyn ServiceClientFactory>,
    call_timeout: Duration,
}

impl DiscoveryResolver {
    pub fn new(config: &ClientConfig, factory: Arc<dyn ServiceClientFactory>) -> Self {
        Self {
            registry_endpoint: config.registry_endpoint.clone(),
            factory,
            call_timeout: config.call_timeout(),
        }
    }

    async fn registry_client(&self) -> Result<Arc<dyn ServiceClient>, RegistryAccessError> {
        let registry_endpoint = self
            .registry_endpoint
            .as_deref()
            .ok_or(RegistryAccessError::Unconfigured)?;

        // Endpoint construction owns TLS setup; a hung handshake must not
        // stall resolution past the configured bound.
        bounded_call(self.call_timeout, self.factory.connect(registry_endpoint))
            .await
            .map_err(|source| RegistryAccessError::Construction {
                endpoint_uri: registry_endpoint.to_string(),
                source,
            })
    }

    /// Resolves `instance_mrn` to a client bound to the current endpoint of
    /// the highest-versioned registered instance.
    pub async fn resolve(&self, instance_mrn: &str) -> Result<Arc<dyn ServiceClient>, ResolveError> {
        debug!(
            event = events::DISCOVERY_RESOLVE_START,
            component = COMPONENT,
            mrn = instance_mrn,
            "resolving service instance"
        );

        let result = self.resolve_inner(instance_mrn).await;
        if let Err(err) = &result {
            warn!(
                event = events::DISCOVERY_RESOLVE_FAILED,
                component = COMPONENT,
                mrn = instance_mrn,
                code = err.code(),
                err = %err,
                "service instance resolution failed"
            );
        }
        result
    }

    async fn resolve_inner(
        &self,
        instance_mrn: &str,
    ) -> Result<Arc<dyn ServiceClient>, ResolveError> {
        if instance_mrn.trim().is_empty() {
            return Err(ResolveError::BlankInstanceMrn);
        }

        let registry = self.registry_client().await?;

        // Result sets are expected to be small; retrieve everything unpaged.
        let filter = SearchFilter::for_instance_mrn(instance_mrn);
        let instances = bounded_call(self.call_timeout, registry.search_service(&filter, None))
            .await
            .map_err(ResolveError::Registry)?;

        let selected =
            version_order::max_by_version(instances).ok_or_else(|| ResolveError::NoInstanceFound {
                mrn: instance_mrn.to_string(),
            })?;

        let client = bounded_call(self.call_timeout, self.factory.connect(&selected.endpoint_uri))
            .await
            .map_err(|source| ResolveError::ClientConstruction {
                endpoint_uri: selected.endpoint_uri.clone(),
                source,
            })?;

        debug!(
            event = events::DISCOVERY_RESOLVE_OK,
            component = COMPONENT,
            mrn = instance_mrn,
            endpoint_uri = selected.endpoint_uri,
            version = selected.version,
            "bound client to service instance"
        );

        Ok(client)
    }

    /// Registry keyword search in registry order, excluding instances whose
    /// name contains "client" (reflexive self-registrations).
    pub async fn search(
        &self,
        keyword: &str,
        page: Option<PageRequest>,
    ) -> Result<Vec<ServiceInstance>, SearchError> {
        let registry = self.registry_client().await?;

        let filter = SearchFilter::for_keyword(keyword);
        let instances = bounded_call(self.call_timeout, registry.search_service(&filter, page))
            .await
            .map_err(|err| {
                warn!(
                    event = events::DISCOVERY_SEARCH_FAILED,
                    component = COMPONENT,
                    keyword,
                    err = %err,
                    "registry keyword search failed"
                );
                SearchError::Registry(err)
            })?;

        let instances: Vec<ServiceInstance> = instances
            .into_iter()
            .filter(|instance| !instance.name.to_lowercase().contains("client"))
            .collect();

        debug!(
            event = events::DISCOVERY_SEARCH_OK,
            component = COMPONENT,
            keyword,
            page = crate::observability::fields::format_page(page),
            results = instances.len(),
            "registry keyword search completed"
        );

        Ok(instances)
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscoveryResolver, ResolveError};
    use crate::config::ClientConfig;
    use crate::contract::{
        Acknowledgement, ClientError, PageRequest, RemovalResponse, SearchFilter, ServiceClient,
        ServiceClientFactory, ServiceInstance, SubscriptionRequest, SubscriptionResponse,
    };
    use crate::error::ErrorKind;
    use async_trait::async_trait;
    use std::sync::Arc;
    use uuid::Uuid;

    struct StubClient {
        instances: Vec<ServiceInstance>,
    }

    #[async_trait]
    impl ServiceClient for StubClient {
        async fn search_service(
            &self,
            _filter: &SearchFilter,
            _page: Option<PageRequest>,
        ) -> Result<Vec<ServiceInstance>, ClientError> {
            Ok(self.instances.clone())
        }

        async fn subscribe(
            &self,
            _request: &SubscriptionRequest,
        ) -> Result<SubscriptionResponse, ClientError> {
            unimplemented!("not needed for resolver tests")
        }

        async fn remove_subscription(
            &self,
            _subscription_identifier: Uuid,
        ) -> Result<RemovalResponse, ClientError> {
            unimplemented!("not needed for resolver tests")
        }

        async fn acknowledge(&self, _acknowledgement: &Acknowledgement) -> Result<(), ClientError> {
            unimplemented!("not needed for resolver tests")
        }
    }

    struct StubFactory {
        registry_instances: Vec<ServiceInstance>,
        fail_endpoints: Vec<String>,
    }

    #[async_trait]
    impl ServiceClientFactory for StubFactory {
        async fn connect(
            &self,
            endpoint_uri: &str,
        ) -> Result<Arc<dyn ServiceClient>, ClientError> {
            if self.fail_endpoints.iter().any(|uri| uri == endpoint_uri) {
                return Err(ClientError::Transport(format!(
                    "TLS setup failed for {endpoint_uri}"
                )));
            }
            Ok(Arc::new(StubClient {
                instances: self.registry_instances.clone(),
            }))
        }
    }

    fn instance(name: &str, version: &str, endpoint_uri: &str) -> ServiceInstance {
        ServiceInstance {
            name: name.to_string(),
            version: version.to_string(),
            endpoint_uri: endpoint_uri.to_string(),
        }
    }

    fn resolver(factory: StubFactory) -> DiscoveryResolver {
        let config = ClientConfig {
            registry_endpoint: Some("https://registry.example.org".to_string()),
            ..Default::default()
        };
        DiscoveryResolver::new(&config, Arc::new(factory))
    }

    #[tokio::test]
    async fn blank_mrn_is_a_validation_error() {
        let resolver = resolver(StubFactory {
            registry_instances: Vec::new(),
            fail_endpoints: Vec::new(),
        });

        let error = resolver.resolve("  ").await.expect_err("blank MRN must fail");

        assert!(matches!(error, ResolveError::BlankInstanceMrn));
        assert_eq!(error.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn unconfigured_registry_is_a_validation_error() {
        let config = ClientConfig::default();
        let resolver = DiscoveryResolver::new(
            &config,
            Arc::new(StubFactory {
                registry_instances: Vec::new(),
                fail_endpoints: Vec::new(),
            }),
        );

        let error = resolver
            .resolve("urn:mrn:mcp:service:aton")
            .await
            .expect_err("unconfigured registry must fail");

        assert!(matches!(error, ResolveError::RegistryUnconfigured));
        assert_eq!(error.to_string(), "no connection to service registry");
    }

    #[tokio::test]
    async fn empty_result_set_is_not_found() {
        let resolver = resolver(StubFactory {
            registry_instances: Vec::new(),
            fail_endpoints: Vec::new(),
        });

        let error = resolver
            .resolve("urn:mrn:x")
            .await
            .expect_err("empty result set must fail");

        assert!(matches!(error, ResolveError::NoInstanceFound { .. }));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn resolution_selects_max_version() {
        let resolver = resolver(StubFactory {
            registry_instances: vec![
                instance("aton", "0.0.1", "https://old.example.org"),
                instance("aton", "0.0.2", "https://new.example.org"),
            ],
            fail_endpoints: vec!["https://old.example.org".to_string()],
        });

        // Connecting to the old endpoint would fail; success proves the
        // resolver bound to the 0.0.2 instance.
        resolver
            .resolve("urn:mrn:mcp:service:aton")
            .await
            .expect("resolution should bind the highest version");
    }

    #[tokio::test]
    async fn client_construction_failure_wraps_as_validation() {
        let resolver = resolver(StubFactory {
            registry_instances: vec![instance("aton", "0.0.1", "https://bad.example.org")],
            fail_endpoints: vec!["https://bad.example.org".to_string()],
        });

        let error = resolver
            .resolve("urn:mrn:mcp:service:aton")
            .await
            .expect_err("construction failure must surface");

        assert!(matches!(error, ResolveError::ClientConstruction { .. }));
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert!(std::error::Error::source(&error).is_some());
    }

    struct HangingFactory;

    #[async_trait]
    impl ServiceClientFactory for HangingFactory {
        async fn connect(
            &self,
            _endpoint_uri: &str,
        ) -> Result<Arc<dyn ServiceClient>, ClientError> {
            std::future::pending().await
        }
    }

    struct HangingEndpointFactory {
        registry_endpoint: String,
        registry_instances: Vec<ServiceInstance>,
    }

    #[async_trait]
    impl ServiceClientFactory for HangingEndpointFactory {
        async fn connect(
            &self,
            endpoint_uri: &str,
        ) -> Result<Arc<dyn ServiceClient>, ClientError> {
            if endpoint_uri == self.registry_endpoint {
                return Ok(Arc::new(StubClient {
                    instances: self.registry_instances.clone(),
                }));
            }
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hung_registry_connect_is_bounded_by_the_call_timeout() {
        let config = ClientConfig {
            registry_endpoint: Some("https://registry.example.org".to_string()),
            call_timeout_secs: 0,
            ..Default::default()
        };
        let resolver = DiscoveryResolver::new(&config, Arc::new(HangingFactory));

        let error = resolver
            .resolve("urn:mrn:mcp:service:aton")
            .await
            .expect_err("hung connect must time out");

        assert!(matches!(
            error,
            ResolveError::ClientConstruction {
                source: ClientError::TimedOut,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn hung_endpoint_connect_is_bounded_by_the_call_timeout() {
        let config = ClientConfig {
            registry_endpoint: Some("https://registry.example.org".to_string()),
            call_timeout_secs: 0,
            ..Default::default()
        };
        let resolver = DiscoveryResolver::new(
            &config,
            Arc::new(HangingEndpointFactory {
                registry_endpoint: "https://registry.example.org".to_string(),
                registry_instances: vec![instance("aton", "0.0.1", "https://slow.example.org")],
            }),
        );

        let error = resolver
            .resolve("urn:mrn:mcp:service:aton")
            .await
            .expect_err("hung endpoint construction must time out");

        assert!(matches!(
            error,
            ResolveError::ClientConstruction {
                ref endpoint_uri,
                source: ClientError::TimedOut,
            } if endpoint_uri == "https://slow.example.org"
        ));
    }

    #[tokio::test]
    async fn search_excludes_reflexive_client_registrations() {
        let resolver = resolver(StubFactory {
            registry_instances: vec![
                instance("aton-service", "0.1", "https://a.example.org"),
                instance("aton-service-client", "0.1", "https://b.example.org"),
            ],
            fail_endpoints: Vec::new(),
        });

        let results = resolver
            .search("aton", None)
            .await
            .expect("search should succeed");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "aton-service");
    }
}
