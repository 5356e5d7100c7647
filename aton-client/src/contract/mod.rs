//! Capability contracts consumed by the core: the protocol client, the
//! subscription store, the local broadcaster, certificate introspection, and
//! dataset decoding. Concrete wire shapes belong to the excluded protocol
//! library; these traits define the orchestration surface only.

mod broadcaster;
pub use broadcaster::Broadcaster;

mod certificate;
pub use certificate::{CertificateError, CertificateIntrospector};

mod dataset;
pub use dataset::{DatasetDecoder, DecodeError, DecodedRecord, JsonDatasetDecoder};

mod service_client;
pub use service_client::{
    bounded_call, Acknowledgement, AckType, ClientError, PageRequest, RemovalResponse,
    SearchFilter, ServiceClient, ServiceClientFactory, ServiceInstance, SubscriptionRequest,
    SubscriptionResponse,
};

mod subscription_store;
pub use subscription_store::{
    InMemorySubscriptionStore, StoreError, SubscriptionRecord, SubscriptionStore,
};
