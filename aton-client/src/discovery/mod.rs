//! Discovery resolution: MRN → live, bound service client.

mod resolver;
pub use resolver::{DiscoveryResolver, ResolveError, SearchError};

mod version_order;
