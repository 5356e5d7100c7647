//! Subscription lifecycle: the singleton slot state machine and remote
//! reconciliation.

mod manager;
pub use manager::{
    CreateSubscriptionError, RemoveSubscriptionError, SubscriptionLifecycleEvent,
    SubscriptionManager,
};
