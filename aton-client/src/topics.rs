//! Stable external topic and header names used on the local broadcast channel.

/// Topic carrying one decoded dataset record per publish.
pub const SUBSCRIPTION_UPDATE: &str = "aton/subscription/update";
/// Topic carrying remote "subscription created" lifecycle notifications.
pub const SUBSCRIPTION_CREATED: &str = "aton/subscription/created";
/// Topic carrying remote "subscription removed" lifecycle notifications.
pub const SUBSCRIPTION_REMOVED: &str = "aton/subscription/removed";

/// Header names attached to broadcast publishes.
pub mod headers {
    /// Data product type declared by the pushing counterparty, when present.
    pub const DATA_PRODUCT_TYPE: &str = "data-product-type";
    /// Subject identity extracted from the upload's embedded certificate.
    pub const SIGNED_BY: &str = "signed-by";
    /// Issuer identity extracted from the upload's embedded certificate.
    pub const ISSUED_BY: &str = "issued-by";
    /// Per-record classification tag; empty string for unrecognized kinds.
    pub const TYPE_TAG: &str = "type-tag";
}
