//! Canonical structured event names used across `aton-client`.

// Discovery events.
pub const DISCOVERY_RESOLVE_START: &str = "discovery_resolve_start";
pub const DISCOVERY_RESOLVE_OK: &str = "discovery_resolve_ok";
pub const DISCOVERY_RESOLVE_FAILED: &str = "discovery_resolve_failed";
pub const DISCOVERY_SEARCH_OK: &str = "discovery_search_ok";
pub const DISCOVERY_SEARCH_FAILED: &str = "discovery_search_failed";

// Subscription lifecycle events.
pub const SUBSCRIPTION_CREATE_START: &str = "subscription_create_start";
pub const SUBSCRIPTION_CREATE_OK: &str = "subscription_create_ok";
pub const SUBSCRIPTION_CREATE_FAILED: &str = "subscription_create_failed";
pub const SUBSCRIPTION_SUPERSEDE_TEARDOWN_FAILED: &str = "subscription_supersede_teardown_failed";
pub const SUBSCRIPTION_REMOVE_OK: &str = "subscription_remove_ok";
pub const SUBSCRIPTION_REMOVE_FAILED: &str = "subscription_remove_failed";
pub const SUBSCRIPTION_REMOTE_REMOVED: &str = "subscription_remote_removed";
pub const SUBSCRIPTION_REMOTE_REMOVED_NOOP: &str = "subscription_remote_removed_noop";
pub const SUBSCRIPTION_REMOTE_CREATED: &str = "subscription_remote_created";
pub const SUBSCRIPTION_NOTIFY_PUBLISHED: &str = "subscription_notify_published";

// Upload ingestion events.
pub const UPLOAD_DECODE_FAILED: &str = "upload_decode_failed";
pub const UPLOAD_RECORDS_PUBLISHED: &str = "upload_records_published";
pub const UPLOAD_SIGNER_EXTRACT_FAILED: &str = "upload_signer_extract_failed";
pub const UPLOAD_ACK_SENT: &str = "upload_ack_sent";
pub const UPLOAD_ACK_SKIPPED: &str = "upload_ack_skipped";
pub const UPLOAD_ACK_FAILED: &str = "upload_ack_failed";
