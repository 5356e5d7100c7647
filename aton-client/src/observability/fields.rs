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

//! Canonical structured field keys and value-format helpers.

use crate::contract::PageRequest;
use uuid::Uuid;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";

pub const MRN: &str = "mrn";
pub const ENDPOINT_URI: &str = "endpoint_uri";
pub const VERSION: &str = "version";
pub const KEYWORD: &str = "keyword";
pub const PAGE: &str = "page";

pub const SUBSCRIPTION_ID: &str = "subscription_id";
pub const TRANSACTION_ID: &str = "transaction_id";
pub const TOPIC: &str = "topic";
pub const RECORDS: &str = "records";

pub const ERR: &str = "err";
pub const REASON: &str = "reason";

pub const NONE: &str = "none";
pub const REASON_NO_ACTIVE_SUBSCRIPTION: &str = "no_active_subscription";
pub const REASON_SUPERSEDED: &str = "superseded";

pub fn format_optional_str(value: Option<&str>) -> String {
    value.unwrap_or(NONE).to_string()
}

pub fn format_uuid(value: &Uuid) -> String {
    value.to_string()
}

pub fn format_page(page: Option<PageRequest>) -> String {
    match page {
        Some(page) => format!("{}x{}", page.page, page.page_size),
        None => "unpaged".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_optional_str, format_page, NONE};
    use crate::contract::PageRequest;

    #[test]
    fn format_optional_str_falls_back_when_absent() {
        assert_eq!(format_optional_str(None), NONE);
        assert_eq!(format_optional_str(Some("S125")), "S125");
    }

    #[test]
    fn format_page_is_stable() {
        assert_eq!(format_page(None), "unpaged");
        assert_eq!(
            format_page(Some(PageRequest {
                page: 2,
                page_size: 50
            })),
            "2x50"
        );
    }
}
