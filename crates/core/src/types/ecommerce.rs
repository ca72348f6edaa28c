//! Storefront configuration shared with client shells.

use serde::{Deserialize, Serialize};

use super::Email;

/// E-commerce settings served by the API and loaded by the shell at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcommerceConfig {
    /// Public store name.
    pub store_name: String,
    /// ISO 4217 currency code prices are shown in.
    pub currency: String,
    /// BCP 47 locale for formatting.
    pub locale: String,
    /// Enabled payment method identifiers (e.g. `card`, `bizum`).
    #[serde(default)]
    pub payment_methods: Vec<String>,
    /// Order subtotal, in minor units, above which shipping is free.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_shipping_threshold_cents: Option<i64>,
    /// Customer support address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<Email>,
}

impl EcommerceConfig {
    /// Whether an order subtotal (in minor units) qualifies for free shipping.
    #[must_use]
    pub fn ships_free(&self, subtotal_cents: i64) -> bool {
        self.free_shipping_threshold_cents
            .is_some_and(|threshold| subtotal_cents >= threshold)
    }
}
