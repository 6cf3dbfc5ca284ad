use serde::{Deserialize, Serialize};

/// Tolerance for the `total_paid == purchase_price + shipping_cost`
/// consistency check. Monetary values are `f64` at this boundary;
/// persistence converts to exact decimals downstream.
pub const MONEY_TOLERANCE: f64 = 1e-9;

/// A purchase record normalized from a raw marketplace order, independent
/// of the originating marketplace or API shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    /// Deterministic dedup key, e.g. `"ebay-sonos-play5-speaker-20240101-123"`.
    ///
    /// Stable across repeated ingestion of the same logical order; the
    /// persistence layer dedups on this field.
    pub identifier: String,
    /// Marketplace the order came from (e.g., `"ebay"`).
    pub platform: String,
    pub product_name: String,
    /// Best-effort brand inferred from the title keywords; `"Unknown"` when
    /// no rule matches.
    pub brand: String,
    /// Best-effort model inferred from the title keywords; empty when no
    /// rule matches.
    pub model: String,
    /// Native order id, stored as a string to avoid precision loss on
    /// numeric upstream ids.
    pub order_id: Option<String>,
    pub transaction_id: Option<String>,
    pub item_id: Option<String>,
    /// Order timestamp exactly as resolved from the source, ISO-8601 when
    /// the source provides one. Empty when the source has no usable date.
    pub order_date: String,
    /// Date-only prefix of `order_date` (`"YYYY-MM-DD"`), empty when
    /// `order_date` is empty.
    pub purchase_date: String,
    pub seller_username: String,
    pub seller_id: Option<String>,
    /// Never empty: a single item is synthesized from order-level fields
    /// when the source exposes no item detail.
    pub line_items: Vec<LineItem>,
    pub purchase_price: f64,
    /// Always `purchase_price + shipping_cost`.
    pub total_paid: f64,
    pub shipping_cost: f64,
    /// Fulfillment state as reported by the source (e.g., `"FULFILLED"`);
    /// `"unknown"` when absent.
    pub delivery_status: String,
    pub tracking_ref: Option<String>,
    pub carrier: Option<String>,
    pub shipped_time: Option<String>,
    /// Integration that produced the raw payload; matches `platform` for
    /// first-party integrations.
    pub source: String,
    /// ISO-8601 timestamp of when this record was assembled.
    pub created_at: String,
    /// Order lifecycle state (e.g., `"completed"`).
    pub status: String,
    /// Sum of line-item quantities.
    pub quantity: u32,
}

impl Purchase {
    /// Returns the number of line items on this purchase.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.line_items.len()
    }

    /// Returns the sum of line-item quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }

    /// Returns `true` when `total_paid` equals `purchase_price +
    /// shipping_cost` within [`MONEY_TOLERANCE`].
    #[must_use]
    pub fn totals_are_consistent(&self) -> bool {
        (self.total_paid - (self.purchase_price + self.shipping_cost)).abs() < MONEY_TOLERANCE
    }
}

/// One purchased SKU/quantity/price tuple within a raw order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_name: String,
    /// Source SKU or item id; empty when the source exposes neither.
    pub sku: String,
    /// Always at least 1.
    pub quantity: u32,
    pub unit_price: f64,
    /// Explicit item total when the source provides one, otherwise
    /// `unit_price * quantity`.
    pub total_price: f64,
}
