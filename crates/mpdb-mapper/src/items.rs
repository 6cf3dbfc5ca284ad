//! Line-item extraction from raw orders.
//!
//! Different API vintages keep purchased items in different containers:
//! the modern `lineItems` array, the legacy `line_items`/`items` arrays,
//! or nested transaction wrappers. The first candidate container holding a
//! non-empty array wins; orders with no item-level detail get exactly one
//! synthesized item from order-level fields so every purchase carries at
//! least one line item.

use mpdb_core::LineItem;
use serde_json::Value;

use crate::field::{CompiledField, FieldSpec};
use crate::path::PathExpr;

/// Candidate item containers in priority order. The wrapped
/// `transactionArray.transaction` shape belongs to the oldest trading
/// API; `transactions` is its flattened successor, which sometimes nests
/// its own `items` list inside the first transaction.
const CONTAINER_PATHS: &[&str] = &[
    "lineItems",
    "line_items",
    "items",
    "transactionArray.transaction",
    "transactions[0].items",
    "transactions",
];

const ITEM_TITLE: FieldSpec = FieldSpec {
    name: "item_title",
    candidates: &["title", "name", "productName", "item.title"],
    default: "Unknown Item",
};

const ITEM_SKU: FieldSpec = FieldSpec {
    name: "item_sku",
    candidates: &["sku", "itemId", "item.itemId", "legacyItemId", "listingId"],
    default: "",
};

const ITEM_UNIT_PRICE: FieldSpec = FieldSpec {
    name: "item_unit_price",
    candidates: &[
        "price",
        "unitPrice",
        "transactionPrice",
        "lineItemCost",
        "item.price",
    ],
    default: "",
};

const ITEM_TOTAL_PRICE: FieldSpec = FieldSpec {
    name: "item_total_price",
    candidates: &["total", "totalPrice", "totalCost"],
    default: "",
};

const ITEM_QUANTITY: FieldSpec = FieldSpec {
    name: "item_quantity",
    candidates: &["quantity", "quantityPurchased", "qty"],
    default: "",
};

/// Locates and normalizes the purchased line items within a raw order.
#[derive(Debug, Clone)]
pub struct LineItemExtractor {
    containers: Vec<PathExpr>,
    title: CompiledField,
    sku: CompiledField,
    unit_price: CompiledField,
    total_price: CompiledField,
    quantity: CompiledField,
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineItemExtractor {
    #[must_use]
    pub fn new() -> Self {
        LineItemExtractor {
            containers: CONTAINER_PATHS.iter().map(|p| PathExpr::parse(p)).collect(),
            title: CompiledField::compile(&ITEM_TITLE),
            sku: CompiledField::compile(&ITEM_SKU),
            unit_price: CompiledField::compile(&ITEM_UNIT_PRICE),
            total_price: CompiledField::compile(&ITEM_TOTAL_PRICE),
            quantity: CompiledField::compile(&ITEM_QUANTITY),
        }
    }

    /// Returns the first candidate container that resolves to a non-empty
    /// array, or `None` when the order exposes no item-level detail.
    #[must_use]
    pub fn locate<'a>(&self, raw_order: &'a Value) -> Option<&'a Vec<Value>> {
        self.containers
            .iter()
            .filter_map(|path| path.resolve(raw_order))
            .filter_map(Value::as_array)
            .find(|entries| !entries.is_empty())
    }

    /// Normalizes every entry of a located container.
    #[must_use]
    pub fn normalize_entries(&self, entries: &[Value]) -> Vec<LineItem> {
        entries.iter().map(|entry| self.normalize_entry(entry)).collect()
    }

    /// Builds the single stand-in item for an order without item detail.
    #[must_use]
    pub fn synthesize(&self, title: &str, sku: Option<&str>, total: f64) -> LineItem {
        LineItem {
            product_name: title.to_string(),
            sku: sku.unwrap_or_default().to_string(),
            quantity: 1,
            unit_price: total,
            total_price: total,
        }
    }

    /// Full extraction: located container entries, or the synthesized
    /// fallback. The result is never empty.
    #[must_use]
    pub fn extract(
        &self,
        raw_order: &Value,
        order_title: &str,
        order_item_id: Option<&str>,
        order_total: f64,
    ) -> Vec<LineItem> {
        match self.locate(raw_order) {
            Some(entries) => self.normalize_entries(entries),
            None => vec![self.synthesize(order_title, order_item_id, order_total)],
        }
    }

    fn normalize_entry(&self, entry: &Value) -> LineItem {
        let product_name = self.title.resolve(entry, None);
        let sku = self.sku.resolve_id(entry, None).unwrap_or_default();
        let quantity = self
            .quantity
            .resolve_first(entry, None, coerce_quantity)
            .unwrap_or(1);
        let unit_price = self.unit_price.resolve_money(entry, None);

        // An explicit item total wins; otherwise derive from unit price.
        let total_price = self
            .total_price
            .resolve_first(entry, None, |value| {
                Some(crate::money::normalize_money(Some(value)))
            })
            .unwrap_or_else(|| unit_price * f64::from(quantity));

        LineItem {
            product_name,
            sku,
            quantity,
            unit_price,
            total_price,
        }
    }
}

/// Coerces a quantity value (number or numeric string) to an integer of at
/// least 1. Unusable values are rejected so the candidate walk continues.
fn coerce_quantity(value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite() && *f >= 0.0)?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = parsed.round() as u64;
    Some(u32::try_from(rounded).unwrap_or(u32::MAX).max(1))
}
