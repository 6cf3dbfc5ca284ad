//! Batch orchestration: raw payload in, canonical purchases out.
//!
//! Every canonical field's candidate paths are declared once in the specs
//! below, compiled at mapper construction, and walked per record. A single
//! malformed entry is logged with its index and skipped; the batch always
//! completes.

use chrono::{DateTime, Utc};
use mpdb_core::{BrandTable, Purchase};
use serde_json::Value;

use crate::error::{json_type_name, MapError};
use crate::field::{CompiledField, FieldSpec};
use crate::items::LineItemExtractor;
use crate::path::PathExpr;

/// Candidate top-level order collections, canonical key first. The
/// wrapped `orderArray.order` shape belongs to the oldest trading API.
const COLLECTION_PATHS: &[&str] = &[
    "orders",
    "orderArray.order",
    "orderHistory",
    "purchases",
    "transactions",
    "results",
];

const PLATFORM: FieldSpec = FieldSpec {
    name: "platform",
    candidates: &["platform", "marketplace", "site"],
    default: "",
};

const TITLE: FieldSpec = FieldSpec {
    name: "product_name",
    candidates: &["title", "item.title", "productName", "name", "itemTitle"],
    default: "Unknown Item",
};

const SELLER: FieldSpec = FieldSpec {
    name: "seller_username",
    candidates: &[
        "seller",
        "sellerUsername",
        "seller.username",
        "sellerInfo.sellerUserName",
        "seller.userId",
    ],
    default: "unknown",
};

const SELLER_ID: FieldSpec = FieldSpec {
    name: "seller_id",
    candidates: &["sellerId", "seller.sellerId", "sellerInfo.sellerId"],
    default: "",
};

const ORDER_DATE: FieldSpec = FieldSpec {
    name: "order_date",
    candidates: &[
        "orderDate",
        "creationDate",
        "createdDate",
        "endTime",
        "paidTime",
        "transactionDate",
        "date",
    ],
    default: "",
};

const ORDER_ID: FieldSpec = FieldSpec {
    name: "order_id",
    candidates: &["orderId", "order_id", "orderID", "extendedOrderId"],
    default: "",
};

const TRANSACTION_ID: FieldSpec = FieldSpec {
    name: "transaction_id",
    candidates: &[
        "transactionId",
        "transaction_id",
        "transactionID",
        "transactionArray.transaction[0].transactionId",
    ],
    default: "",
};

const ITEM_ID: FieldSpec = FieldSpec {
    name: "item_id",
    candidates: &["itemId", "item.itemId", "item_id", "legacyItemId", "listingId"],
    default: "",
};

// The generic "price" ranks last: with the first line item doubling as
// the secondary lookup object, a higher rank would let one item's price
// shadow the order-level subtotal paths.
const PRICE: FieldSpec = FieldSpec {
    name: "purchase_price",
    candidates: &[
        "currentPrice",
        "pricingSummary.priceSubtotal",
        "sellingStatus.currentPrice",
        "purchasePrice",
        "pricePaid",
        "price",
    ],
    default: "",
};

const SHIPPING: FieldSpec = FieldSpec {
    name: "shipping_cost",
    candidates: &[
        "shippingCost",
        "shipping",
        "shippingServiceCost",
        "pricingSummary.deliveryCost",
        "shippingDetails.shippingServiceOptions[0].shippingServiceCost",
    ],
    default: "",
};

const DELIVERY_STATUS: FieldSpec = FieldSpec {
    name: "delivery_status",
    candidates: &[
        "orderFulfillmentStatus",
        "deliveryStatus",
        "shippingStatus",
        "sellerInfo.shipmentStatus",
    ],
    default: "unknown",
};

const STATUS: FieldSpec = FieldSpec {
    name: "status",
    candidates: &["orderStatus", "status", "checkoutStatus", "orderPaymentStatus"],
    default: "completed",
};

const TRACKING: FieldSpec = FieldSpec {
    name: "tracking_ref",
    candidates: &[
        "trackingNumber",
        "tracking",
        "shipmentTrackingNumber",
        "shippingDetails.trackingNumber",
    ],
    default: "",
};

const CARRIER: FieldSpec = FieldSpec {
    name: "carrier",
    candidates: &["carrier", "shippingCarrier", "shippingCarrierCode"],
    default: "",
};

const SHIPPED_TIME: FieldSpec = FieldSpec {
    name: "shipped_time",
    candidates: &["shippedTime", "shipDate", "shippedDate"],
    default: "",
};

/// Result of one batch mapping call.
///
/// Callers distinguish "zero valid orders" from "some orders failed to
/// parse" by comparing the counts; per-skip details go to the log.
#[derive(Debug, Clone)]
pub struct MapSummary {
    pub purchases: Vec<Purchase>,
    /// Entries found in the located order collection.
    pub input_count: usize,
    /// Entries successfully mapped to purchases.
    pub mapped_count: usize,
}

impl MapSummary {
    fn empty() -> Self {
        MapSummary {
            purchases: Vec::new(),
            input_count: 0,
            mapped_count: 0,
        }
    }

    /// Entries excluded by per-record failures.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.input_count - self.mapped_count
    }
}

/// Maps raw marketplace order payloads to canonical [`Purchase`] records.
///
/// Construction compiles every candidate path once; the mapper itself is
/// immutable and safe to share across threads.
#[derive(Debug, Clone)]
pub struct OrderMapper {
    source: String,
    brand_table: BrandTable,
    collections: Vec<PathExpr>,
    items: LineItemExtractor,
    platform: CompiledField,
    title: CompiledField,
    seller: CompiledField,
    seller_id: CompiledField,
    order_date: CompiledField,
    order_id: CompiledField,
    transaction_id: CompiledField,
    item_id: CompiledField,
    price: CompiledField,
    shipping: CompiledField,
    delivery_status: CompiledField,
    status: CompiledField,
    tracking: CompiledField,
    carrier: CompiledField,
    shipped_time: CompiledField,
}

impl OrderMapper {
    #[must_use]
    pub fn new(source: &str, brand_table: BrandTable) -> Self {
        OrderMapper {
            source: source.to_string(),
            brand_table,
            collections: COLLECTION_PATHS.iter().map(|p| PathExpr::parse(p)).collect(),
            items: LineItemExtractor::new(),
            platform: CompiledField::compile(&PLATFORM),
            title: CompiledField::compile(&TITLE),
            seller: CompiledField::compile(&SELLER),
            seller_id: CompiledField::compile(&SELLER_ID),
            order_date: CompiledField::compile(&ORDER_DATE),
            order_id: CompiledField::compile(&ORDER_ID),
            transaction_id: CompiledField::compile(&TRANSACTION_ID),
            item_id: CompiledField::compile(&ITEM_ID),
            price: CompiledField::compile(&PRICE),
            shipping: CompiledField::compile(&SHIPPING),
            delivery_status: CompiledField::compile(&DELIVERY_STATUS),
            status: CompiledField::compile(&STATUS),
            tracking: CompiledField::compile(&TRACKING),
            carrier: CompiledField::compile(&CARRIER),
            shipped_time: CompiledField::compile(&SHIPPED_TIME),
        }
    }

    /// Maps a raw payload, stamping records with the current time.
    #[must_use]
    pub fn map_orders(&self, payload: &Value) -> MapSummary {
        self.map_orders_at(payload, Utc::now())
    }

    /// Maps a raw payload with an injected clock. Tests pass a fixed `now`
    /// so assembled records are fully deterministic.
    #[must_use]
    pub fn map_orders_at(&self, payload: &Value, now: DateTime<Utc>) -> MapSummary {
        let Some(entries) = self.locate_collection(payload) else {
            return MapSummary::empty();
        };

        let created_at = now.to_rfc3339();
        let mut purchases = Vec::with_capacity(entries.len());
        for (index, raw) in entries.iter().enumerate() {
            match self.map_order(raw, index, &created_at) {
                Ok(purchase) => purchases.push(purchase),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping order — mapping failed");
                }
            }
        }

        tracing::info!(
            source = %self.source,
            input = entries.len(),
            mapped = purchases.len(),
            "mapped order batch"
        );

        MapSummary {
            input_count: entries.len(),
            mapped_count: purchases.len(),
            purchases,
        }
    }

    /// Probes the candidate collection paths and returns the entries of
    /// the first one that resolves. A resolved value that is not an array
    /// ends the probe: lower-priority keys are not consulted once the
    /// payload has named its order collection.
    fn locate_collection<'a>(&self, payload: &'a Value) -> Option<&'a Vec<Value>> {
        for path in &self.collections {
            if let Some(found) = path.resolve(payload) {
                let entries = found.as_array();
                if entries.is_none() {
                    tracing::warn!(
                        found = json_type_name(found),
                        "order collection is not list-shaped; returning empty batch"
                    );
                }
                return entries;
            }
        }
        tracing::warn!("payload has no recognizable order collection");
        None
    }

    fn map_order(&self, raw: &Value, index: usize, created_at: &str) -> Result<Purchase, MapError> {
        if !raw.is_object() {
            return Err(MapError::NotAnObject {
                index,
                found: json_type_name(raw),
            });
        }

        // Legacy shapes keep title/price on the first transaction rather
        // than the order itself; that entry becomes the secondary lookup
        // object for every field below.
        let container = self.items.locate(raw);
        let secondary = container.and_then(|entries| entries.first());

        let product_name = self.title.resolve(raw, secondary);
        let seller_username = self.seller.resolve(raw, secondary);
        let order_date = self.order_date.resolve(raw, secondary);
        let purchase_date = order_date.get(..10).map(str::to_string).unwrap_or_default();

        let order_id = self.order_id.resolve_id(raw, secondary);
        let transaction_id = self.transaction_id.resolve_id(raw, secondary);
        let item_id = self.item_id.resolve_id(raw, secondary);
        let seller_id = self.seller_id.resolve_id(raw, secondary);

        let purchase_price = self.price.resolve_money(raw, secondary);
        let shipping_cost = self.shipping.resolve_money(raw, secondary);
        let total_paid = purchase_price + shipping_cost;

        let line_items = match container {
            Some(entries) => self.items.normalize_entries(entries),
            None => vec![self
                .items
                .synthesize(&product_name, item_id.as_deref(), purchase_price)],
        };
        let quantity = line_items.iter().map(|item| item.quantity).sum();

        let (brand, model) = match self.brand_table.infer(&product_name) {
            Some(matched) => (matched.brand, matched.model),
            None => ("Unknown".to_string(), String::new()),
        };

        let identifier = crate::identifier::generate_identifier(
            &self.source,
            &product_name,
            &order_date,
            order_id.as_deref(),
            index,
        );

        Ok(Purchase {
            identifier,
            platform: self
                .platform
                .resolve_opt(raw, secondary)
                .unwrap_or_else(|| self.source.clone()),
            product_name,
            brand,
            model,
            order_id,
            transaction_id,
            item_id,
            order_date,
            purchase_date,
            seller_username,
            seller_id,
            line_items,
            purchase_price,
            total_paid,
            shipping_cost,
            delivery_status: self.delivery_status.resolve(raw, secondary),
            tracking_ref: self.tracking.resolve_id(raw, secondary),
            carrier: self.carrier.resolve_opt(raw, secondary),
            shipped_time: self.shipped_time.resolve_opt(raw, secondary),
            source: self.source.clone(),
            created_at: created_at.to_string(),
            status: self.status.resolve(raw, secondary),
            quantity,
        })
    }
}
