//! End-to-end mapping scenarios through the public API.

use chrono::{TimeZone, Utc};
use mpdb_core::BrandTable;
use mpdb_mapper::{normalize_money, resolve_path, OrderMapper};
use serde_json::json;

fn mapper() -> OrderMapper {
    OrderMapper::new("ebay", BrandTable::builtin())
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap()
}

#[test]
fn sonos_order_maps_to_one_consistent_purchase() {
    let payload = json!({
        "orders": [{
            "itemId": "123",
            "title": "Sonos Play5 Speaker",
            "seller": "abc",
            "currentPrice": "99.99",
            "shippingCost": 5,
            "endTime": "2024-01-01T00:00:00Z"
        }]
    });

    let summary = mapper().map_orders_at(&payload, fixed_now());
    assert_eq!(summary.purchases.len(), 1);

    let purchase = &summary.purchases[0];
    assert!((purchase.purchase_price - 99.99).abs() < 1e-9);
    assert!((purchase.shipping_cost - 5.0).abs() < 1e-9);
    assert!((purchase.total_paid - 104.99).abs() < 1e-9);
    assert!(purchase.totals_are_consistent());
    assert!(!purchase.identifier.is_empty());
    assert!(!purchase.line_items.is_empty());
}

#[test]
fn identifiers_are_stable_across_mapper_instances() {
    let payload = json!({
        "orders": [{
            "orderId": "ORD-42",
            "title": "Bose SoundLink Mini",
            "orderDate": "2023-07-04T09:00:00Z"
        }]
    });

    let first = mapper().map_orders_at(&payload, fixed_now());
    let second = OrderMapper::new("ebay", BrandTable::builtin())
        .map_orders_at(&payload, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

    // A different processing time must not change the identifier.
    assert_eq!(
        first.purchases[0].identifier,
        second.purchases[0].identifier
    );
}

#[test]
fn one_bad_entry_does_not_sink_the_batch() {
    let payload = json!({
        "orders": [
            {"title": "One", "orderId": "1"},
            {"title": "Two", "orderId": "2"},
            42,
            {"title": "Four", "orderId": "4"},
            {"title": "Five", "orderId": "5"}
        ]
    });

    let summary = mapper().map_orders_at(&payload, fixed_now());
    assert_eq!(summary.input_count, 5);
    assert_eq!(summary.mapped_count, 4);
    let titles: Vec<_> = summary
        .purchases
        .iter()
        .map(|p| p.product_name.as_str())
        .collect();
    assert_eq!(titles, vec!["One", "Two", "Four", "Five"]);
}

#[test]
fn string_collection_yields_empty_without_panicking() {
    let summary = mapper().map_orders_at(&json!({"orders": "not-a-list"}), fixed_now());
    assert_eq!(summary.input_count, 0);
    assert!(summary.purchases.is_empty());
}

#[test]
fn money_normalization_table() {
    assert!((normalize_money(Some(&json!(10.5))) - 10.5).abs() < 1e-9);
    assert!((normalize_money(Some(&json!("10.50"))) - 10.5).abs() < 1e-9);
    assert!((normalize_money(Some(&json!({"value": "5"}))) - 5.0).abs() < 1e-9);
    assert!((normalize_money(Some(&json!({"amount": {"value": 7}}))) - 7.0).abs() < 1e-9);
    assert!(normalize_money(Some(&json!(null))).abs() < 1e-9);
    assert!(normalize_money(Some(&json!("abc"))).abs() < 1e-9);
}

#[test]
fn path_resolution_table() {
    let value = json!({"a": {"b": [{"c": 1}]}});
    assert_eq!(resolve_path(&value, "a.b[0].c"), Some(&json!(1)));
    assert_eq!(resolve_path(&json!({}), "a.b.c"), None);
}

#[test]
fn mixed_shape_batch_maps_every_vintage() {
    let payload = json!({
        "orders": [
            // Modern flat record.
            {"title": "Sonos Beam", "price": 399.0, "orderId": "M-1"},
            // Legacy transaction wrapper.
            {
                "orderId": "L-2",
                "transactionArray": {"transaction": [{
                    "item": {"title": "Sonos Play:1", "itemId": 31415},
                    "transactionPrice": "149.00"
                }]}
            },
            // Item-level detail in line items.
            {
                "orderId": "F-3",
                "lineItems": [
                    {"title": "Cable", "price": "9.99", "quantity": 2},
                    {"title": "Adapter", "price": "19.99"}
                ],
                "pricingSummary": {"priceSubtotal": {"value": "39.97"}}
            }
        ]
    });

    let summary = mapper().map_orders_at(&payload, fixed_now());
    assert_eq!(summary.mapped_count, 3);

    let legacy = &summary.purchases[1];
    assert_eq!(legacy.product_name, "Sonos Play:1");
    assert_eq!(legacy.model, "Play:1");
    assert_eq!(legacy.item_id.as_deref(), Some("31415"));

    let itemized = &summary.purchases[2];
    assert_eq!(itemized.line_items.len(), 2);
    assert_eq!(itemized.quantity, 3);
    assert!((itemized.purchase_price - 39.97).abs() < 1e-9);
    assert!(itemized.totals_are_consistent());
}
