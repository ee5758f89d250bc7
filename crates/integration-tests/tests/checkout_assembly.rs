//! Checkout assembly scenarios: from cart lines to a submitted order body.

#![allow(clippy::unwrap_used)]

use rupshari_core::types::{ProductId, Taka};
use rupshari_storefront::cart::CartLineItem;
use rupshari_storefront::checkout::{DeliveryArea, OrderDraft, PaymentMethod};

fn cart_lines() -> Vec<CartLineItem> {
    vec![
        CartLineItem {
            product_id: ProductId::new(1),
            name: "Cotton Panjabi".to_string(),
            slug: "cotton-panjabi".to_string(),
            unit_price: Taka::from_whole(1250),
            quantity: 2,
            selected_color: Some("Red".to_string()),
            selected_size: Some("M".to_string()),
            image_url: None,
        },
        CartLineItem {
            product_id: ProductId::new(2),
            name: "Jamdani Saree".to_string(),
            slug: "jamdani-saree".to_string(),
            unit_price: Taka::from_whole(4500),
            quantity: 1,
            selected_color: None,
            selected_size: None,
            image_url: None,
        },
    ]
}

fn draft(delivery_area: DeliveryArea) -> OrderDraft {
    OrderDraft {
        customer_name: "Rahim Uddin".to_string(),
        phone: "01712345678".to_string(),
        address: "House 12, Road 5, Dhanmondi, Dhaka".to_string(),
        delivery_area,
        payment_method: PaymentMethod::CashOnDelivery,
        items: cart_lines(),
    }
}

#[test]
fn test_totals_per_delivery_area() {
    let inside = draft(DeliveryArea::InsideDhaka);
    assert_eq!(inside.subtotal(), Taka::from_whole(7000));
    assert_eq!(inside.total(), Taka::from_whole(7060));

    let outside = draft(DeliveryArea::OutsideDhaka);
    assert_eq!(outside.total(), Taka::from_whole(7120));
}

#[test]
fn test_wire_request_shape() {
    // The backend expects a Laravel-style JSON body with string money
    let request = draft(DeliveryArea::InsideDhaka).to_request();
    let body = serde_json::to_value(&request).unwrap();

    assert_eq!(body["customer_name"], "Rahim Uddin");
    assert_eq!(body["phone"], "01712345678");
    assert_eq!(body["delivery_area"], "inside_dhaka");
    assert_eq!(body["payment_method"], "cash_on_delivery");
    assert_eq!(body["subtotal"], "7000");
    assert_eq!(body["delivery_charge"], "60");
    assert_eq!(body["total"], "7060");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], 1);
    assert_eq!(items[0]["color"], "Red");
    assert_eq!(items[0]["size"], "M");
    assert_eq!(items[0]["price"], "1250");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[1]["color"], serde_json::Value::Null);
}

#[test]
fn test_invalid_draft_never_reaches_the_wire() {
    let mut order = draft(DeliveryArea::InsideDhaka);
    order.phone = "12345".to_string();
    order.customer_name = "  ".to_string();

    let errors = order.validate().unwrap_err();
    assert!(errors.field("phone").is_some());
    assert!(errors.field("customer_name").is_some());
    assert!(errors.field("address").is_none());
}

#[test]
fn test_empty_order_is_rejected() {
    let mut order = draft(DeliveryArea::InsideDhaka);
    order.items.clear();

    let errors = order.validate().unwrap_err();
    assert!(errors.field("items").is_some());
}

#[test]
fn test_buy_now_single_item_order() {
    // Buy-now orders carry exactly one line and still pay delivery
    let mut order = draft(DeliveryArea::OutsideDhaka);
    order.items.truncate(1);

    assert!(order.validate().is_ok());
    let request = order.to_request();
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.total, Taka::from_whole(2620));
}
