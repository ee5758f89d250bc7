//! Session-related types.
//!
//! Types stored in each visitor's session: the cart and the one-shot order
//! receipt shown after checkout.

use serde::{Deserialize, Serialize};

use rupshari_core::types::{OrderId, Taka};

/// Flash data for the order-success page.
///
/// Written when an order is confirmed and consumed (removed) by the first
/// GET of the success page, so a refresh cannot replay it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Order ID assigned by the backend.
    pub order_id: OrderId,
    /// Name the order was placed under.
    pub customer_name: String,
    /// Grand total including delivery.
    pub total: Taka,
}

/// Session keys for visitor data.
pub mod keys {
    /// Key for storing the cart line items.
    pub const CART_ITEMS: &str = "cart_items";

    /// Key for the one-shot order receipt flash.
    pub const ORDER_RECEIPT: &str = "order_receipt";
}
