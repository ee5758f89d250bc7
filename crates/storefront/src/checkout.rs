//! Checkout: delivery options, payment methods, and order assembly.
//!
//! An [`OrderDraft`] is built from the form plus either the session cart or
//! a single buy-now line. It is validated locally before anything goes over
//! the wire, so a bad phone number never costs a network round trip.

use rupshari_core::types::{PhoneNumber, Taka};
use serde::Deserialize;

use crate::cart::CartLineItem;
use crate::catalog::{OrderItem, OrderRejection, OrderRequest};

/// Where the order ships. Delivery charge depends only on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryArea {
    InsideDhaka,
    OutsideDhaka,
}

impl DeliveryArea {
    /// Flat delivery fee for the area.
    #[must_use]
    pub fn fee(self) -> Taka {
        match self {
            Self::InsideDhaka => Taka::from_whole(60),
            Self::OutsideDhaka => Taka::from_whole(120),
        }
    }

    /// Value sent to the order API.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::InsideDhaka => "inside_dhaka",
            Self::OutsideDhaka => "outside_dhaka",
        }
    }

    /// Human-readable label for forms.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InsideDhaka => "Inside Dhaka",
            Self::OutsideDhaka => "Outside Dhaka",
        }
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    Sslcommerz,
}

impl PaymentMethod {
    /// Value sent to the order API.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "cash_on_delivery",
            Self::Sslcommerz => "sslcommerz",
        }
    }

    /// Human-readable label for forms.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash On Delivery",
            Self::Sslcommerz => "SSLCommerz",
        }
    }
}

/// Validation failures keyed by form field.
///
/// Collected rather than fail-fast so the form can show everything wrong at
/// once. Backend rejections (HTTP 422) merge into the same structure for
/// re-rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(String, String)>,
}

impl ValidationErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push((field.to_string(), message.into()));
    }

    /// Errors for an item that vanished between rendering the form and the
    /// submission, e.g. a buy-now product taken off the catalog.
    #[must_use]
    pub fn item_unavailable() -> Self {
        let mut errors = Self::default();
        errors.push("items", "This product is no longer available");
        errors
    }

    /// Fold a backend rejection into form-field errors.
    pub fn extend_from_rejection(&mut self, rejection: &OrderRejection) {
        if rejection.has_field_errors() {
            for (field, message) in rejection.field_messages() {
                self.errors.push((field, message));
            }
        } else if let Some(message) = &rejection.message {
            self.errors.push(("order".to_string(), message.clone()));
        } else {
            self.errors
                .push(("order".to_string(), "Order could not be placed".to_string()));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message for a field, if any.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn all(&self) -> &[(String, String)] {
        &self.errors
    }
}

/// An order as assembled from the checkout form, before submission.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub delivery_area: DeliveryArea,
    pub payment_method: PaymentMethod,
    pub items: Vec<CartLineItem>,
}

impl OrderDraft {
    /// Sum of line totals, before delivery.
    #[must_use]
    pub fn subtotal(&self) -> Taka {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    #[must_use]
    pub fn delivery_charge(&self) -> Taka {
        self.delivery_area.fee()
    }

    /// `subtotal + delivery_charge`.
    #[must_use]
    pub fn total(&self) -> Taka {
        self.subtotal() + self.delivery_charge()
    }

    /// Validate the draft, collecting every failure.
    ///
    /// # Errors
    ///
    /// Returns all field-level problems at once: blank name or address, an
    /// unparseable phone number, or an empty item list.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.customer_name.trim().is_empty() {
            errors.push("customer_name", "Name is required");
        }
        if let Err(e) = PhoneNumber::parse(&self.phone) {
            errors.push("phone", e.to_string());
        }
        if self.address.trim().is_empty() {
            errors.push("address", "Delivery address is required");
        }
        if self.items.is_empty() {
            errors.push("items", "There is nothing to order");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Build the wire request. Call after [`Self::validate`].
    #[must_use]
    pub fn to_request(&self) -> OrderRequest {
        OrderRequest {
            customer_name: self.customer_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            delivery_area: self.delivery_area.as_wire(),
            payment_method: self.payment_method.as_wire(),
            subtotal: self.subtotal(),
            delivery_charge: self.delivery_charge(),
            total: self.total(),
            items: self
                .items
                .iter()
                .map(|line| OrderItem {
                    id: line.product_id,
                    name: line.name.clone(),
                    color: line.selected_color.clone(),
                    size: line.selected_size.clone(),
                    price: line.unit_price,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rupshari_core::types::ProductId;

    fn line(quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(7),
            name: "Cotton Panjabi".to_string(),
            slug: "cotton-panjabi".to_string(),
            unit_price: Taka::from_whole(1250),
            quantity,
            selected_color: Some("Red".to_string()),
            selected_size: Some("M".to_string()),
            image_url: None,
        }
    }

    fn draft() -> OrderDraft {
        OrderDraft {
            customer_name: "Rahim Uddin".to_string(),
            phone: "01712345678".to_string(),
            address: "House 12, Road 5, Dhanmondi, Dhaka".to_string(),
            delivery_area: DeliveryArea::InsideDhaka,
            payment_method: PaymentMethod::CashOnDelivery,
            items: vec![line(2)],
        }
    }

    #[test]
    fn test_delivery_fees() {
        assert_eq!(DeliveryArea::InsideDhaka.fee(), Taka::from_whole(60));
        assert_eq!(DeliveryArea::OutsideDhaka.fee(), Taka::from_whole(120));
    }

    #[test]
    fn test_totals_add_up() {
        let mut order = draft();
        order.delivery_area = DeliveryArea::OutsideDhaka;

        assert_eq!(order.subtotal(), Taka::from_whole(2500));
        assert_eq!(order.total(), Taka::from_whole(2620));
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_unavailable_item_reports_under_items() {
        let errors = ValidationErrors::item_unavailable();
        assert!(!errors.is_empty());
        assert!(errors.field("items").is_some());
        assert!(errors.field("order").is_none());
    }

    #[test]
    fn test_bad_phone_is_rejected_before_submission() {
        let mut order = draft();
        order.phone = "12345".to_string();

        let errors = order.validate().unwrap_err();
        assert!(errors.field("phone").is_some());
        assert!(errors.field("customer_name").is_none());
    }

    #[test]
    fn test_validation_collects_every_failure() {
        let order = OrderDraft {
            customer_name: "   ".to_string(),
            phone: String::new(),
            address: String::new(),
            delivery_area: DeliveryArea::InsideDhaka,
            payment_method: PaymentMethod::CashOnDelivery,
            items: Vec::new(),
        };

        let errors = order.validate().unwrap_err();
        assert_eq!(errors.all().len(), 4);
        assert!(errors.field("customer_name").is_some());
        assert!(errors.field("phone").is_some());
        assert!(errors.field("address").is_some());
        assert!(errors.field("items").is_some());
    }

    #[test]
    fn test_to_request_maps_wire_fields() {
        let order = draft();
        let request = order.to_request();

        assert_eq!(request.delivery_area, "inside_dhaka");
        assert_eq!(request.payment_method, "cash_on_delivery");
        assert_eq!(request.subtotal, Taka::from_whole(2500));
        assert_eq!(request.delivery_charge, Taka::from_whole(60));
        assert_eq!(request.total, Taka::from_whole(2560));
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].id, ProductId::new(7));
        assert_eq!(request.items[0].color.as_deref(), Some("Red"));
        assert_eq!(request.items[0].quantity, 2);
    }

    #[test]
    fn test_rejection_merges_into_form_errors() {
        let rejection: OrderRejection = serde_json::from_str(
            r#"{"message": "invalid", "errors": {"phone": ["The phone format is invalid."]}}"#,
        )
        .unwrap();

        let mut errors = ValidationErrors::default();
        errors.extend_from_rejection(&rejection);
        assert_eq!(errors.field("phone"), Some("The phone format is invalid."));
    }
}
