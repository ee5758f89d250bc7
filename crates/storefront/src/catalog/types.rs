//! Wire types for the remote catalog API.
//!
//! The API is a Laravel-style JSON service and is not consistent about
//! casing (`imageUrl` next to `regular_price`) or envelopes (`data`,
//! `products`, `categories`, `generalData` depending on the endpoint).
//! These types mirror the wire format exactly; anything nicer lives in the
//! view layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rupshari_core::{CategoryId, OrderId, ProductId, SliderId, Taka};

// =============================================================================
// Products
// =============================================================================

/// A product as returned by the catalog API.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub regular_price: Taka,
    /// Absent or zero means the product is not discounted.
    #[serde(default)]
    pub discount_price: Option<Taka>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    /// Product description, as HTML.
    #[serde(default)]
    pub long_description: Option<String>,
    /// Return policy, as HTML.
    #[serde(default)]
    pub policy: Option<String>,
    /// Embeddable product video URL.
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub product_images: Vec<ProductImage>,
}

impl Product {
    /// The price a customer actually pays: the discount price when present
    /// and non-zero, otherwise the regular price.
    #[must_use]
    pub fn effective_price(&self) -> Taka {
        match self.discount_price {
            Some(discount) if !discount.is_zero() => discount,
            _ => self.regular_price,
        }
    }

    /// Whether the product is currently discounted.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_price.is_some_and(|d| !d.is_zero())
    }
}

/// Category reference embedded in a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRef {
    pub name: String,
    pub slug: String,
}

/// A selectable product color.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorOption {
    pub name: String,
    /// CSS color code for the swatch, when the backend provides one.
    #[serde(default)]
    pub code: Option<String>,
}

/// A selectable product size.
///
/// The backend emits `{"name": ...}` on some products and `{"size": ...}`
/// on others; the alias accepts both.
#[derive(Debug, Clone, Deserialize)]
pub struct SizeOption {
    #[serde(alias = "size")]
    pub name: String,
}

/// A gallery image attached to a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// One page of a Laravel-paginated product list.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPage {
    pub data: Vec<Product>,
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default = "default_page")]
    pub last_page: u32,
}

const fn default_page() -> u32 {
    1
}

impl ProductPage {
    /// Whether pages exist after the current one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Product detail payload: the product plus its related products.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    #[serde(default)]
    pub related: Vec<Product>,
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl ProductSort {
    /// Wire value for the `sort` query parameter.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::RatingDesc => "rating_desc",
        }
    }

    /// Parse a query-string value, falling back to the default order for
    /// anything unrecognized.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("rating_desc") => Self::RatingDesc,
            _ => Self::Newest,
        }
    }
}

// =============================================================================
// Categories, sliders, site settings
// =============================================================================

/// A category with its subcategories.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// A subcategory within a category.
#[derive(Debug, Clone, Deserialize)]
pub struct Subcategory {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A home page banner slider.
#[derive(Debug, Clone, Deserialize)]
pub struct Slider {
    pub id: SliderId,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Shop-wide settings from the `general-data` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// =============================================================================
// Response envelopes
// =============================================================================

/// Generic `{"data": ...}` envelope.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// `{"products": [...]}` envelope used by the curated list endpoints.
#[derive(Debug, Deserialize)]
pub struct ProductsEnvelope {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// `{"categories": [...]}` envelope used by the featured-category endpoint.
#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// `{"generalData": {...}}` envelope for site settings.
#[derive(Debug, Deserialize)]
pub struct GeneralDataEnvelope {
    #[serde(rename = "generalData")]
    pub general_data: SiteSettings,
}

// =============================================================================
// Orders
// =============================================================================

/// Order submission payload sent to the order-confirmation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub delivery_area: &'static str,
    pub payment_method: &'static str,
    pub subtotal: Taka,
    pub delivery_charge: Taka,
    pub total: Taka,
    pub items: Vec<OrderItem>,
}

/// A normalized order line in the submission payload.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: ProductId,
    pub name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub price: Taka,
    pub quantity: u32,
}

/// Successful order confirmation response.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    #[serde(default)]
    pub message: Option<String>,
}

/// A 422 rejection body with per-field validation messages.
///
/// `BTreeMap` keeps field ordering stable for display and tests.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRejection {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl OrderRejection {
    /// Combine each field's messages into one line per field.
    #[must_use]
    pub fn field_messages(&self) -> Vec<(String, String)> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.clone(), messages.join("; ")))
            .collect()
    }

    /// Whether the rejection carries field-level errors at all.
    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_parses_mixed_case_fields() {
        let json = r##"{
            "id": 42,
            "name": "Cotton Panjabi",
            "slug": "cotton-panjabi",
            "imageUrl": "https://cdn.example.com/p/42.jpg",
            "regular_price": "1250.00",
            "discount_price": 999,
            "rating": 4.5,
            "product_type": "Hot",
            "category": {"name": "Men", "slug": "men"},
            "colors": [{"name": "Blue", "code": "#0000ff"}],
            "sizes": [{"name": "M"}, {"size": "L"}],
            "product_images": [{"imageUrl": "https://cdn.example.com/p/42-1.jpg"}]
        }"##;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(42));
        assert_eq!(product.slug, "cotton-panjabi");
        // Prices arrive as both strings and numbers
        assert_eq!(product.regular_price, Taka::from_whole(1250));
        assert_eq!(product.effective_price(), Taka::from_whole(999));
        assert!(product.is_discounted());
        // Both size spellings land in `name`
        assert_eq!(product.sizes[0].name, "M");
        assert_eq!(product.sizes[1].name, "L");
    }

    #[test]
    fn test_product_zero_discount_is_not_discounted() {
        let json = r#"{
            "id": 1,
            "name": "Plain Tee",
            "slug": "plain-tee",
            "imageUrl": null,
            "regular_price": 500,
            "discount_price": 0
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(!product.is_discounted());
        assert_eq!(product.effective_price(), Taka::from_whole(500));
    }

    #[test]
    fn test_product_page_parses_laravel_paginator() {
        let json = r#"{
            "current_page": 2,
            "data": [
                {"id": 1, "name": "A", "slug": "a", "imageUrl": null, "regular_price": 100},
                {"id": 2, "name": "B", "slug": "b", "imageUrl": null, "regular_price": 200}
            ],
            "last_page": 5,
            "total": 48
        }"#;

        let page: ProductPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 5);
        assert!(page.has_more());
    }

    #[test]
    fn test_product_sort_wire_values() {
        assert_eq!(ProductSort::Newest.as_wire(), "newest");
        assert_eq!(ProductSort::PriceAsc.as_wire(), "price_asc");
        assert_eq!(ProductSort::PriceDesc.as_wire(), "price_desc");
        assert_eq!(ProductSort::RatingDesc.as_wire(), "rating_desc");
    }

    #[test]
    fn test_product_sort_from_param() {
        assert_eq!(ProductSort::from_param(None), ProductSort::Newest);
        assert_eq!(
            ProductSort::from_param(Some("price_asc")),
            ProductSort::PriceAsc
        );
        assert_eq!(ProductSort::from_param(Some("bogus")), ProductSort::Newest);
    }

    #[test]
    fn test_categories_envelope() {
        let json = r#"{
            "success": true,
            "data": [
                {"id": 1, "name": "Men", "slug": "men", "subcategories": [
                    {"id": 7, "name": "Panjabi", "slug": "panjabi"}
                ]},
                {"id": 2, "name": "Women", "slug": "women"}
            ]
        }"#;

        let envelope: DataEnvelope<Vec<Category>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].subcategories[0].slug, "panjabi");
        assert!(envelope.data[1].subcategories.is_empty());
    }

    #[test]
    fn test_general_data_envelope() {
        let json = r#"{
            "generalData": {
                "logo_url": "https://cdn.example.com/logo.png",
                "phone": "01712345678",
                "email": "hello@example.com"
            }
        }"#;

        let envelope: GeneralDataEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.general_data.phone.as_deref(), Some("01712345678"));
        assert!(envelope.general_data.shop_name.is_none());
    }

    #[test]
    fn test_order_request_serializes_expected_shape() {
        let request = OrderRequest {
            customer_name: "Rahim Uddin".to_string(),
            phone: "01712345678".to_string(),
            address: "House 7, Road 3, Dhanmondi".to_string(),
            delivery_area: "inside_dhaka",
            payment_method: "cash_on_delivery",
            subtotal: Taka::from_whole(200),
            delivery_charge: Taka::from_whole(60),
            total: Taka::from_whole(260),
            items: vec![OrderItem {
                id: ProductId::new(1),
                name: "Plain Tee".to_string(),
                color: Some("Blue".to_string()),
                size: None,
                price: Taka::from_whole(100),
                quantity: 2,
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["delivery_area"], "inside_dhaka");
        assert_eq!(value["payment_method"], "cash_on_delivery");
        assert_eq!(value["total"], "260");
        assert_eq!(value["items"][0]["id"], 1);
        assert_eq!(value["items"][0]["quantity"], 2);
        assert!(value["items"][0]["size"].is_null());
    }

    #[test]
    fn test_order_rejection_combines_field_messages() {
        let json = r#"{
            "message": "The given data was invalid.",
            "errors": {
                "phone": ["The phone field is required.", "The phone format is invalid."],
                "address": ["The address field is required."]
            }
        }"#;

        let rejection: OrderRejection = serde_json::from_str(json).unwrap();
        assert!(rejection.has_field_errors());

        let messages = rejection.field_messages();
        assert_eq!(
            messages,
            vec![
                (
                    "address".to_string(),
                    "The address field is required.".to_string()
                ),
                (
                    "phone".to_string(),
                    "The phone field is required.; The phone format is invalid.".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_order_rejection_without_field_errors() {
        let rejection: OrderRejection = serde_json::from_str(r#"{"message": "nope"}"#).unwrap();
        assert!(!rejection.has_field_errors());
        assert!(rejection.field_messages().is_empty());
    }
}
