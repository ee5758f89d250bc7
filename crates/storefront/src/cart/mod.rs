//! Shopping cart state and persistence.
//!
//! # Architecture
//!
//! - [`CartLineItem`] is the unit of cart state: a product snapshot plus the
//!   visitor's chosen color/size and quantity
//! - [`CartStore`] holds the cart operations (add, remove, quantity changes)
//!   and is generic over where the items live
//! - [`CartStorage`] is the persistence seam: the real app uses
//!   [`SessionCartStorage`] (tower-sessions), tests use [`MemoryCartStorage`]
//!
//! Two lines are the same line when product id, selected color and selected
//! size all match. A quantity of zero never exists in a stored cart.

mod storage;
mod store;

pub use storage::{CartStorage, CartStorageError, MemoryCartStorage, SessionCartStorage};
pub use store::CartStore;

use rupshari_core::types::{ProductId, Taka};
use serde::{Deserialize, Serialize};

/// One line in the cart: a product snapshot plus chosen options.
///
/// Prices and names are snapshotted at add time so the cart keeps rendering
/// even if the catalog API is briefly unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub unit_price: Taka,
    pub quantity: u32,
    #[serde(default)]
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CartLineItem {
    /// The identity of this line within a cart.
    #[must_use]
    pub fn key(&self) -> (ProductId, Option<&str>, Option<&str>) {
        (
            self.product_id,
            self.selected_color.as_deref(),
            self.selected_size.as_deref(),
        )
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Taka {
        self.unit_price * self.quantity
    }
}
