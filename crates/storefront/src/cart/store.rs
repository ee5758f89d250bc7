//! Cart operations over a storage backend.

use rupshari_core::types::{ProductId, Taka};
use tracing::debug;

use crate::cart::storage::{CartStorage, CartStorageError};
use crate::cart::CartLineItem;

/// The cart: operations over whatever [`CartStorage`] backs it.
///
/// Every mutation is load, modify, save. Concurrent requests from the same
/// session resolve last-write-wins, which is acceptable for a single
/// visitor's cart.
#[derive(Debug, Clone)]
pub struct CartStore<S: CartStorage> {
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Add a line to the cart.
    ///
    /// If a line with the same product id, color and size already exists,
    /// its quantity is REPLACED with the incoming one (adding the same item
    /// twice with quantity 2 leaves quantity 2, not 4). Otherwise the line
    /// is appended. A quantity below 1 is clamped to 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub async fn add(&self, mut item: CartLineItem) -> Result<(), CartStorageError> {
        item.quantity = item.quantity.max(1);

        let mut items = self.storage.load().await;
        if let Some(existing) = items.iter_mut().find(|line| line.key() == item.key()) {
            debug!(product_id = %item.product_id, "Replacing quantity on existing cart line");
            existing.quantity = item.quantity;
        } else {
            items.push(item);
        }
        self.storage.save(&items).await
    }

    /// Remove the line matching the given variant, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub async fn remove(
        &self,
        product_id: ProductId,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<(), CartStorageError> {
        let mut items = self.storage.load().await;
        items.retain(|line| line.key() != (product_id, color, size));
        self.storage.save(&items).await
    }

    /// Increase the matching line's quantity by one. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub async fn increase_quantity(
        &self,
        product_id: ProductId,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<(), CartStorageError> {
        let mut items = self.storage.load().await;
        if let Some(line) = items
            .iter_mut()
            .find(|line| line.key() == (product_id, color, size))
        {
            line.quantity = line.quantity.saturating_add(1);
        }
        self.storage.save(&items).await
    }

    /// Decrease the matching line's quantity by one, never below 1.
    ///
    /// Removal is explicit via [`Self::remove`]; decrementing cannot delete
    /// a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub async fn decrease_quantity(
        &self,
        product_id: ProductId,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<(), CartStorageError> {
        let mut items = self.storage.load().await;
        if let Some(line) = items
            .iter_mut()
            .find(|line| line.key() == (product_id, color, size))
        {
            line.quantity = line.quantity.saturating_sub(1).max(1);
        }
        self.storage.save(&items).await
    }

    /// Set the matching line's quantity directly, clamped to at least 1.
    /// No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub async fn set_quantity(
        &self,
        product_id: ProductId,
        color: Option<&str>,
        size: Option<&str>,
        quantity: u32,
    ) -> Result<(), CartStorageError> {
        let mut items = self.storage.load().await;
        if let Some(line) = items
            .iter_mut()
            .find(|line| line.key() == (product_id, color, size))
        {
            line.quantity = quantity.max(1);
        }
        self.storage.save(&items).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub async fn clear(&self) -> Result<(), CartStorageError> {
        self.storage.save(&[]).await
    }

    /// All line items, in insertion order.
    pub async fn items(&self) -> Vec<CartLineItem> {
        self.storage.load().await
    }

    /// Whether the cart has no lines.
    pub async fn is_empty(&self) -> bool {
        self.storage.load().await.is_empty()
    }

    /// Sum of all line quantities (the badge number).
    pub async fn total_quantity(&self) -> u32 {
        self.storage
            .load()
            .await
            .iter()
            .map(|line| line.quantity)
            .sum()
    }

    /// Sum of all line totals, before delivery charges.
    pub async fn subtotal(&self) -> Taka {
        self.storage
            .load()
            .await
            .iter()
            .map(CartLineItem::line_total)
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::MemoryCartStorage;

    fn store() -> CartStore<MemoryCartStorage> {
        CartStore::new(MemoryCartStorage::new())
    }

    fn panjabi(quantity: u32, color: Option<&str>, size: Option<&str>) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(7),
            name: "Cotton Panjabi".to_string(),
            slug: "cotton-panjabi".to_string(),
            unit_price: Taka::from_whole(1250),
            quantity,
            selected_color: color.map(String::from),
            selected_size: size.map(String::from),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_add_appends_new_line() {
        let cart = store();
        cart.add(panjabi(2, Some("Red"), Some("M"))).await.unwrap();

        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_add_same_variant_replaces_quantity() {
        let cart = store();
        cart.add(panjabi(3, Some("Red"), Some("M"))).await.unwrap();
        cart.add(panjabi(2, Some("Red"), Some("M"))).await.unwrap();

        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        // Replaced, not accumulated
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_add_different_variant_is_a_separate_line() {
        let cart = store();
        cart.add(panjabi(1, Some("Red"), Some("M"))).await.unwrap();
        cart.add(panjabi(1, Some("Red"), Some("L"))).await.unwrap();
        cart.add(panjabi(1, None, None)).await.unwrap();

        assert_eq!(cart.items().await.len(), 3);
        assert_eq!(cart.total_quantity().await, 3);
    }

    #[tokio::test]
    async fn test_add_clamps_zero_quantity_to_one() {
        let cart = store();
        cart.add(panjabi(0, None, None)).await.unwrap();
        assert_eq!(cart.items().await[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_remove_only_touches_matching_variant() {
        let cart = store();
        cart.add(panjabi(1, Some("Red"), Some("M"))).await.unwrap();
        cart.add(panjabi(1, Some("Red"), Some("L"))).await.unwrap();

        cart.remove(ProductId::new(7), Some("Red"), Some("M"))
            .await
            .unwrap();

        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].selected_size.as_deref(), Some("L"));
    }

    #[tokio::test]
    async fn test_increase_and_decrease_quantity() {
        let cart = store();
        cart.add(panjabi(2, None, None)).await.unwrap();

        cart.increase_quantity(ProductId::new(7), None, None)
            .await
            .unwrap();
        assert_eq!(cart.items().await[0].quantity, 3);

        cart.decrease_quantity(ProductId::new(7), None, None)
            .await
            .unwrap();
        assert_eq!(cart.items().await[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_decrease_floors_at_one() {
        let cart = store();
        cart.add(panjabi(1, None, None)).await.unwrap();

        cart.decrease_quantity(ProductId::new(7), None, None)
            .await
            .unwrap();

        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_set_quantity_clamps_to_one() {
        let cart = store();
        cart.add(panjabi(5, None, None)).await.unwrap();

        cart.set_quantity(ProductId::new(7), None, None, 0)
            .await
            .unwrap();
        assert_eq!(cart.items().await[0].quantity, 1);

        cart.set_quantity(ProductId::new(7), None, None, 9)
            .await
            .unwrap();
        assert_eq!(cart.items().await[0].quantity, 9);
    }

    #[tokio::test]
    async fn test_quantity_change_on_absent_line_is_a_noop() {
        let cart = store();
        cart.add(panjabi(2, None, None)).await.unwrap();

        cart.increase_quantity(ProductId::new(99), None, None)
            .await
            .unwrap();
        cart.set_quantity(ProductId::new(7), Some("Red"), None, 5)
            .await
            .unwrap();

        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_clear_empties_the_cart() {
        let cart = store();
        cart.add(panjabi(2, None, None)).await.unwrap();
        assert!(!cart.is_empty().await);

        cart.clear().await.unwrap();
        assert!(cart.is_empty().await);
        assert_eq!(cart.total_quantity().await, 0);
        assert_eq!(cart.subtotal().await, Taka::ZERO);
    }

    #[tokio::test]
    async fn test_subtotal_sums_line_totals() {
        let cart = store();
        cart.add(panjabi(2, Some("Red"), None)).await.unwrap();
        cart.add(panjabi(1, Some("Blue"), None)).await.unwrap();

        // 2 * 1250 + 1 * 1250
        assert_eq!(cart.subtotal().await, Taka::from_whole(3750));
    }
}
