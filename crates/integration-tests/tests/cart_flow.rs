//! Cart flow scenarios over the in-memory storage backend.
//!
//! Exercises the cart the way a shopper would: browsing variants onto the
//! cart, changing quantities on the cart page, and clearing out.

#![allow(clippy::unwrap_used)]

use rupshari_core::types::{ProductId, Taka};
use rupshari_storefront::cart::{CartLineItem, CartStore, MemoryCartStorage};

fn line(
    product_id: i64,
    price: i64,
    quantity: u32,
    color: Option<&str>,
    size: Option<&str>,
) -> CartLineItem {
    CartLineItem {
        product_id: ProductId::new(product_id),
        name: format!("Product {product_id}"),
        slug: format!("product-{product_id}"),
        unit_price: Taka::from_whole(price),
        quantity,
        selected_color: color.map(String::from),
        selected_size: size.map(String::from),
        image_url: None,
    }
}

#[tokio::test]
async fn test_shopping_session_flow() {
    let cart = CartStore::new(MemoryCartStorage::new());
    assert!(cart.is_empty().await);

    // Pick up a panjabi in two sizes and a saree
    cart.add(line(1, 1250, 1, Some("Red"), Some("M"))).await.unwrap();
    cart.add(line(1, 1250, 1, Some("Red"), Some("L"))).await.unwrap();
    cart.add(line(2, 4500, 1, None, None)).await.unwrap();

    assert_eq!(cart.items().await.len(), 3);
    assert_eq!(cart.total_quantity().await, 3);
    assert_eq!(cart.subtotal().await, Taka::from_whole(7000));

    // Re-adding the size M line with a new quantity replaces, not stacks
    cart.add(line(1, 1250, 3, Some("Red"), Some("M"))).await.unwrap();
    assert_eq!(cart.items().await.len(), 3);
    assert_eq!(cart.total_quantity().await, 5);
    assert_eq!(cart.subtotal().await, Taka::from_whole(9500));

    // Bump the saree up, then drop the size L line entirely
    cart.increase_quantity(ProductId::new(2), None, None)
        .await
        .unwrap();
    cart.remove(ProductId::new(1), Some("Red"), Some("L"))
        .await
        .unwrap();

    assert_eq!(cart.items().await.len(), 2);
    assert_eq!(cart.subtotal().await, Taka::from_whole(12750));
}

#[tokio::test]
async fn test_decrease_never_removes_a_line() {
    let cart = CartStore::new(MemoryCartStorage::new());
    cart.add(line(1, 100, 2, None, None)).await.unwrap();

    for _ in 0..5 {
        cart.decrease_quantity(ProductId::new(1), None, None)
            .await
            .unwrap();
    }

    let items = cart.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 1);
}

#[tokio::test]
async fn test_variant_key_isolation() {
    let cart = CartStore::new(MemoryCartStorage::new());

    // Same product, all distinct variant keys
    cart.add(line(1, 100, 1, Some("Red"), Some("M"))).await.unwrap();
    cart.add(line(1, 100, 1, Some("Blue"), Some("M"))).await.unwrap();
    cart.add(line(1, 100, 1, Some("Red"), None)).await.unwrap();
    cart.add(line(1, 100, 1, None, Some("M"))).await.unwrap();
    cart.add(line(1, 100, 1, None, None)).await.unwrap();

    assert_eq!(cart.items().await.len(), 5);

    // Mutating one variant leaves the others alone
    cart.set_quantity(ProductId::new(1), Some("Blue"), Some("M"), 7)
        .await
        .unwrap();

    let items = cart.items().await;
    let blue = items
        .iter()
        .find(|l| l.selected_color.as_deref() == Some("Blue"))
        .unwrap();
    assert_eq!(blue.quantity, 7);
    assert!(
        items
            .iter()
            .filter(|l| l.selected_color.as_deref() != Some("Blue"))
            .all(|l| l.quantity == 1)
    );
}

#[tokio::test]
async fn test_clear_resets_everything() {
    let cart = CartStore::new(MemoryCartStorage::new());
    cart.add(line(1, 100, 3, None, None)).await.unwrap();
    cart.add(line(2, 200, 1, None, None)).await.unwrap();

    cart.clear().await.unwrap();

    assert!(cart.is_empty().await);
    assert_eq!(cart.total_quantity().await, 0);
    assert_eq!(cart.subtotal().await, Taka::ZERO);
}

#[tokio::test]
async fn test_line_items_survive_serialization() {
    // The session store persists lines as JSON; a round trip must be exact
    let original = line(9, 1899, 2, Some("Green"), None);
    let json = serde_json::to_string(&original).unwrap();
    let restored: CartLineItem = serde_json::from_str(&json).unwrap();

    assert_eq!(original, restored);
    assert_eq!(restored.line_total(), Taka::from_whole(3798));
}
