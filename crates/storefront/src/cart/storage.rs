//! Cart persistence backends.

use thiserror::Error;
use tower_sessions::Session;
use tracing::warn;

use crate::cart::CartLineItem;
use crate::models::session::keys;

/// Errors that can occur when persisting the cart.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// The underlying session store failed.
    #[error("session storage error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Where cart line items live between requests.
///
/// Loading is infallible: an unreadable or malformed stored cart is logged
/// and treated as empty rather than breaking the page.
pub trait CartStorage {
    /// Load the stored line items, or an empty list if nothing usable is stored.
    fn load(&self) -> impl Future<Output = Vec<CartLineItem>> + Send;

    /// Replace the stored line items.
    fn save(
        &self,
        items: &[CartLineItem],
    ) -> impl Future<Output = Result<(), CartStorageError>> + Send;
}

/// Session-backed cart storage, the production backend.
///
/// Items are serialized under the `cart_items` session key, so the cart
/// survives for the lifetime of the visitor's session cookie.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn load(&self) -> Vec<CartLineItem> {
        match self.session.get::<Vec<CartLineItem>>(keys::CART_ITEMS).await {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                // A cart we cannot read is an empty cart, not a broken page
                warn!(error = %e, "Failed to load cart from session, treating as empty");
                Vec::new()
            }
        }
    }

    async fn save(&self, items: &[CartLineItem]) -> Result<(), CartStorageError> {
        self.session.insert(keys::CART_ITEMS, items).await?;
        Ok(())
    }
}

/// In-memory cart storage for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    items: std::sync::Arc<std::sync::Mutex<Vec<CartLineItem>>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Vec<CartLineItem> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    async fn save(&self, items: &[CartLineItem]) -> Result<(), CartStorageError> {
        *self
            .items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = items.to_vec();
        Ok(())
    }
}
