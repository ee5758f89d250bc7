//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check
//!
//! # Products
//! GET  /products               - Product listing (paginated, sortable)
//! GET  /products/discounted    - Discounted products
//! GET  /products/:slug         - Product detail
//!
//! # Categories
//! GET  /categories             - Category listing
//! GET  /categories/:slug       - Products in a category
//! GET  /categories/:slug/:subcategory - Products in a subcategory
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Set quantity (returns cart_items fragment)
//! POST /cart/increase          - Increase quantity by one
//! POST /cart/decrease          - Decrease quantity by one (floors at 1)
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form for the session cart
//! GET  /checkout/buy-now       - Checkout form for a single item (query string)
//! POST /checkout               - Validate and submit the order
//! GET  /checkout/success       - Order receipt (one-shot flash)
//! ```

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::cart::{CartStore, SessionCartStorage};
use crate::state::AppState;

// =============================================================================
// Shared Layout Data
// =============================================================================

/// Shop identity for the header and footer.
#[derive(Clone)]
pub struct ShopView {
    pub name: String,
    pub logo_url: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// A category link in the navigation menu.
#[derive(Clone)]
pub struct NavCategoryView {
    pub name: String,
    pub slug: String,
}

/// Data every page's chrome needs: shop identity, nav menu, cart badge.
#[derive(Clone)]
pub struct LayoutContext {
    pub shop: ShopView,
    pub nav_categories: Vec<NavCategoryView>,
    pub cart_count: u32,
}

/// Fallback shop name when the settings endpoint is unavailable.
const DEFAULT_SHOP_NAME: &str = "Rupshari";

/// Assemble the layout context for a page render.
///
/// Settings and categories degrade to defaults on catalog failure so the
/// chrome never takes a page down.
pub async fn layout_context(state: &AppState, session: &Session) -> LayoutContext {
    let shop = state.catalog().site_settings().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch site settings: {e}");
            ShopView {
                name: DEFAULT_SHOP_NAME.to_string(),
                logo_url: None,
                phone: None,
                email: None,
                address: None,
            }
        },
        |settings| ShopView {
            name: settings
                .shop_name
                .unwrap_or_else(|| DEFAULT_SHOP_NAME.to_string()),
            logo_url: settings.logo_url,
            phone: settings.phone,
            email: settings.email,
            address: settings.address,
        },
    );

    let nav_categories = state.catalog().categories().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch categories for navigation: {e}");
            Vec::new()
        },
        |categories| {
            categories
                .into_iter()
                .map(|category| NavCategoryView {
                    name: category.name,
                    slug: category.slug,
                })
                .collect()
        },
    );

    let cart = CartStore::new(SessionCartStorage::new(session.clone()));
    let cart_count = cart.total_quantity().await;

    LayoutContext {
        shop,
        nav_categories,
        cart_count,
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/discounted", get(products::discounted))
        .route("/{slug}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{slug}", get(categories::show))
        .route("/{slug}/{subcategory}", get(categories::show_subcategory))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/buy-now", get(checkout::buy_now))
        .route("/success", get(checkout::success))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Category routes
        .nest("/categories", category_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
}
