//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Line items live in the session; the catalog API is only consulted when
//! adding, to snapshot the authoritative price.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use rupshari_core::types::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartLineItem, CartStore, SessionCartStorage};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::routes::{LayoutContext, layout_context};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i64,
    pub slug: String,
    pub name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: line.product_id.as_i64(),
            slug: line.slug.clone(),
            name: line.name.clone(),
            color: line.selected_color.clone(),
            size: line.selected_size.clone(),
            quantity: line.quantity,
            price: line.unit_price.to_string(),
            line_price: line.line_total().to_string(),
            image_url: line.image_url.clone(),
        }
    }
}

/// Build the cart view from the session store.
async fn cart_view(cart: &CartStore<SessionCartStorage>) -> CartView {
    let items = cart.items().await;
    CartView {
        item_count: items.iter().map(|line| line.quantity).sum(),
        subtotal: items
            .iter()
            .map(CartLineItem::line_total)
            .sum::<rupshari_core::types::Taka>()
            .to_string(),
        items: items.iter().map(CartItemView::from).collect(),
    }
}

fn session_cart(session: &Session) -> CartStore<SessionCartStorage> {
    CartStore::new(SessionCartStorage::new(session.clone()))
}

/// Empty-string form selects mean "no option chosen".
fn normalize_option(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub quantity: Option<u32>,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Identifies one cart line by its variant key.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub product_id: i64,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// Set-quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = cart_view(&session_cart(&session)).await;
    let layout = layout_context(&state, &session).await;

    CartShowTemplate { layout, cart }
}

/// Add item to cart (HTMX).
///
/// Fetches the product so the stored line carries the authoritative price,
/// not whatever the page happened to render. Adding a variant already in the
/// cart replaces its quantity. Returns an HTMX trigger to update the cart
/// count badge.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let detail = match state.catalog().product(&form.slug).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::error!("Failed to fetch product for cart add: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    let product = detail.product;
    let line = CartLineItem {
        product_id: product.id,
        name: product.name.clone(),
        slug: product.slug.clone(),
        unit_price: product.effective_price(),
        quantity: form.quantity.unwrap_or(1),
        selected_color: normalize_option(form.color),
        selected_size: normalize_option(form.size),
        image_url: product.image_url.clone(),
    };

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("slug", &product.slug)]),
    );

    let cart = session_cart(&session);
    if let Err(e) = cart.add(line).await {
        tracing::error!("Failed to save cart: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<span class=\"error\">Error adding to cart</span>"),
        )
            .into_response();
    }

    let count = cart.total_quantity().await;

    // Return cart count with HTMX trigger to update other elements
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response()
}

/// Set a cart line's quantity (HTMX).
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let cart = session_cart(&session);
    if let Err(e) = cart
        .set_quantity(
            ProductId::new(form.product_id),
            normalize_option(form.color).as_deref(),
            normalize_option(form.size).as_deref(),
            form.quantity,
        )
        .await
    {
        tracing::error!("Failed to update cart: {e}");
    }

    items_fragment(&cart).await
}

/// Increase a cart line's quantity by one (HTMX).
#[instrument(skip(session))]
pub async fn increase(session: Session, Form(form): Form<LineForm>) -> Response {
    let cart = session_cart(&session);
    if let Err(e) = cart
        .increase_quantity(
            ProductId::new(form.product_id),
            normalize_option(form.color).as_deref(),
            normalize_option(form.size).as_deref(),
        )
        .await
    {
        tracing::error!("Failed to increase cart quantity: {e}");
    }

    items_fragment(&cart).await
}

/// Decrease a cart line's quantity by one, never below one (HTMX).
#[instrument(skip(session))]
pub async fn decrease(session: Session, Form(form): Form<LineForm>) -> Response {
    let cart = session_cart(&session);
    if let Err(e) = cart
        .decrease_quantity(
            ProductId::new(form.product_id),
            normalize_option(form.color).as_deref(),
            normalize_option(form.size).as_deref(),
        )
        .await
    {
        tracing::error!("Failed to decrease cart quantity: {e}");
    }

    items_fragment(&cart).await
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<LineForm>) -> Response {
    let cart = session_cart(&session);
    if let Err(e) = cart
        .remove(
            ProductId::new(form.product_id),
            normalize_option(form.color).as_deref(),
            normalize_option(form.size).as_deref(),
        )
        .await
    {
        tracing::error!("Failed to remove from cart: {e}");
    }

    items_fragment(&cart).await
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let cart = session_cart(&session);
    if let Err(e) = cart.clear().await {
        tracing::error!("Failed to clear cart: {e}");
    }

    items_fragment(&cart).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let count = session_cart(&session).total_quantity().await;
    CartCountTemplate { count }
}

async fn items_fragment(cart: &CartStore<SessionCartStorage>) -> Response {
    let cart = cart_view(cart).await;
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}
