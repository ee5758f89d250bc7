//! Checkout route handlers.
//!
//! Two entry modes share the same form: the session cart, and "buy now"
//! for a single item carried in the query string (and then in hidden form
//! fields) without ever touching the stored cart. A successful submission
//! clears the cart in either mode and leaves a one-shot receipt in the
//! session for the success page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{CartLineItem, CartStorageError, CartStore, SessionCartStorage};
use crate::catalog::CatalogError;
use crate::checkout::{DeliveryArea, OrderDraft, PaymentMethod, ValidationErrors};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::models::OrderReceipt;
use crate::models::session::keys;
use crate::routes::cart::CartItemView;
use crate::routes::products::NotFoundTemplate;
use crate::routes::{LayoutContext, layout_context};
use crate::state::AppState;

// =============================================================================
// Forms and Queries
// =============================================================================

/// Buy-now query string: `?item={slug}&color=&size=&quantity=`.
#[derive(Debug, Deserialize)]
pub struct BuyNowQuery {
    pub item: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<u32>,
}

/// Checkout form data.
///
/// The `buy_now_*` fields are hidden inputs present only in buy-now mode,
/// so the POST can rebuild the single-item order without consulting the cart.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub delivery_area: DeliveryArea,
    pub payment_method: PaymentMethod,
    pub buy_now_slug: Option<String>,
    pub buy_now_color: Option<String>,
    pub buy_now_size: Option<String>,
    pub buy_now_quantity: Option<u32>,
}

/// Previously entered form values, echoed back on validation failure.
#[derive(Clone, Default)]
pub struct CheckoutFormView {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    /// Wire value of the chosen delivery area.
    pub delivery_area: String,
    /// Wire value of the chosen payment method.
    pub payment_method: String,
}

/// Hidden buy-now fields for the form.
#[derive(Clone)]
pub struct BuyNowView {
    pub slug: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: u32,
}

// =============================================================================
// Templates
// =============================================================================

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub layout: LayoutContext,
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub inside_dhaka_fee: String,
    pub outside_dhaka_fee: String,
    pub form: CheckoutFormView,
    pub errors: ValidationErrors,
    pub buy_now: Option<BuyNowView>,
}

/// Order success page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub layout: LayoutContext,
    pub order_id: String,
    pub customer_name: String,
    pub total: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout form for the session cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> crate::error::Result<Response> {
    let cart = CartStore::new(SessionCartStorage::new(session.clone()));
    let items = cart.items().await;

    // Nothing to order; the cart page says so better than an empty form
    if items.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let layout = layout_context(&state, &session).await;
    Ok(render(
        layout,
        &items,
        CheckoutFormView::default(),
        ValidationErrors::default(),
        None,
        StatusCode::OK,
    ))
}

/// Display the checkout form for a single buy-now item.
///
/// The item never enters the stored cart; it travels in hidden form fields.
#[instrument(skip(state, session))]
pub async fn buy_now(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BuyNowQuery>,
) -> crate::error::Result<Response> {
    let line = match buy_now_line(&state, &query).await {
        Ok(line) => line,
        Err(CatalogError::NotFound(_)) => {
            let layout = layout_context(&state, &session).await;
            return Ok((
                StatusCode::NOT_FOUND,
                NotFoundTemplate {
                    layout,
                    message: "This product does not exist or is no longer available.".to_string(),
                },
            )
                .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let buy_now = BuyNowView {
        slug: line.slug.clone(),
        color: line.selected_color.clone(),
        size: line.selected_size.clone(),
        quantity: line.quantity,
    };

    let layout = layout_context(&state, &session).await;
    Ok(render(
        layout,
        &[line],
        CheckoutFormView::default(),
        ValidationErrors::default(),
        Some(buy_now),
        StatusCode::OK,
    ))
}

/// Validate the order and submit it to the backend.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> crate::error::Result<Response> {
    let cart = CartStore::new(SessionCartStorage::new(session.clone()));

    let form_view = CheckoutFormView {
        customer_name: form.customer_name.clone(),
        phone: form.phone.clone(),
        address: form.address.clone(),
        delivery_area: form.delivery_area.as_wire().to_string(),
        payment_method: form.payment_method.as_wire().to_string(),
    };

    // Buy-now submissions rebuild their single line from hidden fields;
    // everything else orders the stored cart
    let (items, buy_now) = match &form.buy_now_slug {
        Some(slug) => {
            let query = BuyNowQuery {
                item: slug.clone(),
                color: form.buy_now_color.clone(),
                size: form.buy_now_size.clone(),
                quantity: form.buy_now_quantity,
            };
            match buy_now_line(&state, &query).await {
                Ok(line) => {
                    let view = BuyNowView {
                        slug: line.slug.clone(),
                        color: line.selected_color.clone(),
                        size: line.selected_size.clone(),
                        quantity: line.quantity,
                    };
                    (vec![line], Some(view))
                }
                // The product can vanish between rendering the form and the
                // submission; tell the customer instead of erroring out
                Err(CatalogError::NotFound(_)) => {
                    let layout = layout_context(&state, &session).await;
                    return Ok(render(
                        layout,
                        &[],
                        form_view,
                        ValidationErrors::item_unavailable(),
                        None,
                        StatusCode::UNPROCESSABLE_ENTITY,
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }
        None => (cart.items().await, None),
    };

    let draft = OrderDraft {
        customer_name: form.customer_name,
        phone: form.phone,
        address: form.address,
        delivery_area: form.delivery_area,
        payment_method: form.payment_method,
        items,
    };

    if let Err(errors) = draft.validate() {
        let layout = layout_context(&state, &session).await;
        return Ok(render(
            layout,
            &draft.items,
            form_view,
            errors,
            buy_now,
            StatusCode::UNPROCESSABLE_ENTITY,
        ));
    }

    add_breadcrumb(
        "checkout",
        "Submitting order",
        Some(&[("items", &draft.items.len().to_string())]),
    );

    match state.catalog().submit_order(&draft.to_request()).await {
        Ok(confirmation) => {
            let receipt = OrderReceipt {
                order_id: confirmation.order_id,
                customer_name: draft.customer_name.trim().to_string(),
                total: draft.total(),
            };
            session
                .insert(keys::ORDER_RECEIPT, &receipt)
                .await
                .map_err(CartStorageError::from)?;

            // Any successful order empties the cart, buy-now included
            cart.clear().await?;

            Ok(Redirect::to("/checkout/success").into_response())
        }
        Err(CatalogError::OrderRejected(rejection)) => {
            tracing::warn!("Order rejected by backend: {rejection:?}");
            let mut errors = ValidationErrors::default();
            errors.extend_from_rejection(&rejection);

            let layout = layout_context(&state, &session).await;
            Ok(render(
                layout,
                &draft.items,
                form_view,
                errors,
                buy_now,
                StatusCode::UNPROCESSABLE_ENTITY,
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the order receipt.
///
/// The receipt is a one-shot flash: the first view consumes it, and a
/// revisit redirects home.
#[instrument(skip(state, session))]
pub async fn success(State(state): State<AppState>, session: Session) -> crate::error::Result<Response> {
    let receipt: Option<OrderReceipt> = session
        .remove(keys::ORDER_RECEIPT)
        .await
        .map_err(CartStorageError::from)?;

    let Some(receipt) = receipt else {
        return Ok(Redirect::to("/").into_response());
    };

    let layout = layout_context(&state, &session).await;
    Ok(CheckoutSuccessTemplate {
        layout,
        order_id: receipt.order_id.to_string(),
        customer_name: receipt.customer_name,
        total: receipt.total.to_string(),
    }
    .into_response())
}

// =============================================================================
// Helpers
// =============================================================================

/// Build a cart line for a buy-now item from the live product.
async fn buy_now_line(state: &AppState, query: &BuyNowQuery) -> Result<CartLineItem, CatalogError> {
    let detail = state.catalog().product(&query.item).await?;
    let product = detail.product;
    let unit_price = product.effective_price();

    Ok(CartLineItem {
        product_id: product.id,
        name: product.name,
        slug: product.slug,
        unit_price,
        quantity: query.quantity.unwrap_or(1).max(1),
        selected_color: query.color.clone().filter(|v| !v.trim().is_empty()),
        selected_size: query.size.clone().filter(|v| !v.trim().is_empty()),
        image_url: product.image_url,
    })
}

fn render(
    layout: LayoutContext,
    items: &[CartLineItem],
    form: CheckoutFormView,
    errors: ValidationErrors,
    buy_now: Option<BuyNowView>,
    status: StatusCode,
) -> Response {
    let subtotal: rupshari_core::types::Taka =
        items.iter().map(CartLineItem::line_total).sum();

    (
        status,
        CheckoutShowTemplate {
            layout,
            items: items.iter().map(CartItemView::from).collect(),
            subtotal: subtotal.to_string(),
            inside_dhaka_fee: DeliveryArea::InsideDhaka.fee().to_string(),
            outside_dhaka_fee: DeliveryArea::OutsideDhaka.fee().to_string(),
            form,
            errors,
            buy_now,
        },
    )
        .into_response()
}
