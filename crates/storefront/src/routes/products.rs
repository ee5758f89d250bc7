//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{CatalogError, Product, ProductSort};
use crate::filters;
use crate::routes::{LayoutContext, layout_context};
use crate::state::AppState;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub slug: String,
    pub name: String,
    pub price: String,
    /// Struck-through original price, present only when discounted.
    pub compare_at_price: Option<String>,
    pub image: Option<ImageView>,
    pub rating: Option<f64>,
}

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
}

/// Color option display data.
#[derive(Clone)]
pub struct ColorView {
    pub name: String,
    /// CSS color code for the swatch, when the backend provides one.
    pub code: Option<String>,
}

/// Full product detail display data.
#[derive(Clone)]
pub struct ProductDetailView {
    pub slug: String,
    pub name: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub rating: Option<f64>,
    pub product_type: Option<String>,
    pub product_code: Option<String>,
    pub category_name: Option<String>,
    pub colors: Vec<ColorView>,
    pub sizes: Vec<String>,
    pub images: Vec<ImageView>,
    pub long_description: Option<String>,
    pub policy: Option<String>,
    pub video: Option<String>,
}

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
    pub sort: Option<String>,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            slug: product.slug.clone(),
            name: product.name.clone(),
            price: product.effective_price().to_string(),
            compare_at_price: product
                .is_discounted()
                .then(|| product.regular_price.to_string()),
            image: product
                .image_url
                .as_ref()
                .map(|url| ImageView { url: url.clone() }),
            rating: product.rating,
        }
    }
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        // The gallery prefers the dedicated image list, falling back to the
        // card image
        let mut images: Vec<ImageView> = product
            .product_images
            .iter()
            .map(|img| ImageView {
                url: img.image_url.clone(),
            })
            .collect();
        if images.is_empty() {
            if let Some(url) = &product.image_url {
                images.push(ImageView { url: url.clone() });
            }
        }

        Self {
            slug: product.slug.clone(),
            name: product.name.clone(),
            price: product.effective_price().to_string(),
            compare_at_price: product
                .is_discounted()
                .then(|| product.regular_price.to_string()),
            rating: product.rating,
            product_type: product.product_type.clone(),
            product_code: product.product_code.clone(),
            category_name: product.category.as_ref().map(|c| c.name.clone()),
            colors: product
                .colors
                .iter()
                .map(|color| ColorView {
                    name: color.name.clone(),
                    code: color.code.clone(),
                })
                .collect(),
            sizes: product.sizes.iter().map(|size| size.name.clone()).collect(),
            images,
            long_description: product.long_description.clone(),
            policy: product.policy.clone(),
            video: product.video.clone(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: LayoutContext,
    pub heading: String,
    pub products: Vec<ProductView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more_pages: bool,
    /// Base path for pagination links, e.g. `/products`.
    pub base_path: String,
    pub sort: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutContext,
    pub product: ProductDetailView,
    pub related: Vec<ProductView>,
}

/// Not-found page template, shared by product and category lookups.
#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub layout: LayoutContext,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the full product listing.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PaginationQuery>,
) -> crate::error::Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let sort = ProductSort::from_param(query.sort.as_deref());

    let products = state.catalog().products(page, sort).await?;
    let layout = layout_context(&state, &session).await;

    Ok(ProductsIndexTemplate {
        layout,
        heading: "All Products".to_string(),
        products: products.data.iter().map(ProductView::from).collect(),
        current_page: products.current_page,
        total_pages: products.last_page,
        has_more_pages: products.has_more(),
        base_path: "/products".to_string(),
        sort: sort.as_wire().to_string(),
    }
    .into_response())
}

/// Display the discounted products list.
///
/// The backend serves this as a flat curated list, so there is no paging.
#[instrument(skip(state, session))]
pub async fn discounted(
    State(state): State<AppState>,
    session: Session,
) -> crate::error::Result<Response> {
    let products = state.catalog().discounted_products().await?;
    let layout = layout_context(&state, &session).await;

    Ok(ProductsIndexTemplate {
        layout,
        heading: "Discounted Products".to_string(),
        products: products.iter().map(ProductView::from).collect(),
        current_page: 1,
        total_pages: 1,
        has_more_pages: false,
        base_path: "/products/discounted".to_string(),
        sort: ProductSort::Newest.as_wire().to_string(),
    }
    .into_response())
}

/// Display a product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> crate::error::Result<Response> {
    match state.catalog().product(&slug).await {
        Ok(detail) => {
            let layout = layout_context(&state, &session).await;
            Ok(ProductShowTemplate {
                layout,
                product: ProductDetailView::from(&detail.product),
                related: detail.related.iter().map(ProductView::from).collect(),
            }
            .into_response())
        }
        Err(CatalogError::NotFound(_)) => {
            let layout = layout_context(&state, &session).await;
            Ok((
                StatusCode::NOT_FOUND,
                NotFoundTemplate {
                    layout,
                    message: "This product does not exist or is no longer available.".to_string(),
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
