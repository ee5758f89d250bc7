//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{Category, Slider};
use crate::filters;
use crate::routes::products::ProductView;
use crate::routes::{LayoutContext, layout_context};
use crate::state::AppState;

/// Banner slide display data.
#[derive(Clone)]
pub struct SliderView {
    pub image_url: String,
}

/// Featured category tile display data.
#[derive(Clone)]
pub struct CategoryTileView {
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Slider> for SliderView {
    fn from(slider: &Slider) -> Self {
        Self {
            image_url: slider.image_url.clone(),
        }
    }
}

impl From<&Category> for CategoryTileView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            image_url: category.image_url.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutContext,
    /// Banner carousel slides.
    pub sliders: Vec<SliderView>,
    /// True when the slider fetch failed; the template shows a retry link.
    pub sliders_failed: bool,
    /// Featured category tiles.
    pub featured_categories: Vec<CategoryTileView>,
    /// Newest products section.
    pub new_arrivals: Vec<ProductView>,
    /// Curated featured products section.
    pub featured_products: Vec<ProductView>,
    /// Discounted products section.
    pub discounted_products: Vec<ProductView>,
}

/// Display the home page.
///
/// Each section degrades independently: a failed fetch logs and renders
/// empty rather than taking the whole page down. The banner is the one
/// exception, showing an inline error with a retry link because an empty
/// hero looks broken.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let (sliders, sliders_failed) = match state.catalog().sliders().await {
        Ok(sliders) => (sliders.iter().map(SliderView::from).collect(), false),
        Err(e) => {
            tracing::error!("Failed to fetch home sliders: {e}");
            (Vec::new(), true)
        }
    };

    let featured_categories = state.catalog().featured_categories().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured categories: {e}");
            Vec::new()
        },
        |categories| categories.iter().map(CategoryTileView::from).collect(),
    );

    let new_arrivals = state.catalog().new_arrivals().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch new arrivals: {e}");
            Vec::new()
        },
        |products| products.iter().map(ProductView::from).collect(),
    );

    let featured_products = state.catalog().featured_products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |products| products.iter().map(ProductView::from).collect(),
    );

    let discounted_products = state.catalog().discounted_products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch discounted products: {e}");
            Vec::new()
        },
        |products| products.iter().map(ProductView::from).collect(),
    );

    let layout = layout_context(&state, &session).await;

    HomeTemplate {
        layout,
        sliders,
        sliders_failed,
        featured_categories,
        new_arrivals,
        featured_products,
        discounted_products,
    }
}
