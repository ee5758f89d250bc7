//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::{CatalogError, Category, ProductSort};
use crate::filters;
use crate::routes::{LayoutContext, layout_context};
use crate::state::AppState;

pub use super::products::{ImageView, NotFoundTemplate, PaginationQuery, ProductView};

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub slug: String,
    pub image: Option<ImageView>,
    pub subcategories: Vec<SubcategoryView>,
}

/// Subcategory display data for templates.
#[derive(Clone)]
pub struct SubcategoryView {
    pub name: String,
    pub slug: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            image: category
                .image_url
                .as_ref()
                .map(|url| ImageView { url: url.clone() }),
            subcategories: category
                .subcategories
                .iter()
                .map(|sub| SubcategoryView {
                    name: sub.name.clone(),
                    slug: sub.slug.clone(),
                })
                .collect(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub layout: LayoutContext,
    pub categories: Vec<CategoryView>,
}

/// Category product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub layout: LayoutContext,
    pub heading: String,
    pub subcategories: Vec<SubcategoryView>,
    pub products: Vec<ProductView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more_pages: bool,
    /// Base path for pagination links, e.g. `/categories/panjabi`.
    pub base_path: String,
    /// Category root for subcategory links, without any subcategory segment.
    pub category_base: String,
    pub sort: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the category listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> crate::error::Result<Response> {
    let categories = state.catalog().categories().await?;
    let layout = layout_context(&state, &session).await;

    Ok(CategoriesIndexTemplate {
        layout,
        categories: categories.iter().map(CategoryView::from).collect(),
    }
    .into_response())
}

/// Display the products in a category.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> crate::error::Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let sort = ProductSort::from_param(query.sort.as_deref());

    match state.catalog().products_by_category(&slug, page, sort).await {
        Ok(products) => {
            let layout = layout_context(&state, &session).await;
            // Subcategory links come from the nav categories already fetched
            // for the layout, via the full category list
            let subcategories = subcategories_of(&state, &slug).await;

            Ok(CategoryShowTemplate {
                layout,
                heading: heading_for(&state, &slug).await,
                subcategories,
                products: products.data.iter().map(ProductView::from).collect(),
                current_page: products.current_page,
                total_pages: products.last_page,
                has_more_pages: products.has_more(),
                base_path: format!("/categories/{slug}"),
                category_base: format!("/categories/{slug}"),
                sort: sort.as_wire().to_string(),
            }
            .into_response())
        }
        Err(CatalogError::NotFound(_)) => not_found(&state, &session).await,
        Err(e) => Err(e.into()),
    }
}

/// Display the products in a subcategory.
#[instrument(skip(state, session))]
pub async fn show_subcategory(
    State(state): State<AppState>,
    session: Session,
    Path((slug, subcategory)): Path<(String, String)>,
    Query(query): Query<PaginationQuery>,
) -> crate::error::Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let sort = ProductSort::from_param(query.sort.as_deref());

    match state
        .catalog()
        .products_by_subcategory(&subcategory, page, sort)
        .await
    {
        Ok(products) => {
            let layout = layout_context(&state, &session).await;
            let subcategories = subcategories_of(&state, &slug).await;

            Ok(CategoryShowTemplate {
                layout,
                heading: subcategory_heading(&state, &slug, &subcategory).await,
                subcategories,
                products: products.data.iter().map(ProductView::from).collect(),
                current_page: products.current_page,
                total_pages: products.last_page,
                has_more_pages: products.has_more(),
                base_path: format!("/categories/{slug}/{subcategory}"),
                category_base: format!("/categories/{slug}"),
                sort: sort.as_wire().to_string(),
            }
            .into_response())
        }
        Err(CatalogError::NotFound(_)) => not_found(&state, &session).await,
        Err(e) => Err(e.into()),
    }
}

async fn not_found(state: &AppState, session: &Session) -> crate::error::Result<Response> {
    let layout = layout_context(state, session).await;
    Ok((
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            layout,
            message: "This category does not exist.".to_string(),
        },
    )
        .into_response())
}

/// The category's display name, falling back to the slug when the category
/// list is unavailable.
async fn heading_for(state: &AppState, slug: &str) -> String {
    state
        .catalog()
        .categories()
        .await
        .ok()
        .and_then(|categories| {
            categories
                .iter()
                .find(|c| c.slug == slug)
                .map(|c| c.name.clone())
        })
        .unwrap_or_else(|| slug.to_string())
}

async fn subcategory_heading(state: &AppState, slug: &str, subcategory: &str) -> String {
    state
        .catalog()
        .categories()
        .await
        .ok()
        .and_then(|categories| {
            categories.iter().find(|c| c.slug == slug).and_then(|c| {
                c.subcategories
                    .iter()
                    .find(|s| s.slug == subcategory)
                    .map(|s| s.name.clone())
            })
        })
        .unwrap_or_else(|| subcategory.to_string())
}

async fn subcategories_of(state: &AppState, slug: &str) -> Vec<SubcategoryView> {
    state
        .catalog()
        .categories()
        .await
        .ok()
        .and_then(|categories| {
            categories
                .iter()
                .find(|c| c.slug == slug)
                .map(|c| CategoryView::from(c).subcategories)
        })
        .unwrap_or_default()
}
