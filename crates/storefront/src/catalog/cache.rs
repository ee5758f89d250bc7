//! Cache types for catalog API responses.

use crate::catalog::types::{Category, Product, ProductDetail, ProductPage, SiteSettings, Slider};

/// Cached value types, one variant per cacheable payload shape.
#[derive(Debug, Clone)]
pub enum CacheValue {
    ProductDetail(Box<ProductDetail>),
    ProductPage(ProductPage),
    ProductList(Vec<Product>),
    Categories(Vec<Category>),
    Sliders(Vec<Slider>),
    Settings(SiteSettings),
}
