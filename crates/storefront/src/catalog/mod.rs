//! Typed client for the remote catalog API.
//!
//! # Architecture
//!
//! - The remote API is the source of truth - NO local sync, direct calls
//! - Plain REST/JSON over `reqwest`; response shapes live in [`types`]
//! - In-memory caching via `moka` for read endpoints (configurable TTL),
//!   with a per-key generation counter so a superseded in-flight fetch can
//!   never repopulate the cache after an invalidation
//! - Order submission is never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use rupshari_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let page = client.products(1, ProductSort::Newest).await?;
//! let detail = client.product("cotton-panjabi").await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Order submission rejected with validation errors (HTTP 422).
    #[error("Order rejected: {}", format_rejection(.0))]
    OrderRejected(OrderRejection),
}

fn format_rejection(rejection: &OrderRejection) -> String {
    if rejection.has_field_errors() {
        rejection
            .field_messages()
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    } else {
        rejection
            .message
            .clone()
            .unwrap_or_else(|| "(no error details provided)".to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("product cotton-panjabi".to_string());
        assert_eq!(err.to_string(), "Not found: product cotton-panjabi");

        let err = CatalogError::Api {
            status: 500,
            message: "server error".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - server error");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CatalogError::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_order_rejected_formats_field_errors() {
        let rejection: OrderRejection = serde_json::from_str(
            r#"{"message": "invalid", "errors": {"phone": ["The phone format is invalid."]}}"#,
        )
        .unwrap();
        let err = CatalogError::OrderRejected(rejection);
        assert_eq!(
            err.to_string(),
            "Order rejected: phone: The phone format is invalid."
        );
    }

    #[test]
    fn test_order_rejected_without_field_errors() {
        let rejection: OrderRejection =
            serde_json::from_str(r#"{"message": "out of stock"}"#).unwrap();
        let err = CatalogError::OrderRejected(rejection);
        assert_eq!(err.to_string(), "Order rejected: out of stock");
    }

    #[test]
    fn test_order_rejected_no_details() {
        let rejection: OrderRejection = serde_json::from_str("{}").unwrap();
        let err = CatalogError::OrderRejected(rejection);
        assert_eq!(err.to_string(), "Order rejected: (no error details provided)");
    }
}
