//! REST API routes and handlers.
//!
//! Product routes live under `/api/products`; every product id segment must be
//! a UUID, anything else is treated as an unknown route.

mod exports;
mod health;
mod jobs;
mod products;
mod redirects;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// Re-export types for external use
pub use types::{
    HealthResponse, JobResponse, PagedResult, ProductResponse, ProductReviewResponse,
};

/// Create the API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::hello))
        .route("/health", get(health::health_check))
        .nest("/api/products", product_routes())
}

fn product_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Collection
        .route(
            "/",
            get(products::list_products)
                .post(products::create_product)
                .options(products::options),
        )
        // Exports
        .route("/csv", get(exports::products_csv))
        .route("/physical-csv-file", get(exports::physical_csv_file))
        .route("/products-as-table", get(exports::products_table))
        // Background jobs
        .route("/process", post(jobs::start_process))
        .route("/status/{job_id}", get(jobs::job_status))
        // Redirects
        .route("/products-legacy", get(redirects::products_legacy))
        .route("/temp-products", get(redirects::temp_products))
        .route("/legacy-products", get(redirects::legacy_products))
        .route("/products-category", get(redirects::products_category))
        // Single product
        .route(
            "/{product_id}",
            get(products::get_product)
                .head(products::head_product)
                .put(products::update_product)
                .patch(products::patch_product)
                .delete(products::delete_product),
        )
        .route("/{product_id}/reviews", get(products::list_reviews))
}

/// Route constraint: a non-UUID id segment does not name any resource.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("No resource at '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("csv-export"), Err(AppError::NotFound(_))));
    }
}
