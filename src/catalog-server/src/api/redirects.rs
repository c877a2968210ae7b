//! Redirect demonstrations and their targets.

use axum::{
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppResult;
use crate::model::Product;
use crate::negotiate::{Formatters, TABLE_MEDIA_TYPES, render_table};

use super::types::ProductResponse;

const TEMP_PRODUCTS: &str = "/api/products/temp-products";
const PRODUCTS_CATEGORY: &str = "/api/products/products-category";

/// 302 Found to the temporary listing.
pub async fn products_legacy() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, TEMP_PRODUCTS)]).into_response()
}

/// 301 Moved Permanently to the category listing.
pub async fn legacy_products() -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, PRODUCTS_CATEGORY)],
    )
        .into_response()
}

/// Freshly generated products that are never stored.
pub async fn temp_products(headers: HeaderMap) -> AppResult<Response> {
    let products = ProductResponse::from_models(vec![
        Product::new("Temp Product 1", 9.99),
        Product::new("Temp Product 2", 19.99),
        Product::new("Temp Product 3", 29.99),
    ]);

    Formatters::structured()
        .register(TABLE_MEDIA_TYPES, |products: &Vec<ProductResponse>| {
            Ok(render_table(products))
        })
        .respond(&headers, &products)
}

pub async fn products_category() -> &'static str {
    "This is a placeholder response for products in category: "
}
