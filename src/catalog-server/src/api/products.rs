//! Product CRUD endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::negotiate::{Formatters, TABLE_MEDIA_TYPES, render_table};
use crate::patch::{self, PatchOperation};
use crate::state::AppState;

use super::parse_id;
use super::types::{
    CreateProductRequest, PageQuery, PagedResult, ProductQuery, ProductResponse,
    ProductReviewResponse, UpdateProductRequest,
};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Advertise the methods supported on the collection.
pub async fn options() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS))],
    )
}

/// Clamp raw paging parameters to `(page, page_size)`.
pub fn page_bounds(query: &PageQuery, default_size: usize, max_size: usize) -> (usize, usize) {
    let max_size = i64::try_from(max_size).unwrap_or(i64::MAX).max(1);
    let default_size = i64::try_from(default_size).unwrap_or(i64::MAX);
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(default_size).clamp(1, max_size);
    (to_usize(page), to_usize(page_size))
}

/// Both values are already at least 1.
fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// List products one page at a time.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let paging = &state.config.pagination;
    let (page, page_size) = page_bounds(&query, paging.default_page_size, paging.max_page_size);

    let (products, total_count) = state.product_page(page, page_size).await;
    let result = PagedResult::create(
        ProductResponse::from_models(products),
        total_count,
        page_size,
        page,
    );

    Formatters::structured()
        .register(TABLE_MEDIA_TYPES, |page: &PagedResult<ProductResponse>| {
            Ok(render_table(&page.items))
        })
        .respond(&headers, &result)
}

/// Get a single product, optionally with its reviews.
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Query(query): Query<ProductQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let id = parse_id(&product_id)?;
    let product = state.get_product(id).await?;

    let reviews = if query.include_reviews {
        Some(state.reviews_for(id).await?)
    } else {
        None
    };
    let response = ProductResponse::from_model(product, reviews);

    Formatters::structured()
        .register(TABLE_MEDIA_TYPES, |product: &ProductResponse| {
            Ok(render_table(std::slice::from_ref(product)))
        })
        .respond(&headers, &response)
}

/// Existence check without a body.
pub async fn head_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> StatusCode {
    match parse_id(&product_id) {
        Ok(id) if state.product_exists(id).await => StatusCode::OK,
        _ => StatusCode::NOT_FOUND,
    }
}

/// List the reviews of a product.
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let id = parse_id(&product_id)?;
    let reviews = ProductReviewResponse::from_models(state.reviews_for(id).await?);

    Formatters::structured()
        .register(TABLE_MEDIA_TYPES, |reviews: &Vec<ProductReviewResponse>| {
            Ok(render_table(reviews))
        })
        .respond(&headers, &reviews)
}

/// Create a product.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(req) = body?;
    let name = required_name(req.name)?;
    let product = state.create_product(name, req.price).await?;

    let location = HeaderValue::from_str(&format!("/api/products/{}", product.id))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from_model(product, None)),
    )
        .into_response())
}

/// Replace a product's name and price.
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> AppResult<StatusCode> {
    let id = parse_id(&product_id)?;

    state
        .update_product(id, |product| {
            let Json(req) = body?;
            product.name = required_name(req.name)?;
            product.price = req.price;
            Ok(())
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Apply a JSON Patch document to a product's name and price.
pub async fn patch_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    body: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> AppResult<StatusCode> {
    let id = parse_id(&product_id)?;

    // A missing product is reported before a malformed body.
    state
        .update_product(id, |product| {
            let Json(operations) = body?;
            let current = UpdateProductRequest {
                name: product.name.clone(),
                price: product.price,
            };
            let mut doc = serde_json::to_value(current)?;
            patch::apply(&mut doc, &operations).map_err(|e| AppError::BadRequest(e.to_string()))?;

            let patched = patched_request(doc)?;
            product.name = required_name(patched.name)?;
            product.price = patched.price;
            Ok(())
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product.
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&product_id)?;
    state.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn patched_request(doc: Value) -> AppResult<UpdateProductRequest> {
    serde_json::from_value(doc).map_err(|e| AppError::Validation(e.to_string()))
}

/// Presence check: a name must have visible characters. The name is kept as sent.
fn required_name(name: String) -> AppResult<String> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    Ok(name)
}
