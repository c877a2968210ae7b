//! API request and response types.

use catalog_table::{Field, TableRow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Product, ProductReview};
use crate::xml::XmlDocument;

// ============================================================================
// Health
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================================================
// Products
// ============================================================================

/// Product representation returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Vec<ProductReviewResponse>>,
}

impl ProductResponse {
    pub fn from_model(product: Product, reviews: Option<Vec<ProductReview>>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            reviews: reviews.map(ProductReviewResponse::from_models),
        }
    }

    pub fn from_models(products: Vec<Product>) -> Vec<Self> {
        products
            .into_iter()
            .map(|p| Self::from_model(p, None))
            .collect()
    }
}

/// Reviews are nested data and stay out of the table.
impl TableRow for ProductResponse {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("Id", |p: &Self| p.id.into()),
            Field::new("Name", |p: &Self| p.name.as_str().into()),
            Field::new("Price", |p: &Self| p.price.into()),
        ]
    }
}

impl XmlDocument for ProductResponse {
    fn root_element() -> String {
        "ProductResponse".to_string()
    }

    fn item_element(_field: Option<&str>) -> String {
        ProductReviewResponse::root_element()
    }
}

impl XmlDocument for Vec<ProductResponse> {
    fn root_element() -> String {
        "ArrayOfProductResponse".to_string()
    }

    fn item_element(field: Option<&str>) -> String {
        match field {
            None => ProductResponse::root_element(),
            Some(_) => ProductResponse::item_element(field),
        }
    }
}

/// Review representation returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReviewResponse {
    pub review_id: Uuid,
    pub product_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    pub rating: i32,
}

impl ProductReviewResponse {
    pub fn from_model(review: ProductReview) -> Self {
        Self {
            review_id: review.id,
            product_id: review.product_id,
            reviewer: review.reviewer,
            rating: review.rating,
        }
    }

    pub fn from_models(reviews: Vec<ProductReview>) -> Vec<Self> {
        reviews.into_iter().map(Self::from_model).collect()
    }
}

impl TableRow for ProductReviewResponse {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("ReviewId", |r: &Self| r.review_id.into()),
            Field::new("ProductId", |r: &Self| r.product_id.into()),
            Field::new("Reviewer", |r: &Self| r.reviewer.as_deref().into()),
            Field::new("Rating", |r: &Self| r.rating.into()),
        ]
    }
}

impl XmlDocument for ProductReviewResponse {
    fn root_element() -> String {
        "ProductReviewResponse".to_string()
    }

    fn item_element(_field: Option<&str>) -> String {
        "Item".to_string()
    }
}

impl XmlDocument for Vec<ProductReviewResponse> {
    fn root_element() -> String {
        "ArrayOfProductReviewResponse".to_string()
    }

    fn item_element(_field: Option<&str>) -> String {
        ProductReviewResponse::root_element()
    }
}

// ============================================================================
// Paging
// ============================================================================

/// One page of items plus paging metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page_size: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResult<T> {
    /// `page_size` must be at least 1.
    pub fn create(items: Vec<T>, total_count: usize, page_size: usize, current_page: usize) -> Self {
        let total_pages = total_count.div_ceil(page_size.max(1));
        Self {
            items,
            total_count,
            page_size,
            current_page,
            total_pages,
            has_previous_page: current_page > 1,
            has_next_page: current_page < total_pages,
        }
    }
}

impl<T: XmlDocument> XmlDocument for PagedResult<T> {
    fn root_element() -> String {
        format!("PagedResultOf{}", T::root_element())
    }

    fn item_element(field: Option<&str>) -> String {
        match field {
            Some("items") => T::root_element(),
            _ => T::item_element(field),
        }
    }
}

/// Paging query parameters. Out-of-range values are clamped, not rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for fetching one product.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default)]
    pub include_reviews: bool,
}

// ============================================================================
// Requests
// ============================================================================

/// Create product request.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Price")]
    pub price: f64,
}

/// Full replacement of a product's editable fields; also the document a
/// JSON Patch is applied to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Price")]
    pub price: f64,
}

// ============================================================================
// Background jobs
// ============================================================================

/// Status of a (simulated) background job.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub job_id: Uuid,
    pub status: String,
}
