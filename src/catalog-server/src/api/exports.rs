//! File and table exports of the catalog.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::error::{AppError, AppResult};
use crate::model::Product;
use crate::negotiate::{Formatters, TABLE_MEDIA_TYPES, render_table};
use crate::state::AppState;

const PHYSICAL_CSV_NAME: &str = "Products.csv";

/// First page of the catalog as a CSV download.
pub async fn products_csv(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let limit = state.config.export_limit;
    let (products, _) = state.product_page(1, limit).await;

    let filename = format!("products_From-1-To-{limit}.csv");
    attachment("text/csv", &filename, to_csv(&products))
}

/// Serve `Products.csv` from the configured files directory.
pub async fn physical_csv_file(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let path = state.config.files_dir.join(PHYSICAL_CSV_NAME);
    let content = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Export file unavailable");
        AppError::from(e)
    })?;

    attachment("text/csv", "products_physical_file.csv", content)
}

/// First page of the catalog; only the table representation is produced.
pub async fn products_table(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let (products, _) = state.product_page(1, state.config.export_limit).await;

    Formatters::new()
        .register(TABLE_MEDIA_TYPES, |products: &Vec<Product>| {
            Ok(render_table(products))
        })
        .respond(&headers, &products)
}

/// Header row plus one line per product, `\n` terminated.
pub fn to_csv(products: &[Product]) -> String {
    let mut csv = String::from("Id,Name,Price\n");
    for product in products {
        csv.push_str(&format!(
            "{},{},{}\n",
            product.id,
            csv_field(&product.name),
            product.price
        ));
    }
    csv
}

/// Quote a field holding a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn attachment(
    content_type: &'static str,
    filename: &str,
    body: impl Into<Body>,
) -> AppResult<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let body: Body = body.into();

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let products = vec![Product::new("Pen", 1.5), Product::new("Ink, blue", 3.0)];
        let csv = to_csv(&products);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Id,Name,Price");
        assert_eq!(lines[1], format!("{},Pen,1.5", products[0].id));
        assert_eq!(lines[2], format!("{},\"Ink, blue\",3", products[1].id));
    }

    #[test]
    fn test_csv_quotes_embedded_quotes() {
        assert_eq!(csv_field(r#"27" Monitor"#), r#""27"" Monitor""#);
        assert_eq!(csv_field("plain"), "plain");
    }
}
