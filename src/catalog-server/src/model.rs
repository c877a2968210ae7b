//! Domain models.

use catalog_table::{Field, TableRow};
use uuid::Uuid;

/// A catalog product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
        }
    }
}

impl TableRow for Product {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::new("Id", |p: &Self| p.id.into()),
            Field::new("Name", |p: &Self| p.name.as_str().into()),
            Field::new("Price", |p: &Self| p.price.into()),
        ]
    }
}

/// A customer review attached to a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductReview {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Anonymous reviews have no reviewer.
    pub reviewer: Option<String>,
    pub rating: i32,
}

impl ProductReview {
    pub fn new(product_id: Uuid, reviewer: Option<&str>, rating: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            reviewer: reviewer.map(str::to_string),
            rating,
        }
    }
}
