//! In-memory product storage.

use uuid::Uuid;

use crate::model::{Product, ProductReview};

/// Products and reviews kept in insertion order.
///
/// Not synchronized itself; [`crate::state::AppState`] owns it behind a lock.
#[derive(Debug, Default)]
pub struct ProductRepository {
    products: Vec<Product>,
    reviews: Vec<ProductReview>,
}

impl ProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository holding a small demo catalog.
    pub fn seeded() -> Self {
        let mut repo = Self::new();

        let catalog = [
            ("Laptop", 1299.99),
            ("Mechanical Keyboard", 89.5),
            ("Wireless Mouse", 24.99),
            ("USB-C Hub", 39.0),
            ("27\" Monitor", 279.95),
            ("Desk Lamp", 18.75),
            ("Webcam", 59.99),
            ("Noise Cancelling Headphones", 199.0),
            ("Laptop Stand", 32.4),
            ("External SSD 1TB", 109.99),
            ("Ergonomic Chair", 349.0),
            ("Cable Organizer", 9.99),
        ];
        for (name, price) in catalog {
            repo.add(Product::new(name, price));
        }

        let first_two: Vec<Uuid> = repo.products.iter().take(2).map(|p| p.id).collect();
        if let [laptop, keyboard] = first_two[..] {
            repo.add_review(ProductReview::new(laptop, Some("alice"), 5));
            repo.add_review(ProductReview::new(laptop, None, 3));
            repo.add_review(ProductReview::new(keyboard, Some("bob"), 4));
        }

        repo
    }

    pub fn count(&self) -> usize {
        self.products.len()
    }

    /// One page of products; `page` is 1-based. Out-of-range pages are empty.
    pub fn page(&self, page: usize, page_size: usize) -> Vec<Product> {
        let skip = page.saturating_sub(1).saturating_mul(page_size);
        self.products
            .iter()
            .skip(skip)
            .take(page_size)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn exists(&self, id: Uuid) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    /// Case-insensitive name lookup.
    pub fn exists_by_name(&self, name: &str) -> bool {
        let wanted = name.to_lowercase();
        self.products.iter().any(|p| p.name.to_lowercase() == wanted)
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Replace the stored product with the same id. Returns false if absent.
    pub fn update(&mut self, product: Product) -> bool {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        }
    }

    /// Remove a product and its reviews. Returns false if absent.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            return false;
        }
        self.reviews.retain(|r| r.product_id != id);
        true
    }

    pub fn reviews_for(&self, product_id: Uuid) -> Vec<ProductReview> {
        self.reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect()
    }

    pub fn add_review(&mut self, review: ProductReview) {
        self.reviews.push(review);
    }
}
