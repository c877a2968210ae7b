//! Application state management.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::model::{Product, ProductReview};
use crate::repository::ProductRepository;

/// Application state shared across request handlers.
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Product storage.
    products: RwLock<ProductRepository>,
    /// Start time.
    start_time: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("start_time", &self.start_time)
            .finish()
    }
}

impl AppState {
    /// Create application state, seeding the catalog if configured.
    pub fn new(config: ServerConfig) -> Self {
        let repository = if config.seed_data {
            ProductRepository::seeded()
        } else {
            ProductRepository::new()
        };
        Self::with_repository(config, repository)
    }

    pub fn with_repository(config: ServerConfig, repository: ProductRepository) -> Self {
        Self {
            config,
            products: RwLock::new(repository),
            start_time: Instant::now(),
        }
    }

    /// Get uptime duration.
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// One page of products and the total product count, read under one lock.
    pub async fn product_page(&self, page: usize, page_size: usize) -> (Vec<Product>, usize) {
        let repo = self.products.read().await;
        (repo.page(page, page_size), repo.count())
    }

    /// Get a product by ID.
    pub async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .read()
            .await
            .get(id)
            .ok_or_else(|| product_not_found(id))
    }

    pub async fn product_exists(&self, id: Uuid) -> bool {
        self.products.read().await.exists(id)
    }

    pub async fn reviews_for(&self, id: Uuid) -> AppResult<Vec<ProductReview>> {
        let repo = self.products.read().await;
        if !repo.exists(id) {
            return Err(product_not_found(id));
        }
        Ok(repo.reviews_for(id))
    }

    /// Create a product; names are unique ignoring case.
    pub async fn create_product(&self, name: String, price: f64) -> AppResult<Product> {
        let mut repo = self.products.write().await;
        if repo.exists_by_name(&name) {
            return Err(AppError::Conflict(format!(
                "A product with the name '{name}' already exists."
            )));
        }

        let product = Product::new(name, price);
        repo.add(product.clone());
        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Read-modify-write a product under the write lock.
    pub async fn update_product(
        &self,
        id: Uuid,
        update: impl FnOnce(&mut Product) -> AppResult<()>,
    ) -> AppResult<Product> {
        let mut repo = self.products.write().await;
        let mut product = repo.get(id).ok_or_else(|| product_not_found(id))?;

        update(&mut product)?;

        if !repo.update(product.clone()) {
            return Err(AppError::Internal(
                "An error occurred while updating the product.".to_string(),
            ));
        }
        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Delete a product.
    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        let mut repo = self.products.write().await;
        if !repo.exists(id) {
            return Err(product_not_found(id));
        }
        if !repo.delete(id) {
            return Err(AppError::Internal(
                "An error occurred while deleting the product.".to_string(),
            ));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

fn product_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Product with ID '{id}' not found."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_state() -> AppState {
        AppState::with_repository(ServerConfig::default(), ProductRepository::new())
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let state = empty_state();

        let product = state.create_product("Pen".into(), 1.5).await.unwrap();
        assert_eq!(state.get_product(product.id).await.unwrap().name, "Pen");

        let updated = state
            .update_product(product.id, |p| {
                p.price = 2.0;
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(updated.price, 2.0);

        state.delete_product(product.id).await.unwrap();
        assert!(matches!(
            state.get_product(product.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let state = empty_state();
        state.create_product("Pen".into(), 1.5).await.unwrap();

        let err = state.create_product("PEN".into(), 3.0).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_product_untouched() {
        let state = empty_state();
        let product = state.create_product("Pen".into(), 1.5).await.unwrap();

        let result = state
            .update_product(product.id, |p| {
                p.price = 99.0;
                Err(AppError::BadRequest("rejected".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(state.get_product(product.id).await.unwrap().price, 1.5);
    }

    #[tokio::test]
    async fn test_seeded_state() {
        let state = AppState::new(ServerConfig::default());
        let (page, total) = state.product_page(1, 5).await;
        assert_eq!(page.len(), 5);
        assert_eq!(total, 12);
    }
}
