//! Catalog service: product CRUD and image uploads.
//!
//! Authorization happens in the HTTP layer; nothing here checks who is
//! calling.

use std::sync::Arc;

use thiserror::Error;

use minishop_core::ProductId;

use super::media::{MediaError, MediaStorage};
use crate::db::{CatalogRepository, RepositoryError};
use crate::models::{NewProduct, Product, ProductChanges};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with this ID.
    #[error("product not found")]
    NotFound,

    /// Image upload failed.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

/// Catalog service.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn CatalogRepository>,
    media: MediaStorage,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(products: Arc<dyn CatalogRepository>, media: MediaStorage) -> Self {
        Self { products, media }
    }

    /// All products, ascending by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products.get(id).await?.ok_or(CatalogError::NotFound)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the insert fails.
    pub async fn create(&self, new: NewProduct) -> Result<Product, CatalogError> {
        let product = self.products.create(new).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, CatalogError> {
        let product = self.products.update(id, changes).await?;
        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        if !self.products.delete(id).await? {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Store an uploaded image and make it the product's display image.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    /// Returns `CatalogError::Media` if the file cannot be stored.
    pub async fn upload_image(
        &self,
        id: ProductId,
        file_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<Product, CatalogError> {
        // Unknown IDs must not write a file.
        self.get(id).await?;

        let path = self.media.save_product_image(file_name, bytes).await?;
        Ok(self.products.set_uploaded_image(id, &path).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::Repositories;

    fn service(root: &std::path::Path) -> CatalogService {
        CatalogService::new(
            Repositories::in_memory().catalog,
            MediaStorage::new(root),
        )
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(dir.path());

        let created = catalog.create(NewProduct::default()).await.unwrap();
        let listed = catalog.list().await.unwrap();

        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(created.name, "New Product");
        assert_eq!(created.stock, 0);
        assert!(created.description.is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(dir.path());
        let id = ProductId::new(99);

        assert!(matches!(catalog.get(id).await, Err(CatalogError::NotFound)));
        assert!(matches!(
            catalog.update(id, ProductChanges::default()).await,
            Err(CatalogError::NotFound)
        ));
        assert!(matches!(catalog.delete(id).await, Err(CatalogError::NotFound)));
        assert!(matches!(
            catalog.upload_image(id, Some("a.png"), b"data").await,
            Err(CatalogError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_upload_overrides_display_but_keeps_external_url() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = service(dir.path());
        let created = catalog
            .create(NewProduct {
                image_url: "https://cdn.example.com/a.png".to_owned(),
                ..NewProduct::default()
            })
            .await
            .unwrap();

        let updated = catalog
            .upload_image(created.id, Some("a.png"), b"data")
            .await
            .unwrap();

        assert_eq!(updated.image_url, "https://cdn.example.com/a.png");
        let display = updated.display_image_url("/media/").unwrap();
        assert!(display.starts_with("/media/products/"));
    }
}
