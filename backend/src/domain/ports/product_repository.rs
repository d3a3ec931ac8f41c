//! Port abstraction for product persistence.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, ListQuery, Product, ProductDraft, ProductId, ProductSummary};

/// Product persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Page through products ordered by name, with brand and category names.
    async fn list(&self, query: &ListQuery) -> Result<Page<ProductSummary>, Error>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, Error>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, Error>;

    /// Insert a product. An unknown brand or category surfaces as
    /// `FOREIGN_KEY_VIOLATION`.
    async fn create(&self, draft: &ProductDraft) -> Result<Product, Error>;

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, Error>;

    async fn delete(&self, id: ProductId) -> Result<(), Error>;
}
