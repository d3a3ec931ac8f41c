//! Port abstraction for brand persistence.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Brand, BrandDraft, BrandId, BrandSummary, Error, ListQuery};

/// Brand persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// Page through brands ordered by name, with product counts.
    async fn list(&self, query: &ListQuery) -> Result<Page<BrandSummary>, Error>;

    /// Fetch a brand by identifier.
    async fn find_by_id(&self, id: BrandId) -> Result<Option<Brand>, Error>;

    /// Fetch a brand by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Brand>, Error>;

    /// Insert a brand.
    async fn create(&self, draft: &BrandDraft) -> Result<Brand, Error>;

    /// Rename a brand. Fails with `NOT_FOUND` when `id` is unknown.
    async fn update(&self, id: BrandId, draft: &BrandDraft) -> Result<Brand, Error>;

    /// Remove a brand. Fails with `FOREIGN_KEY_VIOLATION` while products
    /// still reference it.
    async fn delete(&self, id: BrandId) -> Result<(), Error>;
}
