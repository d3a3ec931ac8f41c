//! Port abstraction for category persistence.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Category, CategoryDraft, CategoryId, CategorySummary, Error, ListQuery};

/// Category persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Page through categories ordered by name, with product counts.
    async fn list(&self, query: &ListQuery) -> Result<Page<CategorySummary>, Error>;

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, Error>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, Error>;

    async fn create(&self, draft: &CategoryDraft) -> Result<Category, Error>;

    async fn update(&self, id: CategoryId, draft: &CategoryDraft) -> Result<Category, Error>;

    async fn delete(&self, id: CategoryId) -> Result<(), Error>;
}
