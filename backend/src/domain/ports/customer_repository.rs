//! Port abstraction for customer persistence.
use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Customer, CustomerDraft, CustomerId, CustomerSummary, Error, ListQuery};

/// Customer persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Page through customers ordered by name, with order counts.
    async fn list(&self, query: &ListQuery) -> Result<Page<CustomerSummary>, Error>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, Error>;

    async fn create(&self, draft: &CustomerDraft) -> Result<Customer, Error>;

    async fn update(&self, id: CustomerId, draft: &CustomerDraft) -> Result<Customer, Error>;

    /// Remove a customer. Fails with `FOREIGN_KEY_VIOLATION` once the
    /// customer has orders.
    async fn delete(&self, id: CustomerId) -> Result<(), Error>;
}
