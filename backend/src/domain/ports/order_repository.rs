//! Port abstraction for order persistence.
use async_trait::async_trait;
use chrono::NaiveDateTime;
use pagination::Page;

use crate::domain::{Error, ListQuery, NewOrder, Order, OrderDetail, OrderId};

/// Order persistence operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Page through orders, newest first. The name filter matches the
    /// customer name.
    async fn list(&self, query: &ListQuery) -> Result<Page<Order>, Error>;

    /// Fetch an order header with its lines.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<OrderDetail>, Error>;

    /// Insert the header and every line in one transaction. Nothing is
    /// written when any insert fails.
    async fn create(&self, order: &NewOrder) -> Result<OrderDetail, Error>;

    /// `(createdAt, totalPrice)` of every order placed in `[from, to)`.
    async fn totals_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<(NaiveDateTime, i64)>, Error>;
}
