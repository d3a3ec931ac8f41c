//! Controllers: one per entity, one method per business operation.
//!
//! Every public method takes a request struct and resolves to an
//! [`Envelope`](crate::domain::Envelope); none of them panic or return a
//! bare error. Each call authorizes the acting user, validates its input and
//! only then touches a repository.

mod brands;
mod categories;
mod customers;
mod login;
mod orders;
mod products;
mod reports;
mod requests;
mod users;

#[cfg(test)]
mod test_helpers;

pub use brands::{BrandIdRequest, BrandsController, SaveBrandRequest, UpdateBrandRequest};
pub use categories::{
    CategoriesController, CategoryIdRequest, SaveCategoryRequest, UpdateCategoryRequest,
};
pub use customers::{
    CustomerIdRequest, CustomersController, SaveCustomerRequest, UpdateCustomerRequest,
};
pub use login::{LoginController, LoginRequest};
pub use orders::{CreateOrderRequest, OrderIdRequest, OrderLineRequest, OrdersController};
pub use products::{
    ProductIdRequest, ProductsController, SaveProductRequest, UpdateProductRequest,
};
pub use reports::{OrdersReportRequest, ReportsController};
pub use requests::ListRequest;
pub use users::{CreateUserRequest, UpdateUserRequest, UserIdRequest, UsersController};

use crate::domain::{DomainResult, Error};

/// Run CPU-bound password work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> DomainResult<T>
where
    F: FnOnce() -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        Error::unknown("password hashing did not complete").with_cause(err.to_string())
    })?
}
