//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Every repository reports failures as a domain [`Error`](crate::domain::Error)
//! whose kind has already been translated from the storage driver, so
//! controllers pass them through untouched.

mod brand_repository;
mod category_repository;
mod customer_repository;
mod order_repository;
mod product_repository;
mod user_repository;

#[cfg(test)]
pub use brand_repository::MockBrandRepository;
pub use brand_repository::BrandRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::CategoryRepository;
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::CustomerRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::OrderRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::ProductRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
