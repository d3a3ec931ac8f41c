//! SQLite persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by SQLite via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Translated errors**: Every driver failure passes through
//!   [`map_diesel_error`] so callers only ever see domain error kinds.
//!
//! # Example
//!
//! ```ignore
//! use backoffice::outbound::persistence::{DbPool, PoolConfig, DieselBrandRepository};
//!
//! run_pending_migrations("backoffice.sqlite3").await?;
//! let pool = DbPool::new(PoolConfig::new("backoffice.sqlite3")).await?;
//! let brands = DieselBrandRepository::new(pool);
//! ```

mod diesel_brand_repository;
mod diesel_category_repository;
mod diesel_customer_repository;
pub(crate) mod diesel_helpers;
mod diesel_order_repository;
mod diesel_product_repository;
mod diesel_user_repository;
pub(crate) mod error_mapping;
mod migrations;
pub(crate) mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_brand_repository::DieselBrandRepository;
pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_order_repository::DieselOrderRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use error_mapping::{map_diesel_error, map_pool_error};
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError, SqliteConn};
