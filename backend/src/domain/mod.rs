//! Domain primitives and aggregates.
//!
//! Purpose: Define the strongly typed entities, the error taxonomy and the
//! response envelope shared by controllers, repositories and the client.
//! Constructors validate caller input; serde contracts are documented on
//! each type.
//!
//! Public surface:
//! - Error / ErrorKind: the closed failure taxonomy.
//! - Envelope: the `{data, err}` response wrapper.
//! - Entity records, list rows and validated drafts per entity.
//! - Role / Resource / Action and the [`Authorizer`].
//! - ports: repository traits implemented by outbound adapters.

pub mod auth;
pub mod authorization;
pub mod brand;
pub mod category;
pub mod customer;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod list_query;
pub mod order;
pub mod ports;
pub mod product;
pub mod report;
pub mod role;
pub mod user;
pub mod validation;

pub use self::auth::{
    AuthenticatedUser, LoginCredentials, LoginValidationError, MalformedPasswordHash,
    PasswordHash,
};
pub use self::authorization::Authorizer;
pub use self::brand::{Brand, BrandDraft, BrandSummary};
pub use self::category::{Category, CategoryDraft, CategorySummary};
pub use self::customer::{Customer, CustomerDraft, CustomerSummary};
pub use self::envelope::{Deleted, Envelope};
pub use self::error::{Error, ErrorKind, ErrorValidationError};
pub use self::ids::{BrandId, CategoryId, CustomerId, OrderId, ProductId, UserId};
pub use self::list_query::ListQuery;
pub use self::order::{
    NewOrder, Order, OrderDetail, OrderLine, OrderLineDraft, order_total,
};
pub use self::product::{Product, ProductDraft, ProductSummary};
pub use self::report::{DailyTotals, OrdersReport, ReportRange};
pub use self::role::{Action, Resource, Role, UnknownRole};
pub use self::user::{NewUser, User, UserChanges, UserCredentials};

/// Convenient domain result alias.
pub type DomainResult<T> = Result<T, Error>;
