//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::{
    Brand, BrandId, Category, CategoryId, Customer, CustomerId, Error, Order, OrderId,
    OrderLine, Product, ProductId, Role, User, UserCredentials, UserId,
};

use super::schema::{brands, categories, customers, order_lines, orders, products, users};

// ---------------------------------------------------------------------------
// Brands and categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = brands)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct BrandRow {
    pub id: i64,
    pub name: String,
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Self {
            id: BrandId::new(row.id),
            name: row.name,
        }
    }
}

/// Insert and update payload for brands.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = brands)]
pub(crate) struct BrandWrite<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
pub(crate) struct CategoryWrite<'a> {
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId::new(row.id),
            name: row.name,
            phone: row.phone,
            email: row.email,
        }
    }
}

/// Absent contact details clear the stored value on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = customers)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CustomerWrite<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub barcode: Option<String>,
    pub price: i64,
    pub brand_id: i64,
    pub category_id: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            barcode: row.barcode,
            price: row.price,
            brand_id: BrandId::new(row.brand_id),
            category_id: CategoryId::new(row.category_id),
        }
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProductWrite<'a> {
    pub name: &'a str,
    pub barcode: Option<&'a str>,
    pub price: i64,
    pub brand_id: i64,
    pub category_id: i64,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|err: crate::domain::UnknownRole| {
            Error::unknown("stored user has an invalid role").with_cause(err.to_string())
        })?;
        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            role,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserCredentialsRow {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub password_hash: String,
}

impl TryFrom<UserCredentialsRow> for UserCredentials {
    type Error = Error;

    fn try_from(row: UserCredentialsRow) -> Result<Self, Self::Error> {
        let user = User::try_from(UserRow {
            id: row.id,
            name: row.name,
            role: row.role,
        })?;
        Ok(Self {
            user,
            password_hash: row.password_hash,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

/// A `None` password hash leaves the stored hash untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub password_hash: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct OrderRow {
    pub id: i64,
    pub customer_id: i64,
    pub user_id: i64,
    pub total_price: i64,
    pub created_at: NaiveDateTime,
}

impl OrderRow {
    pub fn into_order(self, customer_name: String, user_name: String) -> Order {
        Order {
            id: OrderId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            customer_name,
            user_id: UserId::new(self.user_id),
            user_name,
            total_price: self.total_price,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow {
    pub customer_id: i64,
    pub user_id: i64,
    pub total_price: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = order_lines)]
pub(crate) struct NewOrderLineRow {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub price: i64,
}

/// `(product_id, product_name, quantity, price)` as selected for an order.
pub(crate) type OrderLineTuple = (i64, String, i64, i64);

pub(crate) fn order_line_from_tuple(
    (product_id, product_name, quantity, price): OrderLineTuple,
) -> OrderLine {
    OrderLine {
        product_id: ProductId::new(product_id),
        product_name,
        quantity,
        price,
    }
}
