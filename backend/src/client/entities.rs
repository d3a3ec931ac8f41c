//! Typed wrappers over the command vocabulary.
//!
//! Each wrapper stamps the acting user onto every payload, routes reads
//! through the cache and declares which entity a write changes.

use std::marker::PhantomData;

use chrono::NaiveDate;
use pagination::Page;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::invalidation::Entity;
use super::query_client::{ClientError, QueryClient};
use crate::controllers::{ListRequest, OrderLineRequest};
use crate::domain::{
    Brand, BrandId, BrandSummary, Category, CategoryId, CategorySummary, Customer, CustomerId,
    CustomerSummary, Deleted, Order, OrderDetail, OrderId, OrdersReport, Product, ProductId,
    ProductSummary, Role, User, UserId,
};
use crate::inbound::ipc::commands;

/// Filter and paging for list calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub name: Option<String>,
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
}

impl ListParams {
    /// Rows whose name contains `term`.
    #[must_use]
    pub fn named(term: impl Into<String>) -> Self {
        Self {
            name: Some(term.into()),
            ..Self::default()
        }
    }

    /// Select `page` with `items_per_page` rows.
    #[must_use]
    pub fn paged(mut self, page: i64, items_per_page: i64) -> Self {
        self.page = Some(page);
        self.items_per_page = Some(items_per_page);
        self
    }

    fn into_request(self, actor: UserId) -> ListRequest {
        ListRequest {
            logged_user_id: actor,
            name: self.name,
            page: self.page,
            items_per_page: self.items_per_page,
        }
    }
}

/// The command set and payload types of one CRUD entity.
pub trait CrudEntity {
    const ENTITY: Entity;
    const LIST: &'static str;
    const GET: &'static str;
    const CREATE: &'static str;
    const UPDATE: &'static str;
    const DELETE: &'static str;
    /// Payload field carrying the record id, e.g. `brandId`.
    const ID_FIELD: &'static str;

    type Id: Serialize + DeserializeOwned + Send + Sync;
    type Record: DeserializeOwned;
    type Summary: DeserializeOwned;
    /// Editable fields, shared by create and update.
    type Fields: Serialize + Send + Sync;
}

/// Editable brand fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandFields {
    pub name: String,
}

/// Editable category fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub name: String,
}

/// Editable customer fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFields {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Editable product fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub price: i64,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
}

/// Editable user fields. `password` is required when creating and keeps
/// the current password when absent from an update.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for UserFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserFields")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

macro_rules! crud_entity {
    (
        $marker:ident, $id_field:literal, [$list:ident, $get:ident, $create:ident, $update:ident, $delete:ident],
        $id:ty, $record:ty, $summary:ty, $fields:ty
    ) => {
        #[doc = concat!("Commands addressing `", $id_field, "` records.")]
        #[derive(Debug, Clone, Copy)]
        pub enum $marker {}

        impl CrudEntity for $marker {
            const ENTITY: Entity = Entity::$marker;
            const LIST: &'static str = commands::$list;
            const GET: &'static str = commands::$get;
            const CREATE: &'static str = commands::$create;
            const UPDATE: &'static str = commands::$update;
            const DELETE: &'static str = commands::$delete;
            const ID_FIELD: &'static str = $id_field;

            type Id = $id;
            type Record = $record;
            type Summary = $summary;
            type Fields = $fields;
        }
    };
}

crud_entity!(
    Brands,
    "brandId",
    [BRANDS_LIST, BRANDS_GET, BRANDS_CREATE, BRANDS_UPDATE, BRANDS_DELETE],
    BrandId,
    Brand,
    BrandSummary,
    BrandFields
);
crud_entity!(
    Categories,
    "categoryId",
    [CATEGORIES_LIST, CATEGORIES_GET, CATEGORIES_CREATE, CATEGORIES_UPDATE, CATEGORIES_DELETE],
    CategoryId,
    Category,
    CategorySummary,
    CategoryFields
);
crud_entity!(
    Customers,
    "customerId",
    [CUSTOMERS_LIST, CUSTOMERS_GET, CUSTOMERS_CREATE, CUSTOMERS_UPDATE, CUSTOMERS_DELETE],
    CustomerId,
    Customer,
    CustomerSummary,
    CustomerFields
);
crud_entity!(
    Products,
    "productId",
    [PRODUCTS_LIST, PRODUCTS_GET, PRODUCTS_CREATE, PRODUCTS_UPDATE, PRODUCTS_DELETE],
    ProductId,
    Product,
    ProductSummary,
    ProductFields
);
crud_entity!(
    Users,
    "userId",
    [USERS_LIST, USERS_GET, USERS_CREATE, USERS_UPDATE, USERS_DELETE],
    UserId,
    User,
    User,
    UserFields
);

/// Serialize `body` and stamp `loggedUserId` plus any extra fields onto it.
fn stamped<B: Serialize + ?Sized>(
    actor: UserId,
    body: &B,
    extra: Option<(&str, Value)>,
) -> Result<Value, ClientError> {
    let mut object = match serde_json::to_value(body) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            return Err(ClientError::Payload {
                message: format!("expected an object payload, got {other}"),
            });
        }
        Err(err) => return Err(ClientError::payload(err)),
    };
    let actor = serde_json::to_value(actor).map_err(ClientError::payload)?;
    object.insert("loggedUserId".to_owned(), actor);
    if let Some((field, value)) = extra {
        object.insert(field.to_owned(), value);
    }
    Ok(Value::Object(object))
}

fn id_payload<E: CrudEntity>(actor: UserId, id: &E::Id) -> Result<Value, ClientError> {
    let id = serde_json::to_value(id).map_err(ClientError::payload)?;
    stamped(actor, &Map::new(), Some((E::ID_FIELD, id)))
}

/// List, get, create, update and delete for one entity, as one user.
pub struct CrudClient<E> {
    queries: QueryClient,
    actor: UserId,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CrudClient<E> {
    fn clone(&self) -> Self {
        Self {
            queries: self.queries.clone(),
            actor: self.actor,
            _entity: PhantomData,
        }
    }
}

impl<E: CrudEntity> CrudClient<E> {
    pub(crate) fn new(queries: QueryClient, actor: UserId) -> Self {
        Self {
            queries,
            actor,
            _entity: PhantomData,
        }
    }

    /// One page of summaries.
    ///
    /// # Errors
    /// Returns the command's failure.
    pub async fn list(&self, params: ListParams) -> Result<Page<E::Summary>, ClientError> {
        self.queries
            .query(E::LIST, &params.into_request(self.actor))
            .await
    }

    /// One record by id.
    ///
    /// # Errors
    /// Returns the command's failure, `NOT_FOUND` included.
    pub async fn get(&self, id: E::Id) -> Result<E::Record, ClientError> {
        let payload = id_payload::<E>(self.actor, &id)?;
        self.queries.query(E::GET, &payload).await
    }

    /// Create a record from `fields`.
    ///
    /// # Errors
    /// Returns the command's failure.
    pub async fn create(&self, fields: &E::Fields) -> Result<E::Record, ClientError> {
        let payload = stamped(self.actor, fields, None)?;
        self.queries.mutate(E::ENTITY, E::CREATE, &payload).await
    }

    /// Replace the editable fields of record `id`.
    ///
    /// # Errors
    /// Returns the command's failure.
    pub async fn update(&self, id: E::Id, fields: &E::Fields) -> Result<E::Record, ClientError> {
        let id = serde_json::to_value(&id).map_err(ClientError::payload)?;
        let payload = stamped(self.actor, fields, Some((E::ID_FIELD, id)))?;
        self.queries.mutate(E::ENTITY, E::UPDATE, &payload).await
    }

    /// Delete record `id`.
    ///
    /// # Errors
    /// Returns the command's failure, `FOREIGN_KEY_VIOLATION` included.
    pub async fn delete(&self, id: E::Id) -> Result<Deleted<E::Id>, ClientError> {
        let payload = id_payload::<E>(self.actor, &id)?;
        self.queries.mutate(E::ENTITY, E::DELETE, &payload).await
    }
}

/// One line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLineInput {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewOrderBody {
    customer_id: CustomerId,
    lines: Vec<OrderLineRequest>,
}

/// Orders are listed, read and created; never edited.
#[derive(Clone)]
pub struct OrdersClient {
    queries: QueryClient,
    actor: UserId,
}

impl OrdersClient {
    pub(crate) fn new(queries: QueryClient, actor: UserId) -> Self {
        Self { queries, actor }
    }

    /// # Errors
    /// Returns the command's failure.
    pub async fn list(&self, params: ListParams) -> Result<Page<Order>, ClientError> {
        self.queries
            .query(commands::ORDERS_LIST, &params.into_request(self.actor))
            .await
    }

    /// # Errors
    /// Returns the command's failure, `NOT_FOUND` included.
    pub async fn get(&self, id: OrderId) -> Result<OrderDetail, ClientError> {
        let id = serde_json::to_value(id).map_err(ClientError::payload)?;
        let payload = stamped(self.actor, &Map::new(), Some(("orderId", id)))?;
        self.queries.query(commands::ORDERS_GET, &payload).await
    }

    /// Record an order for `customer_id` with `lines`.
    ///
    /// # Errors
    /// Returns the command's failure. Nothing is stored when any line fails.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        lines: &[OrderLineInput],
    ) -> Result<OrderDetail, ClientError> {
        let body = NewOrderBody {
            customer_id,
            lines: lines
                .iter()
                .map(|line| OrderLineRequest {
                    product_id: line.product_id,
                    quantity: line.quantity,
                    price: line.price,
                })
                .collect(),
        };
        let payload = stamped(self.actor, &body, None)?;
        self.queries
            .mutate(Entity::Orders, commands::ORDERS_CREATE, &payload)
            .await
    }
}

#[derive(Serialize)]
struct ReportBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<NaiveDate>,
}

/// Aggregated reports. Results are cached with the orders they summarize.
#[derive(Clone)]
pub struct ReportsClient {
    queries: QueryClient,
    actor: UserId,
}

impl ReportsClient {
    pub(crate) fn new(queries: QueryClient, actor: UserId) -> Self {
        Self { queries, actor }
    }

    /// Daily order totals between `from` and `to`, both inclusive.
    /// Omitted bounds default to the last 30 days.
    ///
    /// # Errors
    /// Returns the command's failure.
    pub async fn orders_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<OrdersReport, ClientError> {
        let payload = stamped(self.actor, &ReportBody { from, to }, None)?;
        self.queries
            .query(commands::REPORTS_ORDERS, &payload)
            .await
    }
}
