//! SQLite-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Order creation writes the header and every line inside one transaction;
//! a failing line rolls the whole order back.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::Page;
use tracing::debug;

use crate::domain::ports::OrderRepository;
use crate::domain::{Error, ListQuery, NewOrder, Order, OrderDetail, OrderId};

use super::diesel_helpers::{LIKE_ESCAPE, diesel_error_for};
use super::error_mapping::map_pool_error;
use super::models::{
    NewOrderLineRow, NewOrderRow, OrderLineTuple, OrderRow, order_line_from_tuple,
};
use super::pool::{DbPool, SqliteConn};
use super::schema::{customers, order_lines, orders, products, users};

const ENTITY: &str = "order";

/// Diesel-backed implementation of the `OrderRepository` port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn load_detail(conn: &mut SqliteConn, id: i64) -> QueryResult<Option<OrderDetail>> {
    let header: Option<(OrderRow, String, String)> = orders::table
        .inner_join(customers::table)
        .inner_join(users::table)
        .filter(orders::id.eq(id))
        .select((OrderRow::as_select(), customers::name, users::name))
        .first(conn)
        .await
        .optional()?;
    let Some((row, customer_name, user_name)) = header else {
        return Ok(None);
    };

    let lines: Vec<OrderLineTuple> = order_lines::table
        .inner_join(products::table)
        .filter(order_lines::order_id.eq(id))
        .select((
            order_lines::product_id,
            products::name,
            order_lines::quantity,
            order_lines::price,
        ))
        .order_by(order_lines::id.asc())
        .load(conn)
        .await?;

    Ok(Some(OrderDetail {
        order: row.into_order(customer_name, user_name),
        lines: lines.into_iter().map(order_line_from_tuple).collect(),
    }))
}

async fn insert_order(conn: &mut SqliteConn, order: &NewOrder) -> QueryResult<i64> {
    let header = NewOrderRow {
        customer_id: order.customer_id().get(),
        user_id: order.user_id().get(),
        total_price: order.total_price(),
        created_at: order.created_at(),
    };
    let order_id: i64 = diesel::insert_into(orders::table)
        .values(&header)
        .returning(orders::id)
        .get_result(conn)
        .await?;

    for line in order.lines() {
        let row = NewOrderLineRow {
            order_id,
            product_id: line.product_id().get(),
            quantity: line.quantity(),
            price: line.price(),
        };
        diesel::insert_into(order_lines::table)
            .values(&row)
            .execute(conn)
            .await?;
    }
    Ok(order_id)
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<Order>, Error> {
        let db_error = diesel_error_for(ENTITY);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = query.like_pattern();
        let page = query.page();

        let total: i64 = orders::table
            .inner_join(customers::table)
            .filter(customers::name.like(&pattern).escape(LIKE_ESCAPE))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(&db_error)?;

        let rows: Vec<(OrderRow, String, String)> = orders::table
            .inner_join(customers::table)
            .inner_join(users::table)
            .filter(customers::name.like(&pattern).escape(LIKE_ESCAPE))
            .select((OrderRow::as_select(), customers::name, users::name))
            .order_by((orders::created_at.desc(), orders::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(&db_error)?;

        let items = rows
            .into_iter()
            .map(|(row, customer_name, user_name)| row.into_order(customer_name, user_name))
            .collect();
        Ok(Page::new(items, total))
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<OrderDetail>, Error> {
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        load_detail(&mut pooled, id.get())
            .await
            .map_err(diesel_error_for(ENTITY))
    }

    async fn create(&self, order: &NewOrder) -> Result<OrderDetail, Error> {
        let db_error = diesel_error_for(ENTITY);
        let mut pooled = self.pool.get().await.map_err(map_pool_error)?;
        let conn: &mut SqliteConn = &mut pooled;

        let order_id = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move { insert_order(conn, order).await }.scope_boxed()
            })
            .await
            .map_err(&db_error)?;
        debug!(order_id, lines = order.lines().len(), "order persisted");

        load_detail(conn, order_id)
            .await
            .map_err(&db_error)?
            .ok_or_else(|| Error::unknown("created order could not be read back"))
    }

    async fn totals_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<(NaiveDateTime, i64)>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        orders::table
            .filter(orders::created_at.ge(from))
            .filter(orders::created_at.lt(to))
            .select((orders::created_at, orders::total_price))
            .order_by(orders::created_at.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))
    }
}
