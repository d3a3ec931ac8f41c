//! SQLite-backed `CustomerRepository` implementation using Diesel ORM.
//!
//! List rows carry the number of orders each customer has placed, computed
//! in the page query itself.

use async_trait::async_trait;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::ports::CustomerRepository;
use crate::domain::{Customer, CustomerDraft, CustomerId, CustomerSummary, Error, ListQuery};

use super::diesel_helpers::{LIKE_ESCAPE, diesel_error_for, expect_deleted};
use super::error_mapping::map_pool_error;
use super::models::{CustomerRow, CustomerWrite};
use super::pool::DbPool;
use super::schema::{customers, orders};

const ENTITY: &str = "customer";

/// Diesel-backed implementation of the `CustomerRepository` port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn write_row(draft: &CustomerDraft) -> CustomerWrite<'_> {
    CustomerWrite {
        name: draft.name(),
        phone: draft.phone(),
        email: draft.email(),
    }
}

type SummaryTuple = (i64, String, Option<String>, Option<String>, i64);

fn summary_from_tuple((id, name, phone, email, order_count): SummaryTuple) -> CustomerSummary {
    CustomerSummary {
        id: CustomerId::new(id),
        name,
        phone,
        email,
        order_count,
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<CustomerSummary>, Error> {
        let db_error = diesel_error_for(ENTITY);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = query.like_pattern();
        let page = query.page();

        let total: i64 = customers::table
            .filter(customers::name.like(&pattern).escape(LIKE_ESCAPE))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(&db_error)?;

        let rows: Vec<SummaryTuple> = customers::table
            .left_join(orders::table)
            .filter(customers::name.like(&pattern).escape(LIKE_ESCAPE))
            .group_by(customers::id)
            .select((
                customers::id,
                customers::name,
                customers::phone,
                customers::email,
                count(orders::id.nullable()),
            ))
            .order_by((customers::name.asc(), customers::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(&db_error)?;

        Ok(Page::new(
            rows.into_iter().map(summary_from_tuple).collect(),
            total,
        ))
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CustomerRow> = customers::table
            .find(id.get())
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error_for(ENTITY))?;
        Ok(row.map(Customer::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CustomerRow> = customers::table
            .filter(customers::name.eq(name))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error_for(ENTITY))?;
        Ok(row.map(Customer::from))
    }

    async fn create(&self, draft: &CustomerDraft) -> Result<Customer, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CustomerRow = diesel::insert_into(customers::table)
            .values(&write_row(draft))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        Ok(Customer::from(row))
    }

    async fn update(&self, id: CustomerId, draft: &CustomerDraft) -> Result<Customer, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: CustomerRow = diesel::update(customers::table.find(id.get()))
            .set(&write_row(draft))
            .returning(CustomerRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        Ok(Customer::from(row))
    }

    async fn delete(&self, id: CustomerId) -> Result<(), Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(customers::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        expect_deleted(affected, ENTITY)
    }
}
