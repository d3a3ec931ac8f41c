//! SQLite-backed `ProductRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::ports::ProductRepository;
use crate::domain::{
    BrandId, CategoryId, Error, ListQuery, Product, ProductDraft, ProductId, ProductSummary,
};

use super::diesel_helpers::{LIKE_ESCAPE, diesel_error_for, expect_deleted};
use super::error_mapping::map_pool_error;
use super::models::{ProductRow, ProductWrite};
use super::pool::DbPool;
use super::schema::{brands, categories, products};

const ENTITY: &str = "product";

/// Diesel-backed implementation of the `ProductRepository` port.
///
/// List rows join brands and categories so the UI can show their names
/// without further round trips.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn write_row(draft: &ProductDraft) -> ProductWrite<'_> {
    ProductWrite {
        name: draft.name(),
        barcode: draft.barcode(),
        price: draft.price(),
        brand_id: draft.brand_id().get(),
        category_id: draft.category_id().get(),
    }
}

fn summary_from_row((row, brand_name, category_name): (ProductRow, String, String)) -> ProductSummary {
    ProductSummary {
        id: ProductId::new(row.id),
        name: row.name,
        barcode: row.barcode,
        price: row.price,
        brand_id: BrandId::new(row.brand_id),
        brand_name,
        category_id: CategoryId::new(row.category_id),
        category_name,
    }
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<ProductSummary>, Error> {
        let db_error = diesel_error_for(ENTITY);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = query.like_pattern();
        let page = query.page();

        let total: i64 = products::table
            .filter(products::name.like(&pattern).escape(LIKE_ESCAPE))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(&db_error)?;

        let rows: Vec<(ProductRow, String, String)> = products::table
            .inner_join(brands::table)
            .inner_join(categories::table)
            .filter(products::name.like(&pattern).escape(LIKE_ESCAPE))
            .select((ProductRow::as_select(), brands::name, categories::name))
            .order_by((products::name.asc(), products::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(&db_error)?;

        Ok(Page::new(
            rows.into_iter().map(summary_from_row).collect(),
            total,
        ))
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .find(id.get())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error_for(ENTITY))?;
        Ok(row.map(Product::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ProductRow> = products::table
            .filter(products::name.eq(name))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error_for(ENTITY))?;
        Ok(row.map(Product::from))
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ProductRow = diesel::insert_into(products::table)
            .values(&write_row(draft))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        Ok(Product::from(row))
    }

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ProductRow = diesel::update(products::table.find(id.get()))
            .set(&write_row(draft))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        Ok(Product::from(row))
    }

    async fn delete(&self, id: ProductId) -> Result<(), Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(products::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        expect_deleted(affected, ENTITY)
    }
}
