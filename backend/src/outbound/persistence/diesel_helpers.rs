//! Shared helpers and macros for Diesel repository implementations.
//!
//! This module provides common utilities for database access including:
//! - Error-mapping closures bound to an entity label
//! - Interpretation of affected-row counts for deletes
//! - A declarative macro for the name-only catalogue tables

use diesel::result::Error as DieselError;

use crate::domain::Error;

use super::error_mapping::map_diesel_error;

/// Escape character used by every `LIKE` filter.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Bind [`map_diesel_error`] to an entity label for use with `map_err`.
pub(crate) fn diesel_error_for(entity: &'static str) -> impl Fn(DieselError) -> Error {
    move |error| map_diesel_error(error, entity)
}

/// Turn the affected-row count of a delete into a result.
pub(crate) fn expect_deleted(affected: usize, entity: &str) -> Result<(), Error> {
    if affected == 0 {
        return Err(Error::not_found(format!("{entity} not found")));
    }
    Ok(())
}

/// Generate a repository for a table holding only `id` and a unique `name`
/// whose list rows count the products referencing it.
///
/// The generated list query left-joins `products` and groups by the primary
/// key so rows without products report a count of zero.
#[macro_export]
macro_rules! named_catalogue_repository {
    (
        $(#[$meta:meta])*
        pub struct $repo:ident;
        port: $port:path,
        table: $table:ident,
        product_fk: $fk:ident,
        entity: $entity:literal,
        row: $row:ty,
        write: $write:ident,
        record: $record:ty,
        summary: $summary:ident,
        id: $id:ty,
        draft: $draft:ty $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: $crate::outbound::persistence::DbPool,
        }

        impl $repo {
            /// Create a new repository with the given connection pool.
            pub fn new(pool: $crate::outbound::persistence::DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait::async_trait]
        impl $port for $repo {
            async fn list(
                &self,
                query: &$crate::domain::ListQuery,
            ) -> Result<pagination::Page<$summary>, $crate::domain::Error> {
                use diesel::dsl::count;
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::diesel_helpers::{LIKE_ESCAPE, diesel_error_for};
                use $crate::outbound::persistence::error_mapping::map_pool_error;
                use $crate::outbound::persistence::schema::{$table, products};

                let db_error = diesel_error_for($entity);
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let pattern = query.like_pattern();
                let page = query.page();

                let total: i64 = $table::table
                    .filter($table::name.like(&pattern).escape(LIKE_ESCAPE))
                    .count()
                    .get_result(&mut conn)
                    .await
                    .map_err(&db_error)?;

                let rows: Vec<(i64, String, i64)> = $table::table
                    .left_join(products::table.on(products::$fk.eq($table::id)))
                    .filter($table::name.like(&pattern).escape(LIKE_ESCAPE))
                    .group_by($table::id)
                    .select(($table::id, $table::name, count(products::id.nullable())))
                    .order_by(($table::name.asc(), $table::id.asc()))
                    .limit(page.limit())
                    .offset(page.offset())
                    .load(&mut conn)
                    .await
                    .map_err(&db_error)?;

                let items = rows
                    .into_iter()
                    .map(|(id, name, product_count)| $summary {
                        id: <$id>::new(id),
                        name,
                        product_count,
                    })
                    .collect();
                Ok(pagination::Page::new(items, total))
            }

            async fn find_by_id(&self, id: $id) -> Result<Option<$record>, $crate::domain::Error> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::diesel_helpers::diesel_error_for;
                use $crate::outbound::persistence::error_mapping::map_pool_error;
                use $crate::outbound::persistence::schema::$table;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: Option<$row> = $table::table
                    .find(id.get())
                    .select(<$row>::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(diesel_error_for($entity))?;
                Ok(row.map(<$record>::from))
            }

            async fn find_by_name(&self, name: &str) -> Result<Option<$record>, $crate::domain::Error> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::diesel_helpers::diesel_error_for;
                use $crate::outbound::persistence::error_mapping::map_pool_error;
                use $crate::outbound::persistence::schema::$table;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: Option<$row> = $table::table
                    .filter($table::name.eq(name))
                    .select(<$row>::as_select())
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(diesel_error_for($entity))?;
                Ok(row.map(<$record>::from))
            }

            async fn create(&self, draft: &$draft) -> Result<$record, $crate::domain::Error> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::diesel_helpers::diesel_error_for;
                use $crate::outbound::persistence::error_mapping::map_pool_error;
                use $crate::outbound::persistence::models::$write;
                use $crate::outbound::persistence::schema::$table;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: $row = diesel::insert_into($table::table)
                    .values(&$write { name: draft.name() })
                    .returning(<$row>::as_returning())
                    .get_result(&mut conn)
                    .await
                    .map_err(diesel_error_for($entity))?;
                Ok(<$record>::from(row))
            }

            async fn update(&self, id: $id, draft: &$draft) -> Result<$record, $crate::domain::Error> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::diesel_helpers::diesel_error_for;
                use $crate::outbound::persistence::error_mapping::map_pool_error;
                use $crate::outbound::persistence::models::$write;
                use $crate::outbound::persistence::schema::$table;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row: $row = diesel::update($table::table.find(id.get()))
                    .set(&$write { name: draft.name() })
                    .returning(<$row>::as_returning())
                    .get_result(&mut conn)
                    .await
                    .map_err(diesel_error_for($entity))?;
                Ok(<$record>::from(row))
            }

            async fn delete(&self, id: $id) -> Result<(), $crate::domain::Error> {
                use diesel::prelude::*;
                use diesel_async::RunQueryDsl;
                use $crate::outbound::persistence::diesel_helpers::{diesel_error_for, expect_deleted};
                use $crate::outbound::persistence::error_mapping::map_pool_error;
                use $crate::outbound::persistence::schema::$table;

                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let affected = diesel::delete($table::table.find(id.get()))
                    .execute(&mut conn)
                    .await
                    .map_err(diesel_error_for($entity))?;
                expect_deleted(affected, $entity)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use rstest::rstest;

    #[rstest]
    fn zero_deleted_rows_is_not_found() {
        let err = expect_deleted(0, "brand").expect_err("nothing deleted");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "brand not found");
    }

    #[rstest]
    fn one_deleted_row_is_success() {
        assert!(expect_deleted(1, "brand").is_ok());
    }

    #[rstest]
    fn bound_mapper_uses_the_entity_label() {
        let map = diesel_error_for("category");
        assert_eq!(map(DieselError::NotFound).message(), "category not found");
    }
}
