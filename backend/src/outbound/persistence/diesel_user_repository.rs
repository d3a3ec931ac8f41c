//! SQLite-backed `UserRepository` implementation using Diesel ORM.
//!
//! Password hashes are only read by `find_credentials`; every other query
//! selects the public columns.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Page;

use crate::domain::ports::UserRepository;
use crate::domain::{Error, ListQuery, NewUser, User, UserChanges, UserCredentials, UserId};

use super::diesel_helpers::{LIKE_ESCAPE, diesel_error_for, expect_deleted};
use super::error_mapping::map_pool_error;
use super::models::{NewUserRow, UserCredentialsRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

const ENTITY: &str = "user";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self, query: &ListQuery) -> Result<Page<User>, Error> {
        let db_error = diesel_error_for(ENTITY);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = query.like_pattern();
        let page = query.page();

        let total: i64 = users::table
            .filter(users::name.like(&pattern).escape(LIKE_ESCAPE))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(&db_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::name.like(&pattern).escape(LIKE_ESCAPE))
            .select(UserRow::as_select())
            .order_by((users::name.asc(), users::id.asc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(&db_error)?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, total))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error_for(ENTITY))?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::name.eq(name))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error_for(ENTITY))?;
        row.map(User::try_from).transpose()
    }

    async fn find_credentials(&self, name: &str) -> Result<Option<UserCredentials>, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserCredentialsRow> = users::table
            .filter(users::name.eq(name))
            .select(UserCredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error_for(ENTITY))?;
        row.map(UserCredentials::try_from).transpose()
    }

    async fn create(&self, user: &NewUser) -> Result<User, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let password_hash = user.password_hash().encode();
        let new_row = NewUserRow {
            name: user.name(),
            role: user.role().as_str(),
            password_hash: &password_hash,
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        User::try_from(row)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let password_hash = changes.password_hash().map(|hash| hash.encode());
        let update = UserUpdate {
            name: changes.name(),
            role: changes.role().as_str(),
            password_hash: password_hash.as_deref(),
        };
        let row: UserRow = diesel::update(users::table.find(id.get()))
            .set(&update)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        User::try_from(row)
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(users::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error_for(ENTITY))?;
        expect_deleted(affected, ENTITY)
    }
}
