//! Test utilities for the backoffice crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests
//! or when the `test-support` feature is enabled.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use serde_json::Value;
use tempfile::TempDir;

use crate::client::{CommandTransport, TransportError};

use crate::domain::ports::UserRepository;
use crate::domain::{NewUser, Role, User};
use crate::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};

/// Clock whose current instant only moves when a test moves it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}",)
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        lock(&self.0)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("test support mutex poisoned"),
    }
}

/// Transport that answers each command with a fixed envelope and records
/// every payload it was sent.
///
/// Commands without a scripted answer fail with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, Value>>,
    sent: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `envelope` from now on.
    pub fn respond(&self, command: &str, envelope: Value) {
        lock(&self.responses).insert(command.to_owned(), envelope);
    }

    /// How many times `command` was sent.
    pub fn calls(&self, command: &str) -> usize {
        lock(&self.sent)
            .iter()
            .filter(|(sent, _)| sent == command)
            .count()
    }

    /// Payloads sent with `command`, oldest first.
    pub fn payloads(&self, command: &str) -> Vec<Value> {
        lock(&self.sent)
            .iter()
            .filter(|(sent, _)| sent == command)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl CommandTransport for ScriptedTransport {
    async fn send(&self, command: &str, payload: Value) -> Result<Value, TransportError> {
        lock(&self.sent).push((command.to_owned(), payload));
        lock(&self.responses)
            .get(command)
            .cloned()
            .ok_or_else(|| TransportError::Transport {
                message: format!("no scripted response for {command}"),
            })
    }
}

/// A migrated SQLite database in a temporary directory.
///
/// The directory, and with it the database, is removed on drop.
pub struct TestDatabase {
    pool: DbPool,
    url: String,
    _dir: TempDir,
}

impl TestDatabase {
    /// Create and migrate a fresh database.
    ///
    /// # Panics
    /// Panics when the temporary directory, migrations or pool cannot be
    /// set up.
    pub async fn new() -> Self {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("temp dir: {error}"),
        };
        let url = dir.path().join("backoffice.sqlite3").display().to_string();
        if let Err(error) = run_pending_migrations(&url).await {
            panic!("migrate test database: {error}");
        }
        let pool = match DbPool::new(PoolConfig::new(url.clone()).with_max_size(2)).await {
            Ok(pool) => pool,
            Err(error) => panic!("test pool: {error}"),
        };
        Self {
            pool,
            url,
            _dir: dir,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of rows currently in `table`.
    ///
    /// # Panics
    /// Panics when the table cannot be counted.
    pub async fn row_count(&self, table: &str) -> i64 {
        #[derive(diesel::QueryableByName)]
        struct Count {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            count: i64,
        }

        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(error) => panic!("checkout: {error}"),
        };
        let query = diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {table}"));
        match diesel_async::RunQueryDsl::get_result::<Count>(query, &mut *conn).await {
            Ok(row) => row.count,
            Err(error) => panic!("count {table}: {error}"),
        }
    }

    /// Insert an account directly through the user repository.
    ///
    /// # Panics
    /// Panics when the account cannot be stored.
    pub async fn seed_user(&self, name: &str, role: Role, password: &str) -> User {
        let user = match NewUser::try_new(name, role, password) {
            Ok(user) => user,
            Err(error) => panic!("invalid seed user: {error}"),
        };
        match DieselUserRepository::new(self.pool()).create(&user).await {
            Ok(user) => user,
            Err(error) => panic!("seed user: {error}"),
        }
    }
}
