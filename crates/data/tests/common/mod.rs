//! Shared harness for database-backed tests.
//!
//! Run with: TEST_DATABASE_URL=postgres://... cargo test -p nbb-data -- --ignored
//!
//! Each test gets its own schema on the connection's `search_path`, dropped
//! again on teardown, so tests never see each other's rows.

#![allow(dead_code)]

use std::time::Duration;

use nbb_core::PoolSettings;
use nbb_data::{ConnectionPool, StoreError};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};

pub struct TestDb {
    pub pool: ConnectionPool,
    base: PgConnectOptions,
    schema: String,
}

impl TestDb {
    /// Empty schema, no tables.
    pub async fn empty() -> Self {
        Self::with_settings(PoolSettings {
            min_connections: 1,
            max_connections: 4,
            acquire_timeout: Duration::from_secs(5),
        })
        .await
    }

    /// Empty schema served by a pool sized by `settings`.
    pub async fn with_settings(settings: PoolSettings) -> Self {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL required");
        let base: PgConnectOptions = url.parse().expect("invalid TEST_DATABASE_URL");
        let schema = format!("nbb_test_{}", uuid::Uuid::new_v4().simple());

        let mut admin = PgConnection::connect_with(&base)
            .await
            .expect("admin connection failed");
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&mut admin)
            .await
            .expect("create schema failed");
        admin.close().await.expect("close failed");

        let pool = ConnectionPool::connect_with(
            base.clone().options([("search_path", schema.as_str())]),
            settings,
        )
        .await
        .expect("pool creation failed");

        Self { pool, base, schema }
    }

    /// Schema with all tables created.
    pub async fn ready() -> Self {
        let db = Self::empty().await;
        db.pool
            .run_in_scope(|scope| Box::pin(scope.create_schema()))
            .await
            .expect("schema creation failed");
        db
    }

    pub async fn count(&self, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let mut scope = self.pool.begin().await.expect("begin failed");
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(scope.connection())
            .await
            .expect("count failed");
        scope.commit().await.expect("commit failed");
        count
    }

    pub async fn teardown(self) {
        self.pool.drain().await;

        let mut admin = PgConnection::connect_with(&self.base)
            .await
            .expect("admin connection failed");
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&mut admin)
            .await
            .expect("drop schema failed");
        admin.close().await.expect("close failed");
    }
}

/// Error used to abort a scope from test code.
pub fn abort() -> StoreError {
    StoreError::Transaction(sqlx::Error::Protocol("aborted by test".to_string()))
}
