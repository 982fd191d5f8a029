//! Bounded PostgreSQL connection pool.
//!
//! One pool is created at process start and handed, by reference or clone,
//! to every unit of work. Cloning is cheap and shares the same connections.

use futures::future::BoxFuture;
use nbb_core::{DatabaseConfig, PoolSettings};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Postgres;
use tracing::{debug, error, info};

use crate::error::StoreError;
use crate::scope::TransactionScope;

#[derive(Debug, Clone)]
pub struct ConnectionPool {
    pool: PgPool,
}

impl ConnectionPool {
    /// Creates the pool from loaded settings.
    ///
    /// # Errors
    /// Returns `StoreError::PoolCreation` if the database is unreachable or
    /// rejects the credentials. Callers treat this as fatal.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        if let Some(schema) = config.schema.as_deref() {
            options = options.options([("search_path", schema)]);
        }

        Self::connect_with(options, config.pool_settings()).await
    }

    /// Creates a pool from explicit connect options.
    ///
    /// # Errors
    /// Returns `StoreError::PoolCreation` if the first connection fails.
    pub async fn connect_with(
        options: PgConnectOptions,
        settings: PoolSettings,
    ) -> Result<Self, StoreError> {
        let target = format!(
            "{}:{}/{}",
            options.get_host(),
            options.get_port(),
            options.get_database().unwrap_or_default()
        );

        let pool = PgPoolOptions::new()
            .min_connections(settings.min_connections)
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|source| {
                error!("Failed to create connection pool for {}: {}", target, source);
                StoreError::PoolCreation {
                    target: target.clone(),
                    source,
                }
            })?;

        info!(
            "Connection pool ready for {} (min {}, max {})",
            target, settings.min_connections, settings.max_connections
        );

        Ok(Self { pool })
    }

    /// Checks out a connection, waiting while every connection is in use.
    ///
    /// # Errors
    /// Returns `StoreError::Checkout` if the acquire timeout elapses or the
    /// pool has been drained.
    pub async fn checkout(&self) -> Result<PoolConnection<Postgres>, StoreError> {
        let conn = self.pool.acquire().await.map_err(StoreError::Checkout)?;
        debug!(
            "Checked out connection (size {}, idle {})",
            self.size(),
            self.idle()
        );
        Ok(conn)
    }

    /// Returns a connection for reuse.
    pub fn checkin(&self, conn: PoolConnection<Postgres>) {
        drop(conn);
        debug!("Checked in connection (size {})", self.size());
    }

    /// Opens a transaction scope on a freshly checked-out connection.
    ///
    /// # Errors
    /// Returns `StoreError::Checkout` if no connection can be obtained or the
    /// transaction cannot be started.
    pub async fn begin(&self) -> Result<TransactionScope, StoreError> {
        TransactionScope::begin(self).await
    }

    /// Runs `work` inside one transaction scope.
    ///
    /// Commits when `work` returns `Ok`. On `Err` the transaction is rolled
    /// back and the error is returned unchanged; a failing rollback is only
    /// logged.
    ///
    /// # Errors
    /// Returns the error produced by `work`, or the checkout/commit failure.
    pub async fn run_in_scope<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut TransactionScope) -> BoxFuture<'s, Result<T, E>>,
        E: From<StoreError> + std::fmt::Display,
    {
        let mut scope = self.begin().await?;

        let outcome = work(&mut scope).await;
        match outcome {
            Ok(value) => {
                scope.commit().await?;
                Ok(value)
            }
            Err(err) => {
                error!("Transaction rolled back: {}", err);
                if let Err(rollback_err) = scope.rollback().await {
                    error!("Rollback failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    /// Closes every connection. Safe to call more than once.
    pub async fn drain(&self) {
        if self.pool.is_closed() {
            return;
        }
        let (size, idle) = (self.size(), self.idle());
        self.pool.close().await;
        info!("Connection pool drained ({} open, {} idle)", size, idle);
    }

    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.pool.is_closed()
    }

    /// Number of open connections, idle or in use.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    #[must_use]
    pub fn idle(&self) -> usize {
        self.pool.num_idle()
    }

    pub(crate) fn pg_pool(&self) -> &PgPool {
        &self.pool
    }
}
