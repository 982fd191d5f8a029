//! Setup command: creates the schema in one transaction.

use anyhow::{Context, Result};
use nbb_data::{ConnectionPool, SchemaManager};

/// Runs schema creation and reports the result on stdout.
///
/// # Errors
/// Returns the schema failure after printing it, so the process exits
/// non-zero.
pub async fn run_setup(pool: &ConnectionPool) -> Result<()> {
    println!("Creating database tables...");

    let result = pool
        .run_in_scope(|scope| Box::pin(scope.create_schema()))
        .await;

    match result {
        Ok(()) => {
            let tables: Vec<_> = SchemaManager::tables().collect();
            println!("Database setup complete ({}).", tables.join(", "));
            Ok(())
        }
        Err(e) => {
            println!("Database setup failed: {e}");
            Err(e).context("Schema creation failed")
        }
    }
}
