//! Game ids command.
//!
//! Lists the games already stored for a season, one id per line. The
//! scraper uses this to skip box scores it has fetched before.

use anyhow::Result;
use clap::Args;
use nbb_data::{ConnectionPool, StoreError};

/// Arguments for the game-ids command.
#[derive(Args, Debug, Clone)]
pub struct GameIdsArgs {
    /// Season label as stored (e.g. "2023")
    #[arg(long)]
    pub season: String,
}

/// Runs the game-ids command.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn run_game_ids(pool: &ConnectionPool, args: GameIdsArgs) -> Result<()> {
    let season = args.season;
    let ids = pool
        .run_in_scope(move |scope| {
            Box::pin(async move { scope.game_ids_for_season(&season).await })
        })
        .await
        .map_err(|e: StoreError| anyhow::Error::new(e).context("Game id lookup failed"))?;

    tracing::info!("Found {} game(s)", ids.len());
    for id in ids {
        println!("{id}");
    }

    Ok(())
}
