//! Transaction scope: one checked-out connection, one open transaction.
//!
//! The scope owns its connection until [`TransactionScope::commit`] or
//! [`TransactionScope::rollback`] consumes it. Dropping an uncommitted scope
//! rolls the transaction back and returns the connection to the pool, so
//! every exit path (early return, `?`, panic unwinding) releases it.

use sqlx::{PgConnection, Postgres, Transaction};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{Game, Player, RosterSeasonLink, Shot, Team};
use crate::pool::ConnectionPool;
use crate::repositories::{
    GameRepository, PlayerRepository, RosterRepository, ShotRepository, TeamRepository,
    WriteOutcome, WriteSummary,
};
use crate::schema::SchemaManager;

pub struct TransactionScope {
    tx: Transaction<'static, Postgres>,
}

impl TransactionScope {
    /// Checks out a connection and issues `BEGIN` on it.
    ///
    /// # Errors
    /// Returns `StoreError::Checkout` if no connection is available or the
    /// transaction cannot be started. There is no retry.
    pub async fn begin(pool: &ConnectionPool) -> Result<Self, StoreError> {
        let tx = pool.pg_pool().begin().await.map_err(StoreError::Checkout)?;
        debug!("Transaction scope opened");
        Ok(Self { tx })
    }

    /// Commits and returns the connection to the pool.
    ///
    /// # Errors
    /// Returns an error if `COMMIT` fails; the transaction is then void.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        debug!("Transaction scope committed");
        Ok(())
    }

    /// Rolls back and returns the connection to the pool.
    ///
    /// # Errors
    /// Returns an error if `ROLLBACK` fails.
    pub async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        debug!("Transaction scope rolled back");
        Ok(())
    }

    /// The scope's connection, for statements not covered below.
    pub fn connection(&mut self) -> &mut PgConnection {
        &mut self.tx
    }

    /// # Errors
    /// See [`SchemaManager::create_schema`].
    pub async fn create_schema(&mut self) -> Result<(), StoreError> {
        SchemaManager::create_schema(&mut self.tx).await
    }

    // Writers

    /// # Errors
    /// Returns `StoreError::ConstraintViolation` or `StoreError::Transaction`.
    pub async fn insert_team(&mut self, team: &Team) -> Result<WriteOutcome, StoreError> {
        TeamRepository::insert(&mut self.tx, team).await
    }

    /// # Errors
    /// Returns `StoreError::ConstraintViolation` or `StoreError::Transaction`.
    pub async fn insert_player(&mut self, player: &Player) -> Result<WriteOutcome, StoreError> {
        PlayerRepository::insert(&mut self.tx, player).await
    }

    /// # Errors
    /// Returns `StoreError::ConstraintViolation` or `StoreError::Transaction`.
    pub async fn insert_roster_link(
        &mut self,
        link: &RosterSeasonLink,
    ) -> Result<WriteOutcome, StoreError> {
        RosterRepository::insert(&mut self.tx, link).await
    }

    /// # Errors
    /// Returns `StoreError::ConstraintViolation` or `StoreError::Transaction`.
    pub async fn insert_game(&mut self, game: &Game) -> Result<WriteOutcome, StoreError> {
        GameRepository::insert(&mut self.tx, game).await
    }

    /// # Errors
    /// Returns `StoreError::ConstraintViolation` or `StoreError::Transaction`.
    pub async fn insert_shot(&mut self, shot: &Shot) -> Result<WriteOutcome, StoreError> {
        ShotRepository::insert(&mut self.tx, shot).await
    }

    /// # Errors
    /// Stops at the first hard failure.
    pub async fn insert_teams(&mut self, teams: &[Team]) -> Result<WriteSummary, StoreError> {
        TeamRepository::insert_batch(&mut self.tx, teams).await
    }

    /// # Errors
    /// Stops at the first hard failure.
    pub async fn insert_players(&mut self, players: &[Player]) -> Result<WriteSummary, StoreError> {
        PlayerRepository::insert_batch(&mut self.tx, players).await
    }

    /// # Errors
    /// Stops at the first hard failure.
    pub async fn insert_roster_links(
        &mut self,
        links: &[RosterSeasonLink],
    ) -> Result<WriteSummary, StoreError> {
        RosterRepository::insert_batch(&mut self.tx, links).await
    }

    /// # Errors
    /// Stops at the first hard failure.
    pub async fn insert_games(&mut self, games: &[Game]) -> Result<WriteSummary, StoreError> {
        GameRepository::insert_batch(&mut self.tx, games).await
    }

    /// # Errors
    /// Stops at the first hard failure.
    pub async fn insert_shots(&mut self, shots: &[Shot]) -> Result<WriteSummary, StoreError> {
        ShotRepository::insert_batch(&mut self.tx, shots).await
    }

    // Readers

    /// Distinct game ids recorded for `season`, ascending.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn game_ids_for_season(&mut self, season: &str) -> Result<Vec<i32>, StoreError> {
        GameRepository::ids_for_season(&mut self.tx, season).await
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn team(&mut self, id: &str) -> Result<Option<Team>, StoreError> {
        TeamRepository::get(&mut self.tx, id).await
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn player(&mut self, id: i32) -> Result<Option<Player>, StoreError> {
        PlayerRepository::get(&mut self.tx, id).await
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn roster_link(
        &mut self,
        player_id: i32,
        team_id: &str,
        season: &str,
    ) -> Result<Option<RosterSeasonLink>, StoreError> {
        RosterRepository::get(&mut self.tx, player_id, team_id, season).await
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn game(&mut self, id: i32) -> Result<Option<Game>, StoreError> {
        GameRepository::get(&mut self.tx, id).await
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn shots_for_game(&mut self, game_id: i32) -> Result<Vec<Shot>, StoreError> {
        ShotRepository::for_game(&mut self.tx, game_id).await
    }
}
