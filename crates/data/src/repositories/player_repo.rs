//! Player repository.
//!
//! First write wins, like teams.

use sqlx::PgConnection;
use tracing::debug;

use super::{precheck, write_failed, WriteOutcome, WriteSummary};
use crate::error::StoreError;
use crate::models::{KeyedRecord, Player};

/// Repository for the `players` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerRepository;

impl PlayerRepository {
    /// Inserts a player unless the id is already stored.
    ///
    /// # Errors
    /// Returns an error if the database rejects the statement.
    pub async fn insert(
        conn: &mut PgConnection,
        player: &Player,
    ) -> Result<WriteOutcome, StoreError> {
        if let Some(skipped) = precheck(player) {
            return Ok(skipped);
        }

        let result = sqlx::query(
            r"
            INSERT INTO players (id, name, icon_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(&player.icon_url)
        .execute(&mut *conn)
        .await
        .map_err(|e| write_failed(Player::ENTITY, player.id.unwrap_or_default(), e))?;

        let outcome = WriteOutcome::from_rows_affected(result.rows_affected());
        debug!("player {:?}: {:?}", player.id, outcome);
        Ok(outcome)
    }

    /// # Errors
    /// Returns the first hard failure.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        players: &[Player],
    ) -> Result<WriteSummary, StoreError> {
        let mut summary = WriteSummary::default();
        for player in players {
            summary.record(Self::insert(&mut *conn, player).await?);
        }
        Ok(summary)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get(conn: &mut PgConnection, id: i32) -> Result<Option<Player>, StoreError> {
        let player = sqlx::query_as::<_, Player>(
            r"
            SELECT id, name, icon_url
            FROM players
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(player)
    }
}
