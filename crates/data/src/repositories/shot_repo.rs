//! Shot repository.
//!
//! Append-only: there is no conflict target, identical shots are stored
//! twice.

use sqlx::PgConnection;
use tracing::debug;

use super::{precheck, write_failed, WriteOutcome, WriteSummary};
use crate::error::StoreError;
use crate::models::{KeyedRecord, Shot};

/// Repository for the `shots` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShotRepository;

impl ShotRepository {
    /// Appends a shot. The player, game and team must already exist.
    ///
    /// # Errors
    /// Returns `StoreError::ConstraintViolation` for a dangling reference,
    /// or any other database failure.
    pub async fn insert(conn: &mut PgConnection, shot: &Shot) -> Result<WriteOutcome, StoreError> {
        if let Some(skipped) = precheck(shot) {
            return Ok(skipped);
        }

        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO shots (
                player_id, game_id, team_id,
                quarter, time, shot_type,
                x, y
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(shot.player_id)
        .bind(shot.game_id)
        .bind(&shot.team_id)
        .bind(&shot.quarter)
        .bind(shot.time)
        .bind(&shot.shot_type)
        .bind(shot.x)
        .bind(shot.y)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            let key = format!(
                "by player {} in game {}",
                shot.player_id.unwrap_or_default(),
                shot.game_id.unwrap_or_default()
            );
            write_failed(Shot::ENTITY, key, e)
        })?;

        debug!("shot {} stored for game {:?}", id, shot.game_id);
        Ok(WriteOutcome::Inserted)
    }

    /// # Errors
    /// Returns the first hard failure.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        shots: &[Shot],
    ) -> Result<WriteSummary, StoreError> {
        let mut summary = WriteSummary::default();
        for shot in shots {
            summary.record(Self::insert(&mut *conn, shot).await?);
        }
        Ok(summary)
    }

    /// Shots of one game in insertion order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn for_game(conn: &mut PgConnection, game_id: i32) -> Result<Vec<Shot>, StoreError> {
        let shots = sqlx::query_as::<_, Shot>(
            r"
            SELECT id, player_id, game_id, team_id, quarter, time, shot_type, x, y
            FROM shots
            WHERE game_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(game_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(shots)
    }
}
