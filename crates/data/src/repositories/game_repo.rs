//! Game repository.
//!
//! Last write wins: a game already on file has every non-key column
//! replaced, so score corrections and rescheduling land on the stored row.

use sqlx::PgConnection;
use tracing::debug;

use super::{precheck, write_failed, WriteOutcome, WriteSummary};
use crate::error::StoreError;
use crate::models::{Game, KeyedRecord};

/// Repository for the `games` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameRepository;

impl GameRepository {
    /// Inserts a game or overwrites the stored one with the same id.
    ///
    /// # Errors
    /// Returns `StoreError::ConstraintViolation` if a home or away team is
    /// unknown, or any other database failure.
    pub async fn insert(conn: &mut PgConnection, game: &Game) -> Result<WriteOutcome, StoreError> {
        if let Some(skipped) = precheck(game) {
            return Ok(skipped);
        }

        // xmax is 0 only on a freshly inserted tuple.
        let inserted: bool = sqlx::query_scalar(
            r"
            INSERT INTO games (
                id, date, time,
                home_team_id, away_team_id,
                home_score, away_score,
                round, stage, season, arena, link
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE
            SET date = EXCLUDED.date,
                time = EXCLUDED.time,
                home_team_id = EXCLUDED.home_team_id,
                away_team_id = EXCLUDED.away_team_id,
                home_score = EXCLUDED.home_score,
                away_score = EXCLUDED.away_score,
                round = EXCLUDED.round,
                stage = EXCLUDED.stage,
                season = EXCLUDED.season,
                arena = EXCLUDED.arena,
                link = EXCLUDED.link
            RETURNING (xmax = 0) AS inserted
            ",
        )
        .bind(game.id)
        .bind(game.date)
        .bind(game.time)
        .bind(&game.home_team_id)
        .bind(&game.away_team_id)
        .bind(game.home_score)
        .bind(game.away_score)
        .bind(&game.round)
        .bind(&game.stage)
        .bind(&game.season)
        .bind(&game.arena)
        .bind(&game.link)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| write_failed(Game::ENTITY, game.id.unwrap_or_default(), e))?;

        let outcome = if inserted {
            WriteOutcome::Inserted
        } else {
            WriteOutcome::Updated
        };
        debug!("game {:?}: {:?}", game.id, outcome);
        Ok(outcome)
    }

    /// # Errors
    /// Returns the first hard failure.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        games: &[Game],
    ) -> Result<WriteSummary, StoreError> {
        let mut summary = WriteSummary::default();
        for game in games {
            summary.record(Self::insert(&mut *conn, game).await?);
        }
        Ok(summary)
    }

    /// Returns the distinct ids of the games recorded for `season`, ascending.
    ///
    /// A blank season matches nothing and is answered without a query.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn ids_for_season(
        conn: &mut PgConnection,
        season: &str,
    ) -> Result<Vec<i32>, StoreError> {
        if season.trim().is_empty() {
            return Ok(Vec::new());
        }

        let ids = sqlx::query_scalar::<_, i32>(
            r"
            SELECT DISTINCT id
            FROM games
            WHERE season = $1
            ORDER BY id ASC
            ",
        )
        .bind(season)
        .fetch_all(&mut *conn)
        .await?;

        Ok(ids)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get(conn: &mut PgConnection, id: i32) -> Result<Option<Game>, StoreError> {
        let game = sqlx::query_as::<_, Game>(
            r"
            SELECT id, date, time, home_team_id, away_team_id,
                   home_score, away_score, round, stage, season, arena, link
            FROM games
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(game)
    }
}
