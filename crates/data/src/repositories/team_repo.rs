//! Team repository.
//!
//! First write wins: a team already on file is never modified.

use sqlx::PgConnection;
use tracing::debug;

use super::{precheck, write_failed, WriteOutcome, WriteSummary};
use crate::error::StoreError;
use crate::models::{KeyedRecord, Team};

/// Repository for the `teams` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamRepository;

impl TeamRepository {
    /// Inserts a team unless its id is already stored.
    ///
    /// # Errors
    /// Returns an error if the database rejects the statement.
    pub async fn insert(conn: &mut PgConnection, team: &Team) -> Result<WriteOutcome, StoreError> {
        if let Some(skipped) = precheck(team) {
            return Ok(skipped);
        }

        let result = sqlx::query(
            r"
            INSERT INTO teams (id, name, logo)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(&team.id)
        .bind(&team.name)
        .bind(&team.logo)
        .execute(&mut *conn)
        .await
        .map_err(|e| write_failed(Team::ENTITY, team.id.as_deref().unwrap_or_default(), e))?;

        let outcome = WriteOutcome::from_rows_affected(result.rows_affected());
        debug!("team {:?}: {:?}", team.id, outcome);
        Ok(outcome)
    }

    /// Inserts teams in order on the same connection.
    ///
    /// # Errors
    /// Returns the first hard failure; earlier rows are only kept if the
    /// caller commits.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        teams: &[Team],
    ) -> Result<WriteSummary, StoreError> {
        let mut summary = WriteSummary::default();
        for team in teams {
            summary.record(Self::insert(&mut *conn, team).await?);
        }
        Ok(summary)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get(conn: &mut PgConnection, id: &str) -> Result<Option<Team>, StoreError> {
        let team = sqlx::query_as::<_, Team>(
            r"
            SELECT id, name, logo
            FROM teams
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(team)
    }
}
