//! Roster-season repository.

use sqlx::PgConnection;
use tracing::debug;

use super::{precheck, write_failed, WriteOutcome, WriteSummary};
use crate::error::StoreError;
use crate::models::{KeyedRecord, RosterSeasonLink};

/// Repository for `roster_season_links`, keyed by player, team and season.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterRepository;

impl RosterRepository {
    /// Inserts a link unless the same (player, team, season) is stored.
    ///
    /// The player and team must already exist.
    ///
    /// # Errors
    /// Returns `StoreError::ConstraintViolation` for an unknown player or
    /// team, or any other database failure.
    pub async fn insert(
        conn: &mut PgConnection,
        link: &RosterSeasonLink,
    ) -> Result<WriteOutcome, StoreError> {
        if let Some(skipped) = precheck(link) {
            return Ok(skipped);
        }

        let result = sqlx::query(
            r"
            INSERT INTO roster_season_links (player_id, team_id, season, jersey_number)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (player_id, team_id, season) DO NOTHING
            ",
        )
        .bind(link.player_id)
        .bind(&link.team_id)
        .bind(&link.season)
        .bind(&link.jersey_number)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            let key = format!(
                "{}/{}/{}",
                link.player_id.unwrap_or_default(),
                link.team_id.as_deref().unwrap_or_default(),
                link.season.as_deref().unwrap_or_default()
            );
            write_failed(RosterSeasonLink::ENTITY, key, e)
        })?;

        let outcome = WriteOutcome::from_rows_affected(result.rows_affected());
        debug!(
            "roster link {:?}/{:?}/{:?}: {:?}",
            link.player_id, link.team_id, link.season, outcome
        );
        Ok(outcome)
    }

    /// # Errors
    /// Returns the first hard failure.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        links: &[RosterSeasonLink],
    ) -> Result<WriteSummary, StoreError> {
        let mut summary = WriteSummary::default();
        for link in links {
            summary.record(Self::insert(&mut *conn, link).await?);
        }
        Ok(summary)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get(
        conn: &mut PgConnection,
        player_id: i32,
        team_id: &str,
        season: &str,
    ) -> Result<Option<RosterSeasonLink>, StoreError> {
        let link = sqlx::query_as::<_, RosterSeasonLink>(
            r"
            SELECT player_id, team_id, season, jersey_number
            FROM roster_season_links
            WHERE player_id = $1 AND team_id = $2 AND season = $3
            ",
        )
        .bind(player_id)
        .bind(team_id)
        .bind(season)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(link)
    }
}
