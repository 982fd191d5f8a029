//! Table definitions.
//!
//! Every statement is create-if-absent, so running the whole set against an
//! initialized database changes nothing.

use sqlx::PgConnection;
use tracing::{debug, error, info};

use crate::error::StoreError;

/// Tables in dependency order: referenced tables come first.
const TABLES: [(&str, &str); 5] = [
    (
        "teams",
        r"
        CREATE TABLE IF NOT EXISTS teams (
            id VARCHAR(100) PRIMARY KEY,
            name VARCHAR(50),
            logo TEXT
        )
        ",
    ),
    (
        "players",
        r"
        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY,
            name VARCHAR(50),
            icon_url TEXT
        )
        ",
    ),
    (
        "roster_season_links",
        r"
        CREATE TABLE IF NOT EXISTS roster_season_links (
            player_id INTEGER NOT NULL REFERENCES players(id),
            team_id VARCHAR(100) NOT NULL REFERENCES teams(id),
            season VARCHAR(20) NOT NULL,
            jersey_number VARCHAR(10),
            PRIMARY KEY (player_id, team_id, season)
        )
        ",
    ),
    (
        "games",
        r"
        CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY,
            date DATE,
            time TIME,
            home_team_id VARCHAR(100) REFERENCES teams(id),
            away_team_id VARCHAR(100) REFERENCES teams(id),
            home_score INTEGER,
            away_score INTEGER,
            round VARCHAR(30),
            stage VARCHAR(30),
            season VARCHAR(20),
            arena VARCHAR(100),
            link TEXT
        )
        ",
    ),
    (
        "shots",
        r"
        CREATE TABLE IF NOT EXISTS shots (
            id BIGSERIAL PRIMARY KEY,
            player_id INTEGER NOT NULL REFERENCES players(id),
            game_id INTEGER NOT NULL REFERENCES games(id),
            team_id VARCHAR(100) NOT NULL REFERENCES teams(id),
            quarter VARCHAR(10),
            time TIME,
            shot_type VARCHAR(20),
            x DOUBLE PRECISION,
            y DOUBLE PRECISION
        )
        ",
    ),
];

const INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_games_season ON games (season)",
    "CREATE INDEX IF NOT EXISTS idx_shots_game_id ON shots (game_id)",
];

pub struct SchemaManager;

impl SchemaManager {
    /// Creates every table and index that does not exist yet.
    ///
    /// Runs on the caller's connection; inside a transaction scope the
    /// whole schema is created or none of it is.
    ///
    /// # Errors
    /// Returns the first DDL failure (permissions, malformed statement).
    pub async fn create_schema(conn: &mut PgConnection) -> Result<(), StoreError> {
        for (table, ddl) in TABLES {
            sqlx::query(ddl).execute(&mut *conn).await.map_err(|e| {
                error!("Failed to create table {}: {}", table, e);
                StoreError::from(e)
            })?;
            debug!("Table {} ready", table);
        }

        for ddl in INDEXES {
            sqlx::query(ddl).execute(&mut *conn).await.map_err(|e| {
                error!("Failed to create index: {}", e);
                StoreError::from(e)
            })?;
        }

        info!("Schema ready ({} tables)", TABLES.len());
        Ok(())
    }

    /// Table names in creation order.
    pub fn tables() -> impl Iterator<Item = &'static str> {
        TABLES.iter().map(|(name, _)| *name)
    }
}
