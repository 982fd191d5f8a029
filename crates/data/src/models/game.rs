//! Game record.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{has_id, KeyedRecord};

/// A scheduled or played game.
///
/// Scores and metadata change after the first scrape (live to final score,
/// rescheduling), so a later write with the same id replaces every other
/// column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct Game {
    #[serde(alias = "game_id")]
    pub id: Option<i32>,
    #[serde(alias = "game_date")]
    pub date: Option<NaiveDate>,
    /// Local tip-off time
    #[serde(alias = "game_time")]
    pub time: Option<NaiveTime>,
    pub home_team_id: Option<String>,
    pub away_team_id: Option<String>,
    #[serde(alias = "home_team_score")]
    pub home_score: Option<i32>,
    #[serde(alias = "away_team_score")]
    pub away_score: Option<i32>,
    pub round: Option<String>,
    /// Competition phase (e.g. "Fase de classificação", "Playoffs")
    pub stage: Option<String>,
    pub season: Option<String>,
    pub arena: Option<String>,
    /// Box score page the record was scraped from
    pub link: Option<String>,
}

impl Game {
    #[must_use]
    pub fn new(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_teams(mut self, home: impl Into<String>, away: impl Into<String>) -> Self {
        self.home_team_id = Some(home.into());
        self.away_team_id = Some(away.into());
        self
    }

    #[must_use]
    pub fn with_score(mut self, home: i32, away: i32) -> Self {
        self.home_score = Some(home);
        self.away_score = Some(away);
        self
    }

    #[must_use]
    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    #[must_use]
    pub fn with_schedule(mut self, date: NaiveDate, time: NaiveTime) -> Self {
        self.date = Some(date);
        self.time = Some(time);
        self
    }
}

impl KeyedRecord for Game {
    const ENTITY: &'static str = "game";

    fn missing_key(&self) -> Option<&'static str> {
        (!has_id(self.id)).then_some("id")
    }
}
