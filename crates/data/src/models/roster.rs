//! Player-team-season assignment.

use serde::{Deserialize, Serialize};

use super::{has_id, has_text, text_or_number, KeyedRecord};

/// Links a player to the team they played for in a season.
///
/// Keyed by `(player_id, team_id, season)`; all three are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(default)]
pub struct RosterSeasonLink {
    pub player_id: Option<i32>,
    #[serde(alias = "player_team_id")]
    pub team_id: Option<String>,
    /// Season label as published by the league (e.g. "2023", "2023/2024")
    pub season: Option<String>,
    #[serde(alias = "player_number", deserialize_with = "text_or_number")]
    pub jersey_number: Option<String>,
}

impl RosterSeasonLink {
    pub fn new(player_id: i32, team_id: impl Into<String>, season: impl Into<String>) -> Self {
        Self {
            player_id: Some(player_id),
            team_id: Some(team_id.into()),
            season: Some(season.into()),
            jersey_number: None,
        }
    }

    #[must_use]
    pub fn with_jersey_number(mut self, number: impl Into<String>) -> Self {
        self.jersey_number = Some(number.into());
        self
    }
}

impl KeyedRecord for RosterSeasonLink {
    const ENTITY: &'static str = "roster link";

    fn missing_key(&self) -> Option<&'static str> {
        if !has_id(self.player_id) {
            Some("player_id")
        } else if !has_text(self.team_id.as_ref()) {
            Some("team_id")
        } else if !has_text(self.season.as_ref()) {
            Some("season")
        } else {
            None
        }
    }
}
